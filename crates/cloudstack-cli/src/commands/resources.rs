use cloudstack_provider::{CloudStackProvider, ResourceProvider};
use colored::Colorize;

pub fn handle() {
    let provider = CloudStackProvider::new();
    let resources = provider.resources();

    println!(
        "{} ({} 種類)",
        provider.display_name().bold(),
        resources.len()
    );
    for resource_type in resources.iter() {
        println!(
            "  {:<34} {:<26} {}",
            resource_type.name().cyan(),
            resource_type.list_command().dimmed(),
            resource_type.description()
        );
    }
}
