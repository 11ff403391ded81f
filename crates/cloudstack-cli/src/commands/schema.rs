use cloudstack_provider::ProviderSchema;
use colored::Colorize;

pub fn handle() {
    let schema = ProviderSchema::cloudstack();

    println!("{}", "プロバイダ設定:".bold());
    for field in schema.fields() {
        let mut notes = vec![field.value_type.to_string()];
        notes.push(if field.required { "required" } else { "optional" }.to_string());
        if let Some(env) = field.env {
            notes.push(format!("env: {}", env));
        }
        if let Some(default) = &field.default {
            notes.push(format!("default: {}", default));
        }

        println!(
            "  {:<14} {}  {}",
            field.name.cyan(),
            format!("[{}]", notes.join(", ")).dimmed(),
            field.description
        );
        if !field.conflicts_with.is_empty() {
            println!(
                "  {:<14} {} {}",
                "",
                "conflicts with:".yellow(),
                field.conflicts_with.join(", ")
            );
        }
    }
}
