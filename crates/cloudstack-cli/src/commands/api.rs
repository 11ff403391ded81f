use super::to_params;
use cloudstack_provider::{CloudStackProvider, RawConfig, ResourceProvider};
use colored::Colorize;

pub async fn handle_list(
    raw: &RawConfig,
    resource_type: &str,
    params: Vec<(String, String)>,
) -> anyhow::Result<()> {
    let provider = CloudStackProvider::new();
    // 接続前にタイプ名を検証
    provider.resources().get(resource_type)?;

    let client = provider.configure(raw)?;
    let items = provider
        .list_resources(&client, resource_type, to_params(params))
        .await?;

    eprintln!(
        "{}",
        format!("{}: {} 件", resource_type, items.len()).dimmed()
    );
    println!("{}", serde_json::to_string_pretty(&items)?);
    Ok(())
}

pub async fn handle_call(
    raw: &RawConfig,
    command: &str,
    params: Vec<(String, String)>,
    wait: bool,
) -> anyhow::Result<()> {
    let provider = CloudStackProvider::new();
    let client = provider.configure(raw)?;

    let result = if wait {
        client.request_async(command, to_params(params)).await?
    } else {
        client.request(command, to_params(params)).await?
    };

    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}
