use cloudstack_client::CloudStackClient;
use cloudstack_provider::{CloudStackProvider, RawConfig, ResourceProvider};
use colored::Colorize;

pub async fn handle(raw: &RawConfig, auth: bool) -> anyhow::Result<()> {
    let provider = CloudStackProvider::new();
    let config = provider.resolve(raw)?;

    println!("{}", "✓ 認証情報を解決しました".green());
    println!("  {:<14} {}", "API URL:", config.api_url.cyan());
    println!("  {:<14} {}", "API Key:", config.api_key);
    println!("  {:<14} {}", "Secret Key:", config.masked_secret());
    println!("  {:<14} {}", "HTTP GET only:", config.http_get_only);
    println!("  {:<14} {}s", "Timeout:", config.timeout.as_secs());

    if !auth {
        return Ok(());
    }

    let client = CloudStackClient::new(&config)?;
    let status = provider.check_auth(&client).await?;
    println!();
    if status.authenticated {
        println!("{} {}", "✓ 認証に成功しました:".green(), status.api_url);
        println!(
            "  {:<14} {}",
            "CloudStack:",
            status.server_version.as_deref().unwrap_or("不明")
        );
        Ok(())
    } else {
        anyhow::bail!(
            "認証に失敗しました: {}",
            status.error.unwrap_or_else(|| "不明なエラー".to_string())
        )
    }
}
