mod commands;

use clap::{Args, Parser, Subcommand};
use cloudstack_provider::RawConfig;
use serde_json::Value;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "cloudstack")]
#[command(about = "CloudStack プロバイダの設定確認と API 呼び出し", long_about = None)]
struct Cli {
    #[command(flatten)]
    provider: ProviderArgs,

    #[command(subcommand)]
    command: Commands,
}

/// プロバイダブロックに相当する接続設定
///
/// 未指定の項目は CLOUDSTACK_* 環境変数で補完される。
#[derive(Args, Debug, Default)]
struct ProviderArgs {
    /// API の URL（CLOUDSTACK_API_URL）
    #[arg(long, conflicts_with_all = ["config", "profile"])]
    api_url: Option<String>,
    /// API キー（CLOUDSTACK_API_KEY）
    #[arg(long, conflicts_with_all = ["config", "profile"])]
    api_key: Option<String>,
    /// シークレットキー（CLOUDSTACK_SECRET_KEY）
    #[arg(long, conflicts_with_all = ["config", "profile"])]
    secret_key: Option<String>,
    /// プロファイルファイル（INI 形式）のパス
    #[arg(long)]
    config: Option<PathBuf>,
    /// プロファイルファイル内のセクション名
    #[arg(long)]
    profile: Option<String>,
    /// すべての API 呼び出しを GET で送る（CLOUDSTACK_HTTP_GET_ONLY）
    #[arg(long, num_args = 0..=1, require_equals = true, default_missing_value = "true")]
    http_get_only: Option<bool>,
    /// 非同期ジョブのタイムアウト秒数（CLOUDSTACK_TIMEOUT）
    #[arg(long)]
    timeout: Option<u64>,
}

impl ProviderArgs {
    /// 指定されたフラグだけをプロバイダブロックに変換
    fn to_raw(&self) -> RawConfig {
        let mut raw = RawConfig::new();
        let mut set = |key: &str, value: Option<Value>| {
            if let Some(value) = value {
                raw.insert(key.to_string(), value);
            }
        };

        set("api_url", self.api_url.clone().map(Value::from));
        set("api_key", self.api_key.clone().map(Value::from));
        set("secret_key", self.secret_key.clone().map(Value::from));
        set(
            "config",
            self.config
                .as_ref()
                .map(|p| Value::from(p.display().to_string())),
        );
        set("profile", self.profile.clone().map(Value::from));
        set("http_get_only", self.http_get_only.map(Value::from));
        set("timeout", self.timeout.map(Value::from));
        raw
    }
}

#[derive(Subcommand)]
enum Commands {
    /// 認証情報を解決して表示
    Check {
        /// API に接続して認証を確認する
        #[arg(long)]
        auth: bool,
    },
    /// プロバイダ設定のスキーマを表示
    Schema,
    /// 登録されているリソースタイプの一覧を表示
    Resources,
    /// リソースタイプの既存オブジェクトを一覧表示
    List {
        /// リソースタイプ（例: cloudstack_network）
        resource_type: String,
        /// 追加パラメータ（key=value）
        #[arg(value_parser = commands::parse_key_val)]
        params: Vec<(String, String)>,
    },
    /// 任意の API コマンドを実行
    Api {
        /// API コマンド名（例: listZones）
        command: String,
        /// パラメータ（key=value）
        #[arg(value_parser = commands::parse_key_val)]
        params: Vec<(String, String)>,
        /// 非同期ジョブの完了まで待つ
        #[arg(long = "async")]
        wait: bool,
    },
    /// バージョン情報を表示
    Version,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // ログは stderr に出力（stdout は JSON 出力に使う）
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let raw = cli.provider.to_raw();
    tracing::debug!(keys = ?raw.keys().collect::<Vec<_>>(), "Provider flags");

    match cli.command {
        Commands::Version => {
            println!("cloudstack {}", env!("CARGO_PKG_VERSION"));
        }
        Commands::Schema => commands::schema::handle(),
        Commands::Resources => commands::resources::handle(),
        Commands::Check { auth } => commands::check::handle(&raw, auth).await?,
        Commands::List {
            resource_type,
            params,
        } => commands::api::handle_list(&raw, &resource_type, params).await?,
        Commands::Api {
            command,
            params,
            wait,
        } => commands::api::handle_call(&raw, &command, params, wait).await?,
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_raw_only_includes_set_flags() {
        let args = ProviderArgs {
            api_url: Some("https://cloud.example.com/client/api".to_string()),
            timeout: Some(60),
            ..Default::default()
        };
        let raw = args.to_raw();

        assert_eq!(raw.len(), 2);
        assert_eq!(raw["api_url"], "https://cloud.example.com/client/api");
        assert_eq!(raw["timeout"], 60);
    }

    #[test]
    fn test_cli_conflicts() {
        let result = Cli::try_parse_from([
            "cloudstack",
            "--api-key",
            "key",
            "--profile",
            "lab",
            "check",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_http_get_only_flag_without_value() {
        let cli = Cli::try_parse_from(["cloudstack", "--http-get-only", "check"]).unwrap();
        assert_eq!(cli.provider.http_get_only, Some(true));
    }
}
