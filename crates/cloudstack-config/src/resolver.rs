//! 認証情報リゾルバ
//!
//! 直接指定された値（api_url / api_key / secret_key）か、
//! プロファイルファイル（config + profile）のどちらかから
//! [`ProviderConfig`] を組み立てる。
//!
//! 解決順序:
//! 1. 未指定の直接フィールドを環境変数で補完
//! 2. config と profile が両方指定されていればプロファイルの値で上書き
//! 3. URL / キー / シークレットのいずれかが空ならエラー

use crate::env::{self, DEFAULT_TIMEOUT_SECS};
use crate::error::{ConfigError, Result};
use crate::profile::load_profile;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

/// リゾルバへの入力（未解決の設定値）
#[derive(Clone, Default)]
pub struct CredentialInput {
    pub api_url: Option<String>,
    pub api_key: Option<String>,
    pub secret_key: Option<String>,
    pub config: Option<PathBuf>,
    pub profile: Option<String>,
    pub http_get_only: Option<bool>,
    pub timeout: Option<u64>,
}

impl std::fmt::Debug for CredentialInput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialInput")
            .field("api_url", &self.api_url)
            .field("api_key", &self.api_key)
            .field("secret_key", &self.secret_key.as_ref().map(|_| "********"))
            .field("config", &self.config)
            .field("profile", &self.profile)
            .field("http_get_only", &self.http_get_only)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl CredentialInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn api_url(mut self, value: impl Into<String>) -> Self {
        self.api_url = Some(value.into());
        self
    }

    pub fn api_key(mut self, value: impl Into<String>) -> Self {
        self.api_key = Some(value.into());
        self
    }

    pub fn secret_key(mut self, value: impl Into<String>) -> Self {
        self.secret_key = Some(value.into());
        self
    }

    pub fn config(mut self, path: impl Into<PathBuf>) -> Self {
        self.config = Some(path.into());
        self
    }

    pub fn profile(mut self, name: impl Into<String>) -> Self {
        self.profile = Some(name.into());
        self
    }

    pub fn http_get_only(mut self, value: bool) -> Self {
        self.http_get_only = Some(value);
        self
    }

    pub fn timeout(mut self, secs: u64) -> Self {
        self.timeout = Some(secs);
        self
    }

    /// 未指定のフィールドを `CLOUDSTACK_*` 環境変数で補完
    ///
    /// 明示的に指定された値が常に優先される。空文字は未指定扱い。
    pub fn with_env_defaults(mut self) -> Result<Self> {
        fill(&mut self.api_url, env::ENV_API_URL);
        fill(&mut self.api_key, env::ENV_API_KEY);
        fill(&mut self.secret_key, env::ENV_SECRET_KEY);

        if self.http_get_only.is_none() {
            self.http_get_only = env::bool_var(env::ENV_HTTP_GET_ONLY)?;
        }
        if self.timeout.is_none() {
            self.timeout = env::u64_var(env::ENV_TIMEOUT)?;
        }
        Ok(self)
    }
}

fn fill(field: &mut Option<String>, var: &str) {
    if field.as_deref().is_none_or(str::is_empty) {
        *field = env::var(var);
    }
}

/// 解決済みのプロバイダ設定
///
/// プロバイダの初期化時に一度だけ作られ、以後は変更されない。
#[derive(Clone, PartialEq, Eq)]
pub struct ProviderConfig {
    pub api_url: String,
    pub api_key: String,
    pub secret_key: String,
    /// true の場合、すべての API 呼び出しを GET で送る
    pub http_get_only: bool,
    /// 非同期ジョブの完了を待つ上限
    pub timeout: Duration,
}

impl ProviderConfig {
    pub fn new(
        api_url: impl Into<String>,
        api_key: impl Into<String>,
        secret_key: impl Into<String>,
    ) -> Self {
        Self {
            api_url: api_url.into(),
            api_key: api_key.into(),
            secret_key: secret_key.into(),
            http_get_only: false,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    pub fn with_http_get_only(mut self, http_get_only: bool) -> Self {
        self.http_get_only = http_get_only;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// 表示用にマスクしたシークレットキー（末尾4文字のみ）
    ///
    /// ログには出さない。`Debug` は全体を伏せる。
    pub fn masked_secret(&self) -> String {
        let chars: Vec<char> = self.secret_key.chars().collect();
        if chars.len() <= 4 {
            return "*".repeat(chars.len());
        }
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("{}{}", "*".repeat(8), tail)
    }
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("api_url", &self.api_url)
            .field("api_key", &self.api_key)
            .field("secret_key", &"********")
            .field("http_get_only", &self.http_get_only)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// 入力を環境変数で補完してから [`ProviderConfig`] に解決する
#[instrument(skip(input))]
pub fn resolve(input: CredentialInput) -> Result<ProviderConfig> {
    resolve_without_env(input.with_env_defaults()?)
}

/// 環境変数を参照せずに解決する
pub fn resolve_without_env(input: CredentialInput) -> Result<ProviderConfig> {
    let CredentialInput {
        mut api_url,
        mut api_key,
        mut secret_key,
        config,
        profile,
        http_get_only,
        timeout,
    } = input;

    // 空文字は未指定扱い
    let config = config.filter(|path| !path.as_os_str().is_empty());
    let profile = profile.filter(|name| !name.is_empty());

    match (config, profile) {
        (Some(path), Some(name)) => {
            let section = load_profile(&path, &name)?;
            info!(profile = %name, path = %path.display(), "Using credentials from profile");
            api_url = Some(section.url);
            api_key = Some(section.api_key);
            secret_key = Some(section.secret_key);
        }
        (Some(path), None) => {
            warn!(
                path = %path.display(),
                "config is set without profile; ignoring profile file"
            );
        }
        (None, Some(name)) => {
            warn!(profile = %name, "profile is set without config; ignoring profile");
        }
        (None, None) => {
            debug!("Using directly supplied credentials");
        }
    }

    let api_url = api_url.unwrap_or_default();
    let api_key = api_key.unwrap_or_default();
    let secret_key = secret_key.unwrap_or_default();

    let missing: Vec<&'static str> = [
        ("api_url", &api_url),
        ("api_key", &api_key),
        ("secret_key", &secret_key),
    ]
    .into_iter()
    .filter(|(_, value)| value.is_empty())
    .map(|(name, _)| name)
    .collect();

    if !missing.is_empty() {
        return Err(ConfigError::MissingCredentials(missing));
    }

    let config = ProviderConfig {
        api_url,
        api_key,
        secret_key,
        http_get_only: http_get_only.unwrap_or(false),
        timeout: Duration::from_secs(timeout.unwrap_or(DEFAULT_TIMEOUT_SECS)),
    };
    debug!(?config, "Resolved provider config");
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::{ENV_API_KEY, ENV_API_URL, ENV_HTTP_GET_ONLY, ENV_SECRET_KEY, ENV_TIMEOUT};
    use serial_test::serial;
    use std::fs;

    const ALL_VARS: [&str; 5] = [
        ENV_API_URL,
        ENV_API_KEY,
        ENV_SECRET_KEY,
        ENV_HTTP_GET_ONLY,
        ENV_TIMEOUT,
    ];

    /// CLOUDSTACK_* をすべて未設定にした状態で実行
    fn without_env<R>(f: impl FnOnce() -> R) -> R {
        let vars: Vec<(&str, Option<&str>)> = ALL_VARS.iter().map(|v| (*v, None)).collect();
        temp_env::with_vars(vars, f)
    }

    fn direct_input() -> CredentialInput {
        CredentialInput::new()
            .api_url("https://cloud.example.com/client/api")
            .api_key("direct-key")
            .secret_key("direct-secret")
    }

    fn write_profiles() -> (tempfile::TempDir, PathBuf) {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("config");
        fs::write(
            &path,
            "[lab]\nurl = http://lab.local:8080/client/api\napikey = lab-key\nsecretkey = lab-secret\n",
        )
        .unwrap();
        (temp_dir, path)
    }

    #[test]
    #[serial]
    fn test_direct_fields_unchanged() {
        without_env(|| {
            let config = resolve(direct_input().http_get_only(true).timeout(60)).unwrap();

            assert_eq!(config.api_url, "https://cloud.example.com/client/api");
            assert_eq!(config.api_key, "direct-key");
            assert_eq!(config.secret_key, "direct-secret");
            assert!(config.http_get_only);
            assert_eq!(config.timeout, Duration::from_secs(60));
        });
    }

    #[test]
    #[serial]
    fn test_defaults() {
        without_env(|| {
            let config = resolve(direct_input()).unwrap();
            assert!(!config.http_get_only);
            assert_eq!(config.timeout, Duration::from_secs(900));
        });
    }

    #[test]
    #[serial]
    fn test_profile_overrides_direct_fields() {
        let (_dir, path) = write_profiles();
        without_env(|| {
            let config = resolve(direct_input().config(&path).profile("lab")).unwrap();

            assert_eq!(config.api_url, "http://lab.local:8080/client/api");
            assert_eq!(config.api_key, "lab-key");
            assert_eq!(config.secret_key, "lab-secret");
        });
    }

    #[test]
    #[serial]
    fn test_profile_overrides_env() {
        let (_dir, path) = write_profiles();
        temp_env::with_vars(
            [
                (ENV_API_URL, Some("https://env.example.com/client/api")),
                (ENV_API_KEY, Some("env-key")),
                (ENV_SECRET_KEY, Some("env-secret")),
            ],
            || {
                let config = resolve(CredentialInput::new().config(&path).profile("lab")).unwrap();
                assert_eq!(config.api_key, "lab-key");
            },
        );
    }

    #[test]
    #[serial]
    fn test_unknown_profile_fails() {
        let (_dir, path) = write_profiles();
        without_env(|| {
            let result = resolve(CredentialInput::new().config(&path).profile("prod"));
            assert!(matches!(result, Err(ConfigError::ProfileNotFound { .. })));
        });
    }

    #[test]
    #[serial]
    fn test_unreadable_file_fails() {
        let temp_dir = tempfile::tempdir().unwrap();
        without_env(|| {
            let result = resolve(
                CredentialInput::new()
                    .config(temp_dir.path().join("missing.ini"))
                    .profile("lab"),
            );
            assert!(matches!(result, Err(ConfigError::ProfileLoad { .. })));
        });
    }

    #[test]
    #[serial]
    fn test_no_credentials_fails() {
        without_env(|| {
            let result = resolve(CredentialInput::new());
            match result {
                Err(ConfigError::MissingCredentials(missing)) => {
                    assert_eq!(missing, vec!["api_url", "api_key", "secret_key"]);
                }
                other => panic!("Expected MissingCredentials, got {:?}", other),
            }
        });
    }

    #[test]
    #[serial]
    fn test_partial_credentials_report_missing_fields() {
        without_env(|| {
            let result = resolve(
                CredentialInput::new()
                    .api_url("https://cloud.example.com/client/api")
                    .api_key(""),
            );
            match result {
                Err(ConfigError::MissingCredentials(missing)) => {
                    assert_eq!(missing, vec!["api_key", "secret_key"]);
                }
                other => panic!("Expected MissingCredentials, got {:?}", other),
            }
        });
    }

    #[test]
    #[serial]
    fn test_env_defaults_fill_unset_fields() {
        temp_env::with_vars(
            [
                (ENV_API_URL, Some("https://env.example.com/client/api")),
                (ENV_API_KEY, Some("env-key")),
                (ENV_SECRET_KEY, Some("env-secret")),
                (ENV_HTTP_GET_ONLY, Some("true")),
                (ENV_TIMEOUT, Some("120")),
            ],
            || {
                let config = resolve(CredentialInput::new().api_key("explicit-key")).unwrap();

                assert_eq!(config.api_url, "https://env.example.com/client/api");
                assert_eq!(config.api_key, "explicit-key");
                assert_eq!(config.secret_key, "env-secret");
                assert!(config.http_get_only);
                assert_eq!(config.timeout, Duration::from_secs(120));
            },
        );
    }

    #[test]
    #[serial]
    fn test_explicit_flags_win_over_env() {
        temp_env::with_vars(
            [(ENV_HTTP_GET_ONLY, Some("true")), (ENV_TIMEOUT, Some("120"))],
            || {
                let input = direct_input().http_get_only(false).timeout(30);
                let config = resolve(input).unwrap();
                assert!(!config.http_get_only);
                assert_eq!(config.timeout, Duration::from_secs(30));
            },
        );
    }

    #[test]
    #[serial]
    fn test_config_without_profile_uses_direct_fields() {
        let (_dir, path) = write_profiles();
        without_env(|| {
            let config = resolve(direct_input().config(&path)).unwrap();
            assert_eq!(config.api_key, "direct-key");
        });
    }

    #[test]
    #[serial]
    fn test_empty_config_and_profile_are_unset() {
        temp_env::with_vars(
            [
                (ENV_API_URL, Some("https://env.example.com/client/api")),
                (ENV_API_KEY, Some("env-key")),
                (ENV_SECRET_KEY, Some("env-secret")),
                (ENV_HTTP_GET_ONLY, None),
                (ENV_TIMEOUT, None),
            ],
            || {
                let config = resolve(CredentialInput::new().config("").profile("lab")).unwrap();
                assert_eq!(config.api_url, "https://env.example.com/client/api");
                assert_eq!(config.api_key, "env-key");

                let config = resolve(CredentialInput::new().config("").profile("")).unwrap();
                assert_eq!(config.secret_key, "env-secret");
            },
        );
    }

    #[test]
    fn test_masked_secret() {
        let config = ProviderConfig::new("u", "k", "abcdefghijkl");
        assert_eq!(config.masked_secret(), "********ijkl");
        assert!(!format!("{:?}", config).contains("abcdefgh"));

        let short = ProviderConfig::new("u", "k", "abc");
        assert_eq!(short.masked_secret(), "***");
    }

    #[test]
    fn test_debug_hides_whole_secret() {
        let config = ProviderConfig::new("u", "k", "s3cr3");
        let debug = format!("{:?}", config);
        assert!(!debug.contains("3cr3"));
        assert!(debug.contains("\"********\""));
    }
}
