//! 環境変数によるデフォルト値

use crate::error::{ConfigError, Result};

pub const ENV_API_URL: &str = "CLOUDSTACK_API_URL";
pub const ENV_API_KEY: &str = "CLOUDSTACK_API_KEY";
pub const ENV_SECRET_KEY: &str = "CLOUDSTACK_SECRET_KEY";
pub const ENV_HTTP_GET_ONLY: &str = "CLOUDSTACK_HTTP_GET_ONLY";
pub const ENV_TIMEOUT: &str = "CLOUDSTACK_TIMEOUT";

/// 非同期ジョブのタイムアウト（秒）のデフォルト
pub const DEFAULT_TIMEOUT_SECS: u64 = 900;

/// 環境変数を読む。未設定・空文字は `None`
pub(crate) fn var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

pub(crate) fn bool_var(name: &'static str) -> Result<Option<bool>> {
    match var(name) {
        None => Ok(None),
        Some(value) => parse_bool(&value)
            .map(Some)
            .ok_or(ConfigError::InvalidEnvValue { var: name, value }),
    }
}

pub(crate) fn u64_var(name: &'static str) -> Result<Option<u64>> {
    match var(name) {
        None => Ok(None),
        Some(value) => value
            .trim()
            .parse::<u64>()
            .map(Some)
            .map_err(|_| ConfigError::InvalidEnvValue { var: name, value }),
    }
}

/// 真偽値の文字列表現をパース
///
/// `1`, `t`, `T`, `TRUE`, `true`, `True` と、それぞれの偽の形を受け付ける。
pub fn parse_bool(value: &str) -> Option<bool> {
    match value.trim() {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
        _ => None,
    }
}
