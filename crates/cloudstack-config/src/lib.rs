//! CloudStack プロバイダの認証情報解決
//!
//! 直接指定・環境変数・INI プロファイルファイルから
//! API クライアント用の [`ProviderConfig`] を組み立てる。

pub mod env;
pub mod error;
pub mod profile;
pub mod resolver;

pub use env::{
    DEFAULT_TIMEOUT_SECS, ENV_API_KEY, ENV_API_URL, ENV_HTTP_GET_ONLY, ENV_SECRET_KEY,
    ENV_TIMEOUT, parse_bool,
};
pub use error::*;
pub use profile::{DEFAULT_SECTION, Profile, expand_home, load_profile};
pub use resolver::{CredentialInput, ProviderConfig, resolve, resolve_without_env};
