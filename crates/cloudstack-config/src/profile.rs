//! INI 形式のプロファイルファイル
//!
//! CloudMonkey 互換の形式で、セクション名がプロファイル名になる:
//!
//! ```ini
//! [production]
//! url = https://cloud.example.com/client/api
//! apikey = ...
//! secretkey = ...
//! ```

use crate::error::{ConfigError, Result};
use ini::Ini;
use std::path::{Path, PathBuf};
use tracing::debug;

/// セクション外のキーを参照するためのプロファイル名
pub const DEFAULT_SECTION: &str = "DEFAULT";

const KEY_URL: &str = "url";
const KEY_API_KEY: &str = "apikey";
const KEY_SECRET_KEY: &str = "secretkey";

/// プロファイルファイルの1セクション
#[derive(Clone, PartialEq, Eq)]
pub struct Profile {
    pub name: String,
    pub url: String,
    pub api_key: String,
    pub secret_key: String,
}

impl std::fmt::Debug for Profile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Profile")
            .field("name", &self.name)
            .field("url", &self.url)
            .field("api_key", &self.api_key)
            .field("secret_key", &"********")
            .finish()
    }
}

/// `~/` で始まるパスをホームディレクトリに展開
pub fn expand_home(path: &Path) -> Result<PathBuf> {
    match path.strip_prefix("~") {
        Ok(rest) => {
            let home = dirs::home_dir().ok_or(ConfigError::HomeDirNotFound)?;
            Ok(home.join(rest))
        }
        Err(_) => Ok(path.to_path_buf()),
    }
}

/// プロファイルファイルを読み込み、指定されたセクションを取り出す
///
/// セクション内に存在しないキーは空文字として扱う。
/// 空文字の検証は呼び出し側（リゾルバ）の責務。
pub fn load_profile(path: &Path, name: &str) -> Result<Profile> {
    let path = expand_home(path)?;
    debug!("Loading profile '{}' from {}", name, path.display());

    let ini = Ini::load_from_file(&path).map_err(|source| ConfigError::ProfileLoad {
        path: path.clone(),
        source,
    })?;

    let section = if name == DEFAULT_SECTION {
        ini.section(None::<String>).or_else(|| ini.section(Some(name)))
    } else {
        ini.section(Some(name))
    };

    let section = section.ok_or_else(|| ConfigError::ProfileNotFound {
        profile: name.to_string(),
        path: path.clone(),
    })?;

    let value = |key: &str| section.get(key).unwrap_or_default().to_string();

    Ok(Profile {
        name: name.to_string(),
        url: value(KEY_URL),
        api_key: value(KEY_API_KEY),
        secret_key: value(KEY_SECRET_KEY),
    })
}
