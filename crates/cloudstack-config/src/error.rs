use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("プロファイルファイルを読み込めません: {path}\n理由: {source}")]
    ProfileLoad {
        path: PathBuf,
        #[source]
        source: ini::Error,
    },

    #[error("プロファイル '{profile}' が見つかりません: {path}")]
    ProfileNotFound { profile: String, path: PathBuf },

    #[error(
        "認証情報が不足しています: {}\n\
        api_url / api_key / secret_key を指定するか、config と profile でプロファイルファイルを指定してください",
        .0.join(", ")
    )]
    MissingCredentials(Vec<&'static str>),

    #[error("環境変数 {var} の値が不正です: '{value}'")]
    InvalidEnvValue { var: &'static str, value: String },

    #[error("ホームディレクトリが見つかりません")]
    HomeDirNotFound,
}

pub type Result<T> = std::result::Result<T, ConfigError>;
