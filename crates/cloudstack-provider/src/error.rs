//! Provider error types

use crate::schema::ValueType;
use thiserror::Error;

/// Provider errors
///
/// Every failure while configuring the provider surfaces as one of these;
/// none of them are retried.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Unknown configuration key: {0}")]
    UnknownField(String),

    #[error("Invalid value for {field}: expected {expected}, found {found}")]
    InvalidType {
        field: String,
        expected: ValueType,
        found: String,
    },

    #[error("\"{field}\": conflicts with {other}")]
    ConflictingFields { field: String, other: String },

    #[error("Resource type not found: {0}")]
    ResourceTypeNotFound(String),

    #[error("{resource} requires the {param} parameter")]
    MissingParameter {
        resource: String,
        param: &'static str,
    },

    #[error("Credential resolution failed: {0}")]
    Config(#[from] cloudstack_config::ConfigError),

    #[error("API client error: {0}")]
    Client(#[from] cloudstack_client::ClientError),
}

pub type Result<T> = std::result::Result<T, ProviderError>;
