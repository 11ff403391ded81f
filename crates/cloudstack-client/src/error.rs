//! CloudStack API client error types

use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Invalid API URL: {0}")]
    InvalidUrl(String),

    #[error("Request signing failed: {0}")]
    Signing(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("CloudStack API error {code}: {message}")]
    Api { code: i64, message: String },

    #[error("Unexpected API response (HTTP {status}): {body}")]
    UnexpectedResponse { status: u16, body: String },

    #[error("Async job {job_id} failed ({code}): {message}")]
    JobFailed {
        job_id: String,
        code: i64,
        message: String,
    },

    #[error("Async job {job_id} did not finish within {timeout:?}")]
    AsyncTimeout { job_id: String, timeout: Duration },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ClientError>;
