//! Response envelope handling
//!
//! Every CloudStack JSON response is wrapped in a single
//! `{"<command>response": {...}}` object; failures carry
//! `errorcode` / `errortext` inside that object (or in `errorresponse`).

use crate::error::{ClientError, Result};
use serde::Deserialize;
use serde_json::Value;

/// Unwrap the `<command>response` envelope, turning error payloads into errors
pub(crate) fn unwrap_envelope(command: &str, status: u16, body: &str) -> Result<Value> {
    let parsed: Value = match serde_json::from_str(body) {
        Ok(value) => value,
        Err(_) => {
            return Err(ClientError::UnexpectedResponse {
                status,
                body: body.to_string(),
            });
        }
    };

    let Value::Object(mut map) = parsed else {
        return Err(ClientError::UnexpectedResponse {
            status,
            body: body.to_string(),
        });
    };

    let key = format!("{}response", command.to_lowercase());
    let inner = match map.remove(&key) {
        Some(inner) => inner,
        None => map
            .into_iter()
            .next()
            .map(|(_, v)| v)
            .unwrap_or(Value::Null),
    };

    if let Some(err) = api_error(&inner) {
        return Err(err);
    }

    if !(200..300).contains(&status) {
        return Err(ClientError::UnexpectedResponse {
            status,
            body: body.to_string(),
        });
    }

    Ok(inner)
}

/// Extract `errorcode` / `errortext` from a payload, if present
pub(crate) fn api_error(value: &Value) -> Option<ClientError> {
    let code = value.get("errorcode")?.as_i64()?;
    let message = value
        .get("errortext")
        .and_then(Value::as_str)
        .unwrap_or("unknown error")
        .to_string();
    Some(ClientError::Api { code, message })
}

/// Status of an async job
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobStatus {
    Pending,
    Succeeded,
    Failed,
}

/// Result of `queryAsyncJobResult`
#[derive(Debug, Clone, Deserialize)]
pub struct AsyncJob {
    pub jobid: String,
    pub jobstatus: i64,
    #[serde(default)]
    pub jobresultcode: i64,
    #[serde(default)]
    pub jobresult: Value,
}

impl AsyncJob {
    pub fn status(&self) -> JobStatus {
        match self.jobstatus {
            0 => JobStatus::Pending,
            1 => JobStatus::Succeeded,
            _ => JobStatus::Failed,
        }
    }

    /// Convert a failed job into its error
    pub(crate) fn into_error(self) -> ClientError {
        let (code, message) = match api_error(&self.jobresult) {
            Some(ClientError::Api { code, message }) => (code, message),
            _ => (self.jobresultcode, "async job failed".to_string()),
        };
        ClientError::JobFailed {
            job_id: self.jobid,
            code,
            message,
        }
    }
}

/// Job id returned by an async command, if any
pub(crate) fn job_id(value: &Value) -> Option<String> {
    value.get("jobid").and_then(Value::as_str).map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_unwrap_named_envelope() {
        let body = r#"{"listzonesresponse":{"count":1,"zone":[{"id":"z1"}]}}"#;
        let inner = unwrap_envelope("listZones", 200, body).unwrap();
        assert_eq!(inner["count"], json!(1));
        assert_eq!(inner["zone"][0]["id"], json!("z1"));
    }

    #[test]
    fn test_unwrap_error_payload() {
        let body = r#"{"errorresponse":{"errorcode":431,"cserrorcode":9999,"errortext":"Unable to verify user credentials"}}"#;
        match unwrap_envelope("listZones", 431, body) {
            Err(ClientError::Api { code, message }) => {
                assert_eq!(code, 431);
                assert!(message.contains("credentials"));
            }
            other => panic!("Expected Api error, got {:?}", other),
        }
    }

    #[test]
    fn test_non_json_body() {
        let result = unwrap_envelope("listZones", 502, "<html>Bad Gateway</html>");
        assert!(matches!(
            result,
            Err(ClientError::UnexpectedResponse { status: 502, .. })
        ));
    }

    #[test]
    fn test_failed_job_error() {
        let job: AsyncJob = serde_json::from_value(json!({
            "jobid": "job-1",
            "jobstatus": 2,
            "jobresultcode": 530,
            "jobresult": {"errorcode": 530, "errortext": "Insufficient capacity"}
        }))
        .unwrap();

        assert_eq!(job.status(), JobStatus::Failed);
        match job.into_error() {
            ClientError::JobFailed { job_id, code, message } => {
                assert_eq!(job_id, "job-1");
                assert_eq!(code, 530);
                assert_eq!(message, "Insufficient capacity");
            }
            other => panic!("Expected JobFailed, got {:?}", other),
        }
    }
}
