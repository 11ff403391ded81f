//! CloudStack API client
//!
//! Issues signed API calls against the management server and waits on
//! async jobs. Built from a resolved [`ProviderConfig`].

use crate::error::{ClientError, Result};
use crate::poll::PollConfig;
use crate::response::{self, AsyncJob, JobStatus};
use crate::sign::{self, Params};
use cloudstack_config::ProviderConfig;
use serde_json::Value;
use std::time::Duration;
use tokio::time::{Instant, sleep};
use tracing::{debug, info, instrument};

/// Per-request HTTP timeout, independent of the async job timeout
const HTTP_TIMEOUT: Duration = Duration::from_secs(60);

/// CloudStack API client
#[derive(Clone)]
pub struct CloudStackClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    secret_key: String,
    http_get_only: bool,
    async_timeout: Duration,
    poll: PollConfig,
}

impl std::fmt::Debug for CloudStackClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CloudStackClient")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key)
            .field("http_get_only", &self.http_get_only)
            .field("async_timeout", &self.async_timeout)
            .finish_non_exhaustive()
    }
}

impl CloudStackClient {
    /// Create a new client from a resolved provider config
    pub fn new(config: &ProviderConfig) -> Result<Self> {
        let base_url = config.api_url.trim_end_matches('?').to_string();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ClientError::InvalidUrl(config.api_url.clone()));
        }

        let http = reqwest::Client::builder()
            .user_agent(concat!("cloudstack-provider/", env!("CARGO_PKG_VERSION")))
            .timeout(HTTP_TIMEOUT)
            .build()?;

        Ok(Self {
            http,
            base_url,
            api_key: config.api_key.clone(),
            secret_key: config.secret_key.clone(),
            http_get_only: config.http_get_only,
            async_timeout: config.timeout,
            poll: PollConfig::default(),
        })
    }

    /// Override the async job polling schedule
    pub fn with_poll_config(mut self, poll: PollConfig) -> Self {
        self.poll = poll;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn http_get_only(&self) -> bool {
        self.http_get_only
    }

    pub fn async_timeout(&self) -> Duration {
        self.async_timeout
    }

    /// Call a synchronous API command and return the unwrapped response
    #[instrument(skip(self, params), fields(get_only = self.http_get_only))]
    pub async fn request(&self, command: &str, params: Params) -> Result<Value> {
        let mut params = params;
        params.insert("command".to_string(), command.to_string());
        params.insert("apiKey".to_string(), self.api_key.clone());
        params.insert("response".to_string(), "json".to_string());

        let query = sign::canonical_query(&params);
        let signature = sign::sign(&query, &self.secret_key)?;

        let response = if self.http_get_only {
            let url = format!(
                "{}?{}&signature={}",
                self.base_url,
                query,
                urlencoding::encode(&signature)
            );
            debug!("GET {}", command);
            self.http.get(url).send().await?
        } else {
            params.insert("signature".to_string(), signature);
            debug!("POST {}", command);
            self.http.post(&self.base_url).form(&params).send().await?
        };

        let status = response.status().as_u16();
        let body = response.text().await?;
        response::unwrap_envelope(command, status, &body)
    }

    /// Call an async API command and wait for its job result
    ///
    /// Commands that answer synchronously (no `jobid`) are returned as-is.
    pub async fn request_async(&self, command: &str, params: Params) -> Result<Value> {
        let value = self.request(command, params).await?;
        match response::job_id(&value) {
            Some(job_id) => self.wait_for_job(&job_id).await,
            None => Ok(value),
        }
    }

    /// Query the current state of an async job
    pub async fn query_async_job(&self, job_id: &str) -> Result<AsyncJob> {
        let mut params = Params::new();
        params.insert("jobid".to_string(), job_id.to_string());
        let value = self.request("queryAsyncJobResult", params).await?;
        Ok(serde_json::from_value(value)?)
    }

    /// Poll an async job until it finishes or the configured timeout elapses
    #[instrument(skip(self))]
    pub async fn wait_for_job(&self, job_id: &str) -> Result<Value> {
        // None: the timeout is past what Instant can represent, so never expire
        let deadline = Instant::now().checked_add(self.async_timeout);
        let mut attempt = 0;

        loop {
            let job = self.query_async_job(job_id).await?;
            match job.status() {
                JobStatus::Succeeded => {
                    info!("Async job {} finished", job_id);
                    return Ok(job.jobresult);
                }
                JobStatus::Failed => return Err(job.into_error()),
                JobStatus::Pending => {}
            }

            let mut delay = self.poll.delay_for_attempt(attempt);
            if let Some(deadline) = deadline {
                let now = Instant::now();
                if now >= deadline {
                    return Err(ClientError::AsyncTimeout {
                        job_id: job_id.to_string(),
                        timeout: self.async_timeout,
                    });
                }
                delay = delay.min(deadline - now);
            }

            debug!("Async job {} pending, retrying in {:?}", job_id, delay);
            sleep(delay).await;
            attempt += 1;
        }
    }

    /// Call a `list*` command and return the objects under `item_key`
    ///
    /// CloudStack omits the key entirely when nothing matches.
    pub async fn list(&self, command: &str, item_key: &str, params: Params) -> Result<Vec<Value>> {
        let mut value = self.request(command, params).await?;
        match value.get_mut(item_key).map(Value::take) {
            Some(Value::Array(items)) => Ok(items),
            Some(other) => Ok(vec![other]),
            None => Ok(Vec::new()),
        }
    }
}
