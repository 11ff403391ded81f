//! Resource provider trait and the CloudStack implementation

use crate::error::{ProviderError, Result};
use crate::resource::ResourceRegistry;
use crate::schema::{ProviderSchema, RawConfig};
use async_trait::async_trait;
use cloudstack_client::{CloudStackClient, Params};
use cloudstack_config::{CredentialInput, ProviderConfig};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, instrument};

/// Interface the orchestration host loads providers through
///
/// The host validates nothing itself: it hands the raw provider block to
/// [`ResourceProvider::configure`] and passes the returned client to every
/// resource callback.
#[async_trait]
pub trait ResourceProvider: Send + Sync {
    /// Client handed to resource callbacks
    type Client: Send + Sync;

    /// Returns the provider name (e.g., "cloudstack")
    fn name(&self) -> &str;

    /// Returns the provider display name for UI
    fn display_name(&self) -> &str;

    /// Configuration schema of the provider block
    fn schema(&self) -> &ProviderSchema;

    /// Resource types this provider registers
    fn resources(&self) -> &ResourceRegistry;

    /// Resolve the provider block into a ready-to-use client
    fn configure(&self, raw: &RawConfig) -> Result<Self::Client>;

    /// Check that the configured credentials are accepted by the API
    async fn check_auth(&self, client: &Self::Client) -> Result<AuthStatus>;
}

/// Result of probing the management server with the configured keys
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthStatus {
    pub authenticated: bool,

    /// Endpoint the probe was sent to
    pub api_url: String,

    /// `cloudstackversion` reported by `listCapabilities`
    pub server_version: Option<String>,

    pub error: Option<String>,
}

impl AuthStatus {
    pub fn ok(api_url: impl Into<String>, server_version: Option<String>) -> Self {
        Self {
            authenticated: true,
            api_url: api_url.into(),
            server_version,
            error: None,
        }
    }

    pub fn failed(api_url: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            authenticated: false,
            api_url: api_url.into(),
            server_version: None,
            error: Some(error.into()),
        }
    }
}

/// CloudStack provider
pub struct CloudStackProvider {
    schema: ProviderSchema,
    resources: ResourceRegistry,
}

impl CloudStackProvider {
    pub fn new() -> Self {
        Self {
            schema: ProviderSchema::cloudstack(),
            resources: ResourceRegistry::cloudstack(),
        }
    }

    /// Validate the provider block and map it onto resolver input
    pub fn credential_input(&self, raw: &RawConfig) -> Result<CredentialInput> {
        let checked = self.schema.validate(raw)?;

        let string = |key: &str| checked.get(key).and_then(Value::as_str).map(str::to_string);

        Ok(CredentialInput {
            api_url: string("api_url"),
            api_key: string("api_key"),
            secret_key: string("secret_key"),
            config: string("config").map(Into::into),
            profile: string("profile"),
            http_get_only: checked.get("http_get_only").and_then(Value::as_bool),
            timeout: checked.get("timeout").and_then(Value::as_u64),
        })
    }

    /// Resolve the provider block into a [`ProviderConfig`] without building a client
    #[instrument(skip(self, raw))]
    pub fn resolve(&self, raw: &RawConfig) -> Result<ProviderConfig> {
        let input = self.credential_input(raw)?;
        Ok(cloudstack_config::resolve(input)?)
    }

    /// Read the live objects of a registered resource type
    ///
    /// `extra` is merged over the type's fixed list parameters.
    pub async fn list_resources(
        &self,
        client: &CloudStackClient,
        type_name: &str,
        extra: Params,
    ) -> Result<Vec<Value>> {
        let resource_type = self.resources.get(type_name)?;
        if resource_type.requires_instance() && !extra.contains_key("virtualmachineid") {
            return Err(ProviderError::MissingParameter {
                resource: resource_type.name().to_string(),
                param: "virtualmachineid",
            });
        }

        let mut params: Params = resource_type
            .list_params()
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        params.extend(extra);

        debug!("Listing {} via {}", resource_type, resource_type.list_command());
        let items = client
            .list(resource_type.list_command(), resource_type.item_key(), params)
            .await?;
        Ok(items)
    }
}

impl Default for CloudStackProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ResourceProvider for CloudStackProvider {
    type Client = CloudStackClient;

    fn name(&self) -> &str {
        "cloudstack"
    }

    fn display_name(&self) -> &str {
        "Apache CloudStack"
    }

    fn schema(&self) -> &ProviderSchema {
        &self.schema
    }

    fn resources(&self) -> &ResourceRegistry {
        &self.resources
    }

    #[instrument(skip(self, raw))]
    fn configure(&self, raw: &RawConfig) -> Result<CloudStackClient> {
        let config = self.resolve(raw)?;
        let client = CloudStackClient::new(&config)?;
        info!(
            api_url = %config.api_url,
            http_get_only = config.http_get_only,
            timeout_secs = config.timeout.as_secs(),
            "Configured CloudStack client"
        );
        Ok(client)
    }

    async fn check_auth(&self, client: &CloudStackClient) -> Result<AuthStatus> {
        match client.request("listCapabilities", Params::new()).await {
            Ok(value) => {
                let version = value
                    .pointer("/capability/cloudstackversion")
                    .and_then(Value::as_str)
                    .map(str::to_string);
                Ok(AuthStatus::ok(client.base_url(), version))
            }
            Err(e) => Ok(AuthStatus::failed(client.base_url(), e.to_string())),
        }
    }
}
