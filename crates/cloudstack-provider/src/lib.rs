//! CloudStack resource provider
//!
//! Declarative provider plugin for Apache CloudStack: it declares the
//! provider configuration schema, registers the CloudStack resource types
//! with the host and turns the provider block into a configured API client.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────┐
//! │              Orchestration host                  │
//! └─────────────────┬───────────────────────────────┘
//!                   │ provider block (raw config)
//! ┌─────────────────▼───────────────────────────────┐
//! │             cloudstack-provider                  │
//! │  ┌──────────────┐  ┌──────────────────────┐     │
//! │  │    Schema    │  │  Resource registry   │     │
//! │  └──────┬───────┘  └──────────────────────┘     │
//! └─────────┼───────────────────────────────────────┘
//!           │ CredentialInput
//! ┌─────────▼─────────┐     ┌───────────────────────┐
//! │ cloudstack-config │────▶│   cloudstack-client   │
//! │  (resolver)       │     │  (signed API calls)   │
//! └───────────────────┘     └───────────────────────┘
//! ```

pub mod error;
pub mod provider;
pub mod resource;
pub mod schema;

// Re-exports
pub use error::{ProviderError, Result};
pub use provider::{AuthStatus, CloudStackProvider, ResourceProvider};
pub use resource::{ResourceRegistry, ResourceType};
pub use schema::{FieldSchema, ProviderSchema, RawConfig, ValueType};
