//! Apache CloudStack API client
//!
//! A small signed-request client built from a resolved
//! [`cloudstack_config::ProviderConfig`].
//!
//! # Features
//!
//! - HMAC-SHA1 request signing
//! - GET-only mode for management servers that reject POST
//! - Async job polling bounded by the provider timeout
//!
//! # Example
//!
//! ```ignore
//! use cloudstack_client::{CloudStackClient, Params};
//! use cloudstack_config::{CredentialInput, resolve};
//!
//! let config = resolve(CredentialInput::new().config("~/.cloudmonkey/config").profile("lab"))?;
//! let client = CloudStackClient::new(&config)?;
//!
//! let zones = client.list("listZones", "zone", Params::new()).await?;
//! ```

pub mod client;
pub mod error;
pub mod poll;
pub mod response;
pub mod sign;

pub use client::CloudStackClient;
pub use error::{ClientError, Result};
pub use poll::PollConfig;
pub use response::{AsyncJob, JobStatus};
pub use sign::Params;
