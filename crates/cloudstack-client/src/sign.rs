//! Request signing
//!
//! CloudStack signs the query string rather than the request body:
//! 1. Sort parameters by lower-cased name
//! 2. Percent-encode names and values and join them as `k=v&k=v`
//! 3. Lower-case the whole string
//! 4. HMAC-SHA1 it with the secret key and base64-encode the digest

use crate::error::{ClientError, Result};
use base64::{Engine as _, engine::general_purpose::STANDARD};
use hmac::{Hmac, Mac};
use sha1::Sha1;
use std::collections::BTreeMap;

type HmacSha1 = Hmac<Sha1>;

/// Request parameters, excluding `signature`
pub type Params = BTreeMap<String, String>;

/// Build the canonical (sorted, encoded, original-case) query string
pub fn canonical_query(params: &Params) -> String {
    let mut pairs: Vec<(&String, &String)> = params.iter().collect();
    pairs.sort_by_cached_key(|(k, _)| k.to_lowercase());
    pairs
        .iter()
        .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&")
}

/// Compute the signature for a canonical query string
pub fn sign(query: &str, secret_key: &str) -> Result<String> {
    let mut mac = HmacSha1::new_from_slice(secret_key.as_bytes())
        .map_err(|e| ClientError::Signing(e.to_string()))?;
    mac.update(query.to_lowercase().as_bytes());
    Ok(STANDARD.encode(mac.finalize().into_bytes()))
}
