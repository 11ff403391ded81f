//! Provider configuration schema
//!
//! Declares the keys the host may set on the provider block, their types,
//! environment-variable defaults and mutual-exclusion groups.

use crate::error::{ProviderError, Result};
use cloudstack_config::{
    DEFAULT_TIMEOUT_SECS, ENV_API_KEY, ENV_API_URL, ENV_HTTP_GET_ONLY, ENV_SECRET_KEY,
    ENV_TIMEOUT, parse_bool,
};
use serde::Serialize;
use serde_json::{Map, Value};

/// Raw provider configuration as handed over by the host
pub type RawConfig = Map<String, Value>;

const DIRECT_CREDENTIALS: &[&str] = &["api_url", "api_key", "secret_key"];
const PROFILE_FILE: &[&str] = &["config", "profile"];

/// Value type of a configuration key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueType {
    String,
    Bool,
    Int,
}

impl std::fmt::Display for ValueType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValueType::String => write!(f, "string"),
            ValueType::Bool => write!(f, "bool"),
            ValueType::Int => write!(f, "int"),
        }
    }
}

/// Schema of a single configuration key
#[derive(Debug, Clone, Serialize)]
pub struct FieldSchema {
    pub name: &'static str,
    pub value_type: ValueType,
    pub required: bool,
    /// Environment variable consulted when the key is unset
    pub env: Option<&'static str>,
    /// Fallback when neither the key nor `env` is set
    pub default: Option<Value>,
    /// Keys that must not be set together with this one
    pub conflicts_with: &'static [&'static str],
    pub description: &'static str,
}

impl FieldSchema {
    fn optional(name: &'static str, value_type: ValueType, description: &'static str) -> Self {
        Self {
            name,
            value_type,
            required: false,
            env: None,
            default: None,
            conflicts_with: &[],
            description,
        }
    }

    fn required(mut self) -> Self {
        self.required = true;
        self
    }

    fn env(mut self, var: &'static str) -> Self {
        self.env = Some(var);
        self
    }

    fn default_value(mut self, value: Value) -> Self {
        self.default = Some(value);
        self
    }

    fn conflicts_with(mut self, keys: &'static [&'static str]) -> Self {
        self.conflicts_with = keys;
        self
    }

    /// Coerce a raw value to this key's type
    ///
    /// Strings are accepted for bool and int keys the same way the host
    /// accepts them from variables.
    pub fn coerce(&self, value: &Value) -> Result<Value> {
        let coerced = match (self.value_type, value) {
            (ValueType::String, Value::String(_)) => Some(value.clone()),
            (ValueType::Bool, Value::Bool(_)) => Some(value.clone()),
            (ValueType::Bool, Value::String(s)) => parse_bool(s).map(Value::Bool),
            (ValueType::Int, Value::Number(n)) => n.as_u64().map(Value::from),
            (ValueType::Int, Value::String(s)) => s.trim().parse::<u64>().ok().map(Value::from),
            _ => None,
        };

        coerced.ok_or_else(|| ProviderError::InvalidType {
            field: self.name.to_string(),
            expected: self.value_type,
            found: value.to_string(),
        })
    }
}

/// Provider configuration schema
#[derive(Debug, Clone, Serialize)]
pub struct ProviderSchema {
    fields: Vec<FieldSchema>,
}

impl ProviderSchema {
    /// Schema of the CloudStack provider block
    pub fn cloudstack() -> Self {
        use ValueType::{Bool, Int};

        let fields = vec![
            FieldSchema::optional("api_url", ValueType::String, "URL of the CloudStack API endpoint")
                .env(ENV_API_URL)
                .conflicts_with(PROFILE_FILE),
            FieldSchema::optional("api_key", ValueType::String, "API key of the CloudStack account")
                .env(ENV_API_KEY)
                .conflicts_with(PROFILE_FILE),
            FieldSchema::optional("secret_key", ValueType::String, "Secret key of the CloudStack account")
                .env(ENV_SECRET_KEY)
                .conflicts_with(PROFILE_FILE),
            FieldSchema::optional("config", ValueType::String, "Path to an INI file holding credential profiles")
                .conflicts_with(DIRECT_CREDENTIALS),
            FieldSchema::optional("profile", ValueType::String, "Profile (section) to read from the config file")
                .conflicts_with(DIRECT_CREDENTIALS),
            FieldSchema::optional("http_get_only", Bool, "Send every API call as an HTTP GET")
                .required()
                .env(ENV_HTTP_GET_ONLY)
                .default_value(Value::Bool(false)),
            FieldSchema::optional("timeout", Int, "Seconds to wait for async jobs to finish")
                .required()
                .env(ENV_TIMEOUT)
                .default_value(Value::from(DEFAULT_TIMEOUT_SECS)),
        ];

        Self { fields }
    }

    pub fn fields(&self) -> &[FieldSchema] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&FieldSchema> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Validate a raw configuration and return it with coerced values
    ///
    /// Null values count as unset. Conflicts are checked on explicitly set
    /// keys only; environment defaults never conflict.
    pub fn validate(&self, raw: &RawConfig) -> Result<RawConfig> {
        let mut checked = RawConfig::new();

        for (key, value) in raw {
            let field = self
                .field(key)
                .ok_or_else(|| ProviderError::UnknownField(key.clone()))?;
            if value.is_null() {
                continue;
            }
            checked.insert(key.clone(), field.coerce(value)?);
        }

        for field in &self.fields {
            if !checked.contains_key(field.name) {
                continue;
            }
            if let Some(other) = field
                .conflicts_with
                .iter()
                .find(|other| checked.contains_key(**other))
            {
                return Err(ProviderError::ConflictingFields {
                    field: field.name.to_string(),
                    other: other.to_string(),
                });
            }
        }

        Ok(checked)
    }
}

impl Default for ProviderSchema {
    fn default() -> Self {
        Self::cloudstack()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw(value: Value) -> RawConfig {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_schema_declares_all_keys() {
        let schema = ProviderSchema::cloudstack();
        let names: Vec<&str> = schema.fields().iter().map(|f| f.name).collect();
        assert_eq!(
            names,
            vec![
                "api_url",
                "api_key",
                "secret_key",
                "config",
                "profile",
                "http_get_only",
                "timeout"
            ]
        );

        let timeout = schema.field("timeout").unwrap();
        assert!(timeout.required);
        assert_eq!(timeout.env, Some("CLOUDSTACK_TIMEOUT"));
        assert_eq!(timeout.default, Some(json!(900)));

        let config = schema.field("config").unwrap();
        assert_eq!(config.env, None);
        assert_eq!(config.conflicts_with, &["api_url", "api_key", "secret_key"]);
    }

    #[test]
    fn test_validate_direct_credentials() {
        let schema = ProviderSchema::cloudstack();
        let checked = schema
            .validate(&raw(json!({
                "api_url": "https://cloud.example.com/client/api",
                "api_key": "key",
                "secret_key": "secret",
                "http_get_only": "true",
                "timeout": "300",
            })))
            .unwrap();

        assert_eq!(checked["http_get_only"], json!(true));
        assert_eq!(checked["timeout"], json!(300));
    }

    #[test]
    fn test_conflicting_keys() {
        let schema = ProviderSchema::cloudstack();
        let result = schema.validate(&raw(json!({
            "api_key": "key",
            "config": "~/.cloudmonkey/config",
        })));

        match result {
            Err(ProviderError::ConflictingFields { field, other }) => {
                assert_eq!(field, "api_key");
                assert_eq!(other, "config");
            }
            other => panic!("Expected ConflictingFields, got {:?}", other),
        }
    }

    #[test]
    fn test_null_values_do_not_conflict() {
        let schema = ProviderSchema::cloudstack();
        let checked = schema
            .validate(&raw(json!({
                "api_url": null,
                "config": "/etc/cloudstack.ini",
                "profile": "lab",
            })))
            .unwrap();
        assert!(!checked.contains_key("api_url"));
    }

    #[test]
    fn test_unknown_key() {
        let schema = ProviderSchema::cloudstack();
        let result = schema.validate(&raw(json!({"zone": "tokyo"})));
        assert!(matches!(result, Err(ProviderError::UnknownField(k)) if k == "zone"));
    }

    #[test]
    fn test_invalid_types() {
        let schema = ProviderSchema::cloudstack();
        assert!(matches!(
            schema.validate(&raw(json!({"timeout": -5}))),
            Err(ProviderError::InvalidType { .. })
        ));
        assert!(matches!(
            schema.validate(&raw(json!({"http_get_only": "maybe"}))),
            Err(ProviderError::InvalidType { .. })
        ));
        assert!(matches!(
            schema.validate(&raw(json!({"api_url": 42}))),
            Err(ProviderError::InvalidType { .. })
        ));
    }
}
