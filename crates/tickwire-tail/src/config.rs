/*
[INPUT]:  YAML configuration file
[OUTPUT]: Parsed tail configuration
[POS]:    Configuration layer - stream setup
[UPDATE]: When adding new configuration options
*/

use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use tickwire_adapter::FormatOptions;

/// Top-level configuration for the tail runner
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TailConfig {
    /// WebSocket endpoint (`ws://` or `wss://`)
    pub endpoint: String,
    /// Sent once as JSON when the connection opens
    #[serde(default)]
    pub request: Option<serde_json::Value>,
    /// Keys of the `data` object to print as formatted numbers; empty prints
    /// the whole payload
    #[serde(default)]
    pub fields: Vec<String>,
    /// Force a fractional part on formatted numbers
    #[serde(default)]
    pub decimal: bool,
}

impl TailConfig {
    /// Load configuration from YAML file
    pub fn from_file(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> anyhow::Result<Self> {
        let config: Self = serde_yaml::from_str(content).context("parse yaml")?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        let endpoint = self.endpoint.trim();
        if endpoint.is_empty() {
            bail!("endpoint must not be empty");
        }
        if !(endpoint.starts_with("ws://") || endpoint.starts_with("wss://")) {
            bail!("endpoint must start with ws:// or wss://, got {endpoint}");
        }
        if let Some(field) = self.fields.iter().find(|field| field.trim().is_empty()) {
            bail!("field names must not be blank (got {field:?})");
        }
        Ok(())
    }

    pub fn format_options(&self) -> FormatOptions {
        FormatOptions {
            decimal: self.decimal,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_minimal_config() {
        let config = TailConfig::from_yaml("endpoint: ws://localhost:9000\n").unwrap();
        assert!(config.request.is_none());
        assert!(config.fields.is_empty());
        assert!(!config.format_options().decimal);
    }

    #[test]
    fn test_request_is_json_value() {
        let yaml = "endpoint: wss://feed.example.com\nrequest:\n  subscribe:\n    channel: price\n    depth: 5\n";
        let config = TailConfig::from_yaml(yaml).unwrap();
        assert_eq!(
            config.request,
            Some(json!({"subscribe": {"channel": "price", "depth": 5}}))
        );
    }

    #[test]
    fn test_rejects_http_endpoint() {
        let err = TailConfig::from_yaml("endpoint: http://localhost\n").unwrap_err();
        assert!(err.to_string().contains("ws://"));
    }

    #[test]
    fn test_rejects_blank_field() {
        let yaml = "endpoint: ws://localhost\nfields: [price, \" \"]\n";
        assert!(TailConfig::from_yaml(yaml).is_err());
    }
}
