//! Router Configuration

use serde::{Deserialize, Serialize};

use crate::Result;

/// Router configuration options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouterConfig {
    /// Trace registration and dispatch lifecycle at debug level
    pub debug: bool,

    /// Remove a native listener once its topic has no handlers left
    pub release_empty_topics: bool,

    /// Register delegation listeners for the capture phase
    pub delegate_capture: bool,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            debug: false,
            release_empty_topics: true,
            delegate_capture: true,
        }
    }
}

impl RouterConfig {
    /// Parse from JSON; missing keys keep their defaults
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RouteError;

    #[test]
    fn test_defaults() {
        let config = RouterConfig::default();
        assert!(!config.debug);
        assert!(config.release_empty_topics);
        assert!(config.delegate_capture);
    }

    #[test]
    fn test_from_json_partial() {
        let config = RouterConfig::from_json(r#"{ "debug": true }"#).unwrap();
        assert!(config.debug);
        assert!(config.release_empty_topics);
    }

    #[test]
    fn test_from_json_invalid() {
        let err = RouterConfig::from_json(r#"{ "debug": "yes" }"#).unwrap_err();
        assert!(matches!(err, RouteError::Config(_)));
    }
}
