use dashmap::DashMap;
use serde::Deserialize;
use std::env;
use std::sync::Arc;

pub const INCLUDE_FORMAT_KEY: &str = "RESTROUTE_INCLUDE_FORMAT";
pub const FORMATS_KEY: &str = "RESTROUTE_FORMATS";
pub const DEFAULT_FORMAT_KEY: &str = "RESTROUTE_DEFAULT_FORMAT";

/// Configuration service
#[derive(Clone, Default)]
pub struct ConfigService {
    config: Arc<DashMap<String, String>>,
}

impl ConfigService {
    /// Seeded from the process environment
    pub fn new() -> Self {
        let service = Self::default();
        for (key, value) in env::vars() {
            service.set(&key, &value);
        }
        service
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.config.get(key).map(|v| v.clone())
    }

    pub fn set(&self, key: &str, value: &str) {
        self.config.insert(key.to_string(), value.to_string());
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.get(key)
            .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
    }
}

/// Route generation settings for the REST action reader.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RoutingConfig {
    /// Append `.{_format}` to conventional routes
    pub include_format: bool,
    /// Allowed values of `_format`; unrestricted when empty
    pub formats: Vec<String>,
    pub default_format: Option<String>,
}

impl RoutingConfig {
    pub fn from_service(config: &ConfigService) -> Self {
        let formats = config
            .get(FORMATS_KEY)
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|format| !format.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        Self {
            include_format: config.get_bool(INCLUDE_FORMAT_KEY).unwrap_or(false),
            formats,
            default_format: config
                .get(DEFAULT_FORMAT_KEY)
                .map(|format| format.trim().to_string())
                .filter(|format| !format.is_empty()),
        }
    }

    pub fn from_env() -> Self {
        Self::from_service(&ConfigService::new())
    }

    /// `_format` requirement, e.g. `json|xml`
    pub fn format_requirement(&self) -> Option<String> {
        if self.formats.is_empty() {
            None
        } else {
            Some(self.formats.join("|"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_routing_config_from_service() {
        let service = ConfigService::default();
        service.set(INCLUDE_FORMAT_KEY, "true");
        service.set(FORMATS_KEY, "json, xml,,html");
        service.set(DEFAULT_FORMAT_KEY, "json");

        let config = RoutingConfig::from_service(&service);
        assert!(config.include_format);
        assert_eq!(config.formats, vec!["json", "xml", "html"]);
        assert_eq!(config.default_format.as_deref(), Some("json"));
        assert_eq!(config.format_requirement().as_deref(), Some("json|xml|html"));
    }

    #[test]
    fn test_routing_config_defaults() {
        let config = RoutingConfig::from_service(&ConfigService::default());
        assert_eq!(config, RoutingConfig::default());
        assert!(config.format_requirement().is_none());
    }

    #[test]
    fn test_deserialize_partial_config() {
        let config: RoutingConfig = serde_json::from_str(r#"{"include_format": true}"#).unwrap();
        assert!(config.include_format);
        assert!(config.formats.is_empty());
    }
}
