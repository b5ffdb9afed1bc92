// Configuration layer for backend client creation

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::http::{HttpBackend, DEFAULT_BASE_URL};
use crate::traits::Backend;

/// Where the assistant backend lives
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackendConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
        }
    }
}

impl BackendConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }
}

/// Factory for creating backend clients from configuration
pub struct BackendFactory;

impl BackendFactory {
    pub fn create_backend(config: &BackendConfig) -> Result<Arc<dyn Backend>> {
        let backend = HttpBackend::from_config(config)?;
        Ok(Arc::new(backend))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_points_at_localhost() {
        assert_eq!(BackendConfig::default().base_url, "http://localhost:8000");
    }

    #[test]
    fn test_missing_base_url_uses_default() {
        let config: BackendConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, BackendConfig::default());
    }

    #[test]
    fn test_factory_builds_backend() {
        let config = BackendConfig::new("http://example.test:9000");
        assert!(BackendFactory::create_backend(&config).is_ok());
    }
}
