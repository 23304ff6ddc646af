//! Client configuration
//!
//! Loaded from an optional TOML file, then overridden from the environment:
//!
//! ```toml
//! base_url = "http://localhost:8080/api"
//! timeout_secs = 15
//! notification_ttl_secs = 4
//! ```
//!
//! | Variable | Field |
//! |---|---|
//! | `REGISTRY_BASE_URL` | `base_url` |
//! | `REGISTRY_TIMEOUT_SECS` | `timeout_secs` |

use crate::error::{RegistryError, RegistryResult};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Environment variable overriding the base URL
pub const ENV_BASE_URL: &str = "REGISTRY_BASE_URL";

/// Environment variable overriding the request timeout
pub const ENV_TIMEOUT_SECS: &str = "REGISTRY_TIMEOUT_SECS";

/// Base URL used when nothing else is configured
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/api";

/// Registry client configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// API root; endpoint paths are appended to it
    pub base_url: String,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
    /// How long notifications stay visible
    pub notification_ttl_secs: u64,
}

impl ClientConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With base URL
    #[inline]
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// With request timeout
    #[inline]
    #[must_use]
    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Parse from TOML text
    ///
    /// # Errors
    /// `RegistryError::Config` on malformed TOML or invalid values
    pub fn from_toml_str(text: &str) -> RegistryResult<Self> {
        let config: Self =
            toml::from_str(text).map_err(|e| RegistryError::config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a TOML file
    ///
    /// # Errors
    /// `RegistryError::Config` if the file cannot be read or parsed
    pub fn load(path: impl AsRef<Path>) -> RegistryResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            RegistryError::config(format!("cannot read {}: {e}", path.display()))
        })?;
        Self::from_toml_str(&text)
    }

    /// Apply overrides from the process environment
    ///
    /// # Errors
    /// `RegistryError::Config` if an override has an invalid value
    pub fn with_env_overrides(self) -> RegistryResult<Self> {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary variable lookup
    ///
    /// # Errors
    /// `RegistryError::Config` if an override has an invalid value
    pub fn with_overrides(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> RegistryResult<Self> {
        if let Some(url) = lookup(ENV_BASE_URL) {
            self.base_url = url;
        }
        if let Some(secs) = lookup(ENV_TIMEOUT_SECS) {
            self.timeout_secs = secs.trim().parse().map_err(|_| {
                RegistryError::config(format!("{ENV_TIMEOUT_SECS} must be an integer, got '{secs}'"))
            })?;
        }
        self.validate()?;
        Ok(self)
    }

    /// Check field values
    ///
    /// # Errors
    /// `RegistryError::Config` describing the first invalid field
    pub fn validate(&self) -> RegistryResult<()> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(RegistryError::config(format!(
                "base_url must be an http(s) URL, got '{}'",
                self.base_url
            )));
        }
        if self.timeout_secs == 0 {
            return Err(RegistryError::config("timeout_secs must be positive"));
        }
        Ok(())
    }

    /// Request timeout
    #[inline]
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Notification lifetime
    #[inline]
    #[must_use]
    pub fn notification_ttl(&self) -> Duration {
        Duration::from_secs(self.notification_ttl_secs)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 15,
            notification_ttl_secs: 4,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn partial_toml_keeps_defaults() {
        let config = ClientConfig::from_toml_str("timeout_secs = 3").unwrap();
        assert_eq!(config.timeout_secs, 3);
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn invalid_base_url_rejected() {
        let err = ClientConfig::from_toml_str("base_url = \"ftp://x\"").unwrap_err();
        assert!(matches!(err, RegistryError::Config { .. }));
    }

    #[test]
    fn overrides_take_precedence() {
        let vars: HashMap<&str, &str> = [
            (ENV_BASE_URL, "https://registry.example/api"),
            (ENV_TIMEOUT_SECS, "30"),
        ]
        .into_iter()
        .collect();

        let config = ClientConfig::new()
            .with_overrides(|k| vars.get(k).map(|v| (*v).to_string()))
            .unwrap();
        assert_eq!(config.base_url, "https://registry.example/api");
        assert_eq!(config.timeout(), Duration::from_secs(30));
    }

    #[test]
    fn bad_timeout_override_rejected() {
        let result = ClientConfig::new().with_overrides(|k| {
            (k == ENV_TIMEOUT_SECS).then(|| "soon".to_string())
        });
        assert!(result.is_err());
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "base_url = \"http://127.0.0.1:9000\"").unwrap();
        let config = ClientConfig::load(file.path()).unwrap();
        assert_eq!(config.base_url, "http://127.0.0.1:9000");
    }

    #[test]
    fn missing_file_is_config_error() {
        let err = ClientConfig::load("/nonexistent/registry.toml").unwrap_err();
        assert!(err.to_string().contains("cannot read"));
    }
}
