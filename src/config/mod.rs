//! Configuration loading and management

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

/// Environment variable overriding `api.base_url`
pub const ENV_API_URL: &str = "EV_PORTAL_API_URL";
/// Environment variable overriding `api.timeout_secs`
pub const ENV_TIMEOUT_SECS: &str = "EV_PORTAL_TIMEOUT_SECS";
/// Environment variable overriding `logging.filter`
pub const ENV_LOG: &str = "EV_PORTAL_LOG";

/// Where and how to reach the Remote Data Service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL including the `/api` prefix, without trailing slash
    pub base_url: String,

    /// Per-request timeout
    pub timeout_secs: u64,

    pub user_agent: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8001/api".to_string(),
            timeout_secs: 10,
            user_agent: concat!("ev-portal/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default `EnvFilter` directive when `RUST_LOG` is not set
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "ev_portal=info".to_string(),
        }
    }
}

/// Complete portal configuration
///
/// # Example
///
/// ```yaml
/// api:
///   base_url: https://ev-portal.example.ch/api
///   timeout_secs: 5
/// logging:
///   filter: ev_portal=debug
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PortalConfig {
    pub api: ApiConfig,
    pub logging: LoggingConfig,
}

impl PortalConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path))?;
        Self::from_yaml_str(&content)
    }

    /// Load configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let mut config: Self = serde_yaml::from_str(yaml).context("invalid portal config")?;
        config.normalize();
        config.validate()?;
        Ok(config)
    }

    /// Apply overrides from the process environment
    pub fn with_env_overrides(self) -> Result<Self> {
        self.with_overrides_from(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary key lookup
    ///
    /// Empty values are ignored.
    pub fn with_overrides_from<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(url) = get(ENV_API_URL) {
            self.api.base_url = url.trim().to_string();
        }
        if let Some(secs) = get(ENV_TIMEOUT_SECS) {
            self.api.timeout_secs = secs
                .trim()
                .parse()
                .with_context(|| format!("{} must be a positive integer", ENV_TIMEOUT_SECS))?;
        }
        if let Some(filter) = get(ENV_LOG) {
            self.logging.filter = filter;
        }

        self.normalize();
        self.validate()?;
        Ok(self)
    }

    fn normalize(&mut self) {
        let trimmed = self.api.base_url.trim().trim_end_matches('/').to_string();
        self.api.base_url = trimmed;
    }

    /// Check invariants the client relies on
    pub fn validate(&self) -> Result<()> {
        let url = &self.api.base_url;
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            bail!("api.base_url must start with http:// or https://, got '{}'", url);
        }
        if self.api.timeout_secs == 0 {
            bail!("api.timeout_secs must be greater than zero");
        }
        Ok(())
    }
}

/// Install the global fmt subscriber
///
/// `RUST_LOG` takes precedence over the configured filter. Calling this more
/// than once is harmless; later calls are ignored.
pub fn init_tracing(config: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.filter))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = PortalConfig::default();
        assert_eq!(config.api.base_url, "http://localhost:8001/api");
        assert_eq!(config.api.timeout_secs, 10);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config = PortalConfig::from_yaml_str(
            r#"
api:
  base_url: https://portal.example.ch/api/
"#,
        )
        .unwrap();

        assert_eq!(config.api.base_url, "https://portal.example.ch/api");
        assert_eq!(config.api.timeout_secs, 10);
        assert_eq!(config.logging.filter, "ev_portal=info");
    }

    #[test]
    fn test_invalid_scheme_rejected() {
        let err = PortalConfig::from_yaml_str("api:\n  base_url: ftp://nope\n").unwrap_err();
        assert!(err.to_string().contains("http://"));
    }

    #[test]
    fn test_zero_timeout_rejected() {
        assert!(PortalConfig::from_yaml_str("api:\n  timeout_secs: 0\n").is_err());
    }

    #[test]
    fn test_env_overrides() {
        let config = PortalConfig::default()
            .with_overrides_from(env(&[
                (ENV_API_URL, "http://10.0.0.5:9000/api/"),
                (ENV_TIMEOUT_SECS, "3"),
                (ENV_LOG, "ev_portal=trace"),
            ]))
            .unwrap();

        assert_eq!(config.api.base_url, "http://10.0.0.5:9000/api");
        assert_eq!(config.api.timeout_secs, 3);
        assert_eq!(config.logging.filter, "ev_portal=trace");
    }

    #[test]
    fn test_empty_env_values_ignored() {
        let config = PortalConfig::default()
            .with_overrides_from(env(&[(ENV_API_URL, "  ")]))
            .unwrap();
        assert_eq!(config, PortalConfig::default());
    }

    #[test]
    fn test_bad_timeout_override() {
        let result = PortalConfig::default().with_overrides_from(env(&[(ENV_TIMEOUT_SECS, "soon")]));
        assert!(result.is_err());
    }

    #[test]
    fn test_yaml_roundtrip() {
        let config = PortalConfig::default();
        let yaml = serde_yaml::to_string(&config).unwrap();
        let parsed = PortalConfig::from_yaml_str(&yaml).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_from_yaml_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("portal.yaml");
        std::fs::write(&path, "api:\n  timeout_secs: 4\n").unwrap();

        let config = PortalConfig::from_yaml_file(path.to_str().unwrap()).unwrap();
        assert_eq!(config.api.timeout_secs, 4);

        assert!(PortalConfig::from_yaml_file("/does/not/exist.yaml").is_err());
    }

    #[test]
    fn test_init_tracing_is_idempotent() {
        init_tracing(&LoggingConfig::default());
        init_tracing(&LoggingConfig::default());
    }
}
