//! Environment-sourced configuration for the materialization pipeline.

use std::env;
use std::fmt;
use std::time::Duration;

/// Default Unity Catalog endpoint.
pub const DEFAULT_UC_ENDPOINT: &str = "http://localhost:8080";

/// Default object-storage region injected into storage options.
pub const DEFAULT_AWS_REGION: &str = "eu-west-1";

/// Default wall-clock budget for one store operation.
pub const DEFAULT_STORE_TIMEOUT: Duration = Duration::from_secs(10);

/// Settings consumed at invocation time.
///
/// Sourced from the environment via [`StoreConfig::from_env`]; every value
/// can also be overridden per call through directive `OPTIONS`.
#[derive(Clone)]
pub struct StoreConfig {
    /// Unity Catalog endpoint URL (without the API suffix).
    pub uc_endpoint: String,
    /// Bearer token for the catalog service, if any.
    pub uc_token: Option<String>,
    /// Default object-storage region.
    pub aws_region: String,
    /// Wall-clock budget for the store operation.
    pub store_timeout: Duration,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            uc_endpoint: DEFAULT_UC_ENDPOINT.to_string(),
            uc_token: None,
            aws_region: DEFAULT_AWS_REGION.to_string(),
            store_timeout: DEFAULT_STORE_TIMEOUT,
        }
    }
}

impl fmt::Debug for StoreConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreConfig")
            .field("uc_endpoint", &self.uc_endpoint)
            .field("uc_token", &self.uc_token.as_ref().map(|_| "[REDACTED]"))
            .field("aws_region", &self.aws_region)
            .field("store_timeout", &self.store_timeout)
            .finish()
    }
}

impl StoreConfig {
    /// Reads configuration from the environment.
    ///
    /// Recognized variables:
    ///
    /// - `SILT_UC_ENDPOINT` — catalog endpoint (default `http://localhost:8080`)
    /// - `SILT_UC_TOKEN` — bearer token (optional)
    /// - `SILT_AWS_REGION` — default storage region (default `eu-west-1`)
    /// - `SILT_STORE_TIMEOUT_SECS` — store budget in seconds (default 10)
    ///
    /// Unset or unparseable values fall back to the defaults.
    #[must_use]
    pub fn from_env() -> Self {
        let store_timeout = env::var("SILT_STORE_TIMEOUT_SECS")
            .ok()
            .and_then(|raw| raw.parse::<u64>().ok())
            .map_or(DEFAULT_STORE_TIMEOUT, Duration::from_secs);

        Self {
            uc_endpoint: env::var("SILT_UC_ENDPOINT")
                .unwrap_or_else(|_| DEFAULT_UC_ENDPOINT.to_string()),
            uc_token: env::var("SILT_UC_TOKEN").ok().filter(|t| !t.is_empty()),
            aws_region: env::var("SILT_AWS_REGION")
                .unwrap_or_else(|_| DEFAULT_AWS_REGION.to_string()),
            store_timeout,
        }
    }

    /// Overrides the catalog endpoint.
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.uc_endpoint = endpoint.into();
        self
    }

    /// Overrides the catalog bearer token.
    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.uc_token = Some(token.into());
        self
    }

    /// Overrides the default storage region.
    #[must_use]
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.aws_region = region.into();
        self
    }

    /// Overrides the store budget.
    #[must_use]
    pub fn with_store_timeout(mut self, budget: Duration) -> Self {
        self.store_timeout = budget;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_stable() {
        let config = StoreConfig::default();
        assert_eq!(config.uc_endpoint, "http://localhost:8080");
        assert_eq!(config.aws_region, "eu-west-1");
        assert_eq!(config.store_timeout, Duration::from_secs(10));
        assert!(config.uc_token.is_none());
    }

    #[test]
    fn builders_override_fields() {
        let config = StoreConfig::default()
            .with_endpoint("https://uc.example.com")
            .with_token("secret")
            .with_region("us-east-1")
            .with_store_timeout(Duration::from_secs(30));

        assert_eq!(config.uc_endpoint, "https://uc.example.com");
        assert_eq!(config.uc_token.as_deref(), Some("secret"));
        assert_eq!(config.aws_region, "us-east-1");
        assert_eq!(config.store_timeout, Duration::from_secs(30));
    }

    #[test]
    fn debug_redacts_token() {
        let config = StoreConfig::default().with_token("secret");
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("secret"));
        assert!(rendered.contains("REDACTED"));
    }
}
