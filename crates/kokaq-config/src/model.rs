//! Raw and validated shell settings.

use std::time::Duration;

use url::Url;

use crate::defaults::{DEFAULT_ADDRESS, DEFAULT_DIAL_TIMEOUT_SECS, DEFAULT_REQUEST_TIMEOUT_SECS};
use crate::error::ConfigResult;
use crate::validate::{normalize_address, parse_timeout};

/// Settings as supplied by flags or environment variables, before validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawShellConfig {
    /// Server address (`:port`, `host:port`, or URL).
    pub address: String,
    /// Connection establishment deadline in seconds.
    pub dial_timeout_secs: u64,
    /// Per-request deadline in seconds.
    pub request_timeout_secs: u64,
    /// Whether to speak TLS when the address carries no scheme.
    pub tls_enabled: bool,
}

impl Default for RawShellConfig {
    fn default() -> Self {
        Self {
            address: DEFAULT_ADDRESS.to_string(),
            dial_timeout_secs: DEFAULT_DIAL_TIMEOUT_SECS,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            tls_enabled: false,
        }
    }
}

/// Validated connection settings. Immutable once the shell starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellConfig {
    /// Address exactly as the user supplied it, shown in the banner.
    pub display_address: String,
    /// Base URL of the queue service.
    pub address: Url,
    /// Connection establishment deadline.
    pub dial_timeout: Duration,
    /// Per-request deadline.
    pub request_timeout: Duration,
    /// Whether TLS is in use.
    pub tls_enabled: bool,
}

impl ShellConfig {
    /// Validate raw settings.
    ///
    /// # Errors
    ///
    /// Returns a [`crate::ConfigError`] when the address or either timeout is invalid.
    pub fn from_raw(raw: &RawShellConfig) -> ConfigResult<Self> {
        let address = normalize_address(&raw.address, raw.tls_enabled)?;
        let dial_timeout = parse_timeout("dial_timeout", raw.dial_timeout_secs)?;
        let request_timeout = parse_timeout("request_timeout", raw.request_timeout_secs)?;
        Ok(Self {
            display_address: raw.address.trim().to_string(),
            tls_enabled: address.scheme() == "https",
            address,
            dial_timeout,
            request_timeout,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ConfigError;

    #[test]
    fn defaults_validate_to_local_endpoint() {
        let config = ShellConfig::from_raw(&RawShellConfig::default()).expect("defaults");
        assert_eq!(config.address.as_str(), "http://127.0.0.1:9000/");
        assert_eq!(config.dial_timeout, Duration::from_secs(5));
        assert_eq!(config.request_timeout, Duration::from_secs(10));
        assert!(!config.tls_enabled);
        assert_eq!(config.display_address, "127.0.0.1:9000");
    }

    #[test]
    fn https_url_marks_tls_enabled() {
        let raw = RawShellConfig {
            address: "https://kokaq.example.com".into(),
            ..RawShellConfig::default()
        };
        let config = ShellConfig::from_raw(&raw).expect("https config");
        assert!(config.tls_enabled);
    }

    #[test]
    fn request_timeout_is_validated() {
        let raw = RawShellConfig {
            request_timeout_secs: 0,
            ..RawShellConfig::default()
        };
        let err = ShellConfig::from_raw(&raw).expect_err("zero timeout");
        assert!(matches!(
            err,
            ConfigError::InvalidField {
                field: "request_timeout",
                ..
            }
        ));
    }
}
