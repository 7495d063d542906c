//! Validation helpers that turn raw flag values into connection settings.

use std::time::Duration;

use url::Url;

use crate::defaults::DEFAULT_HOST;
use crate::error::{ConfigError, ConfigResult};

/// Normalise a server address into an HTTP(S) base URL.
///
/// Accepts `:port`, `host:port`, and full `http://` or `https://` URLs. The
/// scheme is inferred from `tls_enabled` when absent.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidField`] for empty input, unsupported schemes,
/// a plain-HTTP URL combined with TLS, or URLs without a host.
pub fn normalize_address(raw: &str, tls_enabled: bool) -> ConfigResult<Url> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::invalid("address", raw, "must not be empty"));
    }

    let url = if trimmed.contains("://") {
        Url::parse(trimmed)
            .map_err(|_| ConfigError::invalid("address", raw, "must be a valid URL"))?
    } else {
        let authority = if trimmed.starts_with(':') {
            format!("{DEFAULT_HOST}{trimmed}")
        } else {
            trimmed.to_string()
        };
        let scheme = if tls_enabled { "https" } else { "http" };
        Url::parse(&format!("{scheme}://{authority}"))
            .map_err(|_| ConfigError::invalid("address", raw, "must be host:port or a URL"))?
    };

    match url.scheme() {
        "https" => {}
        "http" if !tls_enabled => {}
        "http" => {
            return Err(ConfigError::invalid(
                "address",
                raw,
                "http scheme conflicts with tls",
            ));
        }
        _ => {
            return Err(ConfigError::invalid(
                "address",
                raw,
                "scheme must be http or https",
            ));
        }
    }

    if url.host_str().is_none_or(str::is_empty) {
        return Err(ConfigError::invalid("address", raw, "must include a host"));
    }

    Ok(url)
}

/// Convert a whole-second timeout into a [`Duration`], rejecting zero.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidField`] when `secs` is zero.
pub fn parse_timeout(field: &'static str, secs: u64) -> ConfigResult<Duration> {
    if secs == 0 {
        return Err(ConfigError::InvalidField {
            field,
            value: Some(secs.to_string()),
            reason: "must be greater than zero",
        });
    }
    Ok(Duration::from_secs(secs))
}
