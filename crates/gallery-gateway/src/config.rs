//! Gateway configuration
//!
//! Resolution order, lowest to highest: defaults, TOML file, environment,
//! command line. The resulting [`GatewayConfig`] is handed to
//! [`Gateway::new`](crate::Gateway::new); nothing reads ambient state after
//! that.

use crate::error::GatewayError;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::net::{IpAddr, Ipv4Addr};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

/// Default content security policy
pub const DEFAULT_CSP: &str =
    "default-src 'self'; script-src 'self' 'unsafe-inline'; img-src 'self' data:";

/// Gateway configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// Listen address
    pub bind_address: IpAddr,
    /// Listen port
    pub port: u16,
    /// Access-event webhook
    pub webhook_url: String,
    /// Per-request timeout for the webhook, in milliseconds
    pub webhook_timeout_ms: u64,
    /// Directory images are served from
    pub image_dir: PathBuf,
    /// Take the client address from `X-Forwarded-For`
    pub trust_proxy: bool,
    /// Allow cross-origin GETs from anywhere
    pub cors_allow_any_origin: bool,
    /// `Content-Security-Policy` header value
    pub content_security_policy: String,
}

impl GatewayConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Read a TOML file; absent keys keep their defaults
    ///
    /// # Errors
    /// - `GatewayError::Io` if the file cannot be read
    /// - `GatewayError::Config` if it is not valid TOML for this struct
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, GatewayError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| GatewayError::io_error(path, e))?;
        toml::from_str(&raw)
            .map_err(|e| GatewayError::config(format!("{}: {e}", path.display())))
    }

    /// Apply overrides from the process environment
    ///
    /// # Errors
    /// `GatewayError::Config` when a variable is set but unparsable.
    pub fn apply_env(self) -> Result<Self, GatewayError> {
        self.apply_vars(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary lookup (the environment in
    /// production, a map in tests)
    ///
    /// # Errors
    /// `GatewayError::Config` when a variable is set but unparsable.
    pub fn apply_vars<F>(mut self, lookup: F) -> Result<Self, GatewayError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(port) = parse_var(&lookup, "PORT")? {
            self.port = port;
        }
        if let Some(addr) = parse_var(&lookup, "BIND_ADDRESS")? {
            self.bind_address = addr;
        }
        if let Some(url) = parse_var::<String, _>(&lookup, "WEBHOOK_URL")? {
            self.webhook_url = url;
        }
        if let Some(ms) = parse_var(&lookup, "WEBHOOK_TIMEOUT_MS")? {
            self.webhook_timeout_ms = ms;
        }
        if let Some(dir) = parse_var::<PathBuf, _>(&lookup, "IMAGE_DIR")? {
            self.image_dir = dir;
        }
        if let Some(trust) = parse_var(&lookup, "TRUST_PROXY")? {
            self.trust_proxy = trust;
        }
        Ok(self)
    }

    /// With port
    #[inline]
    #[must_use]
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// With webhook URL
    #[inline]
    #[must_use]
    pub fn with_webhook_url(mut self, url: impl Into<String>) -> Self {
        self.webhook_url = url.into();
        self
    }

    /// With image directory
    #[inline]
    #[must_use]
    pub fn with_image_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.image_dir = dir.into();
        self
    }

    /// With proxy trust
    #[inline]
    #[must_use]
    pub fn with_trust_proxy(mut self, trust: bool) -> Self {
        self.trust_proxy = trust;
        self
    }

    #[inline]
    #[must_use]
    pub fn webhook_timeout(&self) -> Duration {
        Duration::from_millis(self.webhook_timeout_ms)
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            bind_address: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: 3000,
            webhook_url: "http://127.0.0.1:8787/access-events".to_string(),
            webhook_timeout_ms: 5_000,
            image_dir: PathBuf::from("public/images"),
            trust_proxy: true,
            cors_allow_any_origin: true,
            content_security_policy: DEFAULT_CSP.to_string(),
        }
    }
}

fn parse_var<T, F>(lookup: &F, key: &str) -> Result<Option<T>, GatewayError>
where
    T: FromStr,
    T::Err: Display,
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(key).filter(|v| !v.trim().is_empty()) else {
        tracing::debug!("{key} not set, keeping configured value");
        return Ok(None);
    };

    raw.trim()
        .parse()
        .map(Some)
        .map_err(|e| GatewayError::config(format!("invalid {key} value {raw:?}: {e}")))
}
