//! Gallery configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Environment variable holding the API base URL
pub const API_URL_ENV: &str = "API_URL";

/// Gallery controller configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GalleryConfig {
    /// Records appended per load
    pub batch_size: usize,
    /// Simulated fetch latency before a batch lands
    #[serde(with = "duration_millis")]
    pub load_latency: Duration,
    /// Prefix for gateway-relative image paths
    pub api_base_url: String,
    /// Distance below the viewport at which the sentinel counts as visible
    pub lookahead_margin_px: u32,
    /// Placeholder cards shown while a batch is in flight
    pub skeleton_count: usize,
    /// Image substituted when a source fails to load
    pub error_placeholder_url: String,
}

impl GalleryConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults, with `API_URL` taken from the environment when set
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();
        match std::env::var(API_URL_ENV) {
            Ok(url) if !url.trim().is_empty() => config.api_base_url = url,
            _ => tracing::debug!("{API_URL_ENV} not set, using {}", config.api_base_url),
        }
        config
    }

    /// With batch size (clamped to at least one)
    #[inline]
    #[must_use]
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    /// With simulated latency
    #[inline]
    #[must_use]
    pub fn with_load_latency(mut self, latency: Duration) -> Self {
        self.load_latency = latency;
        self
    }

    /// With API base URL
    #[inline]
    #[must_use]
    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }

    /// With lookahead margin
    #[inline]
    #[must_use]
    pub fn with_lookahead_margin(mut self, px: u32) -> Self {
        self.lookahead_margin_px = px;
        self
    }
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            batch_size: 6,
            load_latency: Duration::from_millis(1500),
            api_base_url: "http://localhost:3000".to_string(),
            lookahead_margin_px: 200,
            skeleton_count: 3,
            error_placeholder_url: "https://placehold.co/600x400/ff0000/ffffff?text=Error"
                .to_string(),
        }
    }
}

mod duration_millis {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub(super) fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
    }

    pub(super) fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        u64::deserialize(d).map(Duration::from_millis)
    }
}
