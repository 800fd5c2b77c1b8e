//! Image records
//!
//! An [`ImageRecord`] is one immutable catalog entry. Records whose `src`
//! points at the gateway (`/view-image/...`) are resolved against the
//! configured API base URL before rendering.

use serde::{Deserialize, Serialize};

/// Path prefix that marks a source as served by the image gateway
pub const GATEWAY_PREFIX: &str = "/view-image/";

/// Stable identifier of a catalog entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageId(pub u64);

impl std::fmt::Display for ImageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One entry of the gallery catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRecord {
    /// Unique, stable identifier
    pub id: ImageId,
    /// Absolute URL or gateway-relative path
    pub src: String,
    /// Alternative text
    pub alt: String,
    /// Card title
    pub title: String,
    /// Card description
    pub description: String,
}

impl ImageRecord {
    /// Create a new record
    #[inline]
    #[must_use]
    pub fn new(
        id: u64,
        src: impl Into<String>,
        alt: impl Into<String>,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: ImageId(id),
            src: src.into(),
            alt: alt.into(),
            title: title.into(),
            description: description.into(),
        }
    }

    /// Whether the source is served by the image gateway
    #[inline]
    #[must_use]
    pub fn is_gateway_relative(&self) -> bool {
        self.src.starts_with(GATEWAY_PREFIX)
    }

    /// Source URL to render, prefixing gateway paths with `api_base_url`
    #[must_use]
    pub fn resolved_src(&self, api_base_url: &str) -> String {
        if self.is_gateway_relative() {
            format!("{}{}", api_base_url.trim_end_matches('/'), self.src)
        } else {
            self.src.clone()
        }
    }
}
