//! Per-image reveal gate
//!
//! Every rendered image starts blurred. Once the image (or its error
//! placeholder) has loaded, an overlay is shown; clicking it unblurs the
//! image for the rest of the session. There is no way back to blurred.

use crate::record::{ImageId, ImageRecord};

/// Visual state of a single image card
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevealGate {
    id: ImageId,
    src: String,
    blurred: bool,
    loaded: bool,
    failed: bool,
}

impl RevealGate {
    /// Gate for a freshly rendered image
    #[must_use]
    pub fn new(record: &ImageRecord, api_base_url: &str) -> Self {
        Self {
            id: record.id,
            src: record.resolved_src(api_base_url),
            blurred: true,
            loaded: false,
            failed: false,
        }
    }

    #[inline]
    #[must_use]
    pub fn id(&self) -> ImageId {
        self.id
    }

    /// Source currently shown (the placeholder after a load error)
    #[inline]
    #[must_use]
    pub fn src(&self) -> &str {
        &self.src
    }

    #[inline]
    #[must_use]
    pub fn is_blurred(&self) -> bool {
        self.blurred
    }

    #[inline]
    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Whether the source failed and was replaced
    #[inline]
    #[must_use]
    pub fn has_failed(&self) -> bool {
        self.failed
    }

    /// The click-to-reveal overlay is only present over a loaded, blurred image
    #[inline]
    #[must_use]
    pub fn overlay_visible(&self) -> bool {
        self.blurred && self.loaded
    }

    /// Outbound link, disabled until the image is revealed
    #[inline]
    #[must_use]
    pub fn link(&self) -> Option<&str> {
        (!self.blurred).then_some(self.src.as_str())
    }

    /// Image finished loading
    pub fn on_load(&mut self) {
        self.loaded = true;
    }

    /// Image failed to load: swap in the placeholder once and force loaded
    pub fn on_error(&mut self, placeholder: &str) {
        if !self.failed {
            tracing::debug!(id = %self.id, src = %self.src, "Image failed to load, using placeholder");
            self.src = placeholder.to_string();
            self.failed = true;
        }
        self.loaded = true;
    }

    /// Click on the overlay. Returns `true` only on the blurred → revealed
    /// transition.
    pub fn reveal(&mut self) -> bool {
        if !self.overlay_visible() {
            return false;
        }
        self.blurred = false;
        true
    }
}
