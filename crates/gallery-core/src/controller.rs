//! Gallery controller
//!
//! Owns the paginated page state and drives incremental loading:
//! - [`GalleryController::mount`] fires the initial load once
//! - [`GalleryController::load_more`] appends the next batch after the
//!   configured latency, guarded by an in-flight flag
//! - [`GalleryController::on_sentinel_visible`] is the visibility trigger
//! - reveal operations forward to the per-image [`RevealGate`]
//!
//! The controller is shared behind an `Arc`; state lives in a short-held
//! mutex that is never held across an `.await`.

use crate::catalog::{Catalog, CatalogSource};
use crate::config::GalleryConfig;
use crate::error::CatalogError;
use crate::record::{ImageId, ImageRecord};
use crate::reveal::RevealGate;
use crate::view::{GalleryView, Viewport};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

/// Paginated page state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GalleryPage {
    /// Records delivered so far, in catalog order
    pub displayed: Vec<ImageRecord>,
    /// A batch is in flight
    pub is_loading: bool,
    /// More records remain; never returns to `true` once cleared
    pub has_more: bool,
}

/// Result of a single `load_more` call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// A batch was appended
    Appended {
        /// Records in this batch
        count: usize,
        /// Whether records remain after it
        has_more: bool,
    },
    /// Nothing was left to append; `has_more` is now false
    Exhausted,
    /// The call did nothing
    Skipped(SkipReason),
}

/// Why a `load_more` call was a no-op
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Another batch is already in flight
    InFlight,
    /// The catalog has been fully delivered
    Exhausted,
}

#[derive(Debug)]
struct ControllerState {
    page: GalleryPage,
    gates: HashMap<ImageId, RevealGate>,
}

/// Clears the in-flight flag even if the load future is dropped mid-sleep
struct LoadingGuard<'a> {
    state: &'a Mutex<ControllerState>,
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.state.lock().page.is_loading = false;
    }
}

/// Headless gallery controller
#[derive(Debug)]
pub struct GalleryController {
    catalog: Catalog,
    config: GalleryConfig,
    state: Mutex<ControllerState>,
    mounted: AtomicBool,
}

impl GalleryController {
    /// Create a controller over an already validated catalog
    #[must_use]
    pub fn new(catalog: Catalog, config: GalleryConfig) -> Self {
        let has_more = !catalog.is_empty();
        Self {
            catalog,
            config,
            state: Mutex::new(ControllerState {
                page: GalleryPage {
                    displayed: Vec::new(),
                    is_loading: false,
                    has_more,
                },
                gates: HashMap::new(),
            }),
            mounted: AtomicBool::new(false),
        }
    }

    /// Load the catalog from a source and build a controller
    ///
    /// # Errors
    /// Propagates any [`CatalogError`] from loading or validation.
    pub fn from_source(
        source: &dyn CatalogSource,
        config: GalleryConfig,
    ) -> Result<Self, CatalogError> {
        Ok(Self::new(Catalog::from_source(source)?, config))
    }

    #[inline]
    #[must_use]
    pub fn config(&self) -> &GalleryConfig {
        &self.config
    }

    #[inline]
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Snapshot of the current page state
    #[must_use]
    pub fn page(&self) -> GalleryPage {
        self.state.lock().page.clone()
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.state.lock().page.is_loading
    }

    #[must_use]
    pub fn has_more(&self) -> bool {
        self.state.lock().page.has_more
    }

    #[must_use]
    pub fn displayed_len(&self) -> usize {
        self.state.lock().page.displayed.len()
    }

    /// First mount: load once if nothing is displayed yet.
    ///
    /// Returns `None` on every call after the first, or when the page
    /// already has records.
    pub async fn mount(&self) -> Option<LoadOutcome> {
        if self.mounted.swap(true, Ordering::AcqRel) {
            return None;
        }
        if self.displayed_len() > 0 {
            return None;
        }
        Some(self.load_more().await)
    }

    /// Append the next batch after the simulated latency.
    ///
    /// No-op while another load is in flight or once the catalog is
    /// exhausted. The in-flight flag is always cleared on completion.
    pub async fn load_more(&self) -> LoadOutcome {
        {
            let mut state = self.state.lock();
            if state.page.is_loading {
                return LoadOutcome::Skipped(SkipReason::InFlight);
            }
            if !state.page.has_more {
                return LoadOutcome::Skipped(SkipReason::Exhausted);
            }
            state.page.is_loading = true;
        }
        let _guard = LoadingGuard { state: &self.state };

        tracing::debug!(latency = ?self.config.load_latency, "Loading batch");
        tokio::time::sleep(self.config.load_latency).await;

        let mut state = self.state.lock();
        let offset = state.page.displayed.len();
        let batch = self.catalog.batch(offset, self.config.batch_size.max(1));

        if batch.is_empty() {
            state.page.has_more = false;
            tracing::info!(total = offset, "Gallery exhausted");
            return LoadOutcome::Exhausted;
        }

        for record in batch {
            state
                .gates
                .insert(record.id, RevealGate::new(record, &self.config.api_base_url));
        }
        state.page.displayed.extend_from_slice(batch);

        let has_more = state.page.displayed.len() < self.catalog.len();
        state.page.has_more = has_more;
        tracing::info!(
            count = batch.len(),
            displayed = state.page.displayed.len(),
            has_more,
            "Batch appended"
        );

        LoadOutcome::Appended {
            count: batch.len(),
            has_more,
        }
    }

    /// Visibility trigger from the bottom sentinel
    pub async fn on_sentinel_visible(&self) -> Option<LoadOutcome> {
        if self.is_loading() {
            return None;
        }
        Some(self.load_more().await)
    }

    /// Scroll event: triggers a load when the sentinel at `sentinel_top` is
    /// within the lookahead margin of `viewport`
    pub async fn on_scroll(&self, viewport: Viewport, sentinel_top: i64) -> Option<LoadOutcome> {
        if viewport.sentinel_visible(sentinel_top, self.config.lookahead_margin_px) {
            self.on_sentinel_visible().await
        } else {
            None
        }
    }

    /// Image finished loading
    pub fn image_loaded(&self, id: ImageId) {
        if let Some(gate) = self.state.lock().gates.get_mut(&id) {
            gate.on_load();
        }
    }

    /// Image failed to load; placeholder substituted
    pub fn image_failed(&self, id: ImageId) {
        let placeholder = &self.config.error_placeholder_url;
        if let Some(gate) = self.state.lock().gates.get_mut(&id) {
            gate.on_error(placeholder);
        }
    }

    /// Click on an image's overlay. Returns `true` only when that image
    /// went from blurred to revealed.
    pub fn reveal(&self, id: ImageId) -> bool {
        self.state
            .lock()
            .gates
            .get_mut(&id)
            .is_some_and(RevealGate::reveal)
    }

    /// Reveal gate of a displayed image
    #[must_use]
    pub fn gate(&self, id: ImageId) -> Option<RevealGate> {
        self.state.lock().gates.get(&id).cloned()
    }

    /// Render the current state
    #[must_use]
    pub fn view(&self) -> GalleryView {
        let state = self.state.lock();
        GalleryView::render(&state.page, &state.gates, &self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    fn records(n: u64) -> Vec<ImageRecord> {
        (1..=n)
            .map(|i| ImageRecord::new(i, format!("/view-image/{i}.png"), "", format!("#{i}"), ""))
            .collect()
    }

    fn controller(n: u64) -> GalleryController {
        GalleryController::from_source(&records(n), GalleryConfig::new()).unwrap()
    }

    #[test]
    fn empty_catalog_has_nothing_more() {
        let controller = controller(0);
        assert!(!controller.has_more());
        assert_eq!(controller.displayed_len(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn empty_catalog_load_is_skipped() {
        let controller = controller(0);
        assert_eq!(
            controller.load_more().await,
            LoadOutcome::Skipped(SkipReason::Exhausted)
        );
        assert!(controller.view().cards.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn partial_final_batch() {
        let controller = controller(8);

        assert_eq!(
            controller.load_more().await,
            LoadOutcome::Appended { count: 6, has_more: true }
        );
        assert_eq!(
            controller.load_more().await,
            LoadOutcome::Appended { count: 2, has_more: false }
        );
        assert_eq!(controller.displayed_len(), 8);
        assert_eq!(
            controller.load_more().await,
            LoadOutcome::Skipped(SkipReason::Exhausted)
        );
    }

    #[tokio::test(start_paused = true)]
    async fn mount_loads_once() {
        let controller = controller(12);
        assert!(controller.mount().await.is_some());
        assert!(controller.mount().await.is_none());
        assert_eq!(controller.displayed_len(), 6);
    }

    #[tokio::test(start_paused = true)]
    async fn overlapping_loads_do_not_double_append() {
        let controller = Arc::new(controller(12));

        let first = tokio::spawn({
            let controller = Arc::clone(&controller);
            async move { controller.load_more().await }
        });
        tokio::task::yield_now().await;
        assert!(controller.is_loading());

        for _ in 0..5 {
            assert_eq!(
                controller.load_more().await,
                LoadOutcome::Skipped(SkipReason::InFlight)
            );
            assert!(controller.on_sentinel_visible().await.is_none());
        }

        assert!(matches!(first.await.unwrap(), LoadOutcome::Appended { count: 6, .. }));
        assert_eq!(controller.displayed_len(), 6);
        assert!(!controller.is_loading());
    }

    #[tokio::test(start_paused = true)]
    async fn dropped_load_clears_flag() {
        let controller = controller(6);
        let pending = tokio::time::timeout(Duration::from_millis(10), controller.load_more()).await;
        assert!(pending.is_err());
        assert!(!controller.is_loading());
        assert_eq!(controller.displayed_len(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn reveal_targets_single_image() {
        let controller = controller(6);
        controller.load_more().await;

        controller.image_loaded(ImageId(1));
        controller.image_loaded(ImageId(2));

        assert!(controller.reveal(ImageId(1)));
        assert!(!controller.reveal(ImageId(1)));
        assert!(!controller.gate(ImageId(1)).unwrap().is_blurred());
        assert!(controller.gate(ImageId(2)).unwrap().is_blurred());
        assert!(!controller.reveal(ImageId(99)));
    }
}
