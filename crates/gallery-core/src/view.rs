//! Render model for the gallery
//!
//! [`GalleryView`] is what a front end draws: image cards in catalog order,
//! skeleton cards while a batch is in flight, the end-of-gallery notice,
//! and the sentinel that drives visibility-triggered loading.

use crate::config::GalleryConfig;
use crate::controller::GalleryPage;
use crate::record::{ImageId, ImageRecord};
use crate::reveal::RevealGate;
use std::collections::HashMap;

/// Notice shown once the whole catalog has been delivered
pub const END_OF_GALLERY: &str = "You've reached the end of the gallery!";

/// A rendered image card
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageCard {
    pub id: ImageId,
    pub src: String,
    pub alt: String,
    pub title: String,
    pub description: String,
    pub blurred: bool,
    pub loaded: bool,
    /// Click-to-reveal overlay is shown
    pub overlay: bool,
    /// Active link target, `None` while blurred
    pub link: Option<String>,
}

impl ImageCard {
    fn from_parts(record: &ImageRecord, gate: Option<&RevealGate>, api_base_url: &str) -> Self {
        let fresh;
        let gate = if let Some(gate) = gate {
            gate
        } else {
            fresh = RevealGate::new(record, api_base_url);
            &fresh
        };

        Self {
            id: record.id,
            src: gate.src().to_string(),
            alt: record.alt.clone(),
            title: record.title.clone(),
            description: record.description.clone(),
            blurred: gate.is_blurred(),
            loaded: gate.is_loaded(),
            overlay: gate.overlay_visible(),
            link: gate.link().map(str::to_string),
        }
    }
}

/// One slot in the gallery grid
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Card {
    Image(ImageCard),
    /// Placeholder for a batch that is still loading
    Skeleton,
}

/// Everything a front end needs to draw the current state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GalleryView {
    pub cards: Vec<Card>,
    /// Show [`END_OF_GALLERY`]
    pub end_of_gallery: bool,
    /// Sentinel is rendered below the grid; observers watch it while this
    /// is set
    pub sentinel_active: bool,
}

impl GalleryView {
    pub(crate) fn render(
        page: &GalleryPage,
        gates: &HashMap<ImageId, RevealGate>,
        config: &GalleryConfig,
    ) -> Self {
        let mut cards: Vec<Card> = page
            .displayed
            .iter()
            .map(|record| {
                Card::Image(ImageCard::from_parts(
                    record,
                    gates.get(&record.id),
                    &config.api_base_url,
                ))
            })
            .collect();

        if page.is_loading {
            cards.extend(std::iter::repeat(Card::Skeleton).take(config.skeleton_count));
        }

        Self {
            cards,
            end_of_gallery: !page.is_loading && !page.has_more,
            sentinel_active: page.has_more,
        }
    }

    /// Image cards only
    pub fn images(&self) -> impl Iterator<Item = &ImageCard> {
        self.cards.iter().filter_map(|card| match card {
            Card::Image(image) => Some(image),
            Card::Skeleton => None,
        })
    }

    #[must_use]
    pub fn skeleton_count(&self) -> usize {
        self.cards
            .iter()
            .filter(|card| matches!(card, Card::Skeleton))
            .count()
    }
}

/// Visible region of the scroll container, in pixels from the top of the
/// document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub top: i64,
    pub height: u32,
}

impl Viewport {
    #[inline]
    #[must_use]
    pub fn new(top: i64, height: u32) -> Self {
        Self { top, height }
    }

    #[inline]
    #[must_use]
    pub fn bottom(&self) -> i64 {
        self.top + i64::from(self.height)
    }

    /// Whether an element starting at `sentinel_top` intersects the viewport
    /// grown by `margin_px` on both edges
    #[must_use]
    pub fn sentinel_visible(&self, sentinel_top: i64, margin_px: u32) -> bool {
        let margin = i64::from(margin_px);
        sentinel_top <= self.bottom() + margin && sentinel_top >= self.top - margin
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookahead_margin() {
        let viewport = Viewport::new(1000, 800);
        assert!(viewport.sentinel_visible(1500, 200));
        assert!(viewport.sentinel_visible(2000, 200));
        assert!(!viewport.sentinel_visible(2001, 200));
        assert!(!viewport.sentinel_visible(1801, 0));
        assert!(!viewport.sentinel_visible(700, 200));
    }

    #[test]
    fn loading_renders_skeletons() {
        let page = GalleryPage {
            displayed: Vec::new(),
            is_loading: true,
            has_more: true,
        };
        let view = GalleryView::render(&page, &HashMap::new(), &GalleryConfig::new());
        assert_eq!(view.skeleton_count(), 3);
        assert!(!view.end_of_gallery);
        assert!(view.sentinel_active);
    }

    #[test]
    fn end_of_gallery_only_when_idle() {
        let record = ImageRecord::new(1, "https://x/a.png", "a", "A", "");
        let page = GalleryPage {
            displayed: vec![record],
            is_loading: false,
            has_more: false,
        };
        let view = GalleryView::render(&page, &HashMap::new(), &GalleryConfig::new());
        assert!(view.end_of_gallery);
        assert!(!view.sentinel_active);
        assert_eq!(view.skeleton_count(), 0);

        let card = view.images().next().unwrap();
        assert!(card.blurred);
        assert!(!card.overlay);
        assert_eq!(card.link, None);
    }
}
