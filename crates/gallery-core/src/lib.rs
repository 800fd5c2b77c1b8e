//! Gallery Core - headless progressive image gallery
//!
//! Drives an image gallery that reveals a fixed catalog in batches:
//! - Loads the ordered catalog through a [`CatalogSource`]
//! - Appends fixed-size batches on mount and on sentinel visibility
//! - Serializes loads behind an in-flight flag
//! - Keeps each image behind a blur until the user reveals it
//!
//! # Example
//!
//! ```rust,ignore
//! use gallery_core::{GalleryConfig, GalleryController, StaticCatalog};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let controller = GalleryController::from_source(&StaticCatalog, GalleryConfig::from_env())?;
//! controller.mount().await;
//!
//! for card in controller.view().images() {
//!     println!("{} -> {}", card.title, card.src);
//! }
//! # Ok(())
//! # }
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod catalog;
pub mod config;
pub mod controller;
pub mod error;
pub mod record;
pub mod reveal;
pub mod view;

pub use catalog::{Catalog, CatalogSource, JsonCatalog, StaticCatalog};
pub use config::GalleryConfig;
pub use controller::{GalleryController, GalleryPage, LoadOutcome, SkipReason};
pub use error::CatalogError;
pub use record::{ImageId, ImageRecord, GATEWAY_PREFIX};
pub use reveal::RevealGate;
pub use view::{Card, GalleryView, ImageCard, Viewport, END_OF_GALLERY};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with the gallery
    pub use crate::{
        Catalog, CatalogSource, GalleryConfig, GalleryController, ImageId, ImageRecord,
        LoadOutcome,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
