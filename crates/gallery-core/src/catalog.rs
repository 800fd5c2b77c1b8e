//! Catalog providers
//!
//! The gallery never owns its data source. A [`CatalogSource`] yields the
//! ordered records once at startup, and [`Catalog`] freezes them into a
//! validated, shareable sequence.

use crate::error::CatalogError;
use crate::record::ImageRecord;
use std::collections::HashSet;
use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Source of the ordered image records
pub trait CatalogSource: Send + Sync {
    /// Load every record, in display order
    ///
    /// # Errors
    /// Returns a [`CatalogError`] when the backing store cannot be read.
    fn load(&self) -> Result<Vec<ImageRecord>, CatalogError>;
}

/// Built-in demo catalog
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticCatalog;

impl CatalogSource for StaticCatalog {
    fn load(&self) -> Result<Vec<ImageRecord>, CatalogError> {
        Ok(vec![
            ImageRecord::new(
                1,
                "https://photospace.life/ZY5FLR.png",
                "A modern glass and concrete building",
                "Architectural Wonder",
                "A stunning view of modern architecture.",
            ),
            ImageRecord::new(
                2,
                "/view-image/banner-2383908_1280.png",
                "A majestic mountain range with a starry night sky",
                "Mountain Serenity",
                "The calm and beauty of a mountain range at dawn.",
            ),
            ImageRecord::new(
                3,
                "/view-image/car-967387_1280.png",
                "A sea turtle swimming gracefully in the deep blue ocean",
                "Oceanic Depth",
                "Exploring the vibrant life beneath the waves.",
            ),
            ImageRecord::new(
                4,
                "/view-image/christmas-7715230_1280.png",
                "A sunlit path winding through a dense green forest",
                "Forest Path",
                "A quiet journey through a sunlit forest.",
            ),
            ImageRecord::new(
                5,
                "/view-image/dolphin-2708695_1280.png",
                "A sprawling cityscape illuminated with vibrant lights at night",
                "City Lights",
                "The vibrant energy of a city at night.",
            ),
            ImageRecord::new(
                6,
                "/view-image/Blurred-Image.png",
                "Blurred-Image",
                "Blurred",
                "This is a Blurred-Image.",
            ),
        ])
    }
}

/// Catalog read from a JSON array on disk
#[derive(Debug, Clone)]
pub struct JsonCatalog {
    path: PathBuf,
}

impl JsonCatalog {
    /// Create a provider for the given file
    #[inline]
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Backing file
    #[inline]
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CatalogSource for JsonCatalog {
    fn load(&self) -> Result<Vec<ImageRecord>, CatalogError> {
        let raw = std::fs::read_to_string(&self.path)
            .map_err(|e| CatalogError::io_error(&self.path, e))?;
        serde_json::from_str(&raw).map_err(|source| CatalogError::Json {
            path: self.path.clone(),
            source,
        })
    }
}

/// Any in-memory record list is a source
impl CatalogSource for Vec<ImageRecord> {
    fn load(&self) -> Result<Vec<ImageRecord>, CatalogError> {
        Ok(self.clone())
    }
}

/// Validated, immutable catalog
#[derive(Debug, Clone)]
pub struct Catalog {
    records: Arc<[ImageRecord]>,
}

impl Catalog {
    /// Load and validate records from a source
    ///
    /// # Errors
    /// - `CatalogError::DuplicateId` if two records share an id
    /// - `CatalogError::EmptySource` if a record has no `src`
    /// - any error raised by the source itself
    pub fn from_source(source: &dyn CatalogSource) -> Result<Self, CatalogError> {
        let records = source.load()?;

        let mut seen = HashSet::with_capacity(records.len());
        for record in &records {
            if !seen.insert(record.id) {
                return Err(CatalogError::DuplicateId(record.id));
            }
            if record.src.trim().is_empty() {
                return Err(CatalogError::EmptySource(record.id));
            }
        }

        tracing::debug!(count = records.len(), "Catalog loaded");
        Ok(Self {
            records: records.into(),
        })
    }

    /// Number of records
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the catalog has no records
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Contiguous slice starting at `offset`, at most `size` long
    #[must_use]
    pub fn batch(&self, offset: usize, size: usize) -> &[ImageRecord] {
        let start = offset.min(self.records.len());
        let end = offset.saturating_add(size).min(self.records.len());
        &self.records[start..end]
    }
}

impl Deref for Catalog {
    type Target = [ImageRecord];

    fn deref(&self) -> &Self::Target {
        &self.records
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::ImageId;

    fn record(id: u64) -> ImageRecord {
        ImageRecord::new(id, format!("/view-image/{id}.png"), "", "", "")
    }

    #[test]
    fn static_catalog_is_valid() {
        let catalog = Catalog::from_source(&StaticCatalog).unwrap();
        assert_eq!(catalog.len(), 6);
        assert!(!catalog[0].is_gateway_relative());
        assert!(catalog[1..].iter().all(ImageRecord::is_gateway_relative));
    }

    #[test]
    fn duplicate_ids_rejected() {
        let source = vec![record(1), record(2), record(1)];
        let err = Catalog::from_source(&source).unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateId(ImageId(1))));
    }

    #[test]
    fn empty_src_rejected() {
        let mut bad = record(3);
        bad.src = "  ".to_string();
        let err = Catalog::from_source(&vec![record(1), bad]).unwrap_err();
        assert!(matches!(err, CatalogError::EmptySource(ImageId(3))));
    }

    #[test]
    fn batch_clamps_to_bounds() {
        let catalog = Catalog::from_source(&(1..=8).map(record).collect::<Vec<_>>()).unwrap();
        assert_eq!(catalog.batch(0, 6).len(), 6);
        assert_eq!(catalog.batch(6, 6).len(), 2);
        assert!(catalog.batch(8, 6).is_empty());
        assert!(catalog.batch(100, 6).is_empty());
    }

    #[test]
    fn json_catalog_missing_file() {
        let err = JsonCatalog::new("/definitely/not/here.json").load().unwrap_err();
        assert!(matches!(err, CatalogError::Io { .. }));
    }
}
