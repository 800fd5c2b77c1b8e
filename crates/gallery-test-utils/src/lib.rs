//! Testing utilities for the gallery workspace
//!
//! Shared fixtures: synthetic catalogs and temporary image directories.

#![allow(missing_docs)]

use gallery_core::{Catalog, GalleryConfig, GalleryController, ImageRecord};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tempfile::TempDir;

/// Minimal valid PNG (1x1, transparent)
pub const TINY_PNG: &[u8] = &[
    0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44,
    0x52, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00, 0x00, 0x1F,
    0x15, 0xC4, 0x89, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x44, 0x41, 0x54, 0x78, 0x9C, 0x63, 0x00,
    0x01, 0x00, 0x00, 0x05, 0x00, 0x01, 0x0D, 0x0A, 0x2D, 0xB4, 0x00, 0x00, 0x00, 0x00, 0x49,
    0x45, 0x4E, 0x44, 0xAE, 0x42, 0x60, 0x82,
];

/// `n` gateway-relative records with ids `1..=n`
pub fn sample_records(n: usize) -> Vec<ImageRecord> {
    (1..=n as u64)
        .map(|i| {
            ImageRecord::new(
                i,
                format!("/view-image/image-{i}.png"),
                format!("image {i}"),
                format!("Image {i}"),
                format!("Sample image number {i}"),
            )
        })
        .collect()
}

pub fn sample_catalog(n: usize) -> Catalog {
    Catalog::from_source(&sample_records(n)).unwrap()
}

/// Controller with the default batch size and a short latency
pub fn sample_controller(n: usize) -> GalleryController {
    let config = GalleryConfig::new().with_load_latency(Duration::from_millis(50));
    GalleryController::new(sample_catalog(n), config)
}

/// Writes `records` as a JSON catalog file inside a fresh temp dir
pub fn write_catalog_file(records: &[ImageRecord]) -> (TempDir, PathBuf) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("catalog.json");
    std::fs::write(&path, serde_json::to_vec_pretty(records).unwrap()).unwrap();
    (dir, path)
}

/// Image directory fixture
///
/// Layout:
/// ```text
/// <tmp>/
///   secret.txt
///   images/
///     existing.png
///     photo.jpg
///     nested/inner.png
/// ```
pub struct ImageDirFixture {
    root: TempDir,
}

impl ImageDirFixture {
    pub fn new() -> Self {
        let root = TempDir::new().unwrap();
        let images = root.path().join("images");
        std::fs::create_dir_all(images.join("nested")).unwrap();
        std::fs::write(images.join("existing.png"), TINY_PNG).unwrap();
        std::fs::write(images.join("photo.jpg"), b"not really a jpeg").unwrap();
        std::fs::write(images.join("nested").join("inner.png"), TINY_PNG).unwrap();
        std::fs::write(root.path().join("secret.txt"), b"outside the image root").unwrap();
        Self { root }
    }

    /// Directory served by the gateway
    pub fn image_dir(&self) -> PathBuf {
        self.root.path().join("images")
    }

    /// Parent of the image directory (holds `secret.txt`)
    pub fn outer_dir(&self) -> &Path {
        self.root.path()
    }

    /// Adds a symlink inside the image dir pointing at `secret.txt`
    #[cfg(unix)]
    pub fn with_escaping_symlink(self, name: &str) -> Self {
        std::os::unix::fs::symlink(
            self.root.path().join("secret.txt"),
            self.image_dir().join(name),
        )
        .unwrap();
        self
    }
}

impl Default for ImageDirFixture {
    fn default() -> Self {
        Self::new()
    }
}
