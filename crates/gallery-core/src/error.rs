//! Error types for the gallery core

use crate::record::ImageId;
use std::path::PathBuf;

/// Errors while loading or validating a catalog
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// IO error reading a catalog file
    #[error("io error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Catalog file is not a JSON array of records
    #[error("malformed catalog {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Two records share an id
    #[error("duplicate image id: {0}")]
    DuplicateId(ImageId),

    /// A record has an empty source
    #[error("image {0} has an empty src")]
    EmptySource(ImageId),
}

impl CatalogError {
    /// Create IO error for path
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
