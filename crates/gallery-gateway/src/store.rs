//! Image directory access
//!
//! Requested names are single path segments. Anything that could address
//! a file outside the image root is refused before touching the disk, and
//! the canonical target must still sit under the canonical root, which
//! also catches symlinks pointing elsewhere.

use crate::error::{GatewayError, ResolveError};
use mime_guess::Mime;
use std::path::{Path, PathBuf};
use tokio::fs::File;

/// Opened image ready to be streamed
#[derive(Debug)]
pub struct ServedImage {
    pub path: PathBuf,
    pub file: File,
    pub len: u64,
    pub content_type: Mime,
}

/// Read-only view of the image directory
#[derive(Debug, Clone)]
pub struct ImageStore {
    root: PathBuf,
}

impl ImageStore {
    /// Open the store rooted at `dir`
    ///
    /// # Errors
    /// - `GatewayError::Io` if the directory cannot be canonicalized
    /// - `GatewayError::Config` if it is not a directory
    pub fn new(dir: impl AsRef<Path>) -> Result<Self, GatewayError> {
        let dir = dir.as_ref();
        let root = std::fs::canonicalize(dir).map_err(|e| GatewayError::io_error(dir, e))?;
        if !root.is_dir() {
            return Err(GatewayError::config(format!(
                "image dir {} is not a directory",
                root.display()
            )));
        }
        Ok(Self { root })
    }

    /// Canonical image root
    #[inline]
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Map `name` to a regular file under the root
    ///
    /// # Errors
    /// - `ResolveError::Rejected` for traversal attempts or names with
    ///   separators, and for targets escaping the root
    /// - `ResolveError::NotFound` if nothing (or no regular file) is there
    pub async fn resolve(&self, name: &str) -> Result<PathBuf, ResolveError> {
        validate_name(name)?;

        let candidate = self.root.join(name);
        let canonical = match tokio::fs::canonicalize(&candidate).await {
            Ok(path) => path,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(ResolveError::NotFound(name.to_string()))
            }
            Err(source) => {
                return Err(ResolveError::Io {
                    path: candidate,
                    source,
                })
            }
        };

        if !canonical.starts_with(&self.root) {
            return Err(ResolveError::Rejected(name.to_string()));
        }

        match tokio::fs::metadata(&canonical).await {
            Ok(meta) if meta.is_file() => Ok(canonical),
            Ok(_) => Err(ResolveError::NotFound(name.to_string())),
            Err(source) => Err(ResolveError::Io {
                path: canonical,
                source,
            }),
        }
    }

    /// Resolve and open `name`
    ///
    /// # Errors
    /// See [`ImageStore::resolve`]; opening failures map to `ResolveError::Io`.
    pub async fn open(&self, name: &str) -> Result<ServedImage, ResolveError> {
        let path = self.resolve(name).await?;
        let file = File::open(&path).await.map_err(|source| ResolveError::Io {
            path: path.clone(),
            source,
        })?;
        let len = file
            .metadata()
            .await
            .map_err(|source| ResolveError::Io {
                path: path.clone(),
                source,
            })?
            .len();
        let content_type = mime_guess::from_path(&path).first_or_octet_stream();

        Ok(ServedImage {
            path,
            file,
            len,
            content_type,
        })
    }
}

/// Accept only a plain, non-empty file name
fn validate_name(name: &str) -> Result<(), ResolveError> {
    let rejected = name.is_empty()
        || name == "."
        || name == ".."
        || name.contains(['/', '\\', '\0'])
        || Path::new(name).is_absolute();

    if rejected {
        Err(ResolveError::Rejected(name.to_string()))
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_names_pass() {
        for name in ["a.png", "banner-2383908_1280.png", "with space.jpg", "..hidden"] {
            assert!(validate_name(name).is_ok(), "{name}");
        }
    }

    #[test]
    fn traversal_and_separators_fail() {
        for name in [
            "",
            ".",
            "..",
            "../etc/passwd",
            "../../etc/passwd",
            "/etc/passwd",
            "nested/inner.png",
            "..\\windows\\win.ini",
            "a\0.png",
        ] {
            assert!(
                matches!(validate_name(name), Err(ResolveError::Rejected(_))),
                "{name:?}"
            );
        }
    }

    #[test]
    fn missing_root_is_an_error() {
        let err = ImageStore::new("/definitely/not/a/dir").unwrap_err();
        assert!(matches!(err, GatewayError::Io { .. }));
    }

    #[tokio::test]
    async fn directories_are_not_served() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("sub")).unwrap();
        let store = ImageStore::new(dir.path()).unwrap();

        assert!(matches!(
            store.resolve("sub").await,
            Err(ResolveError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn content_type_from_extension() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.png"), b"png").unwrap();
        std::fs::write(dir.path().join("b.unknownext"), b"??").unwrap();
        let store = ImageStore::new(dir.path()).unwrap();

        let png = store.open("a.png").await.unwrap();
        assert_eq!(png.content_type.essence_str(), "image/png");
        assert_eq!(png.len, 3);

        let other = store.open("b.unknownext").await.unwrap();
        assert_eq!(other.content_type.essence_str(), "application/octet-stream");
    }
}
