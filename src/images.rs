//! On-disk image store for uploaded event images.
//!
//! Files live flat under the uploads directory and are served under
//! [`PUBLIC_PREFIX`]. Removal is best-effort: a failed unlink is logged and
//! never surfaced, so file-store cleanup can never block a record mutation.

use std::io;
use std::path::{Path, PathBuf};

/// URL prefix under which stored images are served.
pub const PUBLIC_PREFIX: &str = "/uploads";

/// Upper bound on an uploaded image, enforced before anything touches disk.
pub const MAX_IMAGE_BYTES: usize = 20 * 1024 * 1024;

#[derive(Clone)]
pub struct ImageStore {
    root: PathBuf,
}

impl ImageStore {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Store image bytes under a globally unique name derived from the
    /// original filename. Returns the public URL for the stored file.
    pub async fn save(&self, original_name: &str, data: &[u8]) -> io::Result<String> {
        let filename = format!("{}_{}", uuid::Uuid::now_v7(), sanitize_filename(original_name));
        let path = self.root.join(&filename);
        tokio::fs::write(&path, data).await?;
        Ok(format!("{}/{}", PUBLIC_PREFIX, filename))
    }

    /// Resolve a path for a stored filename, rejecting anything that could
    /// escape the uploads directory.
    pub fn resolve(&self, filename: &str) -> Option<PathBuf> {
        if filename.is_empty() || filename.contains('/') || filename.contains("..") {
            return None;
        }
        Some(self.root.join(filename))
    }

    /// Best-effort removal of the file referenced by an image URL.
    ///
    /// The filename is taken as the final `/`-segment of the URL by
    /// convention; an external URL resolves to a name that matches no local
    /// file and the removal degrades to a no-op. Unlink failures are logged
    /// and swallowed.
    pub async fn remove_by_url(&self, url: &str) {
        let Some(filename) = filename_from_url(url) else {
            return;
        };
        let Some(path) = self.resolve(filename) else {
            return;
        };
        match tokio::fs::try_exists(&path).await {
            Ok(true) => {
                if let Err(e) = tokio::fs::remove_file(&path).await {
                    tracing::warn!("Failed to remove image {}: {}", path.display(), e);
                } else {
                    tracing::debug!("Removed image {}", path.display());
                }
            }
            Ok(false) => {}
            Err(e) => {
                tracing::warn!("Failed to stat image {}: {}", path.display(), e);
            }
        }
    }
}

/// Final `/`-delimited segment of an image URL. This is a convention, not a
/// validated contract: URLs minted by the upload endpoint always conform,
/// while arbitrary external URLs yield a segment that matches no local file.
pub fn filename_from_url(url: &str) -> Option<&str> {
    url.rsplit('/').next().filter(|s| !s.is_empty())
}

/// Keep only the final path component of a client-supplied filename.
fn sanitize_filename(name: &str) -> &str {
    name.rsplit(['/', '\\']).next().unwrap_or(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> (tempfile::TempDir, ImageStore) {
        let tmp = tempfile::tempdir().unwrap();
        let store = ImageStore::new(tmp.path().to_path_buf());
        (tmp, store)
    }

    #[test]
    fn filename_from_url_takes_final_segment() {
        assert_eq!(
            filename_from_url("/uploads/abc_photo.png"),
            Some("abc_photo.png")
        );
        assert_eq!(
            filename_from_url("https://cdn.example.org/a/b/c.jpg"),
            Some("c.jpg")
        );
        assert_eq!(filename_from_url("bare-name.png"), Some("bare-name.png"));
        assert_eq!(filename_from_url("/uploads/"), None);
        assert_eq!(filename_from_url(""), None);
    }

    #[test]
    fn sanitize_strips_path_components() {
        assert_eq!(sanitize_filename("photo.png"), "photo.png");
        assert_eq!(sanitize_filename("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_filename("C:\\temp\\shot.jpg"), "shot.jpg");
    }

    #[test]
    fn resolve_rejects_traversal() {
        let (_tmp, store) = store();
        assert!(store.resolve("photo.png").is_some());
        assert!(store.resolve("..").is_none());
        assert!(store.resolve("a/b.png").is_none());
        assert!(store.resolve("").is_none());
    }

    #[tokio::test]
    async fn save_writes_file_and_returns_public_url() {
        let (_tmp, store) = store();
        let url = store.save("photo.png", b"fake-png-bytes").await.unwrap();
        assert!(url.starts_with("/uploads/"));
        assert!(url.ends_with("_photo.png"));

        let filename = filename_from_url(&url).unwrap();
        let on_disk = store.root().join(filename);
        assert_eq!(std::fs::read(on_disk).unwrap(), b"fake-png-bytes");
    }

    #[tokio::test]
    async fn save_generates_unique_names_for_same_original() {
        let (_tmp, store) = store();
        let a = store.save("photo.png", b"one").await.unwrap();
        let b = store.save("photo.png", b"two").await.unwrap();
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn remove_by_url_deletes_stored_file() {
        let (_tmp, store) = store();
        let url = store.save("photo.png", b"bytes").await.unwrap();
        let filename = filename_from_url(&url).unwrap().to_string();

        store.remove_by_url(&url).await;
        assert!(!store.root().join(filename).exists());
    }

    #[tokio::test]
    async fn remove_by_url_ignores_external_urls() {
        let (_tmp, store) = store();
        // Must not panic or error; no matching local file
        store
            .remove_by_url("https://images.example.org/banner.jpg")
            .await;
        store.remove_by_url("/uploads/").await;
    }
}
