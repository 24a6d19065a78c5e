//! Request-scoped scratch directory.

use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A private working directory under `TMP_DIR` for one pipeline operation.
///
/// Everything a tool writes next to its output (partial downloads, format
/// fragments) lands here too, so removing the directory removes all of it.
/// Call [`ScratchDir::close`] on every exit path; if the request future is
/// dropped first, `TempDir`'s own drop removes the tree.
#[derive(Debug)]
pub struct ScratchDir {
    dir: TempDir,
}

impl ScratchDir {
    /// Create a fresh `vidkit-XXXXXX` directory inside `root`, creating `root` if needed.
    pub async fn create(root: &Path) -> std::io::Result<Self> {
        tokio::fs::create_dir_all(root).await?;
        let dir = tempfile::Builder::new()
            .prefix("vidkit-")
            .tempdir_in(root)?;
        Ok(Self { dir })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Path of `file_name` inside the scratch directory.
    pub fn file(&self, file_name: &str) -> PathBuf {
        self.dir.path().join(file_name)
    }

    /// Remove the directory and everything in it. Failures are only logged.
    pub async fn close(self) {
        let path = self.dir.path().to_path_buf();
        let result = tokio::task::spawn_blocking(move || self.dir.close()).await;
        match result {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                tracing::warn!(path = %path.display(), error = %e, "Failed to remove scratch directory")
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Scratch cleanup task failed")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_close_removes_untracked_side_files() {
        let root = tempfile::tempdir().unwrap();
        let scratch = ScratchDir::create(root.path()).await.unwrap();

        tokio::fs::write(scratch.file("abc.mp4"), b"x").await.unwrap();
        tokio::fs::write(scratch.file("abc.mp4.part"), b"x").await.unwrap();
        tokio::fs::write(scratch.file("abc.f137.mp4.part"), b"x").await.unwrap();
        let dir = scratch.path().to_path_buf();

        scratch.close().await;

        assert!(!dir.exists());
        assert_eq!(std::fs::read_dir(root.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_drop_removes_directory() {
        let root = tempfile::tempdir().unwrap();
        let dir = {
            let scratch = ScratchDir::create(root.path()).await.unwrap();
            std::fs::write(scratch.file("b.jpg"), b"x").unwrap();
            scratch.path().to_path_buf()
        };
        assert!(!dir.exists());
    }

    #[tokio::test]
    async fn test_creates_missing_root_and_isolates_requests() {
        let base = tempfile::tempdir().unwrap();
        let root = base.path().join("nested/tmp");

        let first = ScratchDir::create(&root).await.unwrap();
        let second = ScratchDir::create(&root).await.unwrap();

        assert!(first.path().starts_with(&root));
        assert_ne!(first.path(), second.path());

        let other = base.path().join("other.mp4");
        std::fs::write(&other, b"x").unwrap();
        first.close().await;
        second.close().await;
        assert!(other.exists());
    }
}
