//! Per-request scratch directories.
//!
//! A [`ScratchWorkspace`] owns one uniquely named directory under the
//! configured scratch root. It is removed by [`ScratchWorkspace::close`] on
//! the normal paths and by `Drop` when the request future is cancelled or
//! unwinds, so nothing a request staged outlives it.

use std::path::{Path, PathBuf};

use tempfile::TempDir;
use tracing::{debug, warn};
use uuid::Uuid;

const PREFIX: &str = "legacy-office-";

#[derive(Debug)]
pub struct ScratchWorkspace {
    dir: TempDir,
}

impl ScratchWorkspace {
    /// Create a fresh directory under `root`, or the system temp dir.
    pub async fn create(root: Option<&Path>) -> std::io::Result<Self> {
        let root = root.map(Path::to_path_buf);
        let dir = tokio::task::spawn_blocking(move || {
            let mut builder = tempfile::Builder::new();
            builder.prefix(PREFIX);
            match root {
                Some(root) => {
                    std::fs::create_dir_all(&root)?;
                    builder.tempdir_in(&root)
                }
                None => builder.tempdir(),
            }
        })
        .await
        .map_err(std::io::Error::other)??;
        debug!(path = %dir.path().display(), "scratch workspace created");
        Ok(Self { dir })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Write `bytes` unchanged to `<uuid v4><extension>` inside the workspace.
    pub async fn stage_input(&self, extension: &str, bytes: &[u8]) -> std::io::Result<PathBuf> {
        let path = self.dir.path().join(format!("{}{extension}", Uuid::new_v4()));
        tokio::fs::write(&path, bytes).await?;
        debug!(path = %path.display(), size_bytes = bytes.len(), "staged upload");
        Ok(path)
    }

    /// Remove the directory and everything in it. Failures are logged only.
    pub async fn close(self) {
        let path = self.dir.path().to_path_buf();
        match tokio::task::spawn_blocking(move || self.dir.close()).await {
            Ok(Ok(())) => debug!(path = %path.display(), "scratch workspace removed"),
            Ok(Err(e)) => warn!(path = %path.display(), error = %e, "failed to remove scratch workspace"),
            Err(e) => warn!(path = %path.display(), error = %e, "scratch workspace cleanup task failed"),
        }
    }
}
