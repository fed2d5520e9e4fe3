use std::path::{Path, PathBuf};

use tracing::warn;
use uuid::Uuid;

use crate::domain::errors::DomainResult;

/// Reduce an uploaded filename to a safe basename: path components are
/// stripped, whitespace becomes `_`, anything outside `[A-Za-z0-9._-]` is
/// dropped, and leading dots are removed. Never returns an empty string.
pub fn sanitize_filename(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or(name);
    let safe: String = base
        .chars()
        .map(|c| if c.is_whitespace() { '_' } else { c })
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
        .collect();
    let safe = safe.trim_start_matches('.');
    if safe.is_empty() {
        "upload".to_string()
    } else {
        safe.to_string()
    }
}

/// An uploaded file staged to disk for the duration of one request.
///
/// The path carries a per-request uuid prefix so concurrent uploads with the
/// same filename cannot collide. The file is removed when the value drops,
/// so no staged upload outlives its request on any exit path.
pub struct StagedUpload {
    path: PathBuf,
}

impl StagedUpload {
    pub async fn stage(dir: &Path, filename: &str, bytes: &[u8]) -> DomainResult<Self> {
        tokio::fs::create_dir_all(dir).await?;
        let unique = format!("{}_{}", Uuid::new_v4().simple(), sanitize_filename(filename));
        let path = dir.join(unique);
        tokio::fs::write(&path, bytes).await?;
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for StagedUpload {
    fn drop(&mut self) {
        if let Err(e) = std::fs::remove_file(&self.path) {
            if e.kind() != std::io::ErrorKind::NotFound {
                warn!("failed to remove staged upload {}: {e}", self.path.display());
            }
        }
    }
}
