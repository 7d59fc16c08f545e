use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// What a run produced, as printed at the end.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub status: String,
    pub saved: Vec<PathBuf>,
}

/// File name for a thumbnail: the BLAKE3 hash of its bytes.
///
/// Thumbnails come back without the link they belong to, and in completion
/// order when downloaded concurrently, so content is the only stable name.
pub fn file_name(blob: &[u8]) -> String {
    format!("{}.jpeg", blake3::hash(blob))
}

/// Write every thumbnail into `directory`, creating it if needed.
pub async fn save(directory: &Path, blobs: &[Vec<u8>]) -> Result<Vec<PathBuf>> {
    tokio::fs::create_dir_all(directory).await.or_raise(|| ErrorKind::Output)?;
    let mut saved = Vec::with_capacity(blobs.len());
    for blob in blobs {
        let path = directory.join(file_name(blob));
        tokio::fs::write(&path, blob).await.or_raise(|| ErrorKind::Output)?;
        tracing::debug!(path = %path.display(), bytes = blob.len(), "thumbnail saved");
        saved.push(path);
    }
    Ok(saved)
}

/// Render `summary` for stdout.
pub fn render(summary: &Summary, json: bool) -> Result<String> {
    if json {
        return serde_json::to_string_pretty(summary).or_raise(|| ErrorKind::Output);
    }
    let mut out = format!("status: {}\nsaved {} thumbnail(s)", summary.status, summary.saved.len());
    for path in &summary.saved {
        out.push_str("\n  ");
        out.push_str(&path.display().to_string());
    }
    Ok(out)
}
