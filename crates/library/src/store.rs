//! Where resolved thumbnails are remembered between runs.

use crate::error::{ErrorKind, Result};
use async_trait::async_trait;
use exn::ResultExt;
use std::sync::Arc;
use thumbs_cache::Repository;

/// Persistent map from link to thumbnail bytes.
///
/// Keys are compared byte for byte: two URL forms of the same video are two
/// different keys. Implementations must tolerate concurrent callers, and
/// storing a key that is already present is allowed to append another entry.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Stored bytes for `key`, or `None` on a miss.
    ///
    /// An `Err` is not a miss: the store could not tell either way.
    async fn lookup(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Record `blob` under `key`.
    async fn store(&self, key: &str, blob: &[u8]) -> Result<()>;
}

pub type StoreHandle = Arc<dyn CacheStore + Send + Sync>;

#[async_trait]
impl CacheStore for Repository {
    async fn lookup(&self, key: &str) -> Result<Option<Vec<u8>>> {
        self.find(key).await.or_raise(|| ErrorKind::Lookup)
    }

    async fn store(&self, key: &str, blob: &[u8]) -> Result<()> {
        self.insert(key, blob).await.or_raise(|| ErrorKind::Store)?;
        Ok(())
    }
}
