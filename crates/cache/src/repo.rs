//! Repository for thumbnail rows.

use crate::Database;
use crate::error::{ErrorKind, Result};
use crate::models::ThumbnailRow;
use exn::ResultExt;
use sqlx::SqlitePool;
use tracing::instrument;

/// Repository for reading and appending thumbnails in the cache database.
///
/// # Semantics
///
/// - [`insert`](Self::insert) always appends; there is no upsert.
/// - [`find`](Self::find) returns the bytes of the oldest row for a key.
/// - Rows are never updated or deleted.
#[derive(Debug, Clone)]
pub struct Repository {
    pool: SqlitePool,
}
impl From<&Database> for Repository {
    fn from(db: &Database) -> Self {
        Self { pool: db.pool().clone() }
    }
}
impl Repository {
    // =========================================================================
    // Insert
    // =========================================================================

    /// Append a thumbnail for `key`, returning the new row id.
    ///
    /// Calling this twice for the same key leaves two rows behind.
    #[instrument(skip_all, fields(key = key.as_ref(), bytes = blob.len()))]
    pub async fn insert(&self, key: impl AsRef<str>, blob: &[u8]) -> Result<i64> {
        let result = sqlx::query(include_str!("../queries/insert.sql"))
            .bind(key.as_ref())
            .bind(blob)
            .execute(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        let id = result.last_insert_rowid();
        tracing::debug!(id, "thumbnail row inserted");
        Ok(id)
    }

    // =========================================================================
    // Get/Fetch
    // =========================================================================

    /// Get the cached thumbnail bytes for `key`.
    ///
    /// `Ok(None)` is a cache miss, including a row whose blob is `NULL`. An
    /// `Err` means the lookup itself failed and says nothing about whether the
    /// key is cached.
    pub async fn find(&self, key: impl AsRef<str>) -> Result<Option<Vec<u8>>> {
        Ok(self.find_row(key).await?.and_then(ThumbnailRow::into_blob))
    }

    /// Get the oldest row recorded for `key`.
    pub async fn find_row(&self, key: impl AsRef<str>) -> Result<Option<ThumbnailRow>> {
        sqlx::query_as(include_str!("../queries/find_by_key.sql"))
            .bind(key.as_ref())
            .fetch_optional(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)
    }

    // =========================================================================
    // Existence & Counts
    // =========================================================================

    /// Check whether at least one row exists for `key`.
    pub async fn exists(&self, key: impl AsRef<str>) -> Result<bool> {
        Ok(self.count(key).await? > 0)
    }

    /// Count the rows recorded for `key`.
    pub async fn count(&self, key: impl AsRef<str>) -> Result<u64> {
        let count: i64 = sqlx::query_scalar(include_str!("../queries/count_by_key.sql"))
            .bind(key.as_ref())
            .fetch_one(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        u64::try_from(count).or_raise(|| ErrorKind::InvalidData("row count"))
    }
}
