/// A single row of the `thumbnails` table.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct ThumbnailRow {
    pub id: i64,
    pub key: String,
    /// `NULL` is never written by this crate, but the column allows it.
    pub blob: Option<Vec<u8>>,
}

impl ThumbnailRow {
    /// The cached bytes, if the row actually holds any.
    ///
    /// A zero-length blob is still `Some`: it was downloaded and stored, it's
    /// just empty. Only a `NULL` column maps to `None`.
    pub fn into_blob(self) -> Option<Vec<u8>> {
        self.blob
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_blob_is_not_absent() {
        let row = ThumbnailRow { id: 1, key: "k".to_string(), blob: Some(Vec::new()) };
        assert_eq!(row.into_blob(), Some(Vec::new()));
    }

    #[test]
    fn test_null_blob_is_absent() {
        let row = ThumbnailRow { id: 1, key: "k".to_string(), blob: None };
        assert_eq!(row.into_blob(), None);
    }
}
