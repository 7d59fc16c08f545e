//! Library Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.

use derive_more::{Display, Error};

/// A library error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for library operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    /// The request was rejected before any lookup or download happened.
    #[display("invalid request: {_0}")]
    Validation(#[error(not(source))] String),
    /// The cache could not answer whether the key is stored.
    #[display("cache lookup failed")]
    Lookup,
    /// There is no thumbnail for the link.
    #[display("thumbnail not found")]
    NotFound,
    /// The download broke somewhere between here and the thumbnail host.
    #[display("thumbnail download failed")]
    Transport,
    /// A downloaded thumbnail could not be written back to the cache.
    #[display("failed to store thumbnail")]
    Store,
    /// A concurrent unit of work panicked or was cancelled.
    #[display("batch task did not complete")]
    Task,
}

impl ErrorKind {
    /// Map a fetch error into this crate's kinds, keeping it as the source.
    #[track_caller]
    pub fn fetch(err: thumbs_fetch::error::Error) -> Error {
        let kind = if err.is_not_found() { Self::NotFound } else { Self::Transport };
        err.raise(kind)
    }

    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Lookup | Self::Transport | Self::Store)
    }
}
