//! Binary Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.

use derive_more::{Display, Error};

/// A command-line error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for command-line operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Which stage of a run failed.
#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    #[display("could not load configuration")]
    Config,
    #[display("could not set up logging")]
    Logging,
    #[display("invalid video links")]
    Request,
    #[display("could not open thumbnail cache")]
    Cache,
    #[display("could not set up thumbnail downloads")]
    Fetcher,
    #[display("failed to process video links")]
    Batch,
    #[display("could not save thumbnails")]
    Output,
}

impl ErrorKind {
    /// Returns `true` if running the same command again might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Cache | Self::Batch | Self::Output)
    }
}
