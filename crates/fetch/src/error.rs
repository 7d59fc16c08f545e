//! Fetch Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.

use derive_more::{Display, Error};

/// A fetch error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for fetch operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// Split in two families. Either there is nothing to download for this link
/// ([`is_not_found`](Self::is_not_found)), or the download itself broke
/// somewhere between here and the thumbnail host.
#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    /// The link could not be parsed as a URL at all.
    #[display("invalid video URL: {_0}")]
    InvalidUrl(#[error(not(source))] String),
    /// The link is a URL, but not one that points at a YouTube video.
    #[display("unsupported host in video URL: {_0}")]
    UnsupportedHost(#[error(not(source))] String),
    /// The link is a YouTube URL without a usable video id.
    #[display("could not find video id in URL: {_0}")]
    MissingVideoId(#[error(not(source))] String),
    /// The thumbnail host answered 404 for the derived thumbnail URL.
    #[display("thumbnail not found: {_0}")]
    NotFound(#[error(not(source))] String),
    /// Proxy URL could not be parsed or applied.
    #[display("invalid proxy configuration")]
    InvalidProxy,
    /// The HTTP client could not be constructed.
    #[display("failed to build HTTP client")]
    Client,
    /// Connecting or sending the request failed.
    #[display("failed to connect to {_0}")]
    Connection(#[error(not(source))] String),
    /// The thumbnail host answered with something other than 200 or 404.
    #[display("unexpected HTTP status {_0}")]
    Status(#[error(not(source))] u16),
    /// The response body could not be read to the end.
    #[display("failed to read thumbnail body")]
    Body,
}

impl ErrorKind {
    /// Returns `true` when there is no thumbnail to get for the link, as
    /// opposed to the download failing on the way.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::InvalidUrl(_) | Self::UnsupportedHost(_) | Self::MissingVideoId(_) | Self::NotFound(_)
        )
    }

    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Connection(_) | Self::Body => true,
            Self::Status(code) => *code >= 500 || *code == 429,
            _ => false,
        }
    }
}
