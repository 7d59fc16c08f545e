//! Thumbnail downloads for YouTube links.
//!
//! Two pieces live here:
//! - [`video_id`] pulls the video identifier out of a long-form
//!   (`youtube.com/watch?v=...`) or short-form (`youtu.be/...`) link.
//! - [`YouTubeFetcher`] turns a link into the thumbnail image bytes over
//!   HTTP, optionally through an authenticated proxy.
//!
//! Nothing here retries. A failed download is reported once and it is up to
//! the caller to decide what that means for the rest of its work.

mod client;
pub mod error;
mod video;

pub use crate::client::{ProxySettings, YouTubeFetcher};
pub use crate::video::{thumbnail_url, video_id};
