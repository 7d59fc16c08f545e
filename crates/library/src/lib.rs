//! Cache-aside thumbnail resolution.
//!
//! A [`Resolver`] answers one link from a [`CacheStore`](store::CacheStore),
//! falling back to a [`RemoteFetcher`](fetch::RemoteFetcher) on a miss. A
//! [`BatchCoordinator`] runs it over many links, either in order or all at
//! once, and [`handle`] is the validated request/response entry point.

mod batch;
pub mod error;
pub mod fetch;
#[cfg(test)]
mod mock;
mod request;
mod resolve;
pub mod store;

pub use crate::batch::{BatchCoordinator, Mode};
pub use crate::request::{BatchRequest, BatchResponse, STATUS_SUCCESS, handle, validate_link};
pub use crate::resolve::{Outcome, Resolver};
