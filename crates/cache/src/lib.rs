//! SQLite cache database for downloaded thumbnails.
//!
//! The database sits in front of the remote thumbnail fetch: a key (the video
//! URL exactly as requested) maps to the bytes that were downloaded for it the
//! first time it was seen. Entries are write-once. Nothing in this crate
//! updates, expires or evicts a row.
//!
//! # Duplicates
//! The `key` column carries no uniqueness constraint. Two concurrent misses
//! for the same key will both insert, and the table keeps both rows. Lookups
//! always read the oldest row (lowest `id`) for a key.

mod db;
pub mod error;
mod models;
mod repo;

pub use crate::db::Database;
pub use crate::models::ThumbnailRow;
pub use crate::repo::Repository;
