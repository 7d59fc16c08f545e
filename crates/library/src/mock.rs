//! In-memory store and scripted fetcher for testing.

use crate::error::{ErrorKind, Result};
use crate::fetch::RemoteFetcher;
use crate::store::CacheStore;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::RwLock;

/// In-memory [`CacheStore`] for testing.
///
/// Rows are appended in insertion order and lookups return the oldest row for
/// a key, matching the SQLite repository. Every call is counted, and either
/// operation can be switched to fail.
#[derive(Default)]
pub struct MemoryStore {
    rows: RwLock<Vec<(String, Vec<u8>)>>,
    lookups: AtomicUsize,
    stores: AtomicUsize,
    fail_lookups: AtomicBool,
    fail_stores: AtomicBool,
}

impl MemoryStore {
    pub fn with_entries(entries: impl IntoIterator<Item = (impl Into<String>, impl Into<Vec<u8>>)>) -> Self {
        let rows = entries.into_iter().map(|(key, blob)| (key.into(), blob.into())).collect();
        Self { rows: RwLock::new(rows), ..Self::default() }
    }

    /// Make every lookup fail with [`ErrorKind::Lookup`].
    pub fn failing_lookups(self) -> Self {
        self.fail_lookups.store(true, Ordering::SeqCst);
        self
    }

    /// Make every store fail with [`ErrorKind::Store`].
    pub fn failing_stores(self) -> Self {
        self.fail_stores.store(true, Ordering::SeqCst);
        self
    }

    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }

    pub fn stores(&self) -> usize {
        self.stores.load(Ordering::SeqCst)
    }

    /// Number of rows recorded for `key`.
    pub async fn count(&self, key: &str) -> usize {
        self.rows.read().await.iter().filter(|(k, _)| k == key).count()
    }

    pub async fn is_empty(&self) -> bool {
        self.rows.read().await.is_empty()
    }
}

#[async_trait]
impl CacheStore for MemoryStore {
    async fn lookup(&self, key: &str) -> Result<Option<Vec<u8>>> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        if self.fail_lookups.load(Ordering::SeqCst) {
            exn::bail!(ErrorKind::Lookup);
        }
        Ok(self.rows.read().await.iter().find(|(k, _)| k == key).map(|(_, blob)| blob.clone()))
    }

    async fn store(&self, key: &str, blob: &[u8]) -> Result<()> {
        self.stores.fetch_add(1, Ordering::SeqCst);
        if self.fail_stores.load(Ordering::SeqCst) {
            exn::bail!(ErrorKind::Store);
        }
        self.rows.write().await.push((key.to_string(), blob.to_vec()));
        Ok(())
    }
}

#[derive(Clone)]
enum Script {
    Blob(Vec<u8>),
    NotFound,
    Transport,
    Panic,
}

/// Scripted [`RemoteFetcher`] for testing.
///
/// Each key answers with whatever it was configured with, after an optional
/// delay. Keys that were never configured are [`ErrorKind::NotFound`].
#[derive(Default)]
pub struct StubFetcher {
    scripts: HashMap<String, Script>,
    delays: HashMap<String, Duration>,
    calls: Mutex<HashMap<String, usize>>,
}

impl StubFetcher {
    pub fn with_blob(mut self, key: impl Into<String>, blob: impl Into<Vec<u8>>) -> Self {
        self.scripts.insert(key.into(), Script::Blob(blob.into()));
        self
    }

    pub fn with_not_found(mut self, key: impl Into<String>) -> Self {
        self.scripts.insert(key.into(), Script::NotFound);
        self
    }

    pub fn with_transport_error(mut self, key: impl Into<String>) -> Self {
        self.scripts.insert(key.into(), Script::Transport);
        self
    }

    /// Panic inside `fetch` for `key`, after its delay.
    pub fn with_panic(mut self, key: impl Into<String>) -> Self {
        self.scripts.insert(key.into(), Script::Panic);
        self
    }

    /// Sleep on the tokio clock before answering for `key`.
    pub fn with_delay(mut self, key: impl Into<String>, delay: Duration) -> Self {
        self.delays.insert(key.into(), delay);
        self
    }

    /// How many times `key` was fetched.
    pub fn calls(&self, key: &str) -> usize {
        self.calls.lock().map(|calls| calls.get(key).copied().unwrap_or(0)).unwrap_or(0)
    }

    /// How many fetches happened in total.
    pub fn total_calls(&self) -> usize {
        self.calls.lock().map(|calls| calls.values().sum()).unwrap_or(0)
    }
}

#[async_trait]
impl RemoteFetcher for StubFetcher {
    async fn fetch(&self, key: &str) -> Result<Vec<u8>> {
        if let Ok(mut calls) = self.calls.lock() {
            *calls.entry(key.to_string()).or_default() += 1;
        }
        if let Some(delay) = self.delays.get(key) {
            tokio::time::sleep(*delay).await;
        }
        match self.scripts.get(key).cloned() {
            Some(Script::Blob(blob)) => Ok(blob),
            Some(Script::Transport) => exn::bail!(ErrorKind::Transport),
            Some(Script::Panic) => panic!("StubFetcher: scripted panic for {key}"),
            Some(Script::NotFound) | None => exn::bail!(ErrorKind::NotFound),
        }
    }
}
