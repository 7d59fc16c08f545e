use crate::error::{Error, Result};
use crate::fetch::FetcherHandle;
use crate::store::StoreHandle;
use tracing::Dispatch;
use tracing::instrument::WithSubscriber;

/// How a single key was resolved.
#[derive(Debug)]
pub enum Outcome {
    /// Served from the cache. Nothing was downloaded or written.
    Hit(Vec<u8>),
    /// Downloaded after a miss. The write-back was attempted, and its failure
    /// (if any) was logged rather than returned.
    Fetched(Vec<u8>),
    /// No thumbnail for this key. Nothing was written to the cache.
    Failed(Error),
}

impl Outcome {
    pub fn into_result(self) -> Result<Vec<u8>> {
        match self {
            Self::Hit(blob) | Self::Fetched(blob) => Ok(blob),
            Self::Failed(err) => Err(err),
        }
    }

    pub fn blob(&self) -> Option<&[u8]> {
        match self {
            Self::Hit(blob) | Self::Fetched(blob) => Some(blob),
            Self::Failed(_) => None,
        }
    }

    pub fn is_hit(&self) -> bool {
        matches!(self, Self::Hit(_))
    }
}

/// Cache-aside resolution of one key: look it up, and on a miss download it
/// and write it back.
///
/// Every event is emitted to the [`Dispatch`] handed in at construction, never
/// to the global default. Cloning shares the store, fetcher and dispatch.
#[derive(Clone)]
pub struct Resolver {
    store: StoreHandle,
    fetcher: FetcherHandle,
    dispatch: Dispatch,
}

impl Resolver {
    pub fn new(store: StoreHandle, fetcher: FetcherHandle, dispatch: Dispatch) -> Self {
        Self { store, fetcher, dispatch }
    }

    /// The logger every event from this resolver goes to.
    pub fn dispatch(&self) -> &Dispatch {
        &self.dispatch
    }

    /// Resolve `key`, reporting how it was resolved.
    ///
    /// 1. **Hit**: the stored bytes are returned untouched.
    /// 2. **Miss**: the thumbnail is downloaded, stored, then returned. A
    ///    failed store is logged and the bytes are still returned; the next
    ///    call for the same key simply downloads again.
    /// 3. **Lookup error**: does not fall through to a download.
    /// 4. **Download error**: nothing is stored.
    pub async fn resolve(&self, key: &str) -> Outcome {
        let resolved = self.resolve_inner(key).with_subscriber(self.dispatch.clone()).await;
        match resolved {
            Ok(outcome) => outcome,
            Err(err) => Outcome::Failed(err),
        }
    }

    /// [`resolve`](Self::resolve), without saying whether it was a hit.
    pub async fn get_or_fetch(&self, key: &str) -> Result<Vec<u8>> {
        self.resolve(key).await.into_result()
    }

    async fn resolve_inner(&self, key: &str) -> Result<Outcome> {
        tracing::debug!(key, "looking up thumbnail");
        let cached = self.store.lookup(key).await.inspect_err(|err| {
            tracing::error!(key, error = ?err, "cache lookup failed");
        })?;
        if let Some(blob) = cached {
            tracing::info!(key, bytes = blob.len(), "thumbnail served from cache");
            return Ok(Outcome::Hit(blob));
        }

        tracing::info!(key, "cache miss, downloading thumbnail");
        let blob = self.fetcher.fetch(key).await.inspect_err(|err| {
            tracing::error!(key, error = ?err, "thumbnail download failed");
        })?;
        match self.store.store(key, &blob).await {
            Ok(()) => tracing::debug!(key, bytes = blob.len(), "thumbnail stored"),
            Err(err) => tracing::warn!(key, error = ?err, "failed to store thumbnail, returning it anyway"),
        }
        Ok(Outcome::Fetched(blob))
    }
}
