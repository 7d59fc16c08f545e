use crate::error::{Error, ErrorKind, Result};
use crate::resolve::{Outcome, Resolver};
use exn::ResultExt;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::instrument::WithSubscriber;

/// How a batch's keys are worked through.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// One key at a time, in input order. Failed keys are logged and skipped.
    #[default]
    Sequential,
    /// Every key at once. Any failed key fails the whole batch.
    Concurrent,
}
impl From<bool> for Mode {
    /// `true` is concurrent, matching the `async` request flag.
    fn from(concurrent: bool) -> Self {
        if concurrent { Self::Concurrent } else { Self::Sequential }
    }
}

/// Runs a [`Resolver`] over a list of keys.
///
/// | Mode                     | Output order     | A key fails            |
/// |--------------------------|------------------|------------------------|
/// | [`Mode::Sequential`]     | input order      | logged, key skipped    |
/// | [`Mode::Concurrent`]     | completion order | whole batch is `Err`   |
///
/// Neither mode de-duplicates keys: a key listed twice is resolved twice, and
/// in concurrent mode both copies may miss and download, leaving two cached
/// entries behind.
#[derive(Clone)]
pub struct BatchCoordinator {
    resolver: Resolver,
}

impl BatchCoordinator {
    pub fn new(resolver: Resolver) -> Self {
        Self { resolver }
    }

    pub fn resolver(&self) -> &Resolver {
        &self.resolver
    }

    /// Resolve every key in `keys`.
    ///
    /// Sequential mode never returns `Err`; it returns the thumbnails of the
    /// keys that resolved, possibly none of them. Concurrent mode returns the
    /// first failure observed, discarding every thumbnail, but only once every
    /// key has finished, so no write-back is cut short.
    pub async fn process_batch(&self, mode: Mode, keys: &[String]) -> Result<Vec<Vec<u8>>> {
        let dispatch = self.resolver.dispatch().clone();
        async move {
            tracing::info!(?mode, keys = keys.len(), "processing batch");
            let blobs = match mode {
                Mode::Sequential => Ok(self.sequential(keys).await),
                Mode::Concurrent => self.concurrent(keys).await,
            }?;
            tracing::info!(?mode, keys = keys.len(), resolved = blobs.len(), "batch complete");
            Ok::<_, Error>(blobs)
        }
        .with_subscriber(dispatch)
        .await
    }

    async fn sequential(&self, keys: &[String]) -> Vec<Vec<u8>> {
        let mut blobs = Vec::with_capacity(keys.len());
        for key in keys {
            match self.resolver.resolve(key).await {
                Outcome::Hit(blob) | Outcome::Fetched(blob) => blobs.push(blob),
                Outcome::Failed(err) => tracing::warn!(key = %key, error = ?err, "skipping link"),
            }
        }
        blobs
    }

    async fn concurrent(&self, keys: &[String]) -> Result<Vec<Vec<u8>>> {
        // Room for every result, so no unit ever waits on the coordinator.
        let (tx, mut rx) = mpsc::channel::<(usize, Result<Vec<u8>>)>(keys.len().max(1));
        let mut handles = Vec::with_capacity(keys.len());
        for (index, key) in keys.iter().cloned().enumerate() {
            let resolver = self.resolver.clone();
            let tx = tx.clone();
            let unit = async move {
                let result = resolver.get_or_fetch(&key).await;
                // Only fails once the receiver is gone, and then nobody is
                // waiting for the result anyway.
                _ = tx.send((index, result)).await;
            };
            handles.push(tokio::spawn(unit.with_current_subscriber()));
        }
        drop(tx);

        let mut blobs = Vec::with_capacity(keys.len());
        let mut failure: Option<Error> = None;
        while let Some((index, result)) = rx.recv().await {
            match result {
                Ok(blob) if failure.is_none() => blobs.push(blob),
                Ok(_) => tracing::debug!(index, "discarding thumbnail, batch already failed"),
                Err(err) if failure.is_none() => {
                    tracing::error!(index, key = %keys[index], "batch failed, waiting for remaining links");
                    failure = Some(err);
                },
                Err(err) => tracing::debug!(index, error = ?err, "further failure in failed batch"),
            }
        }
        // Every sender is gone, so every unit has finished or died.
        for handle in handles {
            if let Err(err) = handle.await.or_raise(|| ErrorKind::Task) {
                tracing::error!(error = ?err, "batch unit did not complete");
                if failure.is_none() {
                    failure = Some(err);
                }
            }
        }

        match failure {
            Some(err) => Err(err),
            None => Ok(blobs),
        }
    }
}
