//! The request/response shape at the edge of the library.

use crate::batch::{BatchCoordinator, Mode};
use crate::error::{Error, ErrorKind, Result};
use exn::ResultExt;
use serde::{Deserialize, Serialize};
use tracing::instrument::WithSubscriber;
use url::Url;

/// Status reported by every successful [`BatchResponse`].
pub const STATUS_SUCCESS: &str = "success";

/// A list of links to fetch thumbnails for.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchRequest {
    /// Resolve every link at once ([`Mode::Concurrent`]) instead of in order.
    #[serde(rename = "async", default)]
    pub concurrent: bool,
    pub keys: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchResponse {
    pub status: String,
    pub blobs: Vec<Vec<u8>>,
}

impl BatchRequest {
    pub fn new(concurrent: bool, keys: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self { concurrent, keys: keys.into_iter().map(Into::into).collect() }
    }

    pub fn mode(&self) -> Mode {
        Mode::from(self.concurrent)
    }

    /// Reject the request before any work starts.
    ///
    /// There must be at least one link, and every link must be an absolute
    /// URL with a host. Whether the host is actually YouTube is left to the
    /// download, where it counts as not found.
    pub fn validate(&self) -> Result<()> {
        if self.keys.is_empty() {
            exn::bail!(ErrorKind::Validation("no video links provided".to_string()));
        }
        self.keys.iter().try_for_each(|key| validate_link(key))
    }
}

/// Check that `link` is an absolute URL with a scheme and a host.
pub fn validate_link(link: &str) -> Result<()> {
    let url = Url::parse(link).or_raise(|| ErrorKind::Validation(format!("invalid video link: {link}")))?;
    match url.host_str() {
        Some(host) if !host.is_empty() && !url.scheme().is_empty() => Ok(()),
        _ => exn::bail!(ErrorKind::Validation(format!("video link has no host: {link}"))),
    }
}

/// Validate `request` and run it through `coordinator`.
///
/// Validation failures never reach the cache or the network.
pub async fn handle(coordinator: &BatchCoordinator, request: BatchRequest) -> Result<BatchResponse> {
    let dispatch = coordinator.resolver().dispatch().clone();
    async move {
        request.validate().inspect_err(|err| tracing::warn!(error = ?err, "rejecting batch request"))?;
        let blobs = coordinator.process_batch(request.mode(), &request.keys).await?;
        Ok::<_, Error>(BatchResponse { status: STATUS_SUCCESS.to_string(), blobs })
    }
    .with_subscriber(dispatch)
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{MemoryStore, StubFetcher};
    use crate::resolve::Resolver;
    use rstest::rstest;
    use std::sync::Arc;
    use tracing::Dispatch;

    const A: &str = "https://www.youtube.com/watch?v=AAAA";
    const B: &str = "https://youtu.be/BBBB";

    fn coordinator(store: &Arc<MemoryStore>, fetcher: &Arc<StubFetcher>) -> BatchCoordinator {
        BatchCoordinator::new(Resolver::new(store.clone(), fetcher.clone(), Dispatch::none()))
    }

    #[rstest]
    #[case("https://www.youtube.com/watch?v=AAAA")]
    #[case("http://youtu.be/BBBB")]
    #[case("https://example.com/not-youtube-but-well-formed")]
    fn test_valid_links(#[case] link: &str) {
        validate_link(link).unwrap();
    }

    #[rstest]
    #[case("")]
    #[case("youtu.be/BBBB")]
    #[case("not a url")]
    #[case("mailto:someone@example.com")]
    #[case("file:///tmp/video")]
    fn test_invalid_links(#[case] link: &str) {
        let err = validate_link(link).unwrap_err();
        assert!(matches!(&*err, ErrorKind::Validation(_)));
    }

    #[test]
    fn test_empty_request_is_invalid() {
        let err = BatchRequest::new(true, Vec::<String>::new()).validate().unwrap_err();
        assert!(matches!(&*err, ErrorKind::Validation(_)));
    }

    #[test]
    fn test_request_json_shape() {
        let request: BatchRequest = serde_json::from_str(&format!(r#"{{"async":true,"keys":["{A}"]}}"#)).unwrap();
        assert_eq!(request, BatchRequest::new(true, [A]));
        assert_eq!(request.mode(), Mode::Concurrent);

        let request: BatchRequest = serde_json::from_str(&format!(r#"{{"keys":["{B}"]}}"#)).unwrap();
        assert_eq!(request.mode(), Mode::Sequential);

        let response = BatchResponse { status: STATUS_SUCCESS.to_string(), blobs: vec![vec![1, 2]] };
        assert_eq!(serde_json::to_string(&response).unwrap(), r#"{"status":"success","blobs":[[1,2]]}"#);
    }

    #[tokio::test]
    async fn test_handle_success() {
        let store = Arc::new(MemoryStore::default());
        let fetcher = Arc::new(StubFetcher::default().with_blob(A, b"a").with_blob(B, b"b"));
        let response = handle(&coordinator(&store, &fetcher), BatchRequest::new(false, [A, B])).await.unwrap();
        assert_eq!(response.status, STATUS_SUCCESS);
        assert_eq!(response.blobs, vec![b"a".to_vec(), b"b".to_vec()]);
    }

    #[tokio::test]
    async fn test_handle_sequential_partial_success() {
        let store = Arc::new(MemoryStore::default());
        let fetcher = Arc::new(StubFetcher::default().with_blob(A, b"a"));
        let response = handle(&coordinator(&store, &fetcher), BatchRequest::new(false, [B, A])).await.unwrap();
        assert_eq!(response.blobs, vec![b"a".to_vec()]);
    }

    #[tokio::test]
    async fn test_handle_concurrent_failure() {
        let store = Arc::new(MemoryStore::default());
        let fetcher = Arc::new(StubFetcher::default().with_blob(A, b"a"));
        let err = handle(&coordinator(&store, &fetcher), BatchRequest::new(true, [B, A])).await.unwrap_err();
        assert!(matches!(&*err, ErrorKind::NotFound));
    }

    #[tokio::test]
    async fn test_handle_rejects_before_any_work() {
        let store = Arc::new(MemoryStore::default());
        let fetcher = Arc::new(StubFetcher::default().with_blob(A, b"a"));
        let err = handle(&coordinator(&store, &fetcher), BatchRequest::new(false, [A, "not a url"]))
            .await
            .unwrap_err();
        assert!(matches!(&*err, ErrorKind::Validation(_)));
        assert_eq!(store.lookups(), 0);
        assert_eq!(fetcher.total_calls(), 0);
    }
}
