//! Where thumbnails come from when the cache doesn't have them.

use crate::error::{ErrorKind, Result};
use async_trait::async_trait;
use std::sync::Arc;
use thumbs_fetch::YouTubeFetcher;

/// Downloads the thumbnail for a link.
///
/// Failures must distinguish "nothing there" ([`ErrorKind::NotFound`]) from
/// "could not get there" ([`ErrorKind::Transport`]).
#[async_trait]
pub trait RemoteFetcher: Send + Sync {
    async fn fetch(&self, key: &str) -> Result<Vec<u8>>;
}

pub type FetcherHandle = Arc<dyn RemoteFetcher + Send + Sync>;

#[async_trait]
impl RemoteFetcher for YouTubeFetcher {
    async fn fetch(&self, key: &str) -> Result<Vec<u8>> {
        YouTubeFetcher::fetch(self, key).await.map_err(ErrorKind::fetch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unsupported_link_is_not_found() {
        // Nothing listens here; the link is rejected before any request.
        let fetcher: FetcherHandle = Arc::new(YouTubeFetcher::new("http://127.0.0.1:9/vi", None).unwrap());
        let err = fetcher.fetch("https://example.com/watch?v=x").await.unwrap_err();
        assert!(matches!(&*err, ErrorKind::NotFound));
    }

    #[tokio::test]
    async fn test_unreachable_host_is_transport() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let fetcher: FetcherHandle = Arc::new(YouTubeFetcher::new(format!("http://{addr}/vi"), None).unwrap());
        let err = fetcher.fetch("https://youtu.be/ABC123").await.unwrap_err();
        assert!(matches!(&*err, ErrorKind::Transport));
    }
}
