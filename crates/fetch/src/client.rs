use crate::error::{ErrorKind, Result};
use crate::video::{thumbnail_url, video_id};
use exn::ResultExt;
use reqwest::{Client, Proxy, StatusCode};
use tracing::instrument;

/// Where and how to reach the outbound proxy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxySettings {
    pub url: String,
    /// Username and password for basic authentication against the proxy.
    pub credentials: Option<(String, String)>,
}

/// Downloads thumbnails for YouTube links.
///
/// Cloning is cheap: the underlying [`reqwest::Client`] shares its connection
/// pool between clones.
///
/// # Examples
///
/// ```no_run
/// use thumbs_fetch::YouTubeFetcher;
///
/// # async fn example() -> thumbs_fetch::error::Result<()> {
/// let fetcher = YouTubeFetcher::new(YouTubeFetcher::DEFAULT_THUMBNAIL_BASE, None)?;
/// let jpeg = fetcher.fetch("https://youtu.be/dQw4w9WgXcQ").await?;
/// println!("{} bytes", jpeg.len());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct YouTubeFetcher {
    client: Client,
    thumbnail_base: String,
}

impl YouTubeFetcher {
    pub const DEFAULT_THUMBNAIL_BASE: &'static str = "https://img.youtube.com/vi";

    /// Create a fetcher that downloads from `thumbnail_base`.
    ///
    /// Without `proxy` every request goes out directly; proxy environment
    /// variables are ignored so the configuration file is the only thing that
    /// decides the route.
    pub fn new(thumbnail_base: impl Into<String>, proxy: Option<ProxySettings>) -> Result<Self> {
        let builder = Client::builder();
        let builder = match proxy {
            Some(settings) => {
                let mut proxy = Proxy::all(&settings.url).or_raise(|| ErrorKind::InvalidProxy)?;
                if let Some((username, password)) = &settings.credentials {
                    proxy = proxy.basic_auth(username, password);
                }
                tracing::debug!(proxy = %settings.url, "routing thumbnail downloads through proxy");
                builder.proxy(proxy)
            },
            None => builder.no_proxy(),
        };
        let client = builder.build().or_raise(|| ErrorKind::Client)?;
        Ok(Self { client, thumbnail_base: thumbnail_base.into() })
    }

    /// The thumbnail image URL that [`fetch`](Self::fetch) would download for `link`.
    pub fn thumbnail_url(&self, link: &str) -> Result<String> {
        let id = video_id(link)?;
        let url = thumbnail_url(&self.thumbnail_base, &id);
        tracing::trace!(video_id = %id, thumbnail = %url, "derived thumbnail URL");
        Ok(url)
    }

    /// Download the thumbnail for `link`.
    ///
    /// Only a `200 OK` counts as success. A `404` is reported as
    /// [`NotFound`](ErrorKind::NotFound), any other status as
    /// [`Status`](ErrorKind::Status).
    #[instrument(skip(self))]
    pub async fn fetch(&self, link: &str) -> Result<Vec<u8>> {
        let url = self.thumbnail_url(link)?;
        tracing::debug!(thumbnail = %url, "downloading thumbnail");
        let response = self.client.get(&url).send().await.or_raise(|| ErrorKind::Connection(url.clone()))?;
        match response.status() {
            StatusCode::OK => {},
            StatusCode::NOT_FOUND => exn::bail!(ErrorKind::NotFound(url)),
            status => {
                tracing::warn!(thumbnail = %url, %status, "unexpected HTTP status");
                exn::bail!(ErrorKind::Status(status.as_u16()));
            },
        }
        let body = response.bytes().await.or_raise(|| ErrorKind::Body)?;
        tracing::debug!(thumbnail = %url, bytes = body.len(), "thumbnail downloaded");
        Ok(body.to_vec())
    }
}
