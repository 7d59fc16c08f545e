use crate::error::{ErrorKind, Result};
use exn::{OptionExt, ResultExt};
use url::Url;

/// File name of the largest thumbnail YouTube renders for a video.
const THUMBNAIL_FILE: &str = "maxresdefault.jpg";

/// Extract the video id from a YouTube link.
///
/// | Host                           | Id taken from              |
/// |--------------------------------|----------------------------|
/// | `www.youtube.com`, `youtube.com` | the `v` query parameter  |
/// | `youtu.be`                     | the first path segment     |
///
/// Anything else is an error in the [not found](ErrorKind::is_not_found)
/// family: an unparsable link, a different host, or an empty id.
pub fn video_id(link: &str) -> Result<String> {
    let url = Url::parse(link).or_raise(|| ErrorKind::InvalidUrl(link.to_string()))?;
    let id = match url.host_str() {
        Some("www.youtube.com" | "youtube.com") => {
            url.query_pairs().find(|(name, _)| name == "v").map(|(_, value)| value.into_owned())
        },
        Some("youtu.be") => url.path_segments().and_then(|mut segments| segments.next()).map(str::to_string),
        _ => exn::bail!(ErrorKind::UnsupportedHost(link.to_string())),
    };
    id.filter(|id| !id.is_empty()).ok_or_raise(|| ErrorKind::MissingVideoId(link.to_string()))
}

/// Build the thumbnail image URL for a video id under `base`.
///
/// ```
/// assert_eq!(
///     thumbs_fetch::thumbnail_url("https://img.youtube.com/vi/", "ABC123"),
///     "https://img.youtube.com/vi/ABC123/maxresdefault.jpg",
/// );
/// ```
pub fn thumbnail_url(base: &str, video_id: &str) -> String {
    format!("{}/{video_id}/{THUMBNAIL_FILE}", base.trim_end_matches('/'))
}
