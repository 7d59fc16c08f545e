use crate::error::{ErrorKind, Result};
use crate::{logging, output};
use clap::Parser;
use exn::ResultExt;
use std::path::PathBuf;
use std::sync::Arc;
use thumbs_cache::{Database, Repository};
use thumbs_config::Config;
use thumbs_fetch::{ProxySettings, YouTubeFetcher};
use thumbs_library::{BatchCoordinator, BatchRequest, Resolver, handle};
use tracing::Dispatch;
use tracing::instrument::WithSubscriber;

#[derive(Parser, Debug)]
#[command(name = "thumbs")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    #[arg(short, long, help = "Configuration file (TOML, YAML or JSON)")]
    pub config: Option<PathBuf>,

    #[arg(long = "async", help = "Download every link at once; any failure fails the whole batch")]
    pub concurrent: bool,

    #[arg(long, value_delimiter = ',', help = "Comma-separated list of video URLs")]
    pub links: Vec<String>,

    #[arg(short, long, help = "Directory to save thumbnails into")]
    pub output: Option<PathBuf>,

    #[arg(long, help = "Print the result as JSON")]
    pub json: bool,

    #[arg(help = "Video URLs, used when --links is not given")]
    pub urls: Vec<String>,
}

impl Args {
    /// Links from `--links` if any were given, otherwise the positional URLs.
    pub fn links(&self) -> Vec<String> {
        if self.links.is_empty() { self.urls.clone() } else { self.links.clone() }
    }

    pub fn request(&self) -> BatchRequest {
        BatchRequest::new(self.concurrent, self.links())
    }
}

pub async fn run(args: Args) -> Result<()> {
    let config = Config::load(args.config.as_deref()).or_raise(|| ErrorKind::Config)?;
    let dispatch = logging::dispatch(&config.log)?;
    execute(args, config, dispatch.clone()).with_subscriber(dispatch).await
}

async fn execute(args: Args, config: Config, dispatch: Dispatch) -> Result<()> {
    let request = args.request();
    request.validate().or_raise(|| ErrorKind::Request)?;
    tracing::info!(links = request.keys.len(), concurrent = request.concurrent, "command line parsed");

    let proxy = config
        .fetch
        .proxy
        .as_ref()
        .map(|proxy| ProxySettings { url: proxy.url.clone(), credentials: proxy.credentials() });
    let fetcher = YouTubeFetcher::new(&config.fetch.thumbnail_base, proxy).or_raise(|| ErrorKind::Fetcher)?;

    if let Some(parent) = config.database.path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await.or_raise(|| ErrorKind::Cache)?;
    }
    let db = Database::connect(&config.database.path).await.or_raise(|| ErrorKind::Cache)?;
    let resolver = Resolver::new(Arc::new(Repository::from(&db)), Arc::new(fetcher), dispatch);
    let coordinator = BatchCoordinator::new(resolver);

    let result = handle(&coordinator, request).await;
    db.close().await;
    let response = result.or_raise(|| ErrorKind::Batch)?;

    let directory = args.output.unwrap_or(config.output.directory);
    let saved = output::save(&directory, &response.blobs).await?;
    tracing::info!(saved = saved.len(), directory = %directory.display(), "thumbnails saved");
    let summary = output::Summary { status: response.status, saved };
    println!("{}", output::render(&summary, args.json)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn parse(argv: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("thumbs").chain(argv.iter().copied())).unwrap()
    }

    #[rstest]
    #[case(&["https://youtu.be/a", "https://youtu.be/b"], &["https://youtu.be/a", "https://youtu.be/b"])]
    #[case(&["--links", "https://youtu.be/a,https://youtu.be/b"], &["https://youtu.be/a", "https://youtu.be/b"])]
    #[case(&["--links", "https://youtu.be/a", "https://youtu.be/ignored"], &["https://youtu.be/a"])]
    #[case(&[], &[])]
    fn test_links(#[case] argv: &[&str], #[case] expected: &[&str]) {
        assert_eq!(parse(argv).links(), expected);
    }

    #[rstest]
    #[case(&["--async", "https://youtu.be/a"], true)]
    #[case(&["https://youtu.be/a"], false)]
    fn test_async_flag(#[case] argv: &[&str], #[case] concurrent: bool) {
        let request = parse(argv).request();
        assert_eq!(request.concurrent, concurrent);
        assert_eq!(request.keys, vec!["https://youtu.be/a".to_string()]);
    }

    #[test]
    fn test_no_links_is_rejected() {
        assert!(parse(&[]).request().validate().is_err());
    }

    #[test]
    fn test_options() {
        let args = parse(&["--config", "thumbs.yaml", "-o", "out", "--json", "https://youtu.be/a"]);
        assert_eq!(args.config, Some(PathBuf::from("thumbs.yaml")));
        assert_eq!(args.output, Some(PathBuf::from("out")));
        assert!(args.json);
    }

    #[tokio::test]
    async fn test_invalid_links_fail_before_opening_cache() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.database.path = dir.path().join("never/created.sqlite");
        let args = parse(&["not a url"]);
        let err = execute(args, config.clone(), Dispatch::none()).await.unwrap_err();
        assert!(matches!(&*err, ErrorKind::Request));
        assert!(!config.database.path.exists());
    }
}
