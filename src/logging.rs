use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use std::fs::OpenOptions;
use std::sync::Mutex;
use thumbs_config::LogConfig;
use tracing::Dispatch;
use tracing_subscriber::EnvFilter;

/// Build the logger for this run.
///
/// `RUST_LOG` wins over the configured level. With a log file, JSON lines are
/// appended to it; otherwise human-readable lines go to stderr. Nothing is
/// installed globally.
pub fn dispatch(config: &LogConfig) -> Result<Dispatch> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .or_raise(|| ErrorKind::Logging)?;
    let dispatch = match &config.file {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent).or_raise(|| ErrorKind::Logging)?;
            }
            let file = OpenOptions::new().create(true).append(true).open(path).or_raise(|| ErrorKind::Logging)?;
            let subscriber = tracing_subscriber::fmt()
                .json()
                .with_env_filter(filter)
                .with_writer(Mutex::new(file))
                .finish();
            Dispatch::new(subscriber)
        },
        None => {
            let subscriber =
                tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).finish();
            Dispatch::new(subscriber)
        },
    };
    Ok(dispatch)
}
