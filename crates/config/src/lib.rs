//! Configuration loading and validation.
//!
//! Values are layered, later sources overriding earlier ones:
//!
//! 1. built-in defaults ([`Config::default`]);
//! 2. a configuration file (TOML, YAML or JSON, chosen by extension);
//! 3. environment variables prefixed with `THUMBS_`, using `__` to reach
//!    nested keys (e.g. `THUMBS_LOG__LEVEL=debug`).
//!
//! Without an explicit file, `config.toml` in the platform's project config
//! directory is used if it exists.

pub mod error;

use crate::error::{ErrorKind, Result};
use directories::ProjectDirs;
use exn::ResultExt;
use figment::Figment;
use figment::providers::{Env, Format, Json, Serialized, Toml, Yaml};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const ENV_PREFIX: &str = "THUMBS_";
const DEFAULT_CONFIG_FILE: &str = "config.toml";
const DEFAULT_DATABASE_FILE: &str = "thumbs.sqlite";

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("", "", "thumbs")
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub log: LogConfig,
    pub database: DatabaseConfig,
    pub fetch: FetchConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// An `EnvFilter` directive; `RUST_LOG` still wins when set.
    pub level: String,
    /// Write JSON log lines to this file instead of human-readable output to stderr.
    pub file: Option<PathBuf>,
}
impl Default for LogConfig {
    fn default() -> Self {
        Self { level: "info".to_string(), file: None }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub path: PathBuf,
}
impl Default for DatabaseConfig {
    fn default() -> Self {
        let path = match project_dirs() {
            Some(dirs) => dirs.data_dir().join(DEFAULT_DATABASE_FILE),
            None => PathBuf::from(DEFAULT_DATABASE_FILE),
        };
        Self { path }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// URL prefix that video ids are appended to.
    pub thumbnail_base: String,
    pub proxy: Option<ProxyConfig>,
}
impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            thumbnail_base: "https://img.youtube.com/vi".to_string(),
            proxy: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProxyConfig {
    pub url: String,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}
impl ProxyConfig {
    /// Username and password, when both are configured.
    pub fn credentials(&self) -> Option<(String, String)> {
        match (&self.username, &self.password) {
            (Some(username), Some(password)) if !username.is_empty() && !password.is_empty() => {
                Some((username.clone(), password.clone()))
            },
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory that downloaded thumbnails are written into.
    pub directory: PathBuf,
}
impl Default for OutputConfig {
    fn default() -> Self {
        Self { directory: PathBuf::from("thumbnails") }
    }
}

impl Config {
    /// Location of the configuration file used when none is given explicitly.
    pub fn default_path() -> Option<PathBuf> {
        project_dirs().map(|dirs| dirs.config_dir().join(DEFAULT_CONFIG_FILE))
    }

    /// Load and validate the configuration.
    ///
    /// An explicit `path` must exist. The default path is optional.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config: Self = Self::figment(path)?.extract().or_raise(|| ErrorKind::Load)?;
        config.validate()?;
        tracing::debug!(?config, "configuration loaded");
        Ok(config)
    }

    /// Build the layered [`Figment`] without extracting it.
    pub fn figment(path: Option<&Path>) -> Result<Figment> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));
        match path {
            Some(path) if !path.exists() => exn::bail!(ErrorKind::NotFound(path.to_path_buf())),
            Some(path) => figment = Self::merge_file(figment, path)?,
            None => {
                if let Some(path) = Self::default_path().filter(|p| p.exists()) {
                    figment = Self::merge_file(figment, &path)?;
                }
            },
        }
        Ok(figment.merge(Env::prefixed(ENV_PREFIX).split("__")))
    }

    fn merge_file(figment: Figment, path: &Path) -> Result<Figment> {
        let extension = path.extension().and_then(|e| e.to_str()).map(str::to_ascii_lowercase);
        Ok(match extension.as_deref() {
            Some("toml") => figment.merge(Toml::file(path)),
            Some("yaml" | "yml") => figment.merge(Yaml::file(path)),
            Some("json") => figment.merge(Json::file(path)),
            _ => exn::bail!(ErrorKind::UnsupportedFormat(path.to_path_buf())),
        })
    }

    /// Reject values that would only fail later, halfway through a batch.
    pub fn validate(&self) -> Result<()> {
        if self.fetch.thumbnail_base.trim().is_empty() {
            exn::bail!(ErrorKind::Invalid("fetch.thumbnail_base must not be empty"));
        }
        if let Some(proxy) = &self.fetch.proxy {
            if proxy.url.trim().is_empty() {
                exn::bail!(ErrorKind::Invalid("fetch.proxy.url must not be empty"));
            }
            // Same notion of "configured" as `ProxyConfig::credentials`.
            match (proxy.username.as_deref(), proxy.password.as_deref()) {
                (None, None) => {},
                (Some(username), Some(password)) if !username.is_empty() && !password.is_empty() => {},
                _ => exn::bail!(ErrorKind::Invalid("fetch.proxy needs a non-empty username and password, or neither")),
            }
        }
        if self.database.path.as_os_str().is_empty() {
            exn::bail!(ErrorKind::Invalid("database.path must not be empty"));
        }
        Ok(())
    }
}
