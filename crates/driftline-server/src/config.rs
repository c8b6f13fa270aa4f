//! Runtime configuration for the `driftline` binary.
//!
//! Read from a TOML file (optional) and overlaid with `DRIFTLINE_*`
//! environment variables; nested keys use `__`, e.g.
//! `DRIFTLINE_CLUSTER__THRESHOLD_DAYS=5`.

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use driftline_core::config::ClusterConfig;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct ServerConfig {
  pub host:       String,
  pub port:       u16,
  pub store_path: PathBuf,
  pub cluster:    ClusterConfig,
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host:       "127.0.0.1".to_string(),
      port:       8000,
      store_path: PathBuf::from("driftline.db"),
      cluster:    ClusterConfig::default(),
    }
  }
}

impl ServerConfig {
  /// Layer `path` (if it exists) and the environment into a config.
  pub fn load(path: &Path) -> anyhow::Result<Self> {
    let settings = ::config::Config::builder()
      .add_source(::config::File::from(path).required(false))
      .add_source(
        ::config::Environment::with_prefix("DRIFTLINE")
          .separator("__")
          .try_parsing(true),
      )
      .build()
      .context("failed to read config file")?;

    Self::from_settings(settings)
  }

  fn from_settings(settings: ::config::Config) -> anyhow::Result<Self> {
    let cfg: Self = settings
      .try_deserialize()
      .context("failed to deserialise ServerConfig")?;
    cfg.cluster.validate()?;
    Ok(cfg)
  }

  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
