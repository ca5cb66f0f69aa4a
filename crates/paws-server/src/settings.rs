//! Server configuration, layered from `config.toml` and `PAWS_*` variables.

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use paws_core::config::DiscoveryConfig;
use serde::Deserialize;

/// Runtime server configuration. Every field has a default, so an absent
/// config file still yields a usable server.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
  pub host:       String,
  pub port:       u16,
  pub store_path: PathBuf,
  pub discovery:  DiscoveryConfig,
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host:       "127.0.0.1".to_string(),
      port:       8080,
      store_path: PathBuf::from("~/.local/share/paws/discovery.db"),
      discovery:  DiscoveryConfig::default(),
    }
  }
}

impl ServerConfig {
  /// Read `path` (optional) and overlay the environment. Nested keys use a
  /// double underscore: `PAWS_DISCOVERY__MAX_QUEUE_LIMIT=30`.
  pub fn load(path: &Path) -> anyhow::Result<Self> {
    let settings = config::Config::builder()
      .add_source(config::File::from(path).required(false))
      .add_source(
        config::Environment::with_prefix("PAWS")
          .prefix_separator("_")
          .separator("__"),
      )
      .build()
      .context("failed to read config file")?;

    settings
      .try_deserialize()
      .context("failed to deserialise ServerConfig")
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
