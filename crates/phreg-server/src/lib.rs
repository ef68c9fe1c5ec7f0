//! Process-level pieces of the registration server: configuration and the
//! operator commands that are deliberately not reachable over HTTP.

pub mod operator;

use std::path::{Path, PathBuf};

use phreg_api::{
  IdentityConfig,
  identity::{DEFAULT_IDENTITY_HEADER, DEFAULT_SESSION_COOKIE},
};
use serde::Deserialize;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `PHREG_*` environment variables. Every field has a default.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
  pub host:            String,
  pub port:            u16,
  pub store_path:      PathBuf,
  /// Trusted header carrying the authenticated subject.
  pub identity_header: String,
  /// Cookie consulted when the header is absent.
  pub session_cookie:  String,
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host:            "127.0.0.1".to_owned(),
      port:            3000,
      store_path:      PathBuf::from("phreg.db"),
      identity_header: DEFAULT_IDENTITY_HEADER.to_owned(),
      session_cookie:  DEFAULT_SESSION_COOKIE.to_owned(),
    }
  }
}

impl ServerConfig {
  /// Layer an optional config file under `PHREG_*` environment variables.
  pub fn load(path: &Path) -> Result<Self, config::ConfigError> {
    config::Config::builder()
      .add_source(config::File::from(path).required(false))
      .add_source(config::Environment::with_prefix("PHREG"))
      .build()?
      .try_deserialize()
  }

  pub fn identity(&self) -> IdentityConfig {
    IdentityConfig {
      header: self.identity_header.to_lowercase(),
      cookie: self.session_cookie.clone(),
    }
  }

  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }

  /// `store_path` with a leading `~` expanded to the user's home directory.
  pub fn resolved_store_path(&self) -> PathBuf { expand_tilde(&self.store_path) }
}

fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
