//! HTTP server wiring for partner synchronisation.
//!
//! Loads [`ServerConfig`], and wraps the [`partner_api`] router with request
//! tracing. The binary in `main.rs` is a thin shell around these pieces.

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use axum::Router;
use partner_core::{reconcile::Reconciler, store::PartnerStore};
use serde::Deserialize;
use tower_http::trace::TraceLayer;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `PARTNER_*` environment variables.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:       String,
  #[serde(default = "default_port")]
  pub port:       u16,
  #[serde(default = "default_store_path")]
  pub store_path: PathBuf,
}

fn default_host() -> String { "127.0.0.1".to_owned() }

fn default_port() -> u16 { 4004 }

fn default_store_path() -> PathBuf { PathBuf::from("partners.db") }

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host:       default_host(),
      port:       default_port(),
      store_path: default_store_path(),
    }
  }
}

impl ServerConfig {
  /// Layer the optional TOML file at `path` under `PARTNER_*` env vars.
  pub fn load(path: &Path) -> Result<Self, config::ConfigError> {
    config::Config::builder()
      .add_source(config::File::from(path).required(false))
      .add_source(config::Environment::with_prefix("PARTNER"))
      .build()?
      .try_deserialize()
  }

  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// The API router for `store`, with per-request tracing spans.
pub fn app<S>(store: Arc<S>) -> Router
where
  S: PartnerStore + 'static,
{
  partner_api::api_router(Reconciler::new(store)).layer(TraceLayer::new_for_http())
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
