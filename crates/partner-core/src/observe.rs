//! Observability collaborator.
//!
//! The reconciler and the read endpoints report what they do through an
//! injected [`Observer`] instead of logging directly. Events carry a kind and
//! a free-form JSON payload; observers must not influence behaviour.

use serde::Serialize;
use serde_json::Value;

/// What happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
  /// A payload arrived on the inbound endpoint.
  Received,
  Created,
  Updated,
  /// Reconciliation failed; the payload carries the error text.
  Failed,
  /// A list or get was requested; the payload carries the filters.
  ReadRequested,
  /// A list or get completed; the payload carries the result count.
  ReadCompleted,
}

impl EventKind {
  pub fn as_str(self) -> &'static str {
    match self {
      Self::Received => "received",
      Self::Created => "created",
      Self::Updated => "updated",
      Self::Failed => "failed",
      Self::ReadRequested => "read_requested",
      Self::ReadCompleted => "read_completed",
    }
  }

  fn message(self) -> &'static str {
    match self {
      Self::Received => "received business partner",
      Self::Created => "created business partner",
      Self::Updated => "updated business partner",
      Self::Failed => "failed to process business partner",
      Self::ReadRequested => "reading business partners",
      Self::ReadCompleted => "returning business partners",
    }
  }
}

pub trait Observer: Send + Sync {
  fn log_event(&self, kind: EventKind, payload: &Value);
}

/// Emits every event through [`tracing`].
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl Observer for TracingObserver {
  fn log_event(&self, kind: EventKind, payload: &Value) {
    match kind {
      EventKind::Failed => {
        tracing::error!(kind = kind.as_str(), %payload, "{}", kind.message())
      }
      _ => tracing::info!(kind = kind.as_str(), %payload, "{}", kind.message()),
    }
  }
}
