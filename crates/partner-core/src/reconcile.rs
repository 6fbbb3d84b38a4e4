//! The upsert reconciler: decides between creating and updating a partner and
//! applies the timestamp rules.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde_json::json;
use uuid::Uuid;

use crate::{
  Error, Result,
  clock::{Clock, SystemClock},
  observe::{EventKind, Observer, TracingObserver},
  partner::{Candidate, Outcome, PartnerPayload, PartnerRecord, Reconciled},
  store::PartnerStore,
};

// ─── Timestamp rules ─────────────────────────────────────────────────────────

/// Build the record to write for `candidate` given what is already stored.
///
/// - No existing record: `created_at = modified_at = now`.
/// - Existing record: `created_at` is copied from it and `modified_at = now`.
///   If `now` does not move past the stored `modified_at`, the stored value is
///   advanced by one microsecond instead so that `modified_at` still strictly
///   increases.
///
/// Every mutable field is taken from `candidate`; nothing is merged from the
/// existing record.
pub fn stamp(
  candidate: Candidate,
  existing: Option<&PartnerRecord>,
  now: DateTime<Utc>,
) -> Reconciled {
  let Candidate { id, fields } = candidate;
  match existing {
    None => Reconciled {
      outcome: Outcome::Created,
      record:  PartnerRecord { id, fields, created_at: now, modified_at: now },
    },
    Some(prev) => {
      let modified_at = if now > prev.modified_at {
        now
      } else {
        prev.modified_at + Duration::microseconds(1)
      };
      Reconciled {
        outcome: Outcome::Updated,
        record:  PartnerRecord {
          id,
          fields,
          created_at: prev.created_at,
          modified_at,
        },
      }
    }
  }
}

// ─── Reconciler ──────────────────────────────────────────────────────────────

/// Reconciles inbound partner payloads into a [`PartnerStore`].
pub struct Reconciler<S> {
  store:    Arc<S>,
  clock:    Arc<dyn Clock>,
  observer: Arc<dyn Observer>,
}

impl<S> Clone for Reconciler<S> {
  fn clone(&self) -> Self {
    Self {
      store:    Arc::clone(&self.store),
      clock:    Arc::clone(&self.clock),
      observer: Arc::clone(&self.observer),
    }
  }
}

impl<S: PartnerStore> Reconciler<S> {
  /// A reconciler using wall-clock time and [`TracingObserver`].
  pub fn new(store: Arc<S>) -> Self {
    Self {
      store,
      clock: Arc::new(SystemClock),
      observer: Arc::new(TracingObserver),
    }
  }

  pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
    self.clock = clock;
    self
  }

  pub fn with_observer(mut self, observer: Arc<dyn Observer>) -> Self {
    self.observer = observer;
    self
  }

  pub fn store(&self) -> &Arc<S> { &self.store }

  pub fn observer(&self) -> &Arc<dyn Observer> { &self.observer }

  /// Insert `payload` as a new partner or replace the existing one with the
  /// same ID.
  ///
  /// Performs no storage call if the ID is missing or blank. Otherwise makes
  /// exactly one [`PartnerStore::upsert`] call; storage failures are wrapped
  /// in [`Error::Storage`] and never retried.
  pub async fn reconcile(&self, payload: PartnerPayload) -> Result<Reconciled> {
    let request_id = Uuid::new_v4();
    self.observer.log_event(
      EventKind::Received,
      &json!({ "request_id": request_id, "payload": &payload }),
    );

    let id = payload.id.clone();
    match self.apply(payload).await {
      Ok(reconciled) => {
        let kind = match reconciled.outcome {
          Outcome::Created => EventKind::Created,
          Outcome::Updated => EventKind::Updated,
        };
        self.observer.log_event(
          kind,
          &json!({
            "request_id":  request_id,
            "ID":          reconciled.record.id,
            "created_at":  reconciled.record.created_at,
            "modified_at": reconciled.record.modified_at,
          }),
        );
        Ok(reconciled)
      }
      Err(e) => {
        self.observer.log_event(
          EventKind::Failed,
          &json!({ "request_id": request_id, "ID": id, "error": e.to_string() }),
        );
        Err(e)
      }
    }
  }

  async fn apply(&self, payload: PartnerPayload) -> Result<Reconciled> {
    let candidate = payload.into_candidate()?;
    let now = self.clock.now();
    self
      .store
      .upsert(candidate, now)
      .await
      .map_err(|e| Error::Storage(Box::new(e)))
  }
}
