//! The `PartnerStore` trait and supporting query types.
//!
//! The trait is implemented by storage backends (e.g. `partner-store-sqlite`).
//! The reconciler and the HTTP layer depend on this abstraction, not on any
//! concrete backend.

use std::future::Future;

use chrono::{DateTime, Utc};

use crate::{
  partner::{Candidate, Outcome, PartnerRecord, Reconciled},
  reconcile::stamp,
};

// ─── Query type ──────────────────────────────────────────────────────────────

/// Parameters for [`PartnerStore::list`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PartnerQuery {
  /// Exact match on the partner's country code.
  pub country:      Option<String>,
  /// Exact match on the partner type (e.g. `"Customer"`).
  pub partner_type: Option<String>,
  pub limit:        Option<usize>,
  pub offset:       Option<usize>,
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a keyed partner store.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait PartnerStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Retrieve a partner by ID. Returns `None` if not found.
  fn find_by_id<'a>(
    &'a self,
    id: &'a str,
  ) -> impl Future<Output = Result<Option<PartnerRecord>, Self::Error>> + Send + 'a;

  /// Persist a new partner. Fails if the ID is already taken.
  fn insert<'a>(
    &'a self,
    record: &'a PartnerRecord,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  /// Replace the stored partner with ID `id`. Fails if it does not exist.
  fn update<'a>(
    &'a self,
    id: &'a str,
    record: &'a PartnerRecord,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  /// List partners matching `query`, ordered by ID.
  fn list<'a>(
    &'a self,
    query: &'a PartnerQuery,
  ) -> impl Future<Output = Result<Vec<PartnerRecord>, Self::Error>> + Send + 'a;

  /// Insert or update `candidate`, stamping timestamps with `now`.
  ///
  /// The provided body performs one [`find_by_id`](Self::find_by_id) followed
  /// by one [`insert`](Self::insert) or [`update`](Self::update). That
  /// sequence is not atomic: two concurrent calls for the same ID may both see
  /// "not found", and concurrent updates are last-write-wins. Backends that can
  /// run the lookup and the write as a single conditional operation should
  /// override this method.
  fn upsert(
    &self,
    candidate: Candidate,
    now: DateTime<Utc>,
  ) -> impl Future<Output = Result<Reconciled, Self::Error>> + Send + '_ {
    async move {
      let existing = self.find_by_id(&candidate.id).await?;
      let reconciled = stamp(candidate, existing.as_ref(), now);
      match reconciled.outcome {
        Outcome::Created => self.insert(&reconciled.record).await?,
        Outcome::Updated => {
          self
            .update(&reconciled.record.id, &reconciled.record)
            .await?
        }
      }
      Ok(reconciled)
    }
  }
}
