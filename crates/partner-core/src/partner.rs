//! Partner records and the inbound payload they are reconciled from.
//!
//! Field names on the wire follow the upstream system of record
//! (`ID`, `FirstName`, `PartnerType`, ...), so every type here serialises in
//! `PascalCase`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

// ─── Mutable fields ──────────────────────────────────────────────────────────

/// Every attribute of a partner that is replaced wholesale on each write.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PartnerFields {
  pub first_name:   Option<String>,
  pub last_name:    Option<String>,
  pub email:        Option<String>,
  pub phone:        Option<String>,
  pub country:      Option<String>,
  pub partner_type: Option<String>,
}

// ─── Stored record ───────────────────────────────────────────────────────────

/// A partner as persisted by the store.
///
/// `created_at` is assigned on the first write and carried forward on every
/// later one; `modified_at` is reassigned on every write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PartnerRecord {
  #[serde(rename = "ID")]
  pub id:          String,
  #[serde(flatten)]
  pub fields:      PartnerFields,
  pub created_at:  DateTime<Utc>,
  pub modified_at: DateTime<Utc>,
}

// ─── Inbound payload ─────────────────────────────────────────────────────────

/// A partner pushed by the upstream system.
///
/// `id` is optional here so that a missing key surfaces as a
/// [`Error::Validation`] rather than a deserialisation failure. Any
/// `CreatedAt` / `ModifiedAt` the caller sends is dropped: timestamps are
/// always server-assigned.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartnerPayload {
  #[serde(rename = "ID", default)]
  pub id:     Option<String>,
  #[serde(flatten)]
  pub fields: PartnerFields,
}

impl PartnerPayload {
  pub fn new(id: impl Into<String>) -> Self {
    Self { id: Some(id.into()), fields: PartnerFields::default() }
  }

  /// Check the required key and turn the payload into a [`Candidate`].
  pub fn into_candidate(self) -> Result<Candidate> {
    match self.id {
      Some(id) if !id.trim().is_empty() => Ok(Candidate { id, fields: self.fields }),
      Some(_) => Err(Error::Validation("ID must not be empty".into())),
      None => Err(Error::Validation("ID is required".into())),
    }
  }
}

/// A payload whose key has passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
  pub id:     String,
  pub fields: PartnerFields,
}

// ─── Reconciliation result ───────────────────────────────────────────────────

/// Which branch a reconciliation took.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
  Created,
  Updated,
}

/// The record as written, plus which branch produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reconciled {
  pub outcome: Outcome,
  pub record:  PartnerRecord,
}
