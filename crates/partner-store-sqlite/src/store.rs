//! [`SqliteStore`] — the SQLite implementation of [`PartnerStore`].

use std::path::Path;

use chrono::{DateTime, Utc};
use rusqlite::{OptionalExtension as _, TransactionBehavior};

use partner_core::{
  partner::{Candidate, Outcome, PartnerRecord, Reconciled},
  reconcile::stamp,
  store::{PartnerQuery, PartnerStore},
};

use crate::{
  Error, Result,
  encode::{PARTNER_COLUMNS, PartnerParams, RawPartner},
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A partner store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted. Every call
/// runs on the connection's single worker thread, so closures passed to
/// `call` never interleave.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

fn select_by_id(
  conn: &rusqlite::Connection,
  id: &str,
) -> rusqlite::Result<Option<RawPartner>> {
  conn
    .query_row(
      &format!("SELECT {PARTNER_COLUMNS} FROM partners WHERE id = ?1"),
      rusqlite::params![id],
      RawPartner::from_row,
    )
    .optional()
}

/// Write the record produced by [`stamp`] using the branch it took.
///
/// The outer error is a database failure; the inner one reports that the row
/// was not in the state the branch assumed (already present on create, absent
/// on update).
pub(crate) fn write_reconciled(
  conn: &rusqlite::Connection,
  reconciled: &Reconciled,
) -> rusqlite::Result<Result<()>> {
  let params = PartnerParams::from(&reconciled.record);
  let id = &reconciled.record.id;
  Ok(match reconciled.outcome {
    Outcome::Created if !params.insert(conn)? => Err(Error::AlreadyExists(id.clone())),
    Outcome::Updated if !params.update(conn, id)? => Err(Error::NotFound(id.clone())),
    _ => Ok(()),
  })
}

// ─── PartnerStore impl ───────────────────────────────────────────────────────

impl PartnerStore for SqliteStore {
  type Error = Error;

  async fn find_by_id(&self, id: &str) -> Result<Option<PartnerRecord>> {
    let id = id.to_owned();

    let raw: Option<RawPartner> = self
      .conn
      .call(move |conn| Ok(select_by_id(conn, &id)?))
      .await?;

    raw.map(RawPartner::into_record).transpose()
  }

  async fn insert(&self, record: &PartnerRecord) -> Result<()> {
    let params = PartnerParams::from(record);

    let inserted = self
      .conn
      .call(move |conn| Ok(params.insert(conn)?))
      .await?;

    if !inserted {
      return Err(Error::AlreadyExists(record.id.clone()));
    }
    Ok(())
  }

  async fn update(&self, id: &str, record: &PartnerRecord) -> Result<()> {
    let key = id.to_owned();
    let params = PartnerParams::from(record);

    let updated = self
      .conn
      .call(move |conn| Ok(params.update(conn, &key)?))
      .await?;

    if !updated {
      return Err(Error::NotFound(id.to_owned()));
    }
    Ok(())
  }

  async fn list(&self, query: &PartnerQuery) -> Result<Vec<PartnerRecord>> {
    let country      = query.country.clone();
    let partner_type = query.partner_type.clone();
    // SQLite treats a negative LIMIT as "no limit".
    let limit_val    = query.limit.map_or(-1, |l| l as i64);
    let offset_val   = query.offset.unwrap_or(0) as i64;

    let raws: Vec<RawPartner> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {PARTNER_COLUMNS}
           FROM partners
           WHERE (?1 IS NULL OR country = ?1)
             AND (?2 IS NULL OR partner_type = ?2)
           ORDER BY id
           LIMIT ?3 OFFSET ?4"
        ))?;
        let rows = stmt
          .query_map(
            rusqlite::params![country, partner_type, limit_val, offset_val],
            RawPartner::from_row,
          )?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawPartner::into_record).collect()
  }

  /// Lookup, stamping and write happen inside one `IMMEDIATE` transaction on
  /// the connection thread, so concurrent upserts of the same ID cannot both
  /// take the create branch.
  async fn upsert(&self, candidate: Candidate, now: DateTime<Utc>) -> Result<Reconciled> {
    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let existing = match select_by_id(&tx, &candidate.id)?
          .map(RawPartner::into_record)
          .transpose()
        {
          Ok(existing) => existing,
          Err(e) => return Ok(Err(e)),
        };

        let reconciled = stamp(candidate, existing.as_ref(), now);
        if let Err(e) = write_reconciled(&tx, &reconciled)? {
          // Dropping `tx` rolls back.
          return Ok(Err(e));
        }

        tx.commit()?;
        Ok(Ok(reconciled))
      })
      .await?
  }
}
