//! Encoding and decoding helpers between partner records and their SQLite
//! rows.
//!
//! All timestamps are stored as RFC 3339 strings.

use chrono::{DateTime, Utc};
use partner_core::partner::{PartnerFields, PartnerRecord};

use crate::{Error, Result};

/// Column list shared by every `SELECT` against `partners`, in the order
/// [`RawPartner::from_row`] reads them.
pub const PARTNER_COLUMNS: &str = "id, first_name, last_name, email, phone, country, \
                                   partner_type, created_at, modified_at";

// ─── DateTime<Utc>
// ────────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// A `partners` row as read from SQLite, before timestamp decoding.
pub struct RawPartner {
  pub id:           String,
  pub first_name:   Option<String>,
  pub last_name:    Option<String>,
  pub email:        Option<String>,
  pub phone:        Option<String>,
  pub country:      Option<String>,
  pub partner_type: Option<String>,
  pub created_at:   String,
  pub modified_at:  String,
}

impl RawPartner {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:           row.get(0)?,
      first_name:   row.get(1)?,
      last_name:    row.get(2)?,
      email:        row.get(3)?,
      phone:        row.get(4)?,
      country:      row.get(5)?,
      partner_type: row.get(6)?,
      created_at:   row.get(7)?,
      modified_at:  row.get(8)?,
    })
  }

  pub fn into_record(self) -> Result<PartnerRecord> {
    Ok(PartnerRecord {
      id:          self.id,
      fields:      PartnerFields {
        first_name:   self.first_name,
        last_name:    self.last_name,
        email:        self.email,
        phone:        self.phone,
        country:      self.country,
        partner_type: self.partner_type,
      },
      created_at:  decode_dt(&self.created_at)?,
      modified_at: decode_dt(&self.modified_at)?,
    })
  }
}

/// Owned, `'static` column values for writing a record inside a
/// `Connection::call` closure.
pub struct PartnerParams {
  pub id:           String,
  pub first_name:   Option<String>,
  pub last_name:    Option<String>,
  pub email:        Option<String>,
  pub phone:        Option<String>,
  pub country:      Option<String>,
  pub partner_type: Option<String>,
  pub created_at:   String,
  pub modified_at:  String,
}

impl From<&PartnerRecord> for PartnerParams {
  fn from(r: &PartnerRecord) -> Self {
    Self {
      id:           r.id.clone(),
      first_name:   r.fields.first_name.clone(),
      last_name:    r.fields.last_name.clone(),
      email:        r.fields.email.clone(),
      phone:        r.fields.phone.clone(),
      country:      r.fields.country.clone(),
      partner_type: r.fields.partner_type.clone(),
      created_at:   encode_dt(r.created_at),
      modified_at:  encode_dt(r.modified_at),
    }
  }
}

impl PartnerParams {
  /// Run `INSERT OR IGNORE`; returns `false` if the ID was already present.
  pub fn insert(&self, conn: &rusqlite::Connection) -> rusqlite::Result<bool> {
    let changed = conn.execute(
      "INSERT OR IGNORE INTO partners (
         id, first_name, last_name, email, phone, country,
         partner_type, created_at, modified_at
       ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
      rusqlite::params![
        self.id,
        self.first_name,
        self.last_name,
        self.email,
        self.phone,
        self.country,
        self.partner_type,
        self.created_at,
        self.modified_at,
      ],
    )?;
    Ok(changed == 1)
  }

  /// Replace every column except `id` of the row keyed `key`; returns
  /// `false` if no such row exists.
  pub fn update(&self, conn: &rusqlite::Connection, key: &str) -> rusqlite::Result<bool> {
    let changed = conn.execute(
      "UPDATE partners SET
         first_name = ?2, last_name = ?3, email = ?4, phone = ?5,
         country = ?6, partner_type = ?7, created_at = ?8, modified_at = ?9
       WHERE id = ?1",
      rusqlite::params![
        key,
        self.first_name,
        self.last_name,
        self.email,
        self.phone,
        self.country,
        self.partner_type,
        self.created_at,
        self.modified_at,
      ],
    )?;
    Ok(changed == 1)
  }
}
