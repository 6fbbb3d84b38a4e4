//! Integration tests for `SqliteStore` against an in-memory database.

use chrono::{DateTime, Duration, TimeZone, Utc};
use partner_core::{
  partner::{Candidate, Outcome, PartnerFields, PartnerRecord, Reconciled},
  store::{PartnerQuery, PartnerStore},
};

use crate::{Error, SqliteStore, schema::SCHEMA, store::write_reconciled};

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn t1() -> DateTime<Utc> { Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap() }

fn t2() -> DateTime<Utc> { Utc.with_ymd_and_hms(2024, 3, 2, 9, 0, 0).unwrap() }

fn fields(first_name: &str, country: &str, partner_type: &str) -> PartnerFields {
  PartnerFields {
    first_name: Some(first_name.into()),
    country: Some(country.into()),
    partner_type: Some(partner_type.into()),
    ..PartnerFields::default()
  }
}

fn record(id: &str, country: &str, partner_type: &str) -> PartnerRecord {
  PartnerRecord {
    id:          id.into(),
    fields:      fields("Ana", country, partner_type),
    created_at:  t1(),
    modified_at: t1(),
  }
}

fn candidate(id: &str, country: &str) -> Candidate {
  Candidate { id: id.into(), fields: fields("Ana", country, "Customer") }
}

// ─── Keyed access ────────────────────────────────────────────────────────────

#[tokio::test]
async fn insert_and_find() {
  let s = store().await;
  let r = record("BP1", "IN", "Customer");
  s.insert(&r).await.unwrap();

  let fetched = s.find_by_id("BP1").await.unwrap();
  assert_eq!(fetched, Some(r));
}

#[tokio::test]
async fn find_missing_returns_none() {
  let s = store().await;
  assert!(s.find_by_id("nope").await.unwrap().is_none());
}

#[tokio::test]
async fn insert_duplicate_is_rejected() {
  let s = store().await;
  s.insert(&record("BP1", "IN", "Customer")).await.unwrap();

  let err = s.insert(&record("BP1", "DE", "Supplier")).await.unwrap_err();
  assert!(matches!(err, Error::AlreadyExists(ref id) if id == "BP1"));

  // The original row is untouched.
  let stored = s.find_by_id("BP1").await.unwrap().unwrap();
  assert_eq!(stored.fields.country.as_deref(), Some("IN"));
}

#[tokio::test]
async fn update_replaces_row() {
  let s = store().await;
  s.insert(&record("BP1", "IN", "Customer")).await.unwrap();

  let mut replacement = record("BP1", "DE", "Supplier");
  replacement.fields.first_name = None;
  replacement.modified_at = t2();
  s.update("BP1", &replacement).await.unwrap();

  let stored = s.find_by_id("BP1").await.unwrap().unwrap();
  assert_eq!(stored, replacement);
}

#[tokio::test]
async fn update_missing_is_not_found() {
  let s = store().await;
  let err = s.update("BP1", &record("BP1", "IN", "Customer")).await.unwrap_err();
  assert!(matches!(err, Error::NotFound(ref id) if id == "BP1"));
}

// ─── Listing ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn list_filters_and_orders_by_id() {
  let s = store().await;
  s.insert(&record("BP3", "IN", "Customer")).await.unwrap();
  s.insert(&record("BP1", "IN", "Supplier")).await.unwrap();
  s.insert(&record("BP2", "DE", "Customer")).await.unwrap();

  let all = s.list(&PartnerQuery::default()).await.unwrap();
  let ids: Vec<_> = all.iter().map(|r| r.id.as_str()).collect();
  assert_eq!(ids, ["BP1", "BP2", "BP3"]);

  let india = s
    .list(&PartnerQuery { country: Some("IN".into()), ..PartnerQuery::default() })
    .await
    .unwrap();
  assert_eq!(india.len(), 2);
  assert!(india.iter().all(|r| r.fields.country.as_deref() == Some("IN")));

  let indian_customers = s
    .list(&PartnerQuery {
      country: Some("IN".into()),
      partner_type: Some("Customer".into()),
      ..PartnerQuery::default()
    })
    .await
    .unwrap();
  assert_eq!(indian_customers.len(), 1);
  assert_eq!(indian_customers[0].id, "BP3");
}

#[tokio::test]
async fn list_paginates() {
  let s = store().await;
  for id in ["BP1", "BP2", "BP3", "BP4"] {
    s.insert(&record(id, "IN", "Customer")).await.unwrap();
  }

  let page = s
    .list(&PartnerQuery { limit: Some(2), offset: Some(1), ..PartnerQuery::default() })
    .await
    .unwrap();
  let ids: Vec<_> = page.iter().map(|r| r.id.as_str()).collect();
  assert_eq!(ids, ["BP2", "BP3"]);
}

// ─── Atomic upsert ───────────────────────────────────────────────────────────

#[tokio::test]
async fn upsert_creates_then_updates_preserving_created_at() {
  let s = store().await;

  let created = s.upsert(candidate("BP1", "IN"), t1()).await.unwrap();
  assert_eq!(created.outcome, Outcome::Created);
  let stored = s.find_by_id("BP1").await.unwrap().unwrap();
  assert_eq!(stored.created_at, t1());
  assert_eq!(stored.modified_at, t1());

  let updated = s.upsert(candidate("BP1", "DE"), t2()).await.unwrap();
  assert_eq!(updated.outcome, Outcome::Updated);
  let stored = s.find_by_id("BP1").await.unwrap().unwrap();
  assert_eq!(stored.fields.country.as_deref(), Some("DE"));
  assert_eq!(stored.created_at, t1());
  assert_eq!(stored.modified_at, t2());
  assert_eq!(stored, updated.record);
}

#[tokio::test]
async fn upsert_with_stalled_clock_still_advances_modified_at() {
  let s = store().await;
  s.upsert(candidate("BP1", "IN"), t2()).await.unwrap();

  let again = s.upsert(candidate("BP1", "IN"), t1()).await.unwrap();
  assert_eq!(again.record.created_at, t2());
  assert_eq!(again.record.modified_at, t2() + Duration::microseconds(1));
}

#[tokio::test]
async fn concurrent_upserts_of_one_id_create_exactly_once() {
  let s = store().await;

  let tasks: Vec<_> = (0..8)
    .map(|i| {
      let s = s.clone();
      tokio::spawn(async move {
        s.upsert(candidate("BP1", "IN"), t1() + Duration::seconds(i)).await
      })
    })
    .collect();

  let mut created = 0;
  for task in tasks {
    if task.await.unwrap().unwrap().outcome == Outcome::Created {
      created += 1;
    }
  }
  assert_eq!(created, 1);

  let all = s.list(&PartnerQuery::default()).await.unwrap();
  assert_eq!(all.len(), 1);
  assert!(all[0].modified_at >= all[0].created_at);
}

#[test]
fn write_reconciled_rejects_a_branch_that_does_not_match_the_row() {
  let conn = rusqlite::Connection::open_in_memory().unwrap();
  conn.execute_batch(SCHEMA).unwrap();

  let updated = Reconciled { outcome: Outcome::Updated, record: record("BP1", "IN", "Customer") };
  let err = write_reconciled(&conn, &updated).unwrap().unwrap_err();
  assert!(matches!(err, Error::NotFound(ref id) if id == "BP1"));

  let created = Reconciled { outcome: Outcome::Created, record: record("BP1", "IN", "Customer") };
  write_reconciled(&conn, &created).unwrap().unwrap();
  let err = write_reconciled(&conn, &created).unwrap().unwrap_err();
  assert!(matches!(err, Error::AlreadyExists(ref id) if id == "BP1"));

  write_reconciled(&conn, &updated).unwrap().unwrap();
}

// ─── Persistence ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn reopening_a_file_keeps_rows() {
  let path = std::env::temp_dir().join(format!(
    "partner-store-{}-{}.db",
    std::process::id(),
    Utc::now().timestamp_nanos_opt().unwrap_or_default()
  ));

  {
    let s = SqliteStore::open(&path).await.unwrap();
    s.upsert(candidate("BP1", "IN"), t1()).await.unwrap();
  }

  let s = SqliteStore::open(&path).await.unwrap();
  let stored = s.find_by_id("BP1").await.unwrap().unwrap();
  assert_eq!(stored.created_at, t1());

  drop(s);
  for suffix in ["", "-wal", "-shm"] {
    let mut p = path.clone().into_os_string();
    p.push(suffix);
    let _ = std::fs::remove_file(p);
  }
}
