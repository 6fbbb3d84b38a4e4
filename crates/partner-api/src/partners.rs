//! Read handlers for `/BusinessPartners`.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/BusinessPartners` | Optional `country`, `partner_type`, `limit`, `offset` |
//! | `GET`  | `/BusinessPartners/:id` | 404 if not found |
//!
//! Both report the requested filters and the number of returned records to
//! the reconciler's observer.

use axum::{
  Json,
  extract::{Path, Query, State},
};
use partner_core::{
  observe::EventKind,
  partner::PartnerRecord,
  reconcile::Reconciler,
  store::{PartnerQuery, PartnerStore},
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::error::ApiError;

// ─── List ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ListParams {
  pub country:      Option<String>,
  pub partner_type: Option<String>,
  pub limit:        Option<usize>,
  pub offset:       Option<usize>,
}

impl From<ListParams> for PartnerQuery {
  fn from(p: ListParams) -> Self {
    PartnerQuery {
      country:      p.country,
      partner_type: p.partner_type,
      limit:        p.limit,
      offset:       p.offset,
    }
  }
}

/// `GET /BusinessPartners[?country=..][&partner_type=..][&limit=..][&offset=..]`
pub async fn list<S>(
  State(reconciler): State<Reconciler<S>>,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<PartnerRecord>>, ApiError>
where
  S: PartnerStore + 'static,
{
  let observer = reconciler.observer();
  observer.log_event(EventKind::ReadRequested, &json!({ "filters": &params }));

  let partners = reconciler
    .store()
    .list(&PartnerQuery::from(params))
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;

  observer.log_event(EventKind::ReadCompleted, &json!({ "count": partners.len() }));
  Ok(Json(partners))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /BusinessPartners/:id`
pub async fn get_one<S>(
  State(reconciler): State<Reconciler<S>>,
  Path(id): Path<String>,
) -> Result<Json<PartnerRecord>, ApiError>
where
  S: PartnerStore + 'static,
{
  let observer = reconciler.observer();
  observer.log_event(EventKind::ReadRequested, &json!({ "filters": { "ID": &id } }));

  let partner = reconciler
    .store()
    .find_by_id(&id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;

  observer.log_event(
    EventKind::ReadCompleted,
    &json!({ "count": usize::from(partner.is_some()) }),
  );
  let partner = partner.ok_or_else(|| ApiError::NotFound(format!("partner {id} not found")))?;
  Ok(Json(partner))
}
