//! Handler for the inbound sync action.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/receiveBusinessPartner` | Body: [`PartnerPayload`]; returns `{"message", "ID"}` |

use axum::{Json, extract::State};
use partner_core::{
  partner::{Outcome, PartnerPayload},
  reconcile::Reconciler,
  store::PartnerStore,
};
use serde::Serialize;

use crate::error::ApiError;

/// Success body of `POST /receiveBusinessPartner`.
#[derive(Debug, Serialize)]
pub struct ReceiveResponse {
  pub message: String,
  #[serde(rename = "ID")]
  pub id:      String,
}

/// `POST /receiveBusinessPartner` — insert or update one partner.
///
/// Any failure, including a missing `ID`, is reported as 500 with the
/// underlying detail in the message.
pub async fn handler<S>(
  State(reconciler): State<Reconciler<S>>,
  Json(payload): Json<PartnerPayload>,
) -> Result<Json<ReceiveResponse>, ApiError>
where
  S: PartnerStore + 'static,
{
  let reconciled = reconciler.reconcile(payload).await?;

  let message = match reconciled.outcome {
    Outcome::Created => "Business Partner created successfully",
    Outcome::Updated => "Business Partner updated successfully",
  };
  Ok(Json(ReceiveResponse { message: message.to_owned(), id: reconciled.record.id }))
}
