//! JSON API for partner synchronisation.
//!
//! Exposes an axum [`Router`] backed by any
//! [`partner_core::store::PartnerStore`]. Auth, TLS, and transport concerns are
//! the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .merge(partner_api::api_router(Reconciler::new(store)))
//! ```

pub mod error;
pub mod partners;
pub mod receive;

use axum::{
  Router,
  routing::{get, post},
};
use partner_core::{reconcile::Reconciler, store::PartnerStore};

pub use error::ApiError;

/// Build the API router around `reconciler`.
///
/// The read endpoints use the reconciler's store and observer, so every
/// handler shares one storage collaborator.
pub fn api_router<S>(reconciler: Reconciler<S>) -> Router<()>
where
  S: PartnerStore + 'static,
{
  Router::new()
    // Inbound sync
    .route("/receiveBusinessPartner", post(receive::handler::<S>))
    // Reads
    .route("/BusinessPartners", get(partners::list::<S>))
    .route("/BusinessPartners/{id}", get(partners::get_one::<S>))
    .with_state(reconciler)
}

// ─── Integration tests ────────────────────────────────────────────────────────
