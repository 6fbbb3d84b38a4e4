//! Core types and trait definitions for partner synchronisation.
//!
//! This crate is deliberately free of HTTP and database dependencies. It holds
//! the record model, the storage and observability collaborator traits, and
//! the [`Reconciler`](reconcile::Reconciler) that decides between creating and
//! updating a partner.

pub mod clock;
pub mod error;
pub mod observe;
pub mod partner;
pub mod reconcile;
pub mod store;

pub use error::{Error, Result};
