//! certvault REST server library.
//!
//! HTTP surface over [`certvault_core::Ledger`]:
//! - certificate CRUD and per-user listing
//! - transfer propose/accept under HTTP Basic credentials
//! - error → status mapping and CORS

pub mod auth;
pub mod error;
pub mod routes;
pub mod shutdown;
