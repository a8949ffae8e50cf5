//! Passbook server - HTTP surface over passbook-core
//!
//! The binary wires a PassbookContext into the axum router defined here;
//! tests drive the same router directly through tower.

pub mod auth;
pub mod error;
pub mod routes;

pub use routes::{build_router, AppState};
