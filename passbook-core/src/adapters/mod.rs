//! Adapter implementations
//!
//! Adapters implement the port traits with concrete technologies:
//! - DuckDB for durable storage
//! - In-memory stores for tests and ephemeral mode

pub mod duckdb;
pub mod memory;

pub use duckdb::DuckDbStore;
pub use memory::{InMemoryStatementStore, InMemoryUserStore};
