//! Core domain entities
//!
//! All business entities are defined here, together with the balance fold.
//! These are pure data structures and pure computation - no I/O or external
//! dependencies.

mod statement;
mod user;
pub mod balance;
pub mod result;

pub use balance::{net_balance, BalanceReport};
pub use statement::{OperationType, Statement};
pub use user::User;
