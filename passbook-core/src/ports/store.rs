//! Store ports - persistence abstraction

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::result::Result;
use crate::domain::{Statement, User};

/// User persistence abstraction
///
/// This trait defines all user storage operations. Implementations
/// (adapters) provide the actual storage; services depend only on the
/// trait, so the in-memory and DuckDB variants interchange freely.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Persist a new user
    async fn save_user(&self, user: &User) -> Result<()>;

    /// Look up a user by id
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>>;

    /// Look up a user by email
    async fn find_by_email(&self, email: &str) -> Result<Option<User>>;
}

/// Statement persistence abstraction
///
/// Statements are append-only, so the trait carries no update or delete.
#[async_trait]
pub trait StatementStore: Send + Sync {
    /// Persist a new statement
    async fn save_statement(&self, statement: &Statement) -> Result<()>;

    /// Look up one statement, scoped to its owner
    ///
    /// A statement that exists but belongs to a different user comes back
    /// as `None`, indistinguishable from one that never existed.
    async fn find_for_user(
        &self,
        statement_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<Statement>>;

    /// All statements for a user, in insertion order
    async fn find_all_by_user(&self, user_id: Uuid) -> Result<Vec<Statement>>;
}
