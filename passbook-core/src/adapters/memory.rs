//! In-memory store implementation
//!
//! Backs tests and ephemeral mode: a plain Vec per entity behind a std
//! mutex. Append order doubles as insertion order, which is all the
//! statement port requires.

use std::sync::Mutex;

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::result::{Error, Result};
use crate::domain::{Statement, User};
use crate::ports::{StatementStore, UserStore};

/// In-memory user store
#[derive(Default)]
pub struct InMemoryUserStore {
    users: Mutex<Vec<User>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn save_user(&self, user: &User) -> Result<()> {
        let mut users = self.users.lock().unwrap();
        // Same uniqueness behavior as the durable store's constraint
        if users.iter().any(|u| u.email == user.email) {
            return Err(Error::EmailAlreadyInUse);
        }
        users.push(user.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>> {
        let users = self.users.lock().unwrap();
        Ok(users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let users = self.users.lock().unwrap();
        Ok(users.iter().find(|u| u.email == email).cloned())
    }
}

/// In-memory statement store
#[derive(Default)]
pub struct InMemoryStatementStore {
    statements: Mutex<Vec<Statement>>,
}

impl InMemoryStatementStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl StatementStore for InMemoryStatementStore {
    async fn save_statement(&self, statement: &Statement) -> Result<()> {
        let mut statements = self.statements.lock().unwrap();
        statements.push(statement.clone());
        Ok(())
    }

    async fn find_for_user(
        &self,
        statement_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<Statement>> {
        let statements = self.statements.lock().unwrap();
        Ok(statements
            .iter()
            .find(|s| s.id == statement_id && s.user_id == user_id)
            .cloned())
    }

    async fn find_all_by_user(&self, user_id: Uuid) -> Result<Vec<Statement>> {
        let statements = self.statements.lock().unwrap();
        Ok(statements
            .iter()
            .filter(|s| s.user_id == user_id)
            .cloned()
            .collect())
    }
}
