//! Statement service - the ledger's write path and single-record lookup
//!
//! Creating a statement is check-then-write: load the user, for a
//! withdrawal fold the existing statements into a balance and reject
//! overdrafts, then persist. The whole region runs under a per-user async
//! lock so concurrent creates for one user serialize; without it two
//! withdrawals could both pass the funds check against the same balance.

use std::collections::HashMap;
use std::sync::{Arc, Mutex as StdMutex};

use rust_decimal::Decimal;
use tokio::sync::Mutex as AsyncMutex;
use uuid::Uuid;

use crate::domain::result::{Error, Result};
use crate::domain::{net_balance, OperationType, Statement};
use crate::ports::{StatementStore, UserStore};

/// Statement service - deposits, withdrawals and owner-scoped lookup
pub struct StatementService {
    users: Arc<dyn UserStore>,
    statements: Arc<dyn StatementStore>,
    user_locks: StdMutex<HashMap<Uuid, Arc<AsyncMutex<()>>>>,
}

impl StatementService {
    pub fn new(users: Arc<dyn UserStore>, statements: Arc<dyn StatementStore>) -> Self {
        Self {
            users,
            statements,
            user_locks: StdMutex::new(HashMap::new()),
        }
    }

    /// Record a deposit for the user
    pub async fn deposit(
        &self,
        user_id: Uuid,
        amount: Decimal,
        description: &str,
    ) -> Result<Statement> {
        self.create(user_id, OperationType::Deposit, amount, description)
            .await
    }

    /// Record a withdrawal, rejecting anything the balance cannot cover
    pub async fn withdraw(
        &self,
        user_id: Uuid,
        amount: Decimal,
        description: &str,
    ) -> Result<Statement> {
        self.create(user_id, OperationType::Withdraw, amount, description)
            .await
    }

    /// Fetch one statement, scoped to its owner
    ///
    /// A statement that exists but belongs to someone else looks exactly
    /// like one that does not exist.
    pub async fn statement_for(&self, user_id: Uuid, statement_id: Uuid) -> Result<Statement> {
        if self.users.find_by_id(user_id).await?.is_none() {
            return Err(Error::UserNotFound);
        }

        self.statements
            .find_for_user(statement_id, user_id)
            .await?
            .ok_or(Error::StatementNotFound)
    }

    async fn create(
        &self,
        user_id: Uuid,
        operation: OperationType,
        amount: Decimal,
        description: &str,
    ) -> Result<Statement> {
        if amount < Decimal::ZERO {
            return Err(Error::validation("amount must not be negative"));
        }

        // Serialize all creates for this user: the funds check below is
        // only sound if no other write lands between the fold and the save.
        let lock = self.lock_for(user_id);
        let _guard = lock.lock().await;

        if self.users.find_by_id(user_id).await?.is_none() {
            return Err(Error::UserNotFound);
        }

        if operation == OperationType::Withdraw {
            let existing = self.statements.find_all_by_user(user_id).await?;
            let balance = net_balance(&existing);
            if amount > balance {
                tracing::debug!(%user_id, %amount, %balance, "withdrawal rejected");
                return Err(Error::InsufficientFunds);
            }
        }

        let statement = Statement::new(user_id, operation, amount, description);
        self.statements.save_statement(&statement).await?;
        tracing::info!(
            statement_id = %statement.id,
            %user_id,
            operation = operation.as_str(),
            %amount,
            "statement recorded"
        );

        Ok(statement)
    }

    /// One async mutex per user id, created on first use and retained for
    /// the process lifetime (bounded by the number of distinct users).
    fn lock_for(&self, user_id: Uuid) -> Arc<AsyncMutex<()>> {
        let mut locks = self.user_locks.lock().unwrap();
        Arc::clone(locks.entry(user_id).or_default())
    }
}
