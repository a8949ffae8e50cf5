//! Balance service - folds a user's statements into a report

use std::sync::Arc;

use uuid::Uuid;

use crate::domain::result::{Error, Result};
use crate::domain::BalanceReport;
use crate::ports::{StatementStore, UserStore};

/// Balance service - read-only balance reporting
pub struct BalanceService {
    users: Arc<dyn UserStore>,
    statements: Arc<dyn StatementStore>,
}

impl BalanceService {
    pub fn new(users: Arc<dyn UserStore>, statements: Arc<dyn StatementStore>) -> Self {
        Self { users, statements }
    }

    /// Compute the user's balance and return the statements behind it
    ///
    /// The fold runs over the full statement list on every call; there is
    /// no cached running total to drift out of date. Read-only, so it
    /// takes no per-user lock.
    pub async fn balance_for(&self, user_id: Uuid) -> Result<BalanceReport> {
        if self.users.find_by_id(user_id).await?.is_none() {
            return Err(Error::UserNotFound);
        }

        let statements = self.statements.find_all_by_user(user_id).await?;
        Ok(BalanceReport::from_statements(statements))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{InMemoryStatementStore, InMemoryUserStore};
    use crate::domain::{OperationType, Statement, User};
    use rust_decimal::Decimal;

    async fn setup() -> (BalanceService, Arc<InMemoryStatementStore>, Uuid) {
        let users = Arc::new(InMemoryUserStore::new());
        let user = User::new("Alice", "alice@example.com", "hash");
        users.save_user(&user).await.unwrap();

        let statements = Arc::new(InMemoryStatementStore::new());
        let service = BalanceService::new(users, Arc::clone(&statements) as Arc<dyn StatementStore>);
        (service, statements, user.id)
    }

    #[tokio::test]
    async fn test_empty_ledger_reports_zero() {
        let (service, _, user_id) = setup().await;

        let report = service.balance_for(user_id).await.unwrap();

        assert_eq!(report.balance, Decimal::ZERO);
        assert!(report.statements.is_empty());
    }

    #[tokio::test]
    async fn test_balance_is_sum_of_operations() {
        let (service, statements, user_id) = setup().await;

        let entries = [
            (OperationType::Deposit, Decimal::new(10000, 2)),  // +100.00
            (OperationType::Withdraw, Decimal::new(5000, 2)),  // -50.00
            (OperationType::Deposit, Decimal::new(2550, 2)),   // +25.50
        ];
        for (operation, amount) in entries {
            statements
                .save_statement(&Statement::new(user_id, operation, amount, "entry"))
                .await
                .unwrap();
        }

        let report = service.balance_for(user_id).await.unwrap();

        assert_eq!(report.balance, Decimal::new(7550, 2)); // 75.50
        assert_eq!(report.statements.len(), 3);
    }

    #[tokio::test]
    async fn test_report_preserves_insertion_order() {
        let (service, statements, user_id) = setup().await;

        let first = Statement::new(
            user_id,
            OperationType::Deposit,
            Decimal::new(100, 2),
            "first",
        );
        let second = Statement::new(
            user_id,
            OperationType::Deposit,
            Decimal::new(200, 2),
            "second",
        );
        statements.save_statement(&first).await.unwrap();
        statements.save_statement(&second).await.unwrap();

        let report = service.balance_for(user_id).await.unwrap();

        assert_eq!(report.statements[0].id, first.id);
        assert_eq!(report.statements[1].id, second.id);
    }

    #[tokio::test]
    async fn test_balance_for_unknown_user() {
        let (service, _, _) = setup().await;

        let err = service.balance_for(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, Error::UserNotFound));
    }
}
