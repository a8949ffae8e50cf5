//! Balance computation over a user's statements

use rust_decimal::Decimal;
use serde::Serialize;

use super::statement::{OperationType, Statement};

/// Fold a statement list into a net balance: deposits add, withdrawals
/// subtract.
///
/// The balance is always recomputed from the full list. There is no cached
/// running total anywhere in the system, so there is no second source of
/// truth to drift out of sync.
pub fn net_balance(statements: &[Statement]) -> Decimal {
    statements
        .iter()
        .fold(Decimal::ZERO, |acc, statement| match statement.operation {
            OperationType::Deposit => acc + statement.amount,
            OperationType::Withdraw => acc - statement.amount,
        })
}

/// A user's statements together with the balance they fold to
#[derive(Debug, Clone, Serialize)]
pub struct BalanceReport {
    pub statements: Vec<Statement>,
    pub balance: Decimal,
}

impl BalanceReport {
    /// Build a report by folding the given statements
    pub fn from_statements(statements: Vec<Statement>) -> Self {
        let balance = net_balance(&statements);
        Self {
            statements,
            balance,
        }
    }
}
