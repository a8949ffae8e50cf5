//! Statement domain model

use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::result::Error;

/// Kind of balance-affecting event a statement records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationType {
    Deposit,
    Withdraw,
}

impl OperationType {
    /// Storage name, identical to the wire name
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Deposit => "deposit",
            Self::Withdraw => "withdraw",
        }
    }
}

impl FromStr for OperationType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "deposit" => Ok(Self::Deposit),
            "withdraw" => Ok(Self::Withdraw),
            other => Err(Error::database(format!("unknown operation type: {other}"))),
        }
    }
}

/// A single deposit or withdrawal entry in a user's passbook
///
/// Serialized with the operation under the `type` key to match the wire
/// contract. Statements are append-only: never mutated or deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Statement {
    pub id: Uuid,
    pub user_id: Uuid,
    #[serde(rename = "type")]
    pub operation: OperationType,
    pub amount: Decimal,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Statement {
    /// Create a new statement with a fresh id
    ///
    /// The created and updated stamps start equal and stay equal, since
    /// statements are never edited in place.
    pub fn new(
        user_id: Uuid,
        operation: OperationType,
        amount: Decimal,
        description: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id,
            operation,
            amount,
            description: description.into(),
            created_at: now,
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_statement_creation() {
        let user_id = Uuid::new_v4();
        let statement = Statement::new(
            user_id,
            OperationType::Deposit,
            Decimal::new(10000, 2), // 100.00
            "salary",
        );

        assert_eq!(statement.user_id, user_id);
        assert_eq!(statement.operation, OperationType::Deposit);
        assert_eq!(statement.created_at, statement.updated_at);
    }

    #[test]
    fn test_operation_serializes_under_type_key() {
        let statement = Statement::new(
            Uuid::new_v4(),
            OperationType::Withdraw,
            Decimal::new(5000, 2), // 50.00
            "rent",
        );
        let json = serde_json::to_value(&statement).unwrap();

        assert_eq!(json["type"], "withdraw");
        assert_eq!(json["amount"], "50.00");
        assert!(json.get("operation").is_none());
    }

    #[test]
    fn test_operation_type_round_trip() {
        assert_eq!(
            "deposit".parse::<OperationType>().unwrap(),
            OperationType::Deposit
        );
        assert_eq!(
            "withdraw".parse::<OperationType>().unwrap(),
            OperationType::Withdraw
        );
        assert!("transfer".parse::<OperationType>().is_err());
    }
}
