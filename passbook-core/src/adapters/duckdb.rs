//! DuckDB store implementation

use std::path::Path;
use std::sync::Mutex;
use std::thread;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use duckdb::{params, Connection};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::domain::result::{Error, Result};
use crate::domain::{Statement, User};
use crate::ports::{StatementStore, UserStore};
use crate::services::{MigrationResult, MigrationService};

/// Maximum number of retries when the database file is locked
const MAX_RETRIES: u32 = 5;

/// Initial retry delay in milliseconds (doubles each retry: 50, 100, 200, 400, 800ms)
const INITIAL_RETRY_DELAY_MS: u64 = 50;

/// Check if an error message indicates a file locking issue that should be retried
fn is_retryable_error(err_msg: &str) -> bool {
    let lower = err_msg.to_lowercase();
    // Windows error messages
    lower.contains("being used by another process")
        || lower.contains("cannot access the file")
        // Unix/macOS error messages
        || lower.contains("resource temporarily unavailable")
        || lower.contains("database is locked")
        || lower.contains("file is already open")
}

/// DuckDB implementation of both store ports
///
/// A single connection behind a mutex serves all operations. The lock is
/// never held across an await point: each method locks, runs its statements
/// synchronously, and releases.
pub struct DuckDbStore {
    conn: Mutex<Connection>,
}

impl DuckDbStore {
    /// Open (or create) the database file
    ///
    /// Includes retry logic with exponential backoff for file locking
    /// errors, which can occur when another process still holds the file
    /// during a restart.
    pub fn new(db_path: &Path) -> Result<Self> {
        let mut last_error = None;

        for attempt in 0..MAX_RETRIES {
            match Self::try_open_connection(db_path) {
                Ok(conn) => {
                    tracing::debug!(path = %db_path.display(), "database opened");
                    return Ok(Self {
                        conn: Mutex::new(conn),
                    });
                }
                Err(e) => {
                    let err_msg = e.to_string();
                    if is_retryable_error(&err_msg) && attempt < MAX_RETRIES - 1 {
                        let delay =
                            Duration::from_millis(INITIAL_RETRY_DELAY_MS * 2u64.pow(attempt));
                        tracing::warn!(
                            "database busy, retrying in {}ms (attempt {}/{}): {}",
                            delay.as_millis(),
                            attempt + 1,
                            MAX_RETRIES,
                            err_msg
                        );
                        thread::sleep(delay);
                        last_error = Some(e);
                        continue;
                    }
                    // Non-retryable error or max retries reached
                    return Err(e);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| {
            Error::database(format!("failed to open database after {MAX_RETRIES} retries"))
        }))
    }

    /// Attempt to open a database connection (called by new() with retry logic)
    fn try_open_connection(db_path: &Path) -> Result<Connection> {
        // Extension autoloading stays off; the json extension is statically
        // linked via the Cargo feature, nothing else is needed.
        let config = duckdb::Config::default().enable_autoload_extension(false)?;
        Ok(Connection::open_with_flags(db_path, config)?)
    }

    /// Run database migrations using the MigrationService
    pub fn run_migrations(&self) -> Result<MigrationResult> {
        let conn = self.conn.lock().unwrap();
        MigrationService::new(&conn)
            .run_pending()
            .map_err(|e| Error::database(e.to_string()))
    }

    /// Ensure database schema exists (runs pending migrations)
    pub fn ensure_schema(&self) -> Result<()> {
        self.run_migrations()?;
        Ok(())
    }
}

#[async_trait]
impl UserStore for DuckDbStore {
    async fn save_user(&self, user: &User) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        let result = conn.execute(
            "INSERT INTO users (id, name, email, password_hash, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?)",
            params![
                user.id.to_string(),
                user.name,
                user.email,
                user.password_hash,
                user.created_at.to_rfc3339(),
                user.updated_at.to_rfc3339(),
            ],
        );

        match result {
            Ok(_) => Ok(()),
            // The schema's UNIQUE constraint on email backstops the
            // service-level precheck under concurrent registration.
            Err(e) if e.to_string().contains("Duplicate key") => Err(Error::EmailAlreadyInUse),
            Err(e) => Err(e.into()),
        }
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT id, name, email, password_hash, created_at, updated_at
             FROM users WHERE id = ?",
        )?;

        match stmt.query_row([id.to_string()], |row| Ok(row_to_user(row))) {
            Ok(user) => Ok(user),
            Err(duckdb::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT id, name, email, password_hash, created_at, updated_at
             FROM users WHERE email = ?",
        )?;

        match stmt.query_row([email], |row| Ok(row_to_user(row))) {
            Ok(user) => Ok(user),
            Err(duckdb::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

#[async_trait]
impl StatementStore for DuckDbStore {
    async fn save_statement(&self, statement: &Statement) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        // Amount binds as text and is cast straight to DECIMAL, so money
        // never passes through a float. The seq column takes its value from
        // the sequence default and fixes the insertion order for reads.
        conn.execute(
            "INSERT INTO statements (id, user_id, operation_type, amount, description, created_at, updated_at)
             VALUES (?, ?, ?, CAST(? AS DECIMAL(18, 2)), ?, ?, ?)",
            params![
                statement.id.to_string(),
                statement.user_id.to_string(),
                statement.operation.as_str(),
                statement.amount.to_string(),
                statement.description,
                statement.created_at.to_rfc3339(),
                statement.updated_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    async fn find_for_user(
        &self,
        statement_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<Statement>> {
        let conn = self.conn.lock().unwrap();
        // Ownership scoping happens in the WHERE clause: a statement owned
        // by a different user is indistinguishable from a missing one.
        let mut stmt = conn.prepare(
            "SELECT id, user_id, operation_type, amount::VARCHAR, description, created_at, updated_at
             FROM statements WHERE id = ? AND user_id = ?",
        )?;

        match stmt.query_row(
            params![statement_id.to_string(), user_id.to_string()],
            |row| Ok(row_to_statement(row)),
        ) {
            Ok(statement) => Ok(statement),
            Err(duckdb::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn find_all_by_user(&self, user_id: Uuid) -> Result<Vec<Statement>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT id, user_id, operation_type, amount::VARCHAR, description, created_at, updated_at
             FROM statements WHERE user_id = ? ORDER BY seq",
        )?;

        let statements = stmt
            .query_map([user_id.to_string()], |row| Ok(row_to_statement(row)))?
            .filter_map(|r| r.ok().flatten())
            .collect();

        Ok(statements)
    }
}

// Helper functions

fn row_to_user(row: &duckdb::Row) -> Option<User> {
    let id_str: String = row.get(0).ok()?;
    let created_str: String = row.get(4).ok()?;
    let updated_str: String = row.get(5).ok()?;

    Some(User {
        id: Uuid::parse_str(&id_str).ok()?,
        name: row.get(1).ok()?,
        email: row.get(2).ok()?,
        password_hash: row.get(3).ok()?,
        created_at: parse_timestamp(&created_str),
        updated_at: parse_timestamp(&updated_str),
    })
}

fn row_to_statement(row: &duckdb::Row) -> Option<Statement> {
    let id_str: String = row.get(0).ok()?;
    let user_id_str: String = row.get(1).ok()?;
    let op_str: String = row.get(2).ok()?;
    let amount_str: String = row.get(3).ok()?;
    let created_str: String = row.get(5).ok()?;
    let updated_str: String = row.get(6).ok()?;

    Some(Statement {
        id: Uuid::parse_str(&id_str).ok()?,
        user_id: Uuid::parse_str(&user_id_str).ok()?,
        operation: op_str.parse().ok()?,
        amount: Decimal::from_str_exact(&amount_str).ok()?,
        description: row.get(4).ok()?,
        created_at: parse_timestamp(&created_str),
        updated_at: parse_timestamp(&updated_str),
    })
}

fn parse_timestamp(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::OperationType;
    use tempfile::TempDir;

    fn open_store(dir: &TempDir) -> DuckDbStore {
        let store = DuckDbStore::new(&dir.path().join("passbook.duckdb")).unwrap();
        store.ensure_schema().unwrap();
        store
    }

    fn sample_user(email: &str) -> User {
        User::new("Test User", email, "$argon2id$stub")
    }

    #[tokio::test]
    async fn test_user_round_trip() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir);

        let user = sample_user("round@example.com");
        store.save_user(&user).await.unwrap();

        let by_id = store.find_by_id(user.id).await.unwrap().unwrap();
        assert_eq!(by_id.id, user.id);
        assert_eq!(by_id.email, "round@example.com");
        assert_eq!(by_id.password_hash, user.password_hash);

        let by_email = store
            .find_by_email("round@example.com")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(by_email.id, user.id);

        assert!(store
            .find_by_email("missing@example.com")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_duplicate_email_maps_to_domain_error() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir);

        store
            .save_user(&sample_user("taken@example.com"))
            .await
            .unwrap();
        let err = store
            .save_user(&sample_user("taken@example.com"))
            .await
            .unwrap_err();

        assert!(
            matches!(err, Error::EmailAlreadyInUse),
            "expected EmailAlreadyInUse, got {err:?}"
        );
    }

    #[tokio::test]
    async fn test_statements_keep_insertion_order() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir);

        let user = sample_user("order@example.com");
        store.save_user(&user).await.unwrap();

        let mut ids = Vec::new();
        for i in 0..5 {
            let statement = Statement::new(
                user.id,
                OperationType::Deposit,
                Decimal::new(100 + i, 2),
                format!("deposit {i}"),
            );
            ids.push(statement.id);
            store.save_statement(&statement).await.unwrap();
        }

        let read_back = store.find_all_by_user(user.id).await.unwrap();
        let read_ids: Vec<_> = read_back.iter().map(|s| s.id).collect();
        assert_eq!(read_ids, ids, "statements must come back in insertion order");
    }

    #[tokio::test]
    async fn test_statement_lookup_is_ownership_scoped() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir);

        let owner = sample_user("owner@example.com");
        let stranger = sample_user("stranger@example.com");
        store.save_user(&owner).await.unwrap();
        store.save_user(&stranger).await.unwrap();

        let statement = Statement::new(
            owner.id,
            OperationType::Deposit,
            Decimal::new(10000, 2),
            "salary",
        );
        store.save_statement(&statement).await.unwrap();

        let found = store.find_for_user(statement.id, owner.id).await.unwrap();
        assert!(found.is_some());

        let hidden = store
            .find_for_user(statement.id, stranger.id)
            .await
            .unwrap();
        assert!(hidden.is_none(), "wrong owner must see nothing");
    }

    #[tokio::test]
    async fn test_amount_round_trips_exactly() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir);

        let user = sample_user("exact@example.com");
        store.save_user(&user).await.unwrap();

        for (unscaled, scale) in [(10i64, 2u32), (12_345_678, 2), (5, 1)] {
            let amount = Decimal::new(unscaled, scale);
            let statement =
                Statement::new(user.id, OperationType::Deposit, amount, "precision");
            store.save_statement(&statement).await.unwrap();

            let read_back = store
                .find_for_user(statement.id, user.id)
                .await
                .unwrap()
                .unwrap();
            assert_eq!(read_back.amount, amount, "amount must survive storage");
        }
    }
}
