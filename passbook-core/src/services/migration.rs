//! Migration service - manages database schema migrations
//!
//! Migrations are SQL files embedded at compile time. Each applied
//! migration is recorded in the sys_migrations table so reruns are
//! idempotent.

use anyhow::Result;
use duckdb::Connection;

use crate::migrations::MIGRATIONS;

/// Result of running migrations
#[derive(Debug)]
pub struct MigrationResult {
    /// Names of newly applied migrations
    pub applied: Vec<String>,
    /// Count of migrations that were already applied
    pub already_applied: usize,
}

/// Service for managing database migrations
pub struct MigrationService<'a> {
    conn: &'a Connection,
}

impl<'a> MigrationService<'a> {
    /// Create a new migration service with a database connection
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Run all pending migrations in name order
    ///
    /// The first migration creates the tracking table itself, so a fresh
    /// database bootstraps simply by executing the list from the top.
    pub fn run_pending(&self) -> Result<MigrationResult> {
        let already = if self.tracking_table_exists()? {
            self.applied_names()?
        } else {
            Vec::new()
        };

        let mut applied = Vec::new();
        for (name, sql) in MIGRATIONS {
            if already.iter().any(|a| a == name) {
                continue;
            }
            self.conn.execute_batch(sql)?;
            self.record(name)?;
            applied.push((*name).to_string());
        }

        Ok(MigrationResult {
            applied,
            already_applied: already.len(),
        })
    }

    /// Check if sys_migrations exists yet
    fn tracking_table_exists(&self) -> Result<bool> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM information_schema.tables WHERE table_name = 'sys_migrations'",
            [],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    /// Names of already applied migrations
    fn applied_names(&self) -> Result<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT migration_name FROM sys_migrations ORDER BY migration_name")?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
        Ok(rows.filter_map(|r| r.ok()).collect())
    }

    /// Record a migration as applied
    fn record(&self, name: &str) -> Result<()> {
        self.conn.execute(
            "INSERT INTO sys_migrations (migration_name) VALUES (?)",
            [name],
        )?;
        Ok(())
    }
}
