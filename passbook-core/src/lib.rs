//! Passbook Core - Business logic for the personal finance ledger
//!
//! This crate implements the core domain logic following hexagonal architecture:
//!
//! - **domain**: Core business entities (User, Statement, BalanceReport)
//! - **ports**: Trait definitions for external dependencies (UserStore, StatementStore)
//! - **services**: Business logic orchestration
//! - **adapters**: Concrete implementations (DuckDB, in-memory)

pub mod domain;
pub mod ports;
pub mod services;
pub mod adapters;
pub mod config;
pub mod migrations;

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;

use adapters::DuckDbStore;
use config::Config;
use ports::{StatementStore, UserStore};
use services::*;

// Re-export commonly used types at crate root
pub use domain::result::Error;
pub use domain::{net_balance, BalanceReport, OperationType, Statement, User};

/// Database filename inside the data directory
pub const DB_FILENAME: &str = "passbook.duckdb";

/// Main context for Passbook operations
///
/// This is the primary entry point for all business logic. It holds the
/// configuration, the token issuer, and all services.
pub struct PassbookContext {
    pub config: Config,
    pub token_issuer: Arc<TokenIssuer>,
    pub user_service: UserService,
    pub auth_service: AuthService,
    pub statement_service: StatementService,
    pub balance_service: BalanceService,
}

impl PassbookContext {
    /// Create a new Passbook context backed by the DuckDB store
    pub fn new(data_dir: &Path) -> Result<Self> {
        let config = Config::load(data_dir)?;

        let db_path = data_dir.join(DB_FILENAME);
        let store = Arc::new(DuckDbStore::new(&db_path)?);

        // Initialize schema
        store.ensure_schema()?;

        let users = Arc::clone(&store) as Arc<dyn UserStore>;
        let statements = store as Arc<dyn StatementStore>;

        Ok(Self::assemble(config, users, statements))
    }

    /// Create a context over explicit stores
    ///
    /// Used by tests and anywhere a durable database is unwanted.
    pub fn with_stores(
        config: Config,
        users: Arc<dyn UserStore>,
        statements: Arc<dyn StatementStore>,
    ) -> Self {
        Self::assemble(config, users, statements)
    }

    fn assemble(
        config: Config,
        users: Arc<dyn UserStore>,
        statements: Arc<dyn StatementStore>,
    ) -> Self {
        let token_issuer = Arc::new(TokenIssuer::new(&config.jwt_secret, config.token_ttl_secs));

        let user_service = UserService::new(Arc::clone(&users));
        let auth_service = AuthService::new(Arc::clone(&users), Arc::clone(&token_issuer));
        let statement_service = StatementService::new(Arc::clone(&users), Arc::clone(&statements));
        let balance_service = BalanceService::new(users, statements);

        Self {
            config,
            token_issuer,
            user_service,
            auth_service,
            statement_service,
            balance_service,
        }
    }
}
