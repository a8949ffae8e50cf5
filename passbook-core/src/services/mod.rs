//! Service layer - business logic orchestration
//!
//! Services coordinate domain logic and port interactions. Each service
//! focuses on a specific use case or feature area.

pub mod auth;
mod balance;
pub mod migration;
mod statements;
mod users;

pub use auth::{AuthService, AuthenticatedSession, Claims, TokenIssuer};
pub use balance::BalanceService;
pub use migration::{MigrationResult, MigrationService};
pub use statements::StatementService;
pub use users::UserService;
