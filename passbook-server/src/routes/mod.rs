//! HTTP surface - shared state and router assembly

use std::sync::Arc;

use axum::middleware;
use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use passbook_core::PassbookContext;

use crate::auth::require_auth;

pub mod sessions;
pub mod statements;
pub mod users;

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub context: Arc<PassbookContext>,
}

/// Assemble the full API router
///
/// Everything under /api/v1 except registration and session creation sits
/// behind the bearer-token middleware.
pub fn build_router(context: PassbookContext) -> Router {
    let state = AppState {
        context: Arc::new(context),
    };

    let public = Router::new()
        .route("/api/v1/users", post(users::register))
        .route("/api/v1/sessions", post(sessions::create))
        .route("/health", get(health));

    let protected = Router::new()
        .route("/api/v1/profile", get(users::profile))
        .route("/api/v1/statements/deposit", post(statements::deposit))
        .route("/api/v1/statements/withdraw", post(statements::withdraw))
        .route("/api/v1/statements/balance", get(statements::balance))
        .route("/api/v1/statements/:statement_id", get(statements::show))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_auth,
        ));

    public
        .merge(protected)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Liveness probe
async fn health() -> &'static str {
    "OK"
}
