//! Bearer-token authentication middleware
//!
//! Protected routes run through `require_auth`, which verifies the JWT and
//! stashes the subject's user id in the request extensions. Handlers read
//! it back with `Extension<AuthUser>` and never see the raw token.

use axum::extract::{Request, State};
use axum::http::{header, StatusCode};
use axum::middleware::Next;
use axum::response::Response;
use uuid::Uuid;

use crate::error::message_response;
use crate::routes::AppState;

/// Authenticated user id for the current request
#[derive(Debug, Clone, Copy)]
pub struct AuthUser(pub Uuid);

/// Reject requests without a valid bearer token
pub async fn require_auth(State(state): State<AppState>, mut req: Request, next: Next) -> Response {
    let token = match bearer_token(&req) {
        Some(token) => token,
        None => {
            return message_response(StatusCode::UNAUTHORIZED, "Missing authentication token")
        }
    };

    let user_id = match state.context.token_issuer.verify(token) {
        Ok(user_id) => user_id,
        Err(e) => {
            tracing::debug!(error = %e, "token rejected");
            return message_response(StatusCode::UNAUTHORIZED, "Invalid authentication token");
        }
    };

    req.extensions_mut().insert(AuthUser(user_id));
    next.run(req).await
}

fn bearer_token(req: &Request) -> Option<&str> {
    req.headers()
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}
