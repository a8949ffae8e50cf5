//! User handlers - registration and profile

use axum::extract::State;
use axum::http::StatusCode;
use axum::{Extension, Json};
use serde::Deserialize;

use passbook_core::{Error, User};

use crate::auth::AuthUser;
use crate::error::ApiError;

use super::AppState;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// POST /api/v1/users
pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<User>), ApiError> {
    if body.name.trim().is_empty() || body.email.trim().is_empty() || body.password.is_empty() {
        return Err(Error::validation("name, email and password are required").into());
    }

    let user = state
        .context
        .user_service
        .register(&body.name, &body.email, &body.password)
        .await?;

    Ok((StatusCode::CREATED, Json(user)))
}

/// GET /api/v1/profile
pub async fn profile(
    State(state): State<AppState>,
    Extension(AuthUser(user_id)): Extension<AuthUser>,
) -> Result<Json<User>, ApiError> {
    let user = state.context.user_service.profile(user_id).await?;
    Ok(Json(user))
}
