//! Session handler - email/password login

use axum::extract::State;
use axum::Json;
use serde::Deserialize;

use passbook_core::services::AuthenticatedSession;

use crate::error::ApiError;

use super::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateSessionRequest {
    pub email: String,
    pub password: String,
}

/// POST /api/v1/sessions
pub async fn create(
    State(state): State<AppState>,
    Json(body): Json<CreateSessionRequest>,
) -> Result<Json<AuthenticatedSession>, ApiError> {
    let session = state
        .context
        .auth_service
        .authenticate(&body.email, &body.password)
        .await?;

    Ok(Json(session))
}
