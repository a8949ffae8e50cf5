//! Statement handlers - deposits, withdrawals, balance and lookup

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;

use passbook_core::{BalanceReport, Error, Statement};

use crate::auth::AuthUser;
use crate::error::ApiError;

use super::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateStatementRequest {
    pub amount: Decimal,
    pub description: String,
}

/// POST /api/v1/statements/deposit
pub async fn deposit(
    State(state): State<AppState>,
    Extension(AuthUser(user_id)): Extension<AuthUser>,
    Json(body): Json<CreateStatementRequest>,
) -> Result<(StatusCode, Json<Statement>), ApiError> {
    let statement = state
        .context
        .statement_service
        .deposit(user_id, body.amount, &body.description)
        .await?;

    Ok((StatusCode::CREATED, Json(statement)))
}

/// POST /api/v1/statements/withdraw
pub async fn withdraw(
    State(state): State<AppState>,
    Extension(AuthUser(user_id)): Extension<AuthUser>,
    Json(body): Json<CreateStatementRequest>,
) -> Result<(StatusCode, Json<Statement>), ApiError> {
    let statement = state
        .context
        .statement_service
        .withdraw(user_id, body.amount, &body.description)
        .await?;

    Ok((StatusCode::CREATED, Json(statement)))
}

/// GET /api/v1/statements/balance
pub async fn balance(
    State(state): State<AppState>,
    Extension(AuthUser(user_id)): Extension<AuthUser>,
) -> Result<Json<BalanceReport>, ApiError> {
    let report = state.context.balance_service.balance_for(user_id).await?;
    Ok(Json(report))
}

/// GET /api/v1/statements/:statement_id
pub async fn show(
    State(state): State<AppState>,
    Extension(AuthUser(user_id)): Extension<AuthUser>,
    Path(statement_id): Path<String>,
) -> Result<Json<Statement>, ApiError> {
    let statement_id = Uuid::parse_str(&statement_id)
        .map_err(|_| Error::validation("statement id must be a UUID"))?;

    let statement = state
        .context
        .statement_service
        .statement_for(user_id, statement_id)
        .await?;

    Ok(Json(statement))
}
