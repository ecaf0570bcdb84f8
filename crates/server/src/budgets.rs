//! Budget CRUD plus the status endpoint.

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use uuid::Uuid;

use api_types::budget::{BudgetCreated, BudgetStatusResponse, BudgetUpsert, BudgetsResponse};
use engine::stats;

use crate::{ServerError, server::ServerState, user, views};

pub async fn list(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
) -> Result<Json<BudgetsResponse>, ServerError> {
    let budgets = state
        .engine
        .list_budgets(&user.username)
        .await?
        .into_iter()
        .map(views::budget_view)
        .collect();

    Ok(Json(BudgetsResponse { budgets }))
}

pub async fn create(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<BudgetUpsert>,
) -> Result<(StatusCode, Json<BudgetCreated>), ServerError> {
    let id = state
        .engine
        .new_budget(
            &payload.category,
            payload.amount_minor,
            views::period_from(payload.period),
            &user.username,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(BudgetCreated { id })))
}

pub async fn update(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<BudgetUpsert>,
) -> Result<StatusCode, ServerError> {
    state
        .engine
        .update_budget(
            id,
            &user.username,
            &payload.category,
            payload.amount_minor,
            views::period_from(payload.period),
        )
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn remove(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_budget(id, &user.username).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Every budget compared against the whole expense history.
pub async fn status(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
) -> Result<Json<BudgetStatusResponse>, ServerError> {
    let budgets = state.engine.list_budgets(&user.username).await?;
    let expenses = state.engine.list_expenses(&user.username).await?;

    let statuses = stats::budget_status(&budgets, &expenses)
        .into_iter()
        .map(views::budget_status_view)
        .collect();

    Ok(Json(BudgetStatusResponse { statuses }))
}
