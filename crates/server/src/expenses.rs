//! Expense CRUD endpoints.

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use uuid::Uuid;

use api_types::{
    ListQuery,
    expense::{ExpenseCreated, ExpenseUpsert, ExpensesResponse},
};

use crate::{ServerError, listing, server::ServerState, user, views};

pub async fn list(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<ExpensesResponse>, ServerError> {
    let expenses = state.engine.list_expenses(&user.username).await?;
    let expenses = listing::apply(expenses, &query)?
        .into_iter()
        .map(views::expense_view)
        .collect();

    Ok(Json(ExpensesResponse { expenses }))
}

pub async fn create(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<ExpenseUpsert>,
) -> Result<(StatusCode, Json<ExpenseCreated>), ServerError> {
    let id = state
        .engine
        .new_expense(
            &payload.title,
            payload.amount_minor,
            &payload.category,
            payload.date,
            payload.description.as_deref(),
            views::scope_from(payload.paid_by),
            &user.username,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(ExpenseCreated { id })))
}

pub async fn update(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ExpenseUpsert>,
) -> Result<StatusCode, ServerError> {
    state
        .engine
        .update_expense(
            id,
            &user.username,
            &payload.title,
            payload.amount_minor,
            &payload.category,
            payload.date,
            payload.description.as_deref(),
            views::scope_from(payload.paid_by),
        )
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn remove(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_expense(id, &user.username).await?;
    Ok(StatusCode::NO_CONTENT)
}
