//! Income CRUD endpoints.

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use uuid::Uuid;

use api_types::{
    ListQuery,
    income::{IncomeCreated, IncomeUpsert, IncomesResponse},
};

use crate::{ServerError, listing, server::ServerState, user, views};

pub async fn list(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<IncomesResponse>, ServerError> {
    let incomes = state.engine.list_incomes(&user.username).await?;
    let incomes = listing::apply(incomes, &query)?
        .into_iter()
        .map(views::income_view)
        .collect();

    Ok(Json(IncomesResponse { incomes }))
}

pub async fn create(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<IncomeUpsert>,
) -> Result<(StatusCode, Json<IncomeCreated>), ServerError> {
    let id = state
        .engine
        .new_income(
            &payload.title,
            payload.amount_minor,
            &payload.category,
            payload.date,
            payload.description.as_deref(),
            views::scope_from(payload.earned_by),
            &user.username,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(IncomeCreated { id })))
}

pub async fn update(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<IncomeUpsert>,
) -> Result<StatusCode, ServerError> {
    state
        .engine
        .update_income(
            id,
            &user.username,
            &payload.title,
            payload.amount_minor,
            &payload.category,
            payload.date,
            payload.description.as_deref(),
            views::scope_from(payload.earned_by),
        )
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn remove(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_income(id, &user.username).await?;
    Ok(StatusCode::NO_CONTENT)
}
