//! Tithe and tithe-goal endpoints.

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use uuid::Uuid;

use api_types::tithe::{
    TitheCreated, TitheGoalCreated, TitheGoalNew, TitheGoalsResponse, TitheUpsert, TithesResponse,
};

use crate::{ServerError, server::ServerState, user, views};

pub async fn list(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
) -> Result<Json<TithesResponse>, ServerError> {
    let tithes = state
        .engine
        .list_tithes(&user.username)
        .await?
        .into_iter()
        .map(views::tithe_view)
        .collect();

    Ok(Json(TithesResponse { tithes }))
}

pub async fn create(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<TitheUpsert>,
) -> Result<(StatusCode, Json<TitheCreated>), ServerError> {
    let id = state
        .engine
        .new_tithe(
            payload.amount_minor,
            payload.date,
            payload.description.as_deref(),
            &payload.recipient,
            &user.username,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(TitheCreated { id })))
}

pub async fn update(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<TitheUpsert>,
) -> Result<StatusCode, ServerError> {
    state
        .engine
        .update_tithe(
            id,
            &user.username,
            payload.amount_minor,
            payload.date,
            payload.description.as_deref(),
            &payload.recipient,
        )
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn remove(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_tithe(id, &user.username).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_goals(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
) -> Result<Json<TitheGoalsResponse>, ServerError> {
    let goals = state
        .engine
        .list_tithe_goals(&user.username)
        .await?
        .into_iter()
        .map(views::tithe_goal_view)
        .collect();

    Ok(Json(TitheGoalsResponse { goals }))
}

/// Creates a goal; activating one deactivates every other goal so at most
/// one is active per user.
pub async fn create_goal(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<TitheGoalNew>,
) -> Result<(StatusCode, Json<TitheGoalCreated>), ServerError> {
    if payload.is_active {
        state.engine.deactivate_tithe_goals(&user.username).await?;
    }

    let id = state
        .engine
        .new_tithe_goal(
            payload.target_percentage,
            views::period_from(payload.period),
            payload.is_active,
            &user.username,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(TitheGoalCreated { id })))
}

pub async fn remove_goal(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_tithe_goal(id, &user.username).await?;
    Ok(StatusCode::NO_CONTENT)
}
