//! Category registry endpoints.
//!
//! Listing serves the built-in set while the user has none stored of the
//! requested kind; the defaults are not persisted.

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use uuid::Uuid;

use api_types::category::{
    CategoriesResponse, CategoryCreated, CategoryListQuery, CategoryNew, CategoryUpdate,
};
use engine::{CategoryKind, default_expense_categories, default_income_categories};

use crate::{ServerError, server::ServerState, user, views};

pub async fn list(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Query(query): Query<CategoryListQuery>,
) -> Result<Json<CategoriesResponse>, ServerError> {
    let kind = views::kind_from(query.kind.unwrap_or_default());

    let stored = state.engine.list_categories(&user.username, kind).await?;
    let (categories, defaults) = if stored.is_empty() {
        let built_in = match kind {
            CategoryKind::Expense => default_expense_categories(&user.username),
            CategoryKind::Income => default_income_categories(&user.username),
        };
        (built_in, true)
    } else {
        (stored, false)
    };

    Ok(Json(CategoriesResponse {
        categories: categories.into_iter().map(views::category_view).collect(),
        defaults,
    }))
}

pub async fn create(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<CategoryNew>,
) -> Result<(StatusCode, Json<CategoryCreated>), ServerError> {
    let id = state
        .engine
        .new_category(
            &payload.name,
            &payload.color,
            &payload.icon,
            views::kind_from(payload.kind),
            &user.username,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(CategoryCreated { id })))
}

pub async fn update(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<CategoryUpdate>,
) -> Result<StatusCode, ServerError> {
    state
        .engine
        .update_category(id, &user.username, &payload.name, &payload.color, &payload.icon)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn remove(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_category(id, &user.username).await?;
    Ok(StatusCode::NO_CONTENT)
}
