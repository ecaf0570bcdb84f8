//! Family membership endpoints (admin-only mutations).

use std::collections::HashMap;

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::Utc;
use engine::EngineError;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};
use uuid::Uuid;

use api_types::family::{MemberCreated, MemberNew, MembersResponse};

use crate::{ServerError, server::ServerState, user, views};

pub async fn list(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
) -> Result<Json<MembersResponse>, ServerError> {
    let family_id = state
        .engine
        .family_membership(&user.username)
        .await?
        .map(|m| m.family_id);

    let members = state.engine.family_members(&user.username).await?;

    // Denormalized profile data from the member accounts.
    let usernames: Vec<&str> = members.iter().map(|m| m.user_id.as_str()).collect();
    let mut profiles: HashMap<String, user::Model> = user::Entity::find()
        .filter(user::Column::Username.is_in(usernames))
        .all(&state.db)
        .await
        .map_err(EngineError::from)?
        .into_iter()
        .map(|account| (account.username.clone(), account))
        .collect();

    let members = members
        .into_iter()
        .map(|member| {
            let profile = profiles.remove(&member.user_id);
            views::member_view(member, profile)
        })
        .collect();

    Ok(Json(MembersResponse { family_id, members }))
}

pub async fn create(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<MemberNew>,
) -> Result<(StatusCode, Json<MemberCreated>), ServerError> {
    // The new member must be a provisioned account.
    let exists = user::Entity::find()
        .filter(user::Column::Username.eq(payload.username.as_str()))
        .one(&state.db)
        .await
        .map_err(EngineError::from)?;
    if exists.is_none() {
        return Err(ServerError::Generic("user not found".to_string()));
    }

    let id = state
        .engine
        .add_family_member(
            &user.username,
            &payload.username,
            &payload.nickname,
            views::role_from(payload.role),
            Utc::now(),
        )
        .await?;

    Ok((StatusCode::CREATED, Json(MemberCreated { id })))
}

pub async fn remove(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state
        .engine
        .remove_family_member(id, &user.username)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
