//! Family membership: who belongs to a household and with which role.
//!
//! Admin members may create further members under the same `family_id`.
//! Ownership of records never moves: membership only widens what the
//! household views aggregate over.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::EngineError;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FamilyRole {
    Admin,
    #[default]
    User,
}

impl FamilyRole {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::User => "user",
        }
    }
}

impl TryFrom<&str> for FamilyRole {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "admin" => Ok(Self::Admin),
            "user" => Ok(Self::User),
            other => Err(EngineError::InvalidField(format!(
                "invalid family role: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FamilyMember {
    pub id: Uuid,
    pub family_id: String,
    pub user_id: String,
    pub role: FamilyRole,
    pub nickname: String,
    pub created_by: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl FamilyMember {
    pub fn new(
        family_id: String,
        user_id: String,
        role: FamilyRole,
        nickname: String,
        created_by: Option<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            family_id,
            user_id,
            role,
            nickname,
            created_by,
            created_at,
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "family_members")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub family_id: String,
    pub user_id: String,
    pub role: String,
    pub nickname: String,
    pub created_by: Option<String>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&FamilyMember> for ActiveModel {
    fn from(member: &FamilyMember) -> Self {
        Self {
            id: ActiveValue::Set(member.id.to_string()),
            family_id: ActiveValue::Set(member.family_id.clone()),
            user_id: ActiveValue::Set(member.user_id.clone()),
            role: ActiveValue::Set(member.role.as_str().to_string()),
            nickname: ActiveValue::Set(member.nickname.clone()),
            created_by: ActiveValue::Set(member.created_by.clone()),
            created_at: ActiveValue::Set(member.created_at),
        }
    }
}

impl TryFrom<Model> for FamilyMember {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: Uuid::parse_str(&model.id)
                .map_err(|_| EngineError::KeyNotFound("family member not exists".to_string()))?,
            family_id: model.family_id,
            user_id: model.user_id,
            role: FamilyRole::try_from(model.role.as_str())?,
            nickname: model.nickname,
            created_by: model.created_by,
            created_at: model.created_at,
        })
    }
}
