//! Giving-percentage goals for tithes.
//!
//! At most one goal should be active at a time. That is a caller
//! convention: the data layer stores whatever it is given and the server
//! deactivates the others when a new active goal is created.

use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, Period, ResultEngine};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TitheGoal {
    pub id: Uuid,
    pub target_percentage: f64,
    pub period: Period,
    pub is_active: bool,
    pub user_id: String,
}

impl TitheGoal {
    pub fn new(
        target_percentage: f64,
        period: Period,
        is_active: bool,
        user_id: String,
    ) -> ResultEngine<Self> {
        if !(target_percentage > 0.0 && target_percentage <= 100.0) {
            return Err(EngineError::InvalidPercentage(
                "target_percentage must be in (0, 100]".to_string(),
            ));
        }
        Ok(Self {
            id: Uuid::new_v4(),
            target_percentage,
            period,
            is_active,
            user_id,
        })
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "tithe_goals")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub target_percentage: f64,
    pub period: String,
    pub is_active: bool,
    pub user_id: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&TitheGoal> for ActiveModel {
    fn from(goal: &TitheGoal) -> Self {
        Self {
            id: ActiveValue::Set(goal.id.to_string()),
            target_percentage: ActiveValue::Set(goal.target_percentage),
            period: ActiveValue::Set(goal.period.as_str().to_string()),
            is_active: ActiveValue::Set(goal.is_active),
            user_id: ActiveValue::Set(goal.user_id.clone()),
        }
    }
}

impl TryFrom<Model> for TitheGoal {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: Uuid::parse_str(&model.id)
                .map_err(|_| EngineError::KeyNotFound("tithe goal not exists".to_string()))?,
            target_percentage: model.target_percentage,
            period: Period::try_from(model.period.as_str())?,
            is_active: model.is_active,
            user_id: model.user_id,
        })
    }
}
