//! Budget caps per expense category.

use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, Period, ResultEngine};

/// A spending cap for one category name.
///
/// The budget itself is not time-scoped: "spent" is computed against the
/// whole expense history for the category (see `stats::budget_status`).
/// `period` is stored and returned untouched.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Budget {
    pub id: Uuid,
    pub category: String,
    pub amount_minor: i64,
    pub period: Period,
    pub user_id: String,
}

impl Budget {
    /// Zero or negative caps are rejected here so the status math never
    /// divides by zero for stored budgets.
    pub fn new(
        category: String,
        amount_minor: i64,
        period: Period,
        user_id: String,
    ) -> ResultEngine<Self> {
        if amount_minor <= 0 {
            return Err(EngineError::InvalidAmount(
                "amount_minor must be > 0".to_string(),
            ));
        }
        Ok(Self {
            id: Uuid::new_v4(),
            category,
            amount_minor,
            period,
            user_id,
        })
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "budgets")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub category: String,
    pub amount_minor: i64,
    pub period: String,
    pub user_id: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Budget> for ActiveModel {
    fn from(budget: &Budget) -> Self {
        Self {
            id: ActiveValue::Set(budget.id.to_string()),
            category: ActiveValue::Set(budget.category.clone()),
            amount_minor: ActiveValue::Set(budget.amount_minor),
            period: ActiveValue::Set(budget.period.as_str().to_string()),
            user_id: ActiveValue::Set(budget.user_id.clone()),
        }
    }
}

impl TryFrom<Model> for Budget {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: Uuid::parse_str(&model.id)
                .map_err(|_| EngineError::KeyNotFound("budget not exists".to_string()))?,
            category: model.category,
            amount_minor: model.amount_minor,
            period: Period::try_from(model.period.as_str())?,
            user_id: model.user_id,
        })
    }
}
