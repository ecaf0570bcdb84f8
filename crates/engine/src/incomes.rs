//! Income records. Mirrors [`Expense`](crate::Expense) with opposite sign
//! semantics in the aggregates (adds instead of subtracts).

use chrono::NaiveDate;
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    EngineError, ResultEngine, Scope,
    transactions::{Attributed, Categorized, Entry},
};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Income {
    pub id: Uuid,
    pub title: String,
    pub amount_minor: i64,
    pub category: String,
    pub date: NaiveDate,
    pub description: Option<String>,
    pub earned_by: Scope,
    pub user_id: String,
}

impl Income {
    pub fn new(
        title: String,
        amount_minor: i64,
        category: String,
        date: NaiveDate,
        description: Option<String>,
        earned_by: Scope,
        user_id: String,
    ) -> ResultEngine<Self> {
        if amount_minor <= 0 {
            return Err(EngineError::InvalidAmount(
                "amount_minor must be > 0".to_string(),
            ));
        }
        Ok(Self {
            id: Uuid::new_v4(),
            title,
            amount_minor,
            category,
            date,
            description,
            earned_by,
            user_id,
        })
    }
}

impl Entry for Income {
    fn amount_minor(&self) -> i64 {
        self.amount_minor
    }

    fn date(&self) -> NaiveDate {
        self.date
    }
}

impl Categorized for Income {
    fn category(&self) -> &str {
        &self.category
    }
}

impl Attributed for Income {
    fn scope(&self) -> Scope {
        self.earned_by
    }

    fn user_id(&self) -> &str {
        &self.user_id
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "incomes")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub title: String,
    pub amount_minor: i64,
    pub category: String,
    pub date: Date,
    pub description: Option<String>,
    pub earned_by: String,
    pub user_id: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Income> for ActiveModel {
    fn from(income: &Income) -> Self {
        Self {
            id: ActiveValue::Set(income.id.to_string()),
            title: ActiveValue::Set(income.title.clone()),
            amount_minor: ActiveValue::Set(income.amount_minor),
            category: ActiveValue::Set(income.category.clone()),
            date: ActiveValue::Set(income.date),
            description: ActiveValue::Set(income.description.clone()),
            earned_by: ActiveValue::Set(income.earned_by.as_str().to_string()),
            user_id: ActiveValue::Set(income.user_id.clone()),
        }
    }
}

impl TryFrom<Model> for Income {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: Uuid::parse_str(&model.id)
                .map_err(|_| EngineError::KeyNotFound("income not exists".to_string()))?,
            title: model.title,
            amount_minor: model.amount_minor,
            category: model.category,
            date: model.date,
            description: model.description,
            earned_by: Scope::try_from(model.earned_by.as_str())?,
            user_id: model.user_id,
        })
    }
}
