//! Expense records.

use chrono::NaiveDate;
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    EngineError, ResultEngine, Scope,
    transactions::{Attributed, Categorized, Entry},
};

/// A logged cost, owned by the household member who recorded it.
///
/// `category` is a free-text name resolved against the category collection
/// at display time, never a foreign key.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    pub id: Uuid,
    pub title: String,
    pub amount_minor: i64,
    pub category: String,
    pub date: NaiveDate,
    pub description: Option<String>,
    pub paid_by: Scope,
    pub user_id: String,
}

impl Expense {
    pub fn new(
        title: String,
        amount_minor: i64,
        category: String,
        date: NaiveDate,
        description: Option<String>,
        paid_by: Scope,
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
            paid_by,
            user_id,
        })
    }
}

impl Entry for Expense {
    fn amount_minor(&self) -> i64 {
        self.amount_minor
    }

    fn date(&self) -> NaiveDate {
        self.date
    }
}

impl Categorized for Expense {
    fn category(&self) -> &str {
        &self.category
    }
}

impl Attributed for Expense {
    fn scope(&self) -> Scope {
        self.paid_by
    }

    fn user_id(&self) -> &str {
        &self.user_id
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "expenses")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub title: String,
    pub amount_minor: i64,
    pub category: String,
    pub date: Date,
    pub description: Option<String>,
    pub paid_by: String,
    pub user_id: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Expense> for ActiveModel {
    fn from(expense: &Expense) -> Self {
        Self {
            id: ActiveValue::Set(expense.id.to_string()),
            title: ActiveValue::Set(expense.title.clone()),
            amount_minor: ActiveValue::Set(expense.amount_minor),
            category: ActiveValue::Set(expense.category.clone()),
            date: ActiveValue::Set(expense.date),
            description: ActiveValue::Set(expense.description.clone()),
            paid_by: ActiveValue::Set(expense.paid_by.as_str().to_string()),
            user_id: ActiveValue::Set(expense.user_id.clone()),
        }
    }
}

impl TryFrom<Model> for Expense {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: Uuid::parse_str(&model.id)
                .map_err(|_| EngineError::KeyNotFound("expense not exists".to_string()))?,
            title: model.title,
            amount_minor: model.amount_minor,
            category: model.category,
            date: model.date,
            description: model.description,
            paid_by: Scope::try_from(model.paid_by.as_str())?,
            user_id: model.user_id,
        })
    }
}
