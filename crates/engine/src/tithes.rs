//! Tithe records: charitable giving tracked outside the expense collection.

use chrono::NaiveDate;
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, ResultEngine, transactions::Entry};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Tithe {
    pub id: Uuid,
    pub amount_minor: i64,
    pub date: NaiveDate,
    pub description: Option<String>,
    pub recipient: String,
    pub user_id: String,
}

impl Tithe {
    pub fn new(
        amount_minor: i64,
        date: NaiveDate,
        description: Option<String>,
        recipient: String,
        user_id: String,
    ) -> ResultEngine<Self> {
        if amount_minor <= 0 {
            return Err(EngineError::InvalidAmount(
                "amount_minor must be > 0".to_string(),
            ));
        }
        Ok(Self {
            id: Uuid::new_v4(),
            amount_minor,
            date,
            description,
            recipient,
            user_id,
        })
    }
}

impl Entry for Tithe {
    fn amount_minor(&self) -> i64 {
        self.amount_minor
    }

    fn date(&self) -> NaiveDate {
        self.date
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "tithes")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub amount_minor: i64,
    pub date: Date,
    pub description: Option<String>,
    pub recipient: String,
    pub user_id: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Tithe> for ActiveModel {
    fn from(tithe: &Tithe) -> Self {
        Self {
            id: ActiveValue::Set(tithe.id.to_string()),
            amount_minor: ActiveValue::Set(tithe.amount_minor),
            date: ActiveValue::Set(tithe.date),
            description: ActiveValue::Set(tithe.description.clone()),
            recipient: ActiveValue::Set(tithe.recipient.clone()),
            user_id: ActiveValue::Set(tithe.user_id.clone()),
        }
    }
}

impl TryFrom<Model> for Tithe {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: Uuid::parse_str(&model.id)
                .map_err(|_| EngineError::KeyNotFound("tithe not exists".to_string()))?,
            amount_minor: model.amount_minor,
            date: model.date,
            description: model.description,
            recipient: model.recipient,
            user_id: model.user_id,
        })
    }
}
