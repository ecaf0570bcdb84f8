//! Category registry and name resolution.
//!
//! Transactions reference categories by free-text name. Resolution builds a
//! lookup table once per computation pass instead of scattering
//! find-by-name calls; a missing name resolves to a fixed fallback, never
//! an error. Name uniqueness is a soft convention: duplicates are not
//! rejected and the first match wins.

use std::collections::HashMap;

use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::EngineError;

/// Color used when a transaction's category name has no match.
pub const FALLBACK_COLOR: &str = "#6b7280";
/// Icon used when a transaction's category name has no match.
pub const FALLBACK_ICON: &str = "MoreHorizontal";

/// Which of the two independent collections a category belongs to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryKind {
    #[default]
    Expense,
    Income,
}

impl CategoryKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Expense => "expense",
            Self::Income => "income",
        }
    }
}

impl TryFrom<&str> for CategoryKind {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "expense" => Ok(Self::Expense),
            "income" => Ok(Self::Income),
            other => Err(EngineError::InvalidField(format!(
                "invalid category kind: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    /// Hex color string, e.g. `#ef4444`.
    pub color: String,
    /// Symbolic icon name from the client's fixed icon set.
    pub icon: String,
    pub kind: CategoryKind,
    pub user_id: String,
}

impl Category {
    pub fn new(
        name: String,
        color: String,
        icon: String,
        kind: CategoryKind,
        user_id: String,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            color,
            icon,
            kind,
            user_id,
        }
    }
}

/// Display attributes a name resolved to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CategoryStyle<'a> {
    pub color: &'a str,
    pub icon: &'a str,
}

/// Name → category lookup table, built once per render/computation pass.
pub struct CategoryIndex<'a> {
    by_name: HashMap<&'a str, &'a Category>,
}

impl<'a> CategoryIndex<'a> {
    /// First occurrence of a name wins when duplicates exist.
    #[must_use]
    pub fn build(categories: &'a [Category]) -> Self {
        let mut by_name = HashMap::new();
        for category in categories {
            by_name.entry(category.name.as_str()).or_insert(category);
        }
        Self { by_name }
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&'a Category> {
        self.by_name.get(name).copied()
    }

    /// Resolves a name to its display style, falling back to the gray
    /// "more" style when the name is absent.
    #[must_use]
    pub fn resolve(&self, name: &str) -> CategoryStyle<'a> {
        match self.get(name) {
            Some(category) => CategoryStyle {
                color: &category.color,
                icon: &category.icon,
            },
            None => CategoryStyle {
                color: FALLBACK_COLOR,
                icon: FALLBACK_ICON,
            },
        }
    }
}

/// Built-in expense categories served while a user has none stored.
#[must_use]
pub fn default_expense_categories(user_id: &str) -> Vec<Category> {
    [
        ("Food & Dining", "#ef4444", "Utensils"),
        ("Transportation", "#3b82f6", "Car"),
        ("Shopping", "#8b5cf6", "ShoppingBag"),
        ("Entertainment", "#f59e0b", "GameController2"),
        ("Health & Fitness", "#10b981", "Heart"),
        ("Education", "#06b6d4", "GraduationCap"),
        ("Bills & Utilities", "#84cc16", "Receipt"),
        ("Travel", "#f97316", "Plane"),
        ("Other", FALLBACK_COLOR, FALLBACK_ICON),
    ]
    .into_iter()
    .map(|(name, color, icon)| {
        Category::new(
            name.to_string(),
            color.to_string(),
            icon.to_string(),
            CategoryKind::Expense,
            user_id.to_string(),
        )
    })
    .collect()
}

/// Built-in income categories served while a user has none stored.
#[must_use]
pub fn default_income_categories(user_id: &str) -> Vec<Category> {
    [
        ("Salary", "#10b981", "Briefcase"),
        ("Freelance", "#3b82f6", "Laptop"),
        ("Business", "#8b5cf6", "Building2"),
        ("Investments", "#f59e0b", "TrendingUp"),
        ("Rental", "#ef4444", "Home"),
        ("Bonus", "#06b6d4", "Gift"),
        ("Refund", "#84cc16", "RotateCcw"),
        ("Pension", "#f97316", "Shield"),
        ("Other", FALLBACK_COLOR, FALLBACK_ICON),
    ]
    .into_iter()
    .map(|(name, color, icon)| {
        Category::new(
            name.to_string(),
            color.to_string(),
            icon.to_string(),
            CategoryKind::Income,
            user_id.to_string(),
        )
    })
    .collect()
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "categories")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub name: String,
    pub color: String,
    pub icon: String,
    pub kind: String,
    pub user_id: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Category> for ActiveModel {
    fn from(category: &Category) -> Self {
        Self {
            id: ActiveValue::Set(category.id.to_string()),
            name: ActiveValue::Set(category.name.clone()),
            color: ActiveValue::Set(category.color.clone()),
            icon: ActiveValue::Set(category.icon.clone()),
            kind: ActiveValue::Set(category.kind.as_str().to_string()),
            user_id: ActiveValue::Set(category.user_id.clone()),
        }
    }
}

impl TryFrom<Model> for Category {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: Uuid::parse_str(&model.id)
                .map_err(|_| EngineError::KeyNotFound("category not exists".to_string()))?,
            name: model.name,
            color: model.color,
            icon: model.icon,
            kind: CategoryKind::try_from(model.kind.as_str())?,
            user_id: model.user_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn category(name: &str, color: &str) -> Category {
        Category::new(
            name.to_string(),
            color.to_string(),
            "Utensils".to_string(),
            CategoryKind::Expense,
            "ana".to_string(),
        )
    }

    #[test]
    fn missing_name_resolves_to_fallback() {
        let categories = vec![category("Food", "#ef4444")];
        let index = CategoryIndex::build(&categories);

        let style = index.resolve("Nonexistent");
        assert_eq!(style.color, FALLBACK_COLOR);
        assert_eq!(style.icon, FALLBACK_ICON);
    }

    #[test]
    fn first_match_wins_on_duplicates() {
        let categories = vec![category("Food", "#ef4444"), category("Food", "#00ff00")];
        let index = CategoryIndex::build(&categories);

        assert_eq!(index.resolve("Food").color, "#ef4444");
    }

    #[test]
    fn defaults_cover_both_kinds() {
        assert_eq!(default_expense_categories("ana").len(), 9);
        assert_eq!(default_income_categories("ana").len(), 9);
        assert!(
            default_income_categories("ana")
                .iter()
                .all(|c| c.kind == CategoryKind::Income)
        );
    }
}
