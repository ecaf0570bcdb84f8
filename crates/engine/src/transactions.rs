//! Shared transaction vocabulary.
//!
//! The original product distinguished expenses from incomes at runtime by
//! probing for a `paidBy` vs `earnedBy` field. Here the union is a tagged
//! enum ([`Transaction`]) so dispatch on the kind is exhaustive, and the
//! classification/period vocabulary lives in one place.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{EngineError, expenses::Expense, incomes::Income};

/// Per-record classification: shared household money or one member's own.
///
/// This is an attribute of the transaction, not of ownership; a household
/// record still belongs to exactly one `user_id`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scope {
    #[default]
    Personal,
    Household,
}

impl Scope {
    pub fn as_str(self) -> &'static str {
        match self {
            // Stored values kept compatible with the original data.
            Self::Personal => "user",
            Self::Household => "household",
        }
    }
}

impl TryFrom<&str> for Scope {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "user" => Ok(Self::Personal),
            "household" => Ok(Self::Household),
            other => Err(EngineError::InvalidField(format!("invalid scope: {other}"))),
        }
    }
}

/// Recurrence period of a budget cap or tithe goal.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Period {
    Weekly,
    #[default]
    Monthly,
    Yearly,
}

impl Period {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Yearly => "yearly",
        }
    }
}

impl TryFrom<&str> for Period {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "weekly" => Ok(Self::Weekly),
            "monthly" => Ok(Self::Monthly),
            "yearly" => Ok(Self::Yearly),
            other => Err(EngineError::InvalidField(format!("invalid period: {other}"))),
        }
    }
}

/// Anything with an amount and a calendar date (expenses, incomes, tithes).
pub trait Entry {
    fn amount_minor(&self) -> i64;
    fn date(&self) -> NaiveDate;
}

/// Entries carrying a free-text category name.
pub trait Categorized: Entry {
    fn category(&self) -> &str;
}

/// Entries attributed to an owner and a personal/household scope.
pub trait Attributed: Entry {
    fn scope(&self) -> Scope;
    fn user_id(&self) -> &str;
}

/// Tagged expense-or-income union for mixed listings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Transaction {
    Expense(Expense),
    Income(Income),
}

impl Transaction {
    #[must_use]
    pub fn is_expense(&self) -> bool {
        matches!(self, Self::Expense(_))
    }
}

impl Entry for Transaction {
    fn amount_minor(&self) -> i64 {
        match self {
            Self::Expense(e) => e.amount_minor,
            Self::Income(i) => i.amount_minor,
        }
    }

    fn date(&self) -> NaiveDate {
        match self {
            Self::Expense(e) => e.date,
            Self::Income(i) => i.date,
        }
    }
}

impl Categorized for Transaction {
    fn category(&self) -> &str {
        match self {
            Self::Expense(e) => &e.category,
            Self::Income(i) => &i.category,
        }
    }
}

impl Attributed for Transaction {
    fn scope(&self) -> Scope {
        match self {
            Self::Expense(e) => e.paid_by,
            Self::Income(i) => i.earned_by,
        }
    }

    fn user_id(&self) -> &str {
        match self {
            Self::Expense(e) => &e.user_id,
            Self::Income(i) => &i.user_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CategoryKind, FamilyRole};

    #[test]
    fn stored_vocabulary_strings_round_trip() {
        assert_eq!(Scope::try_from(Scope::Household.as_str()).unwrap(), Scope::Household);
        assert_eq!(Period::try_from(Period::Weekly.as_str()).unwrap(), Period::Weekly);
    }

    #[test]
    fn unknown_vocabulary_strings_are_invalid_fields() {
        assert!(matches!(Scope::try_from("shared"), Err(EngineError::InvalidField(_))));
        assert!(matches!(Period::try_from("daily"), Err(EngineError::InvalidField(_))));
        assert!(matches!(
            CategoryKind::try_from("transfer"),
            Err(EngineError::InvalidField(_))
        ));
        assert!(matches!(
            FamilyRole::try_from("owner"),
            Err(EngineError::InvalidField(_))
        ));
    }
}
