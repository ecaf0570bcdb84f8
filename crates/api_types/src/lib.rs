use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    #[default]
    Usd,
    Eur,
    Ron,
}

/// Whether a transaction counts toward the member or the whole household.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scope {
    #[default]
    #[serde(rename = "user")]
    Personal,
    Household,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Period {
    Weekly,
    #[default]
    Monthly,
    Yearly,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryKind {
    #[default]
    Expense,
    Income,
}

/// Query string for transaction listings.
///
/// All filters are optional and compose. `from`/`to` are inclusive
/// calendar dates; `month` is 1-based and requires `year`.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ListQuery {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub month: Option<u32>,
    pub year: Option<i32>,
    pub scope: Option<Scope>,
}

pub mod expense {
    use super::*;

    /// Request body for creating or replacing an expense.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExpenseUpsert {
        pub title: String,
        /// Minor units (cents). Must be > 0.
        pub amount_minor: i64,
        pub category: String,
        /// Calendar date, `YYYY-MM-DD`.
        pub date: NaiveDate,
        pub description: Option<String>,
        pub paid_by: Scope,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExpenseView {
        pub id: Uuid,
        pub title: String,
        pub amount_minor: i64,
        pub category: String,
        pub date: NaiveDate,
        pub description: Option<String>,
        pub paid_by: Scope,
        pub user_id: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExpensesResponse {
        pub expenses: Vec<ExpenseView>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExpenseCreated {
        pub id: Uuid,
    }
}

pub mod income {
    use super::*;

    /// Request body for creating or replacing an income.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct IncomeUpsert {
        pub title: String,
        /// Minor units (cents). Must be > 0.
        pub amount_minor: i64,
        pub category: String,
        pub date: NaiveDate,
        pub description: Option<String>,
        pub earned_by: Scope,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct IncomeView {
        pub id: Uuid,
        pub title: String,
        pub amount_minor: i64,
        pub category: String,
        pub date: NaiveDate,
        pub description: Option<String>,
        pub earned_by: Scope,
        pub user_id: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct IncomesResponse {
        pub incomes: Vec<IncomeView>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct IncomeCreated {
        pub id: Uuid,
    }
}

pub mod budget {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BudgetUpsert {
        pub category: String,
        /// Cap in minor units. Must be > 0.
        pub amount_minor: i64,
        pub period: Period,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BudgetView {
        pub id: Uuid,
        pub category: String,
        pub amount_minor: i64,
        pub period: Period,
        pub user_id: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BudgetsResponse {
        pub budgets: Vec<BudgetView>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BudgetCreated {
        pub id: Uuid,
    }

    /// One budget compared against the expense history.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct BudgetStatusView {
        pub budget: BudgetView,
        pub spent_minor: i64,
        /// Negative when over budget.
        pub remaining_minor: i64,
        /// Display percentage, clamped to 100.
        pub percentage: Option<f64>,
        /// Unclamped comparison; can be `true` while `percentage` is 100.
        pub is_over_budget: bool,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BudgetStatusResponse {
        pub statuses: Vec<BudgetStatusView>,
    }
}

pub mod tithe {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TitheUpsert {
        /// Minor units (cents). Must be > 0.
        pub amount_minor: i64,
        pub date: NaiveDate,
        pub description: Option<String>,
        pub recipient: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TitheView {
        pub id: Uuid,
        pub amount_minor: i64,
        pub date: NaiveDate,
        pub description: Option<String>,
        pub recipient: String,
        pub user_id: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TithesResponse {
        pub tithes: Vec<TitheView>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TitheCreated {
        pub id: Uuid,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TitheGoalNew {
        /// Percent of the giving base, in `(0, 100]`.
        pub target_percentage: f64,
        pub period: Period,
        pub is_active: bool,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TitheGoalView {
        pub id: Uuid,
        pub target_percentage: f64,
        pub period: Period,
        pub is_active: bool,
        pub user_id: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TitheGoalsResponse {
        pub goals: Vec<TitheGoalView>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TitheGoalCreated {
        pub id: Uuid,
    }
}

pub mod category {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoryNew {
        pub name: String,
        /// Hex color string, e.g. `#ef4444`.
        pub color: String,
        /// Symbolic icon name from the client's fixed icon set.
        pub icon: String,
        pub kind: CategoryKind,
    }

    /// Replaces name and display attributes; the kind is immutable.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoryUpdate {
        pub name: String,
        pub color: String,
        pub icon: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoryView {
        pub id: Uuid,
        pub name: String,
        pub color: String,
        pub icon: String,
        pub kind: CategoryKind,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoriesResponse {
        pub categories: Vec<CategoryView>,
        /// `true` when the user has none stored and the built-in set is
        /// being served.
        pub defaults: bool,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoryCreated {
        pub id: Uuid,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoryListQuery {
        pub kind: Option<CategoryKind>,
    }
}

pub mod family {
    use super::*;

    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum FamilyRole {
        Admin,
        #[default]
        User,
    }

    /// Request body for adding a member to the caller's family.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct MemberNew {
        pub username: String,
        pub nickname: String,
        pub role: FamilyRole,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct MemberView {
        pub id: Uuid,
        pub username: String,
        pub nickname: String,
        /// Denormalized from the member's account profile; absent when the
        /// account never set it.
        pub name: Option<String>,
        pub email: Option<String>,
        pub role: FamilyRole,
        pub created_by: Option<String>,
        pub created_at: DateTime<Utc>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct MembersResponse {
        pub family_id: Option<String>,
        pub members: Vec<MemberView>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct MemberCreated {
        pub id: Uuid,
    }
}

pub mod stats {
    use super::*;

    /// Query string for the summary endpoints. All filters are optional
    /// and compose; `month` requires `year`.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct SummaryQuery {
        /// 1-based calendar month; requires `year`.
        pub month: Option<u32>,
        pub year: Option<i32>,
        pub scope: Option<Scope>,
        /// Restrict to one member's records.
        pub member: Option<String>,
        /// Aggregate over the whole family instead of the caller alone.
        pub family: Option<bool>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoryTotal {
        pub category: String,
        pub amount_minor: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ScopeSplit {
        pub personal_minor: i64,
        pub household_minor: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct Summary {
        pub total_income_minor: i64,
        pub total_expenses_minor: i64,
        /// Income minus expenses; negative means deficit.
        pub net_balance_minor: i64,
        /// Mean expense amount in minor units; 0 with no expenses.
        pub average_expense_minor: f64,
        pub expenses_by_category: Vec<CategoryTotal>,
        pub top_expense_categories: Vec<CategoryTotal>,
        pub expense_split: ScopeSplit,
        pub income_split: ScopeSplit,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct GoalProgress {
        pub goal: tithe::TitheGoalView,
        /// Percent toward target, unclamped (>= 100 means reached).
        pub progress: f64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TitheSummary {
        pub total_tithes_minor: i64,
        /// The base the giving percentage is computed against.
        pub expense_base_minor: i64,
        /// 0 when the base is 0.
        pub giving_percentage: f64,
        pub active_goal: Option<GoalProgress>,
    }
}

pub mod rates {
    use super::*;

    /// Query string for the rates endpoint. The three conversion fields
    /// come together or not at all.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct RatesQuery {
        /// Amount to convert, in minor units of `from`.
        pub amount_minor: Option<i64>,
        pub from: Option<Currency>,
        pub to: Option<Currency>,
    }

    /// Exchange rates against the USD base, plus when they were fetched.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct RatesView {
        pub base: Currency,
        pub rates: Vec<RateView>,
        /// Present when the query asked for a conversion.
        pub conversion: Option<ConversionView>,
        /// `None` until the first successful fetch; fallback rates are
        /// served in the meantime.
        pub fetched_at: Option<DateTime<Utc>>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct RateView {
        pub currency: Currency,
        /// Units of `currency` per one USD.
        pub rate: f64,
    }

    /// A converted amount plus its locale-formatted rendering.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct ConversionView {
        pub currency: Currency,
        pub amount_minor: i64,
        /// e.g. `450,00 lei`.
        pub display: String,
    }
}
