use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::{ActiveValue, ColumnTrait, QueryFilter, QueryOrder, prelude::*};
use uuid::Uuid;

pub use budgets::Budget;
pub use categories::{
    Category, CategoryIndex, CategoryKind, CategoryStyle, FALLBACK_COLOR, FALLBACK_ICON,
    default_expense_categories, default_income_categories,
};
pub use currency::Currency;
pub use error::EngineError;
pub use expenses::Expense;
pub use family_members::{FamilyMember, FamilyRole};
pub use incomes::Income;
pub use money::Money;
pub use rates::{RateCache, RateSet, fallback_rates};
pub use tithe_goals::TitheGoal;
pub use tithes::Tithe;
pub use transactions::{Attributed, Categorized, Entry, Period, Scope, Transaction};

mod budgets;
mod categories;
mod currency;
mod error;
mod expenses;
mod family_members;
pub mod filters;
mod incomes;
mod money;
pub mod rates;
pub mod stats;
mod tithe_goals;
mod tithes;
mod transactions;

type ResultEngine<T> = Result<T, EngineError>;

/// A user's record collections, loaded in one pass.
///
/// Aggregation and filtering are pure functions over a snapshot; nothing in
/// the engine reads ambient state. The snapshot is whatever was resident
/// when it was taken: in-flight writes from other sessions are not awaited
/// or reconciled (last writer wins).
#[derive(Clone, Debug, Default)]
pub struct Snapshot {
    pub expenses: Vec<Expense>,
    pub incomes: Vec<Income>,
    pub budgets: Vec<Budget>,
    pub tithes: Vec<Tithe>,
    pub tithe_goals: Vec<TitheGoal>,
    pub categories: Vec<Category>,
}

impl Snapshot {
    /// Expenses and incomes merged into one date-ordered listing.
    #[must_use]
    pub fn transactions(&self) -> Vec<Transaction> {
        let mut merged: Vec<Transaction> = self
            .expenses
            .iter()
            .cloned()
            .map(Transaction::Expense)
            .chain(self.incomes.iter().cloned().map(Transaction::Income))
            .collect();
        merged.sort_by_key(Entry::date);
        merged
    }
}

/// Persistence adapter: CRUD per record kind, keyed by owning user.
///
/// Every read and mutation is owner-checked; a record that exists but
/// belongs to someone else surfaces as `KeyNotFound` rather than leaking
/// its existence.
#[derive(Clone, Debug)]
pub struct Engine {
    database: DatabaseConnection,
}

impl Engine {
    /// Return a builder for `Engine`.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }

    // ───────────────────────────── snapshots ─────────────────────────────

    /// Loads all collections owned by one user.
    pub async fn snapshot(&self, user_id: &str) -> ResultEngine<Snapshot> {
        self.snapshot_for(&[user_id.to_string()]).await
    }

    /// Loads the merged collections of several members (household views).
    pub async fn family_snapshot(&self, user_ids: &[String]) -> ResultEngine<Snapshot> {
        self.snapshot_for(user_ids).await
    }

    async fn snapshot_for(&self, user_ids: &[String]) -> ResultEngine<Snapshot> {
        let expenses = expenses::Entity::find()
            .filter(expenses::Column::UserId.is_in(user_ids.iter().cloned()))
            .order_by_asc(expenses::Column::Date)
            .all(&self.database)
            .await?
            .into_iter()
            .map(Expense::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        let incomes = incomes::Entity::find()
            .filter(incomes::Column::UserId.is_in(user_ids.iter().cloned()))
            .order_by_asc(incomes::Column::Date)
            .all(&self.database)
            .await?
            .into_iter()
            .map(Income::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        let budgets = budgets::Entity::find()
            .filter(budgets::Column::UserId.is_in(user_ids.iter().cloned()))
            .all(&self.database)
            .await?
            .into_iter()
            .map(Budget::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        let tithes = tithes::Entity::find()
            .filter(tithes::Column::UserId.is_in(user_ids.iter().cloned()))
            .order_by_asc(tithes::Column::Date)
            .all(&self.database)
            .await?
            .into_iter()
            .map(Tithe::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        let tithe_goals = tithe_goals::Entity::find()
            .filter(tithe_goals::Column::UserId.is_in(user_ids.iter().cloned()))
            .all(&self.database)
            .await?
            .into_iter()
            .map(TitheGoal::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        let categories = categories::Entity::find()
            .filter(categories::Column::UserId.is_in(user_ids.iter().cloned()))
            .order_by_asc(categories::Column::Name)
            .all(&self.database)
            .await?
            .into_iter()
            .map(Category::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Snapshot {
            expenses,
            incomes,
            budgets,
            tithes,
            tithe_goals,
            categories,
        })
    }

    // ───────────────────────────── expenses ──────────────────────────────

    pub async fn list_expenses(&self, user_id: &str) -> ResultEngine<Vec<Expense>> {
        expenses::Entity::find()
            .filter(expenses::Column::UserId.eq(user_id))
            .order_by_asc(expenses::Column::Date)
            .all(&self.database)
            .await?
            .into_iter()
            .map(Expense::try_from)
            .collect()
    }

    /// Create an expense owned by `user_id`.
    #[allow(clippy::too_many_arguments)]
    pub async fn new_expense(
        &self,
        title: &str,
        amount_minor: i64,
        category: &str,
        date: NaiveDate,
        description: Option<&str>,
        paid_by: Scope,
        user_id: &str,
    ) -> ResultEngine<Uuid> {
        let expense = Expense::new(
            title.to_string(),
            amount_minor,
            category.to_string(),
            date,
            description.map(|s| s.to_string()),
            paid_by,
            user_id.to_string(),
        )?;
        expenses::ActiveModel::from(&expense)
            .insert(&self.database)
            .await?;
        Ok(expense.id)
    }

    /// Full-replace update of an owned expense.
    #[allow(clippy::too_many_arguments)]
    pub async fn update_expense(
        &self,
        id: Uuid,
        user_id: &str,
        title: &str,
        amount_minor: i64,
        category: &str,
        date: NaiveDate,
        description: Option<&str>,
        paid_by: Scope,
    ) -> ResultEngine<()> {
        if amount_minor <= 0 {
            return Err(EngineError::InvalidAmount(
                "amount_minor must be > 0".to_string(),
            ));
        }
        self.owned_expense(id, user_id).await?;

        let model = expenses::ActiveModel {
            id: ActiveValue::Set(id.to_string()),
            title: ActiveValue::Set(title.to_string()),
            amount_minor: ActiveValue::Set(amount_minor),
            category: ActiveValue::Set(category.to_string()),
            date: ActiveValue::Set(date),
            description: ActiveValue::Set(description.map(|s| s.to_string())),
            paid_by: ActiveValue::Set(paid_by.as_str().to_string()),
            user_id: ActiveValue::Set(user_id.to_string()),
        };
        model.update(&self.database).await?;
        Ok(())
    }

    pub async fn delete_expense(&self, id: Uuid, user_id: &str) -> ResultEngine<()> {
        self.owned_expense(id, user_id).await?;
        expenses::Entity::delete_by_id(id.to_string())
            .exec(&self.database)
            .await?;
        Ok(())
    }

    async fn owned_expense(&self, id: Uuid, user_id: &str) -> ResultEngine<expenses::Model> {
        let model = expenses::Entity::find_by_id(id.to_string())
            .one(&self.database)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("expense not exists".to_string()))?;
        if model.user_id != user_id {
            return Err(EngineError::KeyNotFound("expense not exists".to_string()));
        }
        Ok(model)
    }

    // ────────────────────────────── incomes ──────────────────────────────

    pub async fn list_incomes(&self, user_id: &str) -> ResultEngine<Vec<Income>> {
        incomes::Entity::find()
            .filter(incomes::Column::UserId.eq(user_id))
            .order_by_asc(incomes::Column::Date)
            .all(&self.database)
            .await?
            .into_iter()
            .map(Income::try_from)
            .collect()
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn new_income(
        &self,
        title: &str,
        amount_minor: i64,
        category: &str,
        date: NaiveDate,
        description: Option<&str>,
        earned_by: Scope,
        user_id: &str,
    ) -> ResultEngine<Uuid> {
        let income = Income::new(
            title.to_string(),
            amount_minor,
            category.to_string(),
            date,
            description.map(|s| s.to_string()),
            earned_by,
            user_id.to_string(),
        )?;
        incomes::ActiveModel::from(&income)
            .insert(&self.database)
            .await?;
        Ok(income.id)
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn update_income(
        &self,
        id: Uuid,
        user_id: &str,
        title: &str,
        amount_minor: i64,
        category: &str,
        date: NaiveDate,
        description: Option<&str>,
        earned_by: Scope,
    ) -> ResultEngine<()> {
        if amount_minor <= 0 {
            return Err(EngineError::InvalidAmount(
                "amount_minor must be > 0".to_string(),
            ));
        }
        self.owned_income(id, user_id).await?;

        let model = incomes::ActiveModel {
            id: ActiveValue::Set(id.to_string()),
            title: ActiveValue::Set(title.to_string()),
            amount_minor: ActiveValue::Set(amount_minor),
            category: ActiveValue::Set(category.to_string()),
            date: ActiveValue::Set(date),
            description: ActiveValue::Set(description.map(|s| s.to_string())),
            earned_by: ActiveValue::Set(earned_by.as_str().to_string()),
            user_id: ActiveValue::Set(user_id.to_string()),
        };
        model.update(&self.database).await?;
        Ok(())
    }

    pub async fn delete_income(&self, id: Uuid, user_id: &str) -> ResultEngine<()> {
        self.owned_income(id, user_id).await?;
        incomes::Entity::delete_by_id(id.to_string())
            .exec(&self.database)
            .await?;
        Ok(())
    }

    async fn owned_income(&self, id: Uuid, user_id: &str) -> ResultEngine<incomes::Model> {
        let model = incomes::Entity::find_by_id(id.to_string())
            .one(&self.database)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("income not exists".to_string()))?;
        if model.user_id != user_id {
            return Err(EngineError::KeyNotFound("income not exists".to_string()));
        }
        Ok(model)
    }

    // ────────────────────────────── budgets ──────────────────────────────

    pub async fn list_budgets(&self, user_id: &str) -> ResultEngine<Vec<Budget>> {
        budgets::Entity::find()
            .filter(budgets::Column::UserId.eq(user_id))
            .all(&self.database)
            .await?
            .into_iter()
            .map(Budget::try_from)
            .collect()
    }

    pub async fn new_budget(
        &self,
        category: &str,
        amount_minor: i64,
        period: Period,
        user_id: &str,
    ) -> ResultEngine<Uuid> {
        let budget = Budget::new(
            category.to_string(),
            amount_minor,
            period,
            user_id.to_string(),
        )?;
        budgets::ActiveModel::from(&budget)
            .insert(&self.database)
            .await?;
        Ok(budget.id)
    }

    pub async fn update_budget(
        &self,
        id: Uuid,
        user_id: &str,
        category: &str,
        amount_minor: i64,
        period: Period,
    ) -> ResultEngine<()> {
        if amount_minor <= 0 {
            return Err(EngineError::InvalidAmount(
                "amount_minor must be > 0".to_string(),
            ));
        }
        self.owned_budget(id, user_id).await?;

        let model = budgets::ActiveModel {
            id: ActiveValue::Set(id.to_string()),
            category: ActiveValue::Set(category.to_string()),
            amount_minor: ActiveValue::Set(amount_minor),
            period: ActiveValue::Set(period.as_str().to_string()),
            user_id: ActiveValue::Set(user_id.to_string()),
        };
        model.update(&self.database).await?;
        Ok(())
    }

    pub async fn delete_budget(&self, id: Uuid, user_id: &str) -> ResultEngine<()> {
        self.owned_budget(id, user_id).await?;
        budgets::Entity::delete_by_id(id.to_string())
            .exec(&self.database)
            .await?;
        Ok(())
    }

    async fn owned_budget(&self, id: Uuid, user_id: &str) -> ResultEngine<budgets::Model> {
        let model = budgets::Entity::find_by_id(id.to_string())
            .one(&self.database)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("budget not exists".to_string()))?;
        if model.user_id != user_id {
            return Err(EngineError::KeyNotFound("budget not exists".to_string()));
        }
        Ok(model)
    }

    // ────────────────────────────── tithes ───────────────────────────────

    pub async fn list_tithes(&self, user_id: &str) -> ResultEngine<Vec<Tithe>> {
        tithes::Entity::find()
            .filter(tithes::Column::UserId.eq(user_id))
            .order_by_asc(tithes::Column::Date)
            .all(&self.database)
            .await?
            .into_iter()
            .map(Tithe::try_from)
            .collect()
    }

    pub async fn new_tithe(
        &self,
        amount_minor: i64,
        date: NaiveDate,
        description: Option<&str>,
        recipient: &str,
        user_id: &str,
    ) -> ResultEngine<Uuid> {
        let tithe = Tithe::new(
            amount_minor,
            date,
            description.map(|s| s.to_string()),
            recipient.to_string(),
            user_id.to_string(),
        )?;
        tithes::ActiveModel::from(&tithe)
            .insert(&self.database)
            .await?;
        Ok(tithe.id)
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn update_tithe(
        &self,
        id: Uuid,
        user_id: &str,
        amount_minor: i64,
        date: NaiveDate,
        description: Option<&str>,
        recipient: &str,
    ) -> ResultEngine<()> {
        if amount_minor <= 0 {
            return Err(EngineError::InvalidAmount(
                "amount_minor must be > 0".to_string(),
            ));
        }
        self.owned_tithe(id, user_id).await?;

        let model = tithes::ActiveModel {
            id: ActiveValue::Set(id.to_string()),
            amount_minor: ActiveValue::Set(amount_minor),
            date: ActiveValue::Set(date),
            description: ActiveValue::Set(description.map(|s| s.to_string())),
            recipient: ActiveValue::Set(recipient.to_string()),
            user_id: ActiveValue::Set(user_id.to_string()),
        };
        model.update(&self.database).await?;
        Ok(())
    }

    pub async fn delete_tithe(&self, id: Uuid, user_id: &str) -> ResultEngine<()> {
        self.owned_tithe(id, user_id).await?;
        tithes::Entity::delete_by_id(id.to_string())
            .exec(&self.database)
            .await?;
        Ok(())
    }

    async fn owned_tithe(&self, id: Uuid, user_id: &str) -> ResultEngine<tithes::Model> {
        let model = tithes::Entity::find_by_id(id.to_string())
            .one(&self.database)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("tithe not exists".to_string()))?;
        if model.user_id != user_id {
            return Err(EngineError::KeyNotFound("tithe not exists".to_string()));
        }
        Ok(model)
    }

    // ──────────────────────────── tithe goals ────────────────────────────

    pub async fn list_tithe_goals(&self, user_id: &str) -> ResultEngine<Vec<TitheGoal>> {
        tithe_goals::Entity::find()
            .filter(tithe_goals::Column::UserId.eq(user_id))
            .all(&self.database)
            .await?
            .into_iter()
            .map(TitheGoal::try_from)
            .collect()
    }

    pub async fn new_tithe_goal(
        &self,
        target_percentage: f64,
        period: Period,
        is_active: bool,
        user_id: &str,
    ) -> ResultEngine<Uuid> {
        let goal = TitheGoal::new(target_percentage, period, is_active, user_id.to_string())?;
        tithe_goals::ActiveModel::from(&goal)
            .insert(&self.database)
            .await?;
        Ok(goal.id)
    }

    /// Marks every goal of the user inactive. Callers enforcing the
    /// at-most-one-active convention run this before activating a new one.
    pub async fn deactivate_tithe_goals(&self, user_id: &str) -> ResultEngine<()> {
        let actives = tithe_goals::Entity::find()
            .filter(tithe_goals::Column::UserId.eq(user_id))
            .filter(tithe_goals::Column::IsActive.eq(true))
            .all(&self.database)
            .await?;
        for model in actives {
            let goal = tithe_goals::ActiveModel {
                id: ActiveValue::Set(model.id),
                is_active: ActiveValue::Set(false),
                ..Default::default()
            };
            goal.update(&self.database).await?;
        }
        Ok(())
    }

    pub async fn delete_tithe_goal(&self, id: Uuid, user_id: &str) -> ResultEngine<()> {
        let model = tithe_goals::Entity::find_by_id(id.to_string())
            .one(&self.database)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("tithe goal not exists".to_string()))?;
        if model.user_id != user_id {
            return Err(EngineError::KeyNotFound("tithe goal not exists".to_string()));
        }
        tithe_goals::Entity::delete_by_id(id.to_string())
            .exec(&self.database)
            .await?;
        Ok(())
    }

    // ──────────────────────────── categories ─────────────────────────────

    pub async fn list_categories(
        &self,
        user_id: &str,
        kind: CategoryKind,
    ) -> ResultEngine<Vec<Category>> {
        categories::Entity::find()
            .filter(categories::Column::UserId.eq(user_id))
            .filter(categories::Column::Kind.eq(kind.as_str()))
            .order_by_asc(categories::Column::Name)
            .all(&self.database)
            .await?
            .into_iter()
            .map(Category::try_from)
            .collect()
    }

    /// Duplicate names are not rejected (soft convention; resolution is
    /// first-match-wins).
    pub async fn new_category(
        &self,
        name: &str,
        color: &str,
        icon: &str,
        kind: CategoryKind,
        user_id: &str,
    ) -> ResultEngine<Uuid> {
        let category = Category::new(
            name.to_string(),
            color.to_string(),
            icon.to_string(),
            kind,
            user_id.to_string(),
        );
        categories::ActiveModel::from(&category)
            .insert(&self.database)
            .await?;
        Ok(category.id)
    }

    pub async fn update_category(
        &self,
        id: Uuid,
        user_id: &str,
        name: &str,
        color: &str,
        icon: &str,
    ) -> ResultEngine<()> {
        let stored = self.owned_category(id, user_id).await?;

        let model = categories::ActiveModel {
            id: ActiveValue::Set(id.to_string()),
            name: ActiveValue::Set(name.to_string()),
            color: ActiveValue::Set(color.to_string()),
            icon: ActiveValue::Set(icon.to_string()),
            kind: ActiveValue::Set(stored.kind),
            user_id: ActiveValue::Set(user_id.to_string()),
        };
        model.update(&self.database).await?;
        Ok(())
    }

    pub async fn delete_category(&self, id: Uuid, user_id: &str) -> ResultEngine<()> {
        self.owned_category(id, user_id).await?;
        categories::Entity::delete_by_id(id.to_string())
            .exec(&self.database)
            .await?;
        Ok(())
    }

    async fn owned_category(&self, id: Uuid, user_id: &str) -> ResultEngine<categories::Model> {
        let model = categories::Entity::find_by_id(id.to_string())
            .one(&self.database)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("category not exists".to_string()))?;
        if model.user_id != user_id {
            return Err(EngineError::KeyNotFound("category not exists".to_string()));
        }
        Ok(model)
    }

    // ─────────────────────────── family members ──────────────────────────

    /// The caller's own membership row, if any.
    pub async fn family_membership(&self, user_id: &str) -> ResultEngine<Option<FamilyMember>> {
        let model = family_members::Entity::find()
            .filter(family_members::Column::UserId.eq(user_id))
            .one(&self.database)
            .await?;
        model.map(FamilyMember::try_from).transpose()
    }

    /// All members of the caller's family; empty when the caller has no
    /// family.
    pub async fn family_members(&self, user_id: &str) -> ResultEngine<Vec<FamilyMember>> {
        let Some(own) = self.family_membership(user_id).await? else {
            return Ok(Vec::new());
        };

        family_members::Entity::find()
            .filter(family_members::Column::FamilyId.eq(own.family_id))
            .order_by_asc(family_members::Column::CreatedAt)
            .all(&self.database)
            .await?
            .into_iter()
            .map(FamilyMember::try_from)
            .collect()
    }

    /// Adds a member under the creator's family. Admin only.
    pub async fn add_family_member(
        &self,
        creator_user_id: &str,
        member_user_id: &str,
        nickname: &str,
        role: FamilyRole,
        created_at: DateTime<Utc>,
    ) -> ResultEngine<Uuid> {
        let creator = self
            .family_membership(creator_user_id)
            .await?
            .ok_or_else(|| EngineError::Forbidden("not a family member".to_string()))?;
        if creator.role != FamilyRole::Admin {
            return Err(EngineError::Forbidden(
                "only family admins may add members".to_string(),
            ));
        }

        let existing = family_members::Entity::find()
            .filter(family_members::Column::FamilyId.eq(creator.family_id.clone()))
            .filter(family_members::Column::UserId.eq(member_user_id))
            .one(&self.database)
            .await?;
        if existing.is_some() {
            return Err(EngineError::ExistingKey(member_user_id.to_string()));
        }

        let member = FamilyMember::new(
            creator.family_id,
            member_user_id.to_string(),
            role,
            nickname.to_string(),
            Some(creator_user_id.to_string()),
            created_at,
        );
        family_members::ActiveModel::from(&member)
            .insert(&self.database)
            .await?;
        Ok(member.id)
    }

    /// Removes a non-admin member from the caller's family. Admin only.
    pub async fn remove_family_member(&self, id: Uuid, caller_user_id: &str) -> ResultEngine<()> {
        let caller = self
            .family_membership(caller_user_id)
            .await?
            .ok_or_else(|| EngineError::Forbidden("not a family member".to_string()))?;
        if caller.role != FamilyRole::Admin {
            return Err(EngineError::Forbidden(
                "only family admins may remove members".to_string(),
            ));
        }

        let model = family_members::Entity::find_by_id(id.to_string())
            .one(&self.database)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("family member not exists".to_string()))?;
        if model.family_id != caller.family_id {
            return Err(EngineError::KeyNotFound(
                "family member not exists".to_string(),
            ));
        }
        let target = FamilyMember::try_from(model)?;
        if target.role == FamilyRole::Admin {
            return Err(EngineError::Forbidden(
                "admin members cannot be removed".to_string(),
            ));
        }

        family_members::Entity::delete_by_id(id.to_string())
            .exec(&self.database)
            .await?;
        Ok(())
    }

    /// Seeds a family with its first (admin) member. Used for provisioning
    /// and tests; regular member creation goes through
    /// [`add_family_member`](Self::add_family_member).
    pub async fn bootstrap_family(
        &self,
        family_id: &str,
        admin_user_id: &str,
        nickname: &str,
        created_at: DateTime<Utc>,
    ) -> ResultEngine<Uuid> {
        let existing = family_members::Entity::find()
            .filter(family_members::Column::UserId.eq(admin_user_id))
            .one(&self.database)
            .await?;
        if existing.is_some() {
            return Err(EngineError::ExistingKey(admin_user_id.to_string()));
        }

        let member = FamilyMember::new(
            family_id.to_string(),
            admin_user_id.to_string(),
            FamilyRole::Admin,
            nickname.to_string(),
            None,
            created_at,
        );
        family_members::ActiveModel::from(&member)
            .insert(&self.database)
            .await?;
        Ok(member.id)
    }
}

/// The builder for `Engine`.
#[derive(Default)]
pub struct EngineBuilder {
    database: DatabaseConnection,
}

impl EngineBuilder {
    /// Pass the required database
    pub fn database(mut self, db: DatabaseConnection) -> EngineBuilder {
        self.database = db;
        self
    }

    /// Construct `Engine`
    pub fn build(self) -> Engine {
        Engine {
            database: self.database,
        }
    }
}
