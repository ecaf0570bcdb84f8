//! Mapping between engine records and the wire representations.

use api_types::{
    budget::{BudgetStatusView, BudgetView},
    category::CategoryView,
    expense::ExpenseView,
    family::MemberView,
    income::IncomeView,
    tithe::{TitheGoalView, TitheView},
};
use engine::{Budget, Category, Expense, FamilyMember, Income, Tithe, TitheGoal, stats::BudgetStatus};

use crate::user;

pub fn scope_from(scope: api_types::Scope) -> engine::Scope {
    match scope {
        api_types::Scope::Personal => engine::Scope::Personal,
        api_types::Scope::Household => engine::Scope::Household,
    }
}

pub fn scope_view(scope: engine::Scope) -> api_types::Scope {
    match scope {
        engine::Scope::Personal => api_types::Scope::Personal,
        engine::Scope::Household => api_types::Scope::Household,
    }
}

pub fn period_from(period: api_types::Period) -> engine::Period {
    match period {
        api_types::Period::Weekly => engine::Period::Weekly,
        api_types::Period::Monthly => engine::Period::Monthly,
        api_types::Period::Yearly => engine::Period::Yearly,
    }
}

pub fn period_view(period: engine::Period) -> api_types::Period {
    match period {
        engine::Period::Weekly => api_types::Period::Weekly,
        engine::Period::Monthly => api_types::Period::Monthly,
        engine::Period::Yearly => api_types::Period::Yearly,
    }
}

pub fn kind_from(kind: api_types::CategoryKind) -> engine::CategoryKind {
    match kind {
        api_types::CategoryKind::Expense => engine::CategoryKind::Expense,
        api_types::CategoryKind::Income => engine::CategoryKind::Income,
    }
}

pub fn kind_view(kind: engine::CategoryKind) -> api_types::CategoryKind {
    match kind {
        engine::CategoryKind::Expense => api_types::CategoryKind::Expense,
        engine::CategoryKind::Income => api_types::CategoryKind::Income,
    }
}

pub fn role_from(role: api_types::family::FamilyRole) -> engine::FamilyRole {
    match role {
        api_types::family::FamilyRole::Admin => engine::FamilyRole::Admin,
        api_types::family::FamilyRole::User => engine::FamilyRole::User,
    }
}

pub fn role_view(role: engine::FamilyRole) -> api_types::family::FamilyRole {
    match role {
        engine::FamilyRole::Admin => api_types::family::FamilyRole::Admin,
        engine::FamilyRole::User => api_types::family::FamilyRole::User,
    }
}

pub fn expense_view(expense: Expense) -> ExpenseView {
    ExpenseView {
        id: expense.id,
        title: expense.title,
        amount_minor: expense.amount_minor,
        category: expense.category,
        date: expense.date,
        description: expense.description,
        paid_by: scope_view(expense.paid_by),
        user_id: expense.user_id,
    }
}

pub fn income_view(income: Income) -> IncomeView {
    IncomeView {
        id: income.id,
        title: income.title,
        amount_minor: income.amount_minor,
        category: income.category,
        date: income.date,
        description: income.description,
        earned_by: scope_view(income.earned_by),
        user_id: income.user_id,
    }
}

pub fn budget_view(budget: Budget) -> BudgetView {
    BudgetView {
        id: budget.id,
        category: budget.category,
        amount_minor: budget.amount_minor,
        period: period_view(budget.period),
        user_id: budget.user_id,
    }
}

pub fn budget_status_view(status: BudgetStatus) -> BudgetStatusView {
    BudgetStatusView {
        budget: budget_view(status.budget),
        spent_minor: status.spent_minor,
        remaining_minor: status.remaining_minor,
        percentage: status.percentage,
        is_over_budget: status.is_over_budget,
    }
}

pub fn tithe_view(tithe: Tithe) -> TitheView {
    TitheView {
        id: tithe.id,
        amount_minor: tithe.amount_minor,
        date: tithe.date,
        description: tithe.description,
        recipient: tithe.recipient,
        user_id: tithe.user_id,
    }
}

pub fn tithe_goal_view(goal: TitheGoal) -> TitheGoalView {
    TitheGoalView {
        id: goal.id,
        target_percentage: goal.target_percentage,
        period: period_view(goal.period),
        is_active: goal.is_active,
        user_id: goal.user_id,
    }
}

pub fn category_view(category: Category) -> CategoryView {
    CategoryView {
        id: category.id,
        name: category.name,
        color: category.color,
        icon: category.icon,
        kind: kind_view(category.kind),
    }
}

/// `profile` is the member's `users` row, when one still exists.
pub fn member_view(member: FamilyMember, profile: Option<user::Model>) -> MemberView {
    let (name, email) = match profile {
        Some(profile) => (profile.name, profile.email),
        None => (None, None),
    };

    MemberView {
        id: member.id,
        username: member.user_id,
        nickname: member.nickname,
        name,
        email,
        role: role_view(member.role),
        created_by: member.created_by,
        created_at: member.created_at,
    }
}
