//! Statistics API endpoints.
//!
//! Aggregation runs over a snapshot loaded once per request; the filters
//! from the query string compose and preserve record order.

use axum::{
    Extension, Json,
    extract::{Query, State},
};

use api_types::stats::{CategoryTotal, GoalProgress, ScopeSplit, Summary, SummaryQuery, TitheSummary};
use engine::{Expense, Income, Snapshot, Tithe, filters, stats};

use crate::{ServerError, server::ServerState, user, views};

/// How many categories the ranked breakdown is cut to.
const TOP_CATEGORIES: usize = 5;

async fn load_snapshot(
    state: &ServerState,
    username: &str,
    family: bool,
) -> Result<Snapshot, ServerError> {
    if family {
        let members = state.engine.family_members(username).await?;
        if !members.is_empty() {
            let user_ids: Vec<String> = members.into_iter().map(|m| m.user_id).collect();
            return Ok(state.engine.family_snapshot(&user_ids).await?);
        }
    }
    Ok(state.engine.snapshot(username).await?)
}

fn checked_month(query: &SummaryQuery) -> Result<(), ServerError> {
    if query.month.is_some() && query.year.is_none() {
        return Err(ServerError::Generic("month requires year".to_string()));
    }
    if let Some(month) = query.month
        && !(1..=12).contains(&month)
    {
        return Err(ServerError::Generic("month must be 1-12".to_string()));
    }
    Ok(())
}

fn filter_expenses(mut expenses: Vec<Expense>, query: &SummaryQuery) -> Vec<Expense> {
    if let Some(member) = &query.member {
        expenses = filters::by_member(expenses, member);
    }
    if let Some(scope) = query.scope {
        expenses = filters::by_scope(expenses, views::scope_from(scope));
    }
    match (query.month, query.year) {
        (Some(month), Some(year)) => filters::by_month(expenses, month, year),
        (None, Some(year)) => filters::by_year(expenses, year),
        _ => expenses,
    }
}

fn filter_incomes(mut incomes: Vec<Income>, query: &SummaryQuery) -> Vec<Income> {
    if let Some(member) = &query.member {
        incomes = filters::by_member(incomes, member);
    }
    if let Some(scope) = query.scope {
        incomes = filters::by_scope(incomes, views::scope_from(scope));
    }
    match (query.month, query.year) {
        (Some(month), Some(year)) => filters::by_month(incomes, month, year),
        (None, Some(year)) => filters::by_year(incomes, year),
        _ => incomes,
    }
}

fn filter_tithes(tithes: Vec<Tithe>, query: &SummaryQuery) -> Vec<Tithe> {
    match (query.month, query.year) {
        (Some(month), Some(year)) => filters::by_month(tithes, month, year),
        (None, Some(year)) => filters::by_year(tithes, year),
        _ => tithes,
    }
}

fn category_totals(ranked: Vec<(String, i64)>) -> Vec<CategoryTotal> {
    ranked
        .into_iter()
        .map(|(category, amount_minor)| CategoryTotal {
            category,
            amount_minor,
        })
        .collect()
}

pub async fn summary(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Query(query): Query<SummaryQuery>,
) -> Result<Json<Summary>, ServerError> {
    checked_month(&query)?;

    let snapshot = load_snapshot(&state, &user.username, query.family.unwrap_or(false)).await?;
    let expenses = filter_expenses(snapshot.expenses, &query);
    let incomes = filter_incomes(snapshot.incomes, &query);

    let expense_split = stats::scope_totals(&expenses);
    let income_split = stats::scope_totals(&incomes);

    Ok(Json(Summary {
        total_income_minor: stats::total(&incomes),
        total_expenses_minor: stats::total(&expenses),
        net_balance_minor: stats::net_balance(&incomes, &expenses),
        average_expense_minor: stats::average_per_entry(&expenses),
        expenses_by_category: category_totals(stats::top_categories(&expenses, usize::MAX)),
        top_expense_categories: category_totals(stats::top_categories(&expenses, TOP_CATEGORIES)),
        expense_split: ScopeSplit {
            personal_minor: expense_split.personal_minor,
            household_minor: expense_split.household_minor,
        },
        income_split: ScopeSplit {
            personal_minor: income_split.personal_minor,
            household_minor: income_split.household_minor,
        },
    }))
}

pub async fn tithe_summary(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Query(query): Query<SummaryQuery>,
) -> Result<Json<TitheSummary>, ServerError> {
    checked_month(&query)?;

    let snapshot = state.engine.snapshot(&user.username).await?;
    let tithes = filter_tithes(snapshot.tithes, &query);
    let expenses = filter_expenses(snapshot.expenses, &query);

    let total_tithes_minor = stats::total(&tithes);
    let expense_base_minor = stats::total(&expenses);
    let giving_percentage = stats::giving_percentage(total_tithes_minor, expense_base_minor);

    let active_goal = snapshot
        .tithe_goals
        .into_iter()
        .find(|goal| goal.is_active)
        .map(|goal| {
            let progress = stats::goal_progress(giving_percentage, goal.target_percentage);
            GoalProgress {
                goal: views::tithe_goal_view(goal),
                progress,
            }
        });

    Ok(Json(TitheSummary {
        total_tithes_minor,
        expense_base_minor,
        giving_percentage,
        active_goal,
    }))
}
