//! Aggregation over record collections.
//!
//! Everything here is pure and deterministic: functions take the current
//! snapshot of records as arguments and have no ordering dependency on the
//! input beyond the documented tie-breaking of `top_categories`.

use std::collections::HashMap;

use crate::{
    budgets::Budget,
    transactions::{Attributed, Categorized, Entry, Scope},
};

/// Σ amount over the (possibly pre-filtered) collection. Empty → 0.
#[must_use]
pub fn total<T: Entry>(items: &[T]) -> i64 {
    items.iter().map(Entry::amount_minor).sum()
}

/// Maps each distinct category name to the sum of its amounts.
///
/// The values sum exactly to `total(items)`.
#[must_use]
pub fn by_category<T: Categorized>(items: &[T]) -> HashMap<String, i64> {
    let mut totals: HashMap<String, i64> = HashMap::new();
    for item in items {
        *totals.entry(item.category().to_string()).or_insert(0) += item.amount_minor();
    }
    totals
}

/// Top `n` categories by summed amount, descending.
///
/// Ties keep first-appearance order (the sort is stable over totals
/// accumulated in input order), so the result is consistent across runs.
#[must_use]
pub fn top_categories<T: Categorized>(items: &[T], n: usize) -> Vec<(String, i64)> {
    let mut order: Vec<String> = Vec::new();
    let mut totals: HashMap<String, i64> = HashMap::new();
    for item in items {
        let name = item.category();
        if !totals.contains_key(name) {
            order.push(name.to_string());
        }
        *totals.entry(name.to_string()).or_insert(0) += item.amount_minor();
    }

    let mut ranked: Vec<(String, i64)> = order
        .into_iter()
        .map(|name| {
            let amount = totals.get(&name).copied().unwrap_or(0);
            (name, amount)
        })
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked.truncate(n);
    ranked
}

/// Income total minus expense total; ≥ 0 means surplus, < 0 deficit.
#[must_use]
pub fn net_balance<I: Entry, E: Entry>(incomes: &[I], expenses: &[E]) -> i64 {
    total(incomes) - total(expenses)
}

/// Per-classification totals of one collection.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ScopeTotals {
    pub personal_minor: i64,
    pub household_minor: i64,
}

/// Splits a collection's total between personal and household records.
#[must_use]
pub fn scope_totals<T: Attributed>(items: &[T]) -> ScopeTotals {
    items.iter().fold(ScopeTotals::default(), |mut acc, item| {
        match item.scope() {
            Scope::Personal => acc.personal_minor += item.amount_minor(),
            Scope::Household => acc.household_minor += item.amount_minor(),
        }
        acc
    })
}

/// Derived view of one budget against the expense history.
#[derive(Clone, Debug, PartialEq)]
pub struct BudgetStatus {
    pub budget: Budget,
    pub spent_minor: i64,
    /// `amount - spent`; negative when over budget.
    pub remaining_minor: i64,
    /// Display percentage, clamped to 100. `None` for a zero-cap budget
    /// (cannot occur for stored budgets, which reject `amount <= 0`).
    pub percentage: Option<f64>,
    /// Unclamped comparison: can fire while `percentage` shows 100.
    pub is_over_budget: bool,
}

/// Computes the status of every budget.
///
/// "Spent" is the by-category total over the **whole** expense collection
/// passed in, not scoped to the budget's period; callers wanting a scoped
/// view pre-filter the expenses.
#[must_use]
pub fn budget_status<T: Categorized>(budgets: &[Budget], expenses: &[T]) -> Vec<BudgetStatus> {
    let totals = by_category(expenses);

    budgets
        .iter()
        .map(|budget| {
            let spent = totals.get(&budget.category).copied().unwrap_or(0);
            let (percentage, is_over_budget) = if budget.amount_minor > 0 {
                let raw = spent as f64 / budget.amount_minor as f64 * 100.0;
                (Some(raw.min(100.0)), spent > budget.amount_minor)
            } else {
                (None, spent > 0)
            };
            BudgetStatus {
                budget: budget.clone(),
                spent_minor: spent,
                remaining_minor: budget.amount_minor - spent,
                percentage,
                is_over_budget,
            }
        })
        .collect()
}

/// Mean amount per entry in minor units; 0 for an empty collection.
#[must_use]
pub fn average_per_entry<T: Entry>(items: &[T]) -> f64 {
    if items.is_empty() {
        return 0.0;
    }
    total(items) as f64 / items.len() as f64
}

/// Tithes as a percentage of the expense base; 0 when the base is 0.
///
/// The denominator is deliberately the expense total, matching the
/// shipped product's behavior.
#[must_use]
pub fn giving_percentage(total_tithes_minor: i64, total_expenses_minor: i64) -> f64 {
    if total_expenses_minor <= 0 {
        return 0.0;
    }
    total_tithes_minor as f64 / total_expenses_minor as f64 * 100.0
}

/// Progress toward a goal percentage, unclamped (≥ 100 means reached).
#[must_use]
pub fn goal_progress(current_percentage: f64, target_percentage: f64) -> f64 {
    if target_percentage <= 0.0 {
        return 0.0;
    }
    current_percentage / target_percentage * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Period, Scope, expenses::Expense, incomes::Income, tithes::Tithe};

    fn expense(amount: i64, category: &str) -> Expense {
        Expense::new(
            "x".to_string(),
            amount,
            category.to_string(),
            "2026-03-10".parse().unwrap(),
            None,
            Scope::Personal,
            "ana".to_string(),
        )
        .unwrap()
    }

    fn income(amount: i64, scope: Scope) -> Income {
        Income::new(
            "x".to_string(),
            amount,
            "Salary".to_string(),
            "2026-03-01".parse().unwrap(),
            None,
            scope,
            "ana".to_string(),
        )
        .unwrap()
    }

    fn tithe(amount: i64) -> Tithe {
        Tithe::new(
            amount,
            "2026-03-05".parse().unwrap(),
            None,
            "parish".to_string(),
            "ana".to_string(),
        )
        .unwrap()
    }

    #[test]
    fn sum_of_empty_is_zero() {
        let none: Vec<Expense> = Vec::new();
        assert_eq!(total(&none), 0);
    }

    #[test]
    fn sum_is_additive_over_concatenation() {
        let a = vec![expense(100, "Food"), expense(250, "Travel")];
        let b = vec![expense(399, "Food")];
        let concat: Vec<Expense> = a.iter().chain(b.iter()).cloned().collect();

        assert_eq!(total(&concat), total(&a) + total(&b));
    }

    #[test]
    fn breakdown_values_sum_to_total() {
        let items = vec![
            expense(10_000, "Food"),
            expense(5_000, "Food"),
            expense(3_000, "Transport"),
        ];
        let breakdown = by_category(&items);

        assert_eq!(breakdown["Food"], 15_000);
        assert_eq!(breakdown["Transport"], 3_000);
        assert_eq!(breakdown.values().sum::<i64>(), total(&items));
    }

    #[test]
    fn top_categories_sorts_descending_and_truncates() {
        let items = vec![
            expense(100, "A"),
            expense(300, "B"),
            expense(200, "C"),
            expense(300, "D"),
        ];

        let top = top_categories(&items, 2);
        // B and D tie at 300; B appeared first.
        assert_eq!(top, vec![("B".to_string(), 300), ("D".to_string(), 300)]);
    }

    #[test]
    fn net_balance_signs_surplus_and_deficit() {
        let incomes = vec![income(100_000, Scope::Personal)];
        let expenses = vec![expense(40_000, "Food")];
        assert_eq!(net_balance(&incomes, &expenses), 60_000);

        let expenses = vec![expense(140_000, "Food")];
        assert_eq!(net_balance(&incomes, &expenses), -40_000);
    }

    #[test]
    fn scope_totals_split_personal_and_household() {
        let items = vec![
            income(100, Scope::Personal),
            income(200, Scope::Household),
            income(50, Scope::Personal),
        ];
        let split = scope_totals(&items);
        assert_eq!(split.personal_minor, 150);
        assert_eq!(split.household_minor, 200);
    }

    #[test]
    fn over_budget_flag_uses_unclamped_ratio() {
        // spent=150, cap=100: bar saturates at 100% but the flag fires.
        let budgets = vec![
            Budget::new("Food".to_string(), 10_000, Period::Monthly, "ana".to_string()).unwrap(),
        ];
        let expenses = vec![expense(15_000, "Food")];

        let statuses = budget_status(&budgets, &expenses);
        assert_eq!(statuses[0].spent_minor, 15_000);
        assert_eq!(statuses[0].remaining_minor, -5_000);
        assert_eq!(statuses[0].percentage, Some(100.0));
        assert!(statuses[0].is_over_budget);
    }

    #[test]
    fn budget_scenario_end_to_end() {
        // Expenses [100 Food, 50 Food, 30 Transport], budget Food cap 120.
        let expenses = vec![
            expense(10_000, "Food"),
            expense(5_000, "Food"),
            expense(3_000, "Transport"),
        ];
        let budgets = vec![
            Budget::new("Food".to_string(), 12_000, Period::Monthly, "ana".to_string()).unwrap(),
        ];

        let statuses = budget_status(&budgets, &expenses);
        let food = &statuses[0];
        assert_eq!(food.spent_minor, 15_000);
        assert_eq!(food.remaining_minor, -3_000);
        assert_eq!(food.percentage, Some(100.0));
        assert!(food.is_over_budget);
    }

    #[test]
    fn budget_with_no_matching_expenses_spends_zero() {
        let budgets = vec![
            Budget::new("Travel".to_string(), 5_000, Period::Weekly, "ana".to_string()).unwrap(),
        ];
        let expenses = vec![expense(1_000, "Food")];

        let statuses = budget_status(&budgets, &expenses);
        assert_eq!(statuses[0].spent_minor, 0);
        assert_eq!(statuses[0].remaining_minor, 5_000);
        assert_eq!(statuses[0].percentage, Some(0.0));
        assert!(!statuses[0].is_over_budget);
    }

    #[test]
    fn average_of_empty_is_zero_not_nan() {
        let none: Vec<Expense> = Vec::new();
        assert_eq!(average_per_entry(&none), 0.0);
    }

    #[test]
    fn average_is_total_over_count() {
        let items = vec![expense(100, "A"), expense(200, "B")];
        assert_eq!(average_per_entry(&items), 150.0);
    }

    #[test]
    fn giving_percentage_against_expense_base() {
        // Tithes [50, 30], expense base 800 → 10%.
        let tithes = vec![tithe(5_000), tithe(3_000)];
        let pct = giving_percentage(total(&tithes), 80_000);
        assert_eq!(pct, 10.0);
    }

    #[test]
    fn giving_percentage_with_zero_base_is_zero() {
        assert_eq!(giving_percentage(5_000, 0), 0.0);
    }

    #[test]
    fn goal_progress_is_unclamped() {
        assert_eq!(goal_progress(12.0, 10.0), 120.0);
        assert_eq!(goal_progress(8.0, 10.0), 80.0);
        assert_eq!(goal_progress(5.0, 0.0), 0.0);
    }

    #[test]
    fn income_minus_expense_scenario() {
        let incomes = vec![income(100_000, Scope::Personal)];
        let expenses = vec![expense(40_000, "Food")];
        assert_eq!(net_balance(&incomes, &expenses), 60_000);
    }
}
