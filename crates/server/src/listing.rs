//! Shared query-string filtering for the transaction list endpoints.

use api_types::ListQuery;
use chrono::NaiveDate;
use engine::{Attributed, filters};

use crate::{ServerError, views};

pub fn apply<T: Attributed>(mut items: Vec<T>, query: &ListQuery) -> Result<Vec<T>, ServerError> {
    if query.month.is_some() && query.year.is_none() {
        return Err(ServerError::Generic("month requires year".to_string()));
    }
    if let Some(month) = query.month
        && !(1..=12).contains(&month)
    {
        return Err(ServerError::Generic("month must be 1-12".to_string()));
    }

    if let Some(scope) = query.scope {
        items = filters::by_scope(items, views::scope_from(scope));
    }
    items = match (query.from, query.to) {
        (Some(from), Some(to)) => filters::by_date_range(items, from, to),
        (Some(from), None) => filters::by_date_range(items, from, NaiveDate::MAX),
        (None, Some(to)) => filters::by_date_range(items, NaiveDate::MIN, to),
        (None, None) => items,
    };
    items = match (query.month, query.year) {
        (Some(month), Some(year)) => filters::by_month(items, month, year),
        (None, Some(year)) => filters::by_year(items, year),
        _ => items,
    };

    Ok(items)
}
