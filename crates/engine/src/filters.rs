//! Record filtering.
//!
//! Each filter narrows an owned collection in place, preserving the
//! original relative order. Filters compose by plain chaining; there is no
//! combinator layer. Dates are calendar dates, so time-of-day can never
//! leak into a comparison.

use chrono::{Datelike, NaiveDate};

use crate::transactions::{Attributed, Entry, Scope};

/// Keeps entries with `start <= date <= end` (inclusive on both ends).
#[must_use]
pub fn by_date_range<T: Entry>(mut items: Vec<T>, start: NaiveDate, end: NaiveDate) -> Vec<T> {
    items.retain(|item| {
        let date = item.date();
        start <= date && date <= end
    });
    items
}

/// Keeps entries whose calendar month and year match exactly.
///
/// `month` is 1-based (January = 1), matching `chrono`.
#[must_use]
pub fn by_month<T: Entry>(mut items: Vec<T>, month: u32, year: i32) -> Vec<T> {
    items.retain(|item| {
        let date = item.date();
        date.month() == month && date.year() == year
    });
    items
}

/// Keeps entries whose calendar year matches exactly.
#[must_use]
pub fn by_year<T: Entry>(mut items: Vec<T>, year: i32) -> Vec<T> {
    items.retain(|item| item.date().year() == year);
    items
}

/// Keeps entries with the given personal/household classification.
#[must_use]
pub fn by_scope<T: Attributed>(mut items: Vec<T>, scope: Scope) -> Vec<T> {
    items.retain(|item| item.scope() == scope);
    items
}

/// Keeps entries owned by the given member.
#[must_use]
pub fn by_member<T: Attributed>(mut items: Vec<T>, user_id: &str) -> Vec<T> {
    items.retain(|item| item.user_id() == user_id);
    items
}
