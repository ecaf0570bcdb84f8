use std::fmt;

use crate::Currency;

/// Minor-unit amount (cents) paired with its presentation helpers.
///
/// Records and aggregates carry raw `i64` minor units of the base currency;
/// `Money` wraps such a value at the presentation boundary, where converted
/// amounts are rounded and rendered per currency.
///
/// # Examples
///
/// ```rust
/// use engine::{Currency, Money};
///
/// let amount = Money::new(1050);
/// assert_eq!(amount.minor(), 1050);
/// assert_eq!(amount.to_string(), "10.50");
/// assert_eq!(amount.format(Currency::Eur), "10,50 €");
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct Money(i64);

impl Money {
    /// Creates a new amount from integer minor units.
    #[must_use]
    pub const fn new(minor: i64) -> Self {
        Self(minor)
    }

    /// Returns the raw value in minor units.
    #[must_use]
    pub const fn minor(self) -> i64 {
        self.0
    }

    /// Formats the amount following the currency's locale conventions.
    ///
    /// USD uses the en-US prefix style (`$1,234.56`); EUR and RON trail the
    /// symbol with `.` grouping and `,` decimals (`1.234,56 €`).
    #[must_use]
    pub fn format(self, currency: Currency) -> String {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let major = abs / 100;
        let minor = abs % 100;

        let (group_sep, decimal_sep) = if currency.symbol_trails() {
            ('.', ',')
        } else {
            (',', '.')
        };
        let grouped = group_digits(major, group_sep);

        if currency.symbol_trails() {
            format!(
                "{sign}{grouped}{decimal_sep}{minor:02} {}",
                currency.symbol()
            )
        } else {
            format!("{sign}{}{grouped}{decimal_sep}{minor:02}", currency.symbol())
        }
    }
}

/// Inserts `sep` between groups of three digits.
fn group_digits(value: u64, sep: char) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    let offset = digits.len() % 3;
    for (i, c) in digits.chars().enumerate() {
        if i != 0 && (i + 3 - offset) % 3 == 0 {
            out.push(sep);
        }
        out.push(c);
    }
    out
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{sign}{}.{:02}", abs / 100, abs % 100)
    }
}

impl From<i64> for Money {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl From<Money> for i64 {
    fn from(value: Money) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_follows_locale_conventions() {
        assert_eq!(Money::new(0).format(Currency::Usd), "$0.00");
        assert_eq!(Money::new(1050).format(Currency::Usd), "$10.50");
        assert_eq!(Money::new(123_456_789).format(Currency::Usd), "$1,234,567.89");
        assert_eq!(Money::new(123_456_789).format(Currency::Eur), "1.234.567,89 €");
        assert_eq!(Money::new(-1050).format(Currency::Ron), "-10,50 lei");
    }

    #[test]
    fn display_uses_a_plain_decimal_point() {
        assert_eq!(Money::new(-305).to_string(), "-3.05");
        assert_eq!(Money::new(7).to_string(), "0.07");
    }
}
