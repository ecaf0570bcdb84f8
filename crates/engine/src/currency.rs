use serde::{Deserialize, Serialize};

use crate::EngineError;

/// ISO-like currency code for display amounts.
///
/// Record amounts are stored as an `i64` number of **minor units** of the
/// base currency (`USD`). Other currencies only exist at presentation time:
/// a `RateSet` converts between them and `Money::format` renders the result.
///
/// Example: USD has 2 minor units, so `10.50 USD` ⇄ `1050`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    /// Base unit for stored amounts and exchange rates.
    #[default]
    Usd,
    Eur,
    Ron,
}

impl Currency {
    /// Canonical currency code.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Currency::Usd => "USD",
            Currency::Eur => "EUR",
            Currency::Ron => "RON",
        }
    }

    /// Conventional currency symbol.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Currency::Usd => "$",
            Currency::Eur => "€",
            Currency::Ron => "lei",
        }
    }

    /// `true` for currencies whose locale writes the symbol after the
    /// amount with `.` grouping and `,` decimals (EUR via de-DE, RON via
    /// ro-RO). USD keeps the en-US prefix style.
    #[must_use]
    pub const fn symbol_trails(self) -> bool {
        match self {
            Currency::Usd => false,
            Currency::Eur | Currency::Ron => true,
        }
    }
}

impl core::fmt::Display for Currency {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.code())
    }
}

impl TryFrom<&str> for Currency {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_uppercase().as_str() {
            "USD" => Ok(Currency::Usd),
            "EUR" => Ok(Currency::Eur),
            "RON" => Ok(Currency::Ron),
            other => Err(EngineError::InvalidCurrency(format!(
                "unsupported currency: {other}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!(Currency::try_from("ron").unwrap(), Currency::Ron);
        assert_eq!(Currency::try_from(" EUR ").unwrap(), Currency::Eur);
    }

    #[test]
    fn unknown_code_is_invalid_currency() {
        assert!(matches!(
            Currency::try_from("GBP"),
            Err(EngineError::InvalidCurrency(_))
        ));
    }
}
