//! Exchange-rate snapshot and refresh bookkeeping.
//!
//! Stored amounts are in the base currency (USD). A [`RateSet`] holds the
//! multiplier from USD to each supported currency; conversion between two
//! non-base currencies goes through USD. The engine never fetches rates
//! itself: the app binary refreshes the shared [`RateCache`] at most hourly
//! and keeps the last-known set when the fetch fails.

use std::collections::HashMap;

use chrono::{DateTime, TimeDelta, Utc};

use crate::{Currency, EngineError, Money};

/// Minimum age in seconds before a cached rate set is refreshed again.
pub const REFRESH_INTERVAL_SECS: i64 = 3600;

/// Hardcoded rates used until the first successful fetch.
pub fn fallback_rates() -> RateSet {
    RateSet::new(0.85, 4.5)
}

/// Exchange rates relative to the base currency (USD).
#[derive(Clone, Debug, PartialEq)]
pub struct RateSet {
    rates: HashMap<Currency, f64>,
}

impl RateSet {
    /// Builds a set from the USD→EUR and USD→RON multipliers.
    #[must_use]
    pub fn new(eur: f64, ron: f64) -> Self {
        let mut rates = HashMap::new();
        rates.insert(Currency::Usd, 1.0);
        rates.insert(Currency::Eur, eur);
        rates.insert(Currency::Ron, ron);
        Self { rates }
    }

    /// Multiplier from USD to `currency`.
    pub fn rate(&self, currency: Currency) -> Result<f64, EngineError> {
        self.rates.get(&currency).copied().ok_or_else(|| {
            EngineError::InvalidCurrency(format!("no rate for {}", currency.code()))
        })
    }

    /// Converts a major-unit amount between two currencies.
    ///
    /// Same-currency conversion is the identity. Anything else goes through
    /// the base unit: source→USD, then USD→target.
    pub fn convert(&self, amount: f64, from: Currency, to: Currency) -> Result<f64, EngineError> {
        if from == to {
            return Ok(amount);
        }

        let usd = amount / self.rate(from)?;
        Ok(usd * self.rate(to)?)
    }

    /// Converts a minor-unit amount, rounding to the nearest minor unit of
    /// the target currency.
    pub fn convert_minor(
        &self,
        amount: Money,
        from: Currency,
        to: Currency,
    ) -> Result<Money, EngineError> {
        let converted = self.convert(amount.minor() as f64, from, to)?;
        Ok(Money::new(converted.round() as i64))
    }
}

impl Default for RateSet {
    fn default() -> Self {
        fallback_rates()
    }
}

/// Last-known rates plus the time they were fetched.
///
/// `fetched_at` is `None` until the first successful fetch, so the fallback
/// set is immediately considered stale.
#[derive(Clone, Debug, Default)]
pub struct RateCache {
    set: RateSet,
    fetched_at: Option<DateTime<Utc>>,
}

impl RateCache {
    #[must_use]
    pub fn set(&self) -> &RateSet {
        &self.set
    }

    #[must_use]
    pub fn fetched_at(&self) -> Option<DateTime<Utc>> {
        self.fetched_at
    }

    /// `true` when the cache has never been filled or is older than
    /// [`REFRESH_INTERVAL_SECS`].
    #[must_use]
    pub fn needs_refresh(&self, now: DateTime<Utc>) -> bool {
        match self.fetched_at {
            None => true,
            Some(at) => now - at > TimeDelta::seconds(REFRESH_INTERVAL_SECS),
        }
    }

    /// Replaces the cached set after a successful fetch.
    ///
    /// On fetch failure callers simply skip this call: the last-known (or
    /// fallback) set stays in place so conversion keeps working.
    pub fn update(&mut self, set: RateSet, now: DateTime<Utc>) {
        self.set = set;
        self.fetched_at = Some(now);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_currency_is_identity() {
        let rates = RateSet::new(0.9, 5.0);
        assert_eq!(rates.convert(123.45, Currency::Ron, Currency::Ron).unwrap(), 123.45);
    }

    #[test]
    fn cross_rate_goes_through_base() {
        let rates = RateSet::new(0.5, 4.0);
        // 100 EUR -> 200 USD -> 800 RON
        let ron = rates.convert(100.0, Currency::Eur, Currency::Ron).unwrap();
        assert!((ron - 800.0).abs() < 1e-9);

        let ron_minor = rates
            .convert_minor(Money::new(10_000), Currency::Eur, Currency::Ron)
            .unwrap();
        assert_eq!(ron_minor, Money::new(80_000));
    }

    #[test]
    fn round_trip_within_tolerance() {
        let rates = RateSet::new(0.8537, 4.4721);
        let amount = 1234.56;
        let there = rates.convert(amount, Currency::Usd, Currency::Ron).unwrap();
        let back = rates.convert(there, Currency::Ron, Currency::Usd).unwrap();
        assert!((back - amount).abs() < 1e-9);
    }

    #[test]
    fn cache_refresh_policy_is_hourly() {
        let mut cache = RateCache::default();
        let now = Utc::now();
        assert!(cache.needs_refresh(now));

        cache.update(RateSet::new(0.9, 4.6), now);
        assert!(!cache.needs_refresh(now + TimeDelta::minutes(59)));
        assert!(cache.needs_refresh(now + TimeDelta::minutes(61)));
    }

    #[test]
    fn failed_fetch_keeps_last_known() {
        let mut cache = RateCache::default();
        let now = Utc::now();
        cache.update(RateSet::new(0.9, 4.6), now);

        // A failed fetch never calls `update`; the set is untouched.
        assert_eq!(cache.set().rate(Currency::Eur).unwrap(), 0.9);
    }
}
