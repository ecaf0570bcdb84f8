//! Background refresh of the shared exchange-rate cache.
//!
//! The loop polls the upstream feed and updates the cache only when it is
//! stale per [`RateCache::needs_refresh`]. A failed fetch logs and leaves
//! the last-known set (initially the fallback) in place.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use engine::{RateCache, RateSet};
use serde::Deserialize;
use tokio::sync::RwLock;

pub const DEFAULT_URL: &str = "https://api.exchangerate-api.com/v4/latest/USD";

#[derive(Debug, Deserialize)]
struct RatesPayload {
    rates: HashMap<String, f64>,
}

pub async fn refresh_loop(url: String, poll_interval: Duration, cache: Arc<RwLock<RateCache>>) {
    let client = reqwest::Client::new();

    loop {
        let now = Utc::now();
        if cache.read().await.needs_refresh(now) {
            match fetch(&client, &url).await {
                Ok(set) => {
                    cache.write().await.update(set, now);
                    tracing::info!("exchange rates refreshed");
                }
                Err(err) => {
                    tracing::warn!("rate fetch failed, keeping last known set: {err}");
                }
            }
        }
        tokio::time::sleep(poll_interval).await;
    }
}

async fn fetch(
    client: &reqwest::Client,
    url: &str,
) -> Result<RateSet, Box<dyn std::error::Error + Send + Sync>> {
    let payload: RatesPayload = client
        .get(url)
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;

    let eur = payload
        .rates
        .get("EUR")
        .copied()
        .ok_or("missing EUR rate")?;
    let ron = payload
        .rates
        .get("RON")
        .copied()
        .ok_or("missing RON rate")?;

    Ok(RateSet::new(eur, ron))
}
