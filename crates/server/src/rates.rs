//! Exchange-rate endpoint.
//!
//! Serves whatever the shared cache holds; the app binary refreshes it in
//! the background, so a failed upstream fetch never surfaces here. A query
//! string may additionally ask for one amount to be converted and formatted
//! for display.

use axum::{
    Extension, Json,
    extract::{Query, State},
};
use engine::Money;

use api_types::{
    Currency,
    rates::{ConversionView, RateView, RatesQuery, RatesView},
};

use crate::{ServerError, server::ServerState, user};

fn currency_view(currency: engine::Currency) -> Currency {
    match currency {
        engine::Currency::Usd => Currency::Usd,
        engine::Currency::Eur => Currency::Eur,
        engine::Currency::Ron => Currency::Ron,
    }
}

fn currency_from(currency: Currency) -> engine::Currency {
    match currency {
        Currency::Usd => engine::Currency::Usd,
        Currency::Eur => engine::Currency::Eur,
        Currency::Ron => engine::Currency::Ron,
    }
}

pub async fn get(
    Extension(_user): Extension<user::Model>,
    State(state): State<ServerState>,
    Query(query): Query<RatesQuery>,
) -> Result<Json<RatesView>, ServerError> {
    let cache = state.rates.read().await;

    let mut rates = Vec::new();
    for currency in [
        engine::Currency::Usd,
        engine::Currency::Eur,
        engine::Currency::Ron,
    ] {
        let rate = cache.set().rate(currency)?;
        rates.push(RateView {
            currency: currency_view(currency),
            rate,
        });
    }

    let conversion = match (query.amount_minor, query.from, query.to) {
        (None, None, None) => None,
        (Some(amount), Some(from), Some(to)) => {
            let converted = cache.set().convert_minor(
                Money::new(amount),
                currency_from(from),
                currency_from(to),
            )?;
            Some(ConversionView {
                currency: to,
                amount_minor: converted.minor(),
                display: converted.format(currency_from(to)),
            })
        }
        _ => {
            return Err(ServerError::Generic(
                "conversion needs amount_minor, from and to".to_string(),
            ));
        }
    };

    Ok(Json(RatesView {
        base: Currency::Usd,
        rates,
        conversion,
        fetched_at: cache.fetched_at(),
    }))
}
