use axum::{Json, http::StatusCode, response::IntoResponse};
use engine::EngineError;

use serde::Serialize;
pub use server::{ServerState, app, run, run_with_listener, spawn_with_listener};

mod budgets;
mod categories;
mod expenses;
mod family;
mod incomes;
mod listing;
mod rates;
mod server;
mod statistics;
mod tithes;
mod user;
mod views;

pub mod types {
    pub use api_types::ListQuery;

    pub mod expense {
        pub use api_types::expense::{ExpenseCreated, ExpenseUpsert, ExpenseView, ExpensesResponse};
    }

    pub mod income {
        pub use api_types::income::{IncomeCreated, IncomeUpsert, IncomeView, IncomesResponse};
    }

    pub mod budget {
        pub use api_types::budget::{
            BudgetCreated, BudgetStatusResponse, BudgetStatusView, BudgetUpsert, BudgetView,
            BudgetsResponse,
        };
    }

    pub mod tithe {
        pub use api_types::tithe::{
            TitheCreated, TitheGoalCreated, TitheGoalNew, TitheGoalView, TitheGoalsResponse,
            TitheUpsert, TitheView, TithesResponse,
        };
    }

    pub mod category {
        pub use api_types::category::{
            CategoriesResponse, CategoryCreated, CategoryListQuery, CategoryNew, CategoryUpdate,
            CategoryView,
        };
    }

    pub mod family {
        pub use api_types::family::{FamilyRole, MemberCreated, MemberNew, MemberView, MembersResponse};
    }

    pub mod stats {
        pub use api_types::stats::{Summary, SummaryQuery, TitheSummary};
    }

    pub mod rates {
        pub use api_types::rates::{ConversionView, RateView, RatesQuery, RatesView};
    }
}

pub enum ServerError {
    Engine(EngineError),
    Generic(String),
}

#[derive(Serialize)]
struct Error {
    error: String,
}

fn status_for_engine_error(err: &EngineError) -> StatusCode {
    match err {
        EngineError::Forbidden(_) => StatusCode::FORBIDDEN,
        EngineError::KeyNotFound(_) => StatusCode::NOT_FOUND,
        EngineError::ExistingKey(_) => StatusCode::CONFLICT,
        EngineError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        EngineError::InvalidAmount(_)
        | EngineError::InvalidDate(_)
        | EngineError::InvalidPercentage(_)
        | EngineError::InvalidCurrency(_)
        | EngineError::InvalidField(_) => StatusCode::UNPROCESSABLE_ENTITY,
    }
}

fn message_for_engine_error(err: EngineError) -> String {
    match err {
        EngineError::Database(db_err) => {
            tracing::error!("database error: {db_err}");
            "internal server error".to_string()
        }
        other => other.to_string(),
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> axum::response::Response {
        let (status, error) = match self {
            ServerError::Engine(err) => {
                (status_for_engine_error(&err), message_for_engine_error(err))
            }
            ServerError::Generic(err) => (StatusCode::BAD_REQUEST, err),
        };

        (status, Json(Error { error })).into_response()
    }
}

impl From<EngineError> for ServerError {
    fn from(value: EngineError) -> Self {
        Self::Engine(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn engine_forbidden_maps_to_403() {
        let res = ServerError::from(EngineError::Forbidden("forbidden".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn engine_not_found_maps_to_404() {
        let res = ServerError::from(EngineError::KeyNotFound("x".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn engine_conflict_maps_to_409() {
        let res = ServerError::from(EngineError::ExistingKey("x".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn engine_validation_maps_to_422() {
        let res = ServerError::from(EngineError::InvalidAmount("x".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let res =
            ServerError::from(EngineError::InvalidPercentage("x".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let res = ServerError::from(EngineError::InvalidField("x".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn database_errors_map_to_500() {
        let err = EngineError::Database(sea_orm::DbErr::Custom("boom".to_string()));
        let res = ServerError::from(err).into_response();
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn generic_maps_to_400() {
        let res = ServerError::Generic("bad".to_string()).into_response();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }
}
