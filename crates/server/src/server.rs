use axum::{
    Router,
    extract::{Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::Response,
    routing::{delete, get, put},
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Basic},
};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};
use tokio::sync::RwLock;

use std::sync::Arc;

use crate::{budgets, categories, expenses, family, incomes, rates, statistics, tithes, user};
use engine::{Engine, RateCache};

#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<Engine>,
    pub db: DatabaseConnection,
    pub rates: Arc<RwLock<RateCache>>,
}

async fn auth(
    auth_header: TypedHeader<Authorization<Basic>>,
    State(state): State<ServerState>,
    mut request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    if auth_header.username().is_empty() || auth_header.password().is_empty() {
        return Err(StatusCode::UNAUTHORIZED);
    }

    let user: Option<user::Model> = user::Entity::find()
        .filter(user::Column::Username.eq(auth_header.username()))
        .filter(user::Column::Password.eq(auth_header.password()))
        .one(&state.db)
        .await
        .map_err(|_| StatusCode::UNAUTHORIZED)?;

    let Some(user) = user else {
        return Err(StatusCode::UNAUTHORIZED);
    };

    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

fn router(state: ServerState) -> Router {
    Router::new()
        .route("/expenses", get(expenses::list).post(expenses::create))
        .route(
            "/expenses/{id}",
            put(expenses::update).delete(expenses::remove),
        )
        .route("/incomes", get(incomes::list).post(incomes::create))
        .route(
            "/incomes/{id}",
            put(incomes::update).delete(incomes::remove),
        )
        .route("/budgets", get(budgets::list).post(budgets::create))
        .route("/budgets/status", get(budgets::status))
        .route(
            "/budgets/{id}",
            put(budgets::update).delete(budgets::remove),
        )
        .route("/tithes", get(tithes::list).post(tithes::create))
        .route("/tithes/{id}", put(tithes::update).delete(tithes::remove))
        .route(
            "/titheGoals",
            get(tithes::list_goals).post(tithes::create_goal),
        )
        .route("/titheGoals/{id}", delete(tithes::remove_goal))
        .route(
            "/categories",
            get(categories::list).post(categories::create),
        )
        .route(
            "/categories/{id}",
            put(categories::update).delete(categories::remove),
        )
        .route("/family/members", get(family::list).post(family::create))
        .route("/family/members/{id}", delete(family::remove))
        .route("/stats/summary", get(statistics::summary))
        .route("/stats/tithes", get(statistics::tithe_summary))
        .route("/rates", get(rates::get))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth))
        .with_state(state)
}

/// Builds the routed application, for serving or in-process testing.
pub fn app(engine: Engine, db: DatabaseConnection, rates: Arc<RwLock<RateCache>>) -> Router {
    router(ServerState {
        engine: Arc::new(engine),
        db,
        rates,
    })
}

pub async fn run(engine: Engine, db: DatabaseConnection, rates: Arc<RwLock<RateCache>>) {
    let listener = match tokio::net::TcpListener::bind("127.0.0.1:3000").await {
        Ok(listener) => listener,
        Err(err) => {
            tracing::error!("failed to bind server listener: {err}");
            return;
        }
    };
    if let Err(err) = run_with_listener(engine, db, rates, listener).await {
        tracing::error!("server failed: {err}");
    }
}

pub async fn run_with_listener(
    engine: Engine,
    db: DatabaseConnection,
    rates: Arc<RwLock<RateCache>>,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    let state = ServerState {
        engine: Arc::new(engine),
        db,
        rates,
    };

    axum::serve(listener, router(state)).await
}

pub fn spawn_with_listener(
    engine: Engine,
    db: DatabaseConnection,
    rates: Arc<RwLock<RateCache>>,
    listener: tokio::net::TcpListener,
) -> Result<std::net::SocketAddr, std::io::Error> {
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        if let Err(err) = run_with_listener(engine, db, rates, listener).await {
            tracing::error!("server failed: {err}");
        }
    });

    Ok(addr)
}
