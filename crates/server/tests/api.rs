use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use base64::Engine as _;
use http_body_util::BodyExt;
use migration::MigratorTrait;
use sea_orm::{ConnectionTrait, Database, Statement};
use serde_json::{Value, json};
use std::sync::Arc;
use tokio::sync::RwLock;
use tower::ServiceExt;

use engine::{Engine, RateCache};

async fn test_app() -> (Router, Engine) {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let backend = db.get_database_backend();
    for (username, name, email) in [
        ("alice", "Ana Popescu", "ana@example.com"),
        ("bob", "Ion Popescu", "ion@example.com"),
    ] {
        db.execute(Statement::from_sql_and_values(
            backend,
            "INSERT INTO users (username, password, name, email) VALUES (?, ?, ?, ?)",
            vec![
                username.into(),
                "password".into(),
                name.into(),
                email.into(),
            ],
        ))
        .await
        .unwrap();
    }

    let engine = Engine::builder().database(db.clone()).build();
    let rates = Arc::new(RwLock::new(RateCache::default()));
    let app = server::app(engine.clone(), db, rates);
    (app, engine)
}

fn basic_auth(username: &str, password: &str) -> String {
    let encoded = base64::engine::general_purpose::STANDARD.encode(format!("{username}:{password}"));
    format!("Basic {encoded}")
}

async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    username: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, basic_auth(username, "password"));

    let request = match body {
        Some(value) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(value.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

fn expense_body(title: &str, amount: i64, category: &str, date: &str) -> Value {
    json!({
        "title": title,
        "amount_minor": amount,
        "category": category,
        "date": date,
        "description": null,
        "paid_by": "user",
    })
}

#[tokio::test]
async fn wrong_credentials_are_rejected() {
    let (app, _engine) = test_app().await;

    let request = Request::builder()
        .uri("/expenses")
        .header(header::AUTHORIZATION, basic_auth("alice", "wrong"))
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn expense_create_and_list() {
    let (app, _engine) = test_app().await;

    let (status, created) = send(
        &app,
        "POST",
        "/expenses",
        "alice",
        Some(expense_body("Groceries", 4_599, "Food & Dining", "2026-03-10")),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(created["id"].is_string());

    let (status, body) = send(&app, "GET", "/expenses", "alice", None).await;
    assert_eq!(status, StatusCode::OK);
    let expenses = body["expenses"].as_array().unwrap();
    assert_eq!(expenses.len(), 1);
    assert_eq!(expenses[0]["title"], "Groceries");
    assert_eq!(expenses[0]["amount_minor"], 4_599);
    assert_eq!(expenses[0]["paid_by"], "user");
    assert_eq!(expenses[0]["date"], "2026-03-10");

    // Another user sees nothing.
    let (_, body) = send(&app, "GET", "/expenses", "bob", None).await;
    assert!(body["expenses"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn expense_list_honors_query_filters() {
    let (app, _engine) = test_app().await;

    send(
        &app,
        "POST",
        "/expenses",
        "alice",
        Some(expense_body("Groceries", 1_000, "Food & Dining", "2026-03-10")),
    )
    .await;
    let mut household = expense_body("Fuel", 2_000, "Transportation", "2026-03-20");
    household["paid_by"] = json!("household");
    send(&app, "POST", "/expenses", "alice", Some(household)).await;
    send(
        &app,
        "POST",
        "/expenses",
        "alice",
        Some(expense_body("Trip", 3_000, "Travel", "2026-04-02")),
    )
    .await;

    // Inclusive date range.
    let (_, body) = send(
        &app,
        "GET",
        "/expenses?from=2026-03-10&to=2026-03-20",
        "alice",
        None,
    )
    .await;
    assert_eq!(body["expenses"].as_array().unwrap().len(), 2);

    // Month + scope compose.
    let (_, body) = send(
        &app,
        "GET",
        "/expenses?month=3&year=2026&scope=household",
        "alice",
        None,
    )
    .await;
    let expenses = body["expenses"].as_array().unwrap();
    assert_eq!(expenses.len(), 1);
    assert_eq!(expenses[0]["title"], "Fuel");

    let (status, _) = send(&app, "GET", "/expenses?month=3", "alice", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn invalid_amount_is_unprocessable() {
    let (app, _engine) = test_app().await;

    let (status, body) = send(
        &app,
        "POST",
        "/expenses",
        "alice",
        Some(expense_body("Nothing", 0, "Food & Dining", "2026-03-10")),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn updating_a_missing_expense_is_not_found() {
    let (app, _engine) = test_app().await;

    let (status, _) = send(
        &app,
        "PUT",
        &format!("/expenses/{}", uuid::Uuid::new_v4()),
        "alice",
        Some(expense_body("Groceries", 4_599, "Food & Dining", "2026-03-10")),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn foreign_records_cannot_be_deleted() {
    let (app, _engine) = test_app().await;

    let (_, created) = send(
        &app,
        "POST",
        "/expenses",
        "alice",
        Some(expense_body("Groceries", 4_599, "Food & Dining", "2026-03-10")),
    )
    .await;
    let id = created["id"].as_str().unwrap().to_string();

    let (status, _) = send(&app, "DELETE", &format!("/expenses/{id}"), "bob", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, body) = send(&app, "GET", "/expenses", "alice", None).await;
    assert_eq!(body["expenses"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn budget_status_reports_overspend() {
    let (app, _engine) = test_app().await;

    send(
        &app,
        "POST",
        "/budgets",
        "alice",
        Some(json!({"category": "Food & Dining", "amount_minor": 12_000, "period": "monthly"})),
    )
    .await;
    send(
        &app,
        "POST",
        "/expenses",
        "alice",
        Some(expense_body("Groceries", 10_000, "Food & Dining", "2026-03-10")),
    )
    .await;
    send(
        &app,
        "POST",
        "/expenses",
        "alice",
        Some(expense_body("Restaurant", 5_000, "Food & Dining", "2026-03-12")),
    )
    .await;

    let (status, body) = send(&app, "GET", "/budgets/status", "alice", None).await;
    assert_eq!(status, StatusCode::OK);
    let statuses = body["statuses"].as_array().unwrap();
    assert_eq!(statuses.len(), 1);
    assert_eq!(statuses[0]["spent_minor"], 15_000);
    assert_eq!(statuses[0]["remaining_minor"], -3_000);
    // The display bar saturates while the flag still fires.
    assert_eq!(statuses[0]["percentage"], 100.0);
    assert_eq!(statuses[0]["is_over_budget"], true);
}

#[tokio::test]
async fn activating_a_goal_deactivates_the_previous_one() {
    let (app, _engine) = test_app().await;

    send(
        &app,
        "POST",
        "/titheGoals",
        "alice",
        Some(json!({"target_percentage": 10.0, "period": "monthly", "is_active": true})),
    )
    .await;
    send(
        &app,
        "POST",
        "/titheGoals",
        "alice",
        Some(json!({"target_percentage": 12.0, "period": "monthly", "is_active": true})),
    )
    .await;

    let (_, body) = send(&app, "GET", "/titheGoals", "alice", None).await;
    let goals = body["goals"].as_array().unwrap();
    assert_eq!(goals.len(), 2);
    let active: Vec<_> = goals.iter().filter(|g| g["is_active"] == true).collect();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0]["target_percentage"], 12.0);
}

#[tokio::test]
async fn categories_fall_back_to_the_built_in_set() {
    let (app, _engine) = test_app().await;

    let (status, body) = send(&app, "GET", "/categories?kind=expense", "alice", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["defaults"], true);
    assert_eq!(body["categories"].as_array().unwrap().len(), 9);

    send(
        &app,
        "POST",
        "/categories",
        "alice",
        Some(json!({"name": "Books", "color": "#06b6d4", "icon": "BookOpen", "kind": "expense"})),
    )
    .await;

    let (_, body) = send(&app, "GET", "/categories?kind=expense", "alice", None).await;
    assert_eq!(body["defaults"], false);
    let categories = body["categories"].as_array().unwrap();
    assert_eq!(categories.len(), 1);
    assert_eq!(categories[0]["name"], "Books");

    // The income side still serves its own defaults.
    let (_, body) = send(&app, "GET", "/categories?kind=income", "alice", None).await;
    assert_eq!(body["defaults"], true);
}

#[tokio::test]
async fn family_membership_is_admin_gated() {
    let (app, engine) = test_app().await;
    engine
        .bootstrap_family("popescu", "alice", "Ana", chrono::Utc::now())
        .await
        .unwrap();

    let (status, _) = send(
        &app,
        "POST",
        "/family/members",
        "alice",
        Some(json!({"username": "bob", "nickname": "Ion", "role": "user"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, body) = send(&app, "GET", "/family/members", "bob", None).await;
    assert_eq!(body["family_id"], "popescu");
    let members = body["members"].as_array().unwrap();
    assert_eq!(members.len(), 2);

    // Profile data comes along from the member accounts.
    let ion = members.iter().find(|m| m["username"] == "bob").unwrap();
    assert_eq!(ion["nickname"], "Ion");
    assert_eq!(ion["name"], "Ion Popescu");
    assert_eq!(ion["email"], "ion@example.com");

    // Plain members cannot add further members.
    let (status, _) = send(
        &app,
        "POST",
        "/family/members",
        "bob",
        Some(json!({"username": "carol", "nickname": "Carol", "role": "user"})),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // Unknown accounts cannot be added at all.
    let (status, _) = send(
        &app,
        "POST",
        "/family/members",
        "alice",
        Some(json!({"username": "nobody", "nickname": "X", "role": "user"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn summary_filters_by_month_and_scope() {
    let (app, _engine) = test_app().await;

    send(
        &app,
        "POST",
        "/incomes",
        "alice",
        Some(json!({
            "title": "Salary",
            "amount_minor": 100_000,
            "category": "Salary",
            "date": "2026-03-01",
            "description": null,
            "earned_by": "user",
        })),
    )
    .await;
    send(
        &app,
        "POST",
        "/expenses",
        "alice",
        Some(expense_body("Groceries", 40_000, "Food & Dining", "2026-03-10")),
    )
    .await;
    // Outside the queried month.
    send(
        &app,
        "POST",
        "/expenses",
        "alice",
        Some(expense_body("Trip", 99_000, "Travel", "2026-04-02")),
    )
    .await;

    let (status, body) = send(
        &app,
        "GET",
        "/stats/summary?month=3&year=2026",
        "alice",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_income_minor"], 100_000);
    assert_eq!(body["total_expenses_minor"], 40_000);
    assert_eq!(body["net_balance_minor"], 60_000);
    assert_eq!(body["average_expense_minor"], 40_000.0);
    assert_eq!(body["top_expense_categories"][0]["category"], "Food & Dining");

    // month without year is rejected
    let (status, _) = send(&app, "GET", "/stats/summary?month=3", "alice", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn tithe_summary_reports_giving_against_expenses() {
    let (app, _engine) = test_app().await;

    send(
        &app,
        "POST",
        "/expenses",
        "alice",
        Some(expense_body("Rent", 80_000, "Bills & Utilities", "2026-03-01")),
    )
    .await;
    send(
        &app,
        "POST",
        "/tithes",
        "alice",
        Some(json!({
            "amount_minor": 8_000,
            "date": "2026-03-05",
            "description": null,
            "recipient": "parish",
        })),
    )
    .await;
    send(
        &app,
        "POST",
        "/titheGoals",
        "alice",
        Some(json!({"target_percentage": 10.0, "period": "monthly", "is_active": true})),
    )
    .await;

    let (status, body) = send(&app, "GET", "/stats/tithes", "alice", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_tithes_minor"], 8_000);
    assert_eq!(body["expense_base_minor"], 80_000);
    assert_eq!(body["giving_percentage"], 10.0);
    assert_eq!(body["active_goal"]["progress"], 100.0);
}

#[tokio::test]
async fn rates_serve_the_fallback_until_fetched() {
    let (app, _engine) = test_app().await;

    let (status, body) = send(&app, "GET", "/rates", "alice", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["base"], "USD");
    assert!(body["fetched_at"].is_null());
    assert!(body["conversion"].is_null());

    let rates = body["rates"].as_array().unwrap();
    let eur = rates.iter().find(|r| r["currency"] == "EUR").unwrap();
    assert_eq!(eur["rate"], 0.85);
    let ron = rates.iter().find(|r| r["currency"] == "RON").unwrap();
    assert_eq!(ron["rate"], 4.5);
}

#[tokio::test]
async fn rates_convert_amounts_for_display() {
    let (app, _engine) = test_app().await;

    // 100 USD at the fallback 4.5 rate.
    let (status, body) = send(
        &app,
        "GET",
        "/rates?amount_minor=10000&from=USD&to=RON",
        "alice",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["conversion"]["currency"], "RON");
    assert_eq!(body["conversion"]["amount_minor"], 45_000);
    assert_eq!(body["conversion"]["display"], "450,00 lei");

    // A partial conversion query is rejected.
    let (status, _) = send(&app, "GET", "/rates?amount_minor=10000&from=USD", "alice", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
