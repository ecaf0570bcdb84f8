use chrono::{NaiveDate, Utc};
use migration::MigratorTrait;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Statement};

use engine::{CategoryKind, Engine, EngineError, FamilyRole, Period, Scope};

async fn engine_with_db() -> (Engine, DatabaseConnection) {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let backend = db.get_database_backend();
    for username in ["alice", "bob"] {
        db.execute(Statement::from_sql_and_values(
            backend,
            "INSERT INTO users (username, password) VALUES (?, ?)",
            vec![username.into(), "password".into()],
        ))
        .await
        .unwrap();
    }
    let engine = Engine::builder().database(db.clone()).build();
    (engine, db)
}

fn date(s: &str) -> NaiveDate {
    s.parse().unwrap()
}

#[tokio::test]
async fn expense_roundtrip() {
    let (engine, _db) = engine_with_db().await;

    let id = engine
        .new_expense(
            "Groceries",
            4_599,
            "Food & Dining",
            date("2026-03-10"),
            Some("weekly shop"),
            Scope::Household,
            "alice",
        )
        .await
        .unwrap();

    let expenses = engine.list_expenses("alice").await.unwrap();
    assert_eq!(expenses.len(), 1);
    assert_eq!(expenses[0].id, id);
    assert_eq!(expenses[0].amount_minor, 4_599);
    assert_eq!(expenses[0].paid_by, Scope::Household);

    engine
        .update_expense(
            id,
            "alice",
            "Groceries",
            5_000,
            "Food & Dining",
            date("2026-03-11"),
            None,
            Scope::Personal,
        )
        .await
        .unwrap();
    let expenses = engine.list_expenses("alice").await.unwrap();
    assert_eq!(expenses[0].amount_minor, 5_000);
    assert_eq!(expenses[0].description, None);
    assert_eq!(expenses[0].paid_by, Scope::Personal);

    engine.delete_expense(id, "alice").await.unwrap();
    assert!(engine.list_expenses("alice").await.unwrap().is_empty());
}

#[tokio::test]
async fn records_are_invisible_across_owners() {
    let (engine, _db) = engine_with_db().await;

    let id = engine
        .new_expense(
            "Groceries",
            4_599,
            "Food & Dining",
            date("2026-03-10"),
            None,
            Scope::Personal,
            "alice",
        )
        .await
        .unwrap();

    assert!(engine.list_expenses("bob").await.unwrap().is_empty());
    let err = engine.delete_expense(id, "bob").await.unwrap_err();
    assert!(matches!(err, EngineError::KeyNotFound(_)));

    // Still there for the real owner.
    assert_eq!(engine.list_expenses("alice").await.unwrap().len(), 1);
}

#[tokio::test]
async fn non_positive_amounts_are_rejected() {
    let (engine, _db) = engine_with_db().await;

    let err = engine
        .new_expense(
            "Nothing",
            0,
            "Food & Dining",
            date("2026-03-10"),
            None,
            Scope::Personal,
            "alice",
        )
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidAmount(_)));

    let err = engine
        .new_budget("Food & Dining", -100, Period::Monthly, "alice")
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidAmount(_)));
}

#[tokio::test]
async fn snapshot_collects_every_kind() {
    let (engine, _db) = engine_with_db().await;

    engine
        .new_expense(
            "Groceries",
            4_599,
            "Food & Dining",
            date("2026-03-10"),
            None,
            Scope::Personal,
            "alice",
        )
        .await
        .unwrap();
    engine
        .new_income(
            "Salary",
            350_000,
            "Salary",
            date("2026-03-01"),
            None,
            Scope::Personal,
            "alice",
        )
        .await
        .unwrap();
    engine
        .new_budget("Food & Dining", 30_000, Period::Monthly, "alice")
        .await
        .unwrap();
    engine
        .new_tithe(35_000, date("2026-03-05"), None, "parish", "alice")
        .await
        .unwrap();
    engine
        .new_tithe_goal(10.0, Period::Monthly, true, "alice")
        .await
        .unwrap();
    engine
        .new_category("Books", "#06b6d4", "BookOpen", CategoryKind::Expense, "alice")
        .await
        .unwrap();

    let snapshot = engine.snapshot("alice").await.unwrap();
    assert_eq!(snapshot.expenses.len(), 1);
    assert_eq!(snapshot.incomes.len(), 1);
    assert_eq!(snapshot.budgets.len(), 1);
    assert_eq!(snapshot.tithes.len(), 1);
    assert_eq!(snapshot.tithe_goals.len(), 1);
    assert_eq!(snapshot.categories.len(), 1);

    // Merged listing interleaves both kinds in date order.
    let transactions = snapshot.transactions();
    assert_eq!(transactions.len(), 2);
    assert!(!transactions[0].is_expense());
    assert!(transactions[1].is_expense());
}

#[tokio::test]
async fn family_snapshot_merges_members() {
    let (engine, _db) = engine_with_db().await;

    engine
        .new_expense(
            "Groceries",
            100,
            "Food & Dining",
            date("2026-03-10"),
            None,
            Scope::Household,
            "alice",
        )
        .await
        .unwrap();
    engine
        .new_expense(
            "Fuel",
            200,
            "Transportation",
            date("2026-03-11"),
            None,
            Scope::Household,
            "bob",
        )
        .await
        .unwrap();

    let merged = engine
        .family_snapshot(&["alice".to_string(), "bob".to_string()])
        .await
        .unwrap();
    assert_eq!(merged.expenses.len(), 2);

    let solo = engine.snapshot("alice").await.unwrap();
    assert_eq!(solo.expenses.len(), 1);
}

#[tokio::test]
async fn goal_deactivation_clears_previous_actives() {
    let (engine, _db) = engine_with_db().await;

    engine
        .new_tithe_goal(10.0, Period::Monthly, true, "alice")
        .await
        .unwrap();
    engine.deactivate_tithe_goals("alice").await.unwrap();
    engine
        .new_tithe_goal(12.0, Period::Monthly, true, "alice")
        .await
        .unwrap();

    let goals = engine.list_tithe_goals("alice").await.unwrap();
    let active: Vec<_> = goals.iter().filter(|g| g.is_active).collect();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].target_percentage, 12.0);
}

#[tokio::test]
async fn goal_percentage_bounds_are_enforced() {
    let (engine, _db) = engine_with_db().await;

    for bad in [0.0, -5.0, 100.5] {
        let err = engine
            .new_tithe_goal(bad, Period::Monthly, true, "alice")
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::InvalidPercentage(_)));
    }
}

#[tokio::test]
async fn categories_are_partitioned_by_kind() {
    let (engine, _db) = engine_with_db().await;

    engine
        .new_category("Books", "#06b6d4", "BookOpen", CategoryKind::Expense, "alice")
        .await
        .unwrap();
    let id = engine
        .new_category("Royalties", "#f59e0b", "TrendingUp", CategoryKind::Income, "alice")
        .await
        .unwrap();

    let expense_cats = engine
        .list_categories("alice", CategoryKind::Expense)
        .await
        .unwrap();
    assert_eq!(expense_cats.len(), 1);
    assert_eq!(expense_cats[0].name, "Books");

    engine
        .update_category(id, "alice", "Dividends", "#f59e0b", "TrendingUp")
        .await
        .unwrap();
    let income_cats = engine
        .list_categories("alice", CategoryKind::Income)
        .await
        .unwrap();
    assert_eq!(income_cats[0].name, "Dividends");
    // Kind is immutable through update.
    assert_eq!(income_cats[0].kind, CategoryKind::Income);

    engine.delete_category(id, "alice").await.unwrap();
    assert!(
        engine
            .list_categories("alice", CategoryKind::Income)
            .await
            .unwrap()
            .is_empty()
    );
}

#[tokio::test]
async fn family_admin_manages_members() {
    let (engine, _db) = engine_with_db().await;
    let now = Utc::now();

    engine
        .bootstrap_family("popescu", "alice", "Ana", now)
        .await
        .unwrap();
    let member_id = engine
        .add_family_member("alice", "bob", "Ion", FamilyRole::User, now)
        .await
        .unwrap();

    let members = engine.family_members("alice").await.unwrap();
    assert_eq!(members.len(), 2);
    // Both see the same roster.
    assert_eq!(engine.family_members("bob").await.unwrap().len(), 2);

    // Duplicate membership is rejected.
    let err = engine
        .add_family_member("alice", "bob", "Ion", FamilyRole::User, now)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::ExistingKey(_)));

    // Plain members cannot add.
    let err = engine
        .add_family_member("bob", "carol", "Carol", FamilyRole::User, now)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Forbidden(_)));

    engine.remove_family_member(member_id, "alice").await.unwrap();
    assert_eq!(engine.family_members("alice").await.unwrap().len(), 1);
}

#[tokio::test]
async fn family_admins_cannot_be_removed() {
    let (engine, _db) = engine_with_db().await;
    let now = Utc::now();

    let admin_id = engine
        .bootstrap_family("popescu", "alice", "Ana", now)
        .await
        .unwrap();

    let err = engine
        .remove_family_member(admin_id, "alice")
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Forbidden(_)));
    assert_eq!(engine.family_members("alice").await.unwrap().len(), 1);
}

#[tokio::test]
async fn outsiders_have_no_family_view() {
    let (engine, _db) = engine_with_db().await;
    let now = Utc::now();

    engine
        .bootstrap_family("popescu", "alice", "Ana", now)
        .await
        .unwrap();

    assert!(engine.family_members("bob").await.unwrap().is_empty());
    let err = engine
        .add_family_member("bob", "carol", "Carol", FamilyRole::User, now)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Forbidden(_)));
}
