mod common;

use sea_orm::{EntityTrait, PaginatorTrait};

use common::engine_with_users;
use engine::{Amount, BudgetNewCmd, Category, EngineError, ItemDraft, budgets, expenses, incomes};

#[tokio::test]
async fn create_budget_with_children_computes_revenue() {
    let (engine, _db) = engine_with_users().await;

    let budget = engine
        .create_budget(
            BudgetNewCmd::new("Groceries", "alice")
                .income(ItemDraft::new("100.00").category("WORK"))
                .expense(ItemDraft::new("1.00").category("FOOD")),
        )
        .await
        .unwrap();

    assert_eq!(budget.name, "Groceries");
    assert_eq!(budget.owner, "alice");
    assert!(budget.shared_with.is_empty());
    assert_eq!(budget.incomes.len(), 1);
    assert_eq!(budget.expenses.len(), 1);
    assert_eq!(budget.incomes[0].category, Category::Work);
    assert_eq!(budget.expenses[0].category, Category::Food);
    assert_eq!(budget.revenue(), Amount::from_cents(9_900));
    assert_eq!(budget.revenue().to_string(), "99.00");

    let stored = engine.budget(budget.id, "alice").await.unwrap();
    assert_eq!(stored, budget);
}

#[tokio::test]
async fn empty_budget_has_zero_revenue() {
    let (engine, _db) = engine_with_users().await;

    let budget = engine
        .create_budget(BudgetNewCmd::new("Empty", "alice"))
        .await
        .unwrap();

    assert_eq!(budget.revenue(), Amount::ZERO);
    assert_eq!(budget.revenue().to_string(), "0.00");
}

#[tokio::test]
async fn omitted_category_defaults_to_other() {
    let (engine, _db) = engine_with_users().await;

    let budget = engine
        .create_budget(BudgetNewCmd::new("Misc", "alice").expense(ItemDraft::new("5")))
        .await
        .unwrap();

    assert_eq!(budget.expenses[0].category, Category::Other);
    assert_eq!(budget.expenses[0].budget, format!("Misc (#{})", budget.id));
}

#[tokio::test]
async fn invalid_child_leaves_nothing_behind() {
    let (engine, db) = engine_with_users().await;

    let err = engine
        .create_budget(
            BudgetNewCmd::new("Broken", "alice")
                .income(ItemDraft::new("10.00").category("WORK"))
                .expense(ItemDraft::new("3.00").category("RENT")),
        )
        .await
        .unwrap_err();

    let EngineError::Validation(errors) = err else {
        panic!("expected validation error, got {err:?}");
    };
    assert!(errors.contains("expenses[0].category"));
    assert!(!errors.contains("incomes[0].category"));

    assert_eq!(budgets::Entity::find().count(&db).await.unwrap(), 0);
    assert_eq!(incomes::Entity::find().count(&db).await.unwrap(), 0);
    assert_eq!(expenses::Entity::find().count(&db).await.unwrap(), 0);
}

#[tokio::test]
async fn amount_precision_is_enforced() {
    let (engine, _db) = engine_with_users().await;

    let err = engine
        .create_budget(
            BudgetNewCmd::new("Big", "alice")
                .income(ItemDraft::new("10000.00"))
                .expense(ItemDraft::new("1.005")),
        )
        .await
        .unwrap_err();

    let EngineError::Validation(errors) = err else {
        panic!("expected validation error, got {err:?}");
    };
    assert!(errors.contains("incomes[0].amount"));
    assert!(errors.contains("expenses[0].amount"));
}

#[tokio::test]
async fn blank_name_is_rejected() {
    let (engine, _db) = engine_with_users().await;

    let err = engine
        .create_budget(BudgetNewCmd::new("   ", "alice"))
        .await
        .unwrap_err();

    let EngineError::Validation(errors) = err else {
        panic!("expected validation error, got {err:?}");
    };
    assert!(errors.contains("name"));
}

#[tokio::test]
async fn list_budgets_returns_owned_and_shared_only() {
    let (engine, _db) = engine_with_users().await;

    let a1 = engine
        .create_budget(BudgetNewCmd::new("A1", "alice"))
        .await
        .unwrap();
    let b1 = engine
        .create_budget(BudgetNewCmd::new("B1", "bob"))
        .await
        .unwrap();
    let b2 = engine
        .create_budget(BudgetNewCmd::new("B2", "bob"))
        .await
        .unwrap();
    let c1 = engine
        .create_budget(BudgetNewCmd::new("C1", "carol"))
        .await
        .unwrap();
    engine.share_budget(b2.id, "alice", "bob").await.unwrap();

    let ids = |budgets: Vec<engine::Budget>| budgets.into_iter().map(|b| b.id).collect::<Vec<_>>();

    assert_eq!(
        ids(engine.list_budgets("alice").await.unwrap()),
        vec![a1.id, b2.id]
    );
    assert_eq!(
        ids(engine.list_budgets("bob").await.unwrap()),
        vec![b1.id, b2.id]
    );
    assert_eq!(ids(engine.list_budgets("carol").await.unwrap()), vec![c1.id]);
    assert!(engine.list_budgets("nobody").await.unwrap().is_empty());
}

#[tokio::test]
async fn get_budget_checks_existence_then_access() {
    let (engine, _db) = engine_with_users().await;

    let budget = engine
        .create_budget(BudgetNewCmd::new("Home", "alice"))
        .await
        .unwrap();

    assert!(matches!(
        engine.budget(budget.id + 100, "alice").await,
        Err(EngineError::KeyNotFound(_))
    ));
    assert!(matches!(
        engine.budget(budget.id, "bob").await,
        Err(EngineError::Forbidden(_))
    ));
}

#[tokio::test]
async fn sharing_grants_the_same_view_as_the_owner() {
    let (engine, _db) = engine_with_users().await;

    let budget = engine
        .create_budget(
            BudgetNewCmd::new("Groceries", "alice")
                .income(ItemDraft::new("100").category("WORK"))
                .expense(ItemDraft::new("1").category("FOOD")),
        )
        .await
        .unwrap();

    assert!(matches!(
        engine.budget(budget.id, "bob").await,
        Err(EngineError::Forbidden(_))
    ));

    engine.share_budget(budget.id, "bob", "alice").await.unwrap();

    let as_owner = engine.budget(budget.id, "alice").await.unwrap();
    let as_member = engine.budget(budget.id, "bob").await.unwrap();
    assert_eq!(as_owner, as_member);
    assert_eq!(as_member.shared_with, vec!["bob".to_string()]);
}

#[tokio::test]
async fn rename_and_delete_are_owner_only() {
    let (engine, db) = engine_with_users().await;

    let budget = engine
        .create_budget(
            BudgetNewCmd::new("Home", "alice")
                .income(ItemDraft::new("10"))
                .expense(ItemDraft::new("2")),
        )
        .await
        .unwrap();
    engine.share_budget(budget.id, "bob", "alice").await.unwrap();

    assert!(matches!(
        engine.rename_budget(budget.id, "Mine", "bob").await,
        Err(EngineError::Forbidden(_))
    ));
    assert!(matches!(
        engine.delete_budget(budget.id, "bob").await,
        Err(EngineError::Forbidden(_))
    ));

    let renamed = engine
        .rename_budget(budget.id, "  House ", "alice")
        .await
        .unwrap();
    assert_eq!(renamed.name, "House");
    assert_eq!(renamed.incomes[0].budget, format!("House (#{})", budget.id));

    engine.delete_budget(budget.id, "alice").await.unwrap();
    assert!(matches!(
        engine.budget(budget.id, "alice").await,
        Err(EngineError::KeyNotFound(_))
    ));
    assert_eq!(incomes::Entity::find().count(&db).await.unwrap(), 0);
    assert_eq!(expenses::Entity::find().count(&db).await.unwrap(), 0);
}
