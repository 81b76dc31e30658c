//! Integration tests that exercise the repository against a real MySQL
//! instance. They are ignored by default so `cargo test` stays green on
//! machines without a database; run them with `cargo test -- --ignored`
//! once `DATABASE_URL` points at a disposable schema.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use core_types::{NewProduct, ProductPatch};
use database::{connect, run_migrations, DbError, DbRepository, ExecuteOutcome};
use rust_decimal_macros::dec;

async fn repo() -> DbRepository {
    let pool = connect(5, Duration::from_secs(5)).await.unwrap();
    run_migrations(&pool).await.unwrap();
    DbRepository::new(pool)
}

/// Runs a mutation through the console path and returns the generated id.
async fn seed(repo: &DbRepository, statement: &str) -> u64 {
    match repo.execute_statement(statement).await.unwrap() {
        ExecuteOutcome::Mutation { insert_id, .. } => insert_id,
        other => panic!("expected a mutation outcome, got {other:?}"),
    }
}

async fn seed_product(repo: &DbRepository, name: &str) -> i64 {
    let category_id = seed(
        repo,
        "INSERT INTO categories (category_name) VALUES ('Grains')",
    )
    .await;
    let supplier_id = seed(
        repo,
        "INSERT INTO suppliers (supplier_name) VALUES ('Harbor Wholesale')",
    )
    .await;
    let new_product = NewProduct {
        product_name: name.to_string(),
        price: dec!(40.00),
        category_id: category_id as i64,
        supplier_id: supplier_id as i64,
    };
    repo.create_product(&new_product).await.unwrap()
}

/// Seeds a customer, an order on the given date, and one order item for the
/// product. Returns the order id.
async fn seed_order_with_item(repo: &DbRepository, product_id: i64, order_date: &str) -> u64 {
    let customer_id = seed(repo, "INSERT INTO customers (name) VALUES ('Asha Patel')").await;
    let order_id = seed(
        repo,
        &format!(
            "INSERT INTO orders (customer_id, order_date, total_amount) \
             VALUES ({customer_id}, '{order_date}', 80.00)"
        ),
    )
    .await;
    seed(
        repo,
        &format!(
            "INSERT INTO order_items (order_id, product_id, quantity, subtotal) \
             VALUES ({order_id}, {product_id}, 2, 80.00)"
        ),
    )
    .await;
    order_id
}

async fn count_order_items(repo: &DbRepository, product_id: i64) -> i64 {
    let statement =
        format!("SELECT COUNT(*) AS item_count FROM order_items WHERE product_id = {product_id}");
    match repo.execute_statement(&statement).await.unwrap() {
        ExecuteOutcome::Rows(rows) => rows[0]["item_count"].as_i64().unwrap(),
        other => panic!("expected rows, got {other:?}"),
    }
}

fn unique_suffix() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos()
}

#[tokio::test]
#[ignore = "requires a running MySQL instance reachable via DATABASE_URL"]
async fn created_product_reads_back_with_the_same_values() {
    let repo = repo().await;
    let product_id = seed_product(&repo, "Rice").await;

    let product = repo.get_product(product_id).await.unwrap().unwrap();
    assert_eq!(product.product_id, product_id);
    assert_eq!(product.product_name, "Rice");
    assert_eq!(product.price, dec!(40.00));
}

#[tokio::test]
#[ignore = "requires a running MySQL instance reachable via DATABASE_URL"]
async fn delete_without_cascade_rejects_and_leaves_both_rows() {
    let repo = repo().await;
    let product_id = seed_product(&repo, "Rice").await;
    seed_order_with_item(&repo, product_id, "2030-01-15 10:00:00").await;

    let err = repo.delete_product(product_id, false).await.unwrap_err();
    assert!(matches!(err, DbError::ProductReferenced(id) if id == product_id));

    // The rollback must leave the product and its order item untouched.
    assert!(repo.get_product(product_id).await.unwrap().is_some());
    assert_eq!(count_order_items(&repo, product_id).await, 1);
}

#[tokio::test]
#[ignore = "requires a running MySQL instance reachable via DATABASE_URL"]
async fn delete_with_cascade_removes_product_and_items_atomically() {
    let repo = repo().await;
    let product_id = seed_product(&repo, "Rice").await;
    seed_order_with_item(&repo, product_id, "2030-02-15 10:00:00").await;

    let deletion = repo.delete_product(product_id, true).await.unwrap();
    assert!(deletion.cascaded);
    assert_eq!(deletion.removed_order_items, 1);

    assert!(repo.get_product(product_id).await.unwrap().is_none());
    assert_eq!(count_order_items(&repo, product_id).await, 0);
}

#[tokio::test]
#[ignore = "requires a running MySQL instance reachable via DATABASE_URL"]
async fn deleting_an_unreferenced_product_reports_no_cascade() {
    let repo = repo().await;
    let product_id = seed_product(&repo, "Rice").await;

    let deletion = repo.delete_product(product_id, false).await.unwrap();
    assert!(!deletion.cascaded);
    assert_eq!(deletion.removed_order_items, 0);
    assert!(repo.get_product(product_id).await.unwrap().is_none());
}

#[tokio::test]
#[ignore = "requires a running MySQL instance reachable via DATABASE_URL"]
async fn updating_a_missing_product_affects_zero_rows() {
    let repo = repo().await;
    // Create and delete so the id is guaranteed free.
    let product_id = seed_product(&repo, "Ephemeral").await;
    repo.delete_product(product_id, false).await.unwrap();

    let patch = ProductPatch {
        product_name: Some("Renamed".to_string()),
        ..ProductPatch::default()
    };
    let affected = repo.update_product(product_id, &patch).await.unwrap();
    assert_eq!(affected, 0);
}

#[tokio::test]
#[ignore = "requires a running MySQL instance reachable via DATABASE_URL"]
async fn partial_update_preserves_unsupplied_fields() {
    let repo = repo().await;
    let product_id = seed_product(&repo, "Basmati").await;
    let before = repo.get_product(product_id).await.unwrap().unwrap();

    let patch = ProductPatch {
        price: Some(dec!(60.50)),
        ..ProductPatch::default()
    };
    let affected = repo.update_product(product_id, &patch).await.unwrap();
    assert_eq!(affected, 1);

    let after = repo.get_product(product_id).await.unwrap().unwrap();
    assert_eq!(after.price, dec!(60.50));
    assert_eq!(after.product_name, before.product_name);
    assert_eq!(after.category_id, before.category_id);
    assert_eq!(after.supplier_id, before.supplier_id);
}

#[tokio::test]
#[ignore = "requires a running MySQL instance reachable via DATABASE_URL"]
async fn monthly_sales_aggregates_orders_in_the_same_month() {
    let repo = repo().await;
    // A far-future month no other test writes into.
    let customer_id = seed(&repo, "INSERT INTO customers (name) VALUES ('Asha Patel')").await;
    seed(
        &repo,
        &format!(
            "INSERT INTO orders (customer_id, order_date, total_amount) \
             VALUES ({customer_id}, '2031-07-03 09:00:00', 100.00)"
        ),
    )
    .await;
    seed(
        &repo,
        &format!(
            "INSERT INTO orders (customer_id, order_date, total_amount) \
             VALUES ({customer_id}, '2031-07-21 17:30:00', 150.25)"
        ),
    )
    .await;

    let rows = repo.monthly_sales().await.unwrap();
    let july: Vec<_> = rows.iter().filter(|row| row.month == "2031-07").collect();
    assert_eq!(july.len(), 1);
    assert_eq!(july[0].monthly_sales, dec!(250.25));
}

#[tokio::test]
#[ignore = "requires a running MySQL instance reachable via DATABASE_URL"]
async fn product_listing_honors_the_limit() {
    let repo = repo().await;
    for _ in 0..3 {
        seed_product(&repo, "Bulk Item").await;
    }

    let products = repo.list_products(2).await.unwrap();
    assert_eq!(products.len(), 2);
}

#[tokio::test]
#[ignore = "requires a running MySQL instance reachable via DATABASE_URL"]
async fn console_mutations_report_affected_rows_and_insert_id() {
    let repo = repo().await;
    let outcome = repo
        .execute_statement("INSERT INTO categories (category_name) VALUES ('Console Seeded')")
        .await
        .unwrap();

    match outcome {
        ExecuteOutcome::Mutation {
            affected_rows,
            insert_id,
        } => {
            assert_eq!(affected_rows, 1);
            assert!(insert_id > 0);
        }
        other => panic!("expected a mutation outcome, got {other:?}"),
    }
}

#[tokio::test]
#[ignore = "requires a running MySQL instance reachable via DATABASE_URL"]
async fn console_queries_decode_rows_into_json() {
    let repo = repo().await;
    let outcome = repo
        .execute_statement("SELECT 1 AS one, 'two' AS two, NULL AS three")
        .await
        .unwrap();

    match outcome {
        ExecuteOutcome::Rows(rows) => {
            assert_eq!(rows.len(), 1);
            assert_eq!(rows[0]["one"].as_i64(), Some(1));
            assert_eq!(rows[0]["two"].as_str(), Some("two"));
            assert!(rows[0]["three"].is_null());
        }
        other => panic!("expected rows, got {other:?}"),
    }
}

#[tokio::test]
#[ignore = "requires a running MySQL instance reachable via DATABASE_URL"]
async fn automation_install_registers_trigger_and_procedure() {
    let repo = repo().await;
    repo.install_order_automation().await.unwrap();
    // A second install must succeed as well (drop-if-exists idempotency).
    repo.install_order_automation().await.unwrap();

    let triggers = repo.list_triggers().await.unwrap();
    let trigger = triggers
        .iter()
        .find(|t| t.trigger_name == "trg_order_total_recalc")
        .expect("trigger should be registered");
    assert_eq!(trigger.event_manipulation, "INSERT");
    assert_eq!(trigger.event_object_table, "order_items");
    assert_eq!(trigger.action_timing, "AFTER");

    let routines = repo.list_routines().await.unwrap();
    let routine = routines
        .iter()
        .find(|r| r.routine_name == "get_customer_discount")
        .expect("procedure should be registered");
    assert_eq!(routine.routine_type, "PROCEDURE");
}

#[tokio::test]
#[ignore = "requires a running MySQL instance reachable via DATABASE_URL"]
async fn trigger_recomputes_the_order_total_on_item_insert() {
    let repo = repo().await;
    repo.install_order_automation().await.unwrap();

    let first = seed_product(&repo, "Rice").await;
    let second = seed_product(&repo, "Lentils").await;
    let customer_id = seed(&repo, "INSERT INTO customers (name) VALUES ('Asha Patel')").await;
    let order_id = seed(
        &repo,
        &format!(
            "INSERT INTO orders (customer_id, order_date, total_amount) \
             VALUES ({customer_id}, '2030-03-01 12:00:00', 0.00)"
        ),
    )
    .await;
    seed(
        &repo,
        &format!(
            "INSERT INTO order_items (order_id, product_id, quantity, subtotal) \
             VALUES ({order_id}, {first}, 1, 30.00)"
        ),
    )
    .await;
    seed(
        &repo,
        &format!(
            "INSERT INTO order_items (order_id, product_id, quantity, subtotal) \
             VALUES ({order_id}, {second}, 3, 45.00)"
        ),
    )
    .await;

    let statement = format!("SELECT total_amount FROM orders WHERE order_id = {order_id}");
    match repo.execute_statement(&statement).await.unwrap() {
        ExecuteOutcome::Rows(rows) => {
            assert_eq!(rows[0]["total_amount"].as_str(), Some("75.00"));
        }
        other => panic!("expected rows, got {other:?}"),
    }
}

#[tokio::test]
#[ignore = "requires a running MySQL instance reachable via DATABASE_URL"]
async fn discount_procedure_returns_the_membership_rate() {
    let repo = repo().await;
    repo.install_order_automation().await.unwrap();

    let member_name = format!("Member {}", unique_suffix());
    let membership_id = seed(
        &repo,
        "INSERT INTO memberships (type, discount_rate) VALUES ('Gold', 10.00)",
    )
    .await;
    seed(
        &repo,
        &format!("INSERT INTO customers (name, membership_id) VALUES ('{member_name}', {membership_id})"),
    )
    .await;

    let rows = repo.customer_discount(&member_name).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].name, member_name);
    assert_eq!(rows[0].membership_type, "Gold");
    assert_eq!(rows[0].discount_rate, dec!(10.00));

    let empty = repo
        .customer_discount("Nobody By This Name")
        .await
        .unwrap();
    assert!(empty.is_empty());
}
