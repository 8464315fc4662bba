//! Black-box checks of the engine's pure rules through the public API:
//! status lifecycle, price-snapshot totals, import-row coercion, token
//! validation. Datastore-backed behavior is covered by the repository
//! layer against a running SurrealDB.

use larder_server::auth::{CurrentUser, JwtConfig, JwtService};
use larder_server::db::models::{Order, OrderLine, OrderStatus};
use larder_server::inventory::BulkImportRow;
use rust_decimal::Decimal;
use std::str::FromStr;
use surrealdb::RecordId;

fn line(key: &str, name: &str, quantity: i64, unit_price: &str) -> OrderLine {
    OrderLine {
        product: RecordId::from_table_key("item", key),
        name: name.to_string(),
        quantity,
        unit_price: Decimal::from_str(unit_price).unwrap(),
    }
}

#[test]
fn order_total_is_a_snapshot() {
    let lines = vec![line("rice", "Rice", 2, "2.99"), line("milk", "Milk", 1, "3.99")];
    let total = Order::compute_total(&lines);
    assert_eq!(total, Decimal::from_str("9.97").unwrap());

    // A later price change on the referenced item has no bearing on the
    // stored snapshot: the lines carry their own copied unit prices.
    let recomputed = Order::compute_total(&lines);
    assert_eq!(recomputed, total);
}

#[test]
fn lifecycle_has_exactly_one_exit_per_state() {
    use OrderStatus::*;
    let all = [Pending, Processing, Shipped, Delivered, Cancelled];

    let successors = |from: OrderStatus| {
        all.iter()
            .filter(|next| from.can_transition_to(**next))
            .count()
    };

    assert_eq!(successors(Pending), 2); // processing or cancelled
    assert_eq!(successors(Processing), 1);
    assert_eq!(successors(Shipped), 1);
    assert_eq!(successors(Delivered), 0);
    assert_eq!(successors(Cancelled), 0);
}

#[test]
fn only_pending_orders_are_cancellable() {
    use OrderStatus::*;
    assert!(Pending.can_transition_to(Cancelled));
    for status in [Processing, Shipped, Delivered, Cancelled] {
        assert!(!status.can_transition_to(Cancelled));
    }
}

#[test]
fn import_rows_survive_csv_noise() {
    let rows = serde_json::json!([
        { "name": "Rice", "price": "1.99", "quantity": "100", "minStockLevel": "20" },
        { "name": "", "price": "2.49" },
        { "quantity": 5 },
        { "name": "Milk", "price": "oops", "quantity": null }
    ]);

    let parsed: Vec<_> = rows
        .as_array()
        .unwrap()
        .iter()
        .map(BulkImportRow::from_value)
        .collect();

    assert!(parsed[0].is_ok());
    assert!(parsed[1].is_err());
    assert!(parsed[2].is_err());

    let milk = parsed[3].as_ref().unwrap();
    assert_eq!(milk.price, Decimal::ZERO);
    assert_eq!(milk.quantity, 0);
}

#[test]
fn identity_context_round_trip() {
    let service = JwtService::with_config(JwtConfig {
        secret: "integration-test-secret-32-bytes-min!!".to_string(),
        issuer: "larder-auth".to_string(),
        audience: "larder-clients".to_string(),
    });

    let token = service.generate_token("user:carol", "carol", "admin").unwrap();
    let user = CurrentUser::from(service.validate_token(&token).unwrap());

    assert_eq!(user.id, "user:carol");
    assert!(user.is_admin());

    assert!(service.validate_token("not-a-token").is_err());
}
