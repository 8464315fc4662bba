//! Bulk Import Reconciler
//!
//! Merges a parsed row set (CSV- or JSON-derived, already structured by the
//! boundary layer) into the inventory by upsert-by-name. Transport mechanics
//! never reach this module — it sees rows, not multipart bytes.

use rust_decimal::Decimal;
use serde_json::Value;

use crate::db::models::serde_helpers::{coerce_decimal, coerce_int, coerce_string};
use crate::db::models::{InventoryItem, ItemUpsert};
use crate::db::repository::{ItemRepository, RepoResult};

/// One parsed import row. Transient: lives for a single reconciliation pass
/// and is never stored.
#[derive(Debug)]
pub struct BulkImportRow {
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub quantity: i64,
    pub threshold: i64,
    pub unit: String,
    pub category: String,
}

impl BulkImportRow {
    /// Parse a loosely-typed row object.
    ///
    /// Numeric coercion is total (junk → 0); `minStockLevel` is accepted as
    /// an alias for `threshold` — both header spellings exist in the wild.
    /// Returns the reason a row cannot be applied, for skip-and-count.
    pub fn from_value(value: &Value) -> Result<Self, String> {
        static NULL: Value = Value::Null;

        let row = value.as_object().ok_or("row is not an object")?;

        let field = |key: &str| row.get(key).unwrap_or(&NULL);

        let name = coerce_string(field("name"));
        if name.is_empty() {
            return Err("name is required".to_string());
        }

        let threshold_value = row
            .get("threshold")
            .or_else(|| row.get("minStockLevel"))
            .unwrap_or(&NULL);

        let price = coerce_decimal(field("price"));
        let quantity = coerce_int(field("quantity"));
        let threshold = coerce_int(threshold_value);

        if price < Decimal::ZERO {
            return Err("price must not be negative".to_string());
        }
        if quantity < 0 {
            return Err("quantity must not be negative".to_string());
        }
        if threshold < 0 {
            return Err("threshold must not be negative".to_string());
        }

        let unit = coerce_string(field("unit"));
        Ok(Self {
            name,
            description: coerce_string(field("description")),
            price,
            quantity,
            threshold,
            unit: if unit.is_empty() { "pieces".to_string() } else { unit },
            category: coerce_string(field("category")),
        })
    }

    fn into_upsert(self) -> ItemUpsert {
        ItemUpsert {
            name: self.name,
            description: self.description,
            price: self.price,
            quantity: self.quantity,
            threshold: self.threshold,
            unit: self.unit,
            category: self.category,
        }
    }
}

/// Result of one reconciliation pass
#[derive(Debug)]
pub struct ReconcileOutcome {
    /// Rows successfully applied
    pub processed: usize,
    /// Rows skipped for failing validation
    pub skipped: usize,
    /// Full inventory snapshot for the owner after the pass
    pub inventory: Vec<InventoryItem>,
}

/// Bulk reconciler — writes through the inventory ledger only
#[derive(Clone)]
pub struct Reconciler {
    items: ItemRepository,
}

impl Reconciler {
    pub fn new(items: ItemRepository) -> Self {
        Self { items }
    }

    /// Apply a row set for one owner, sequentially in input order.
    ///
    /// Each row is an atomic create-or-replace against the `(owner, name)`
    /// key, so a later row for the same name overwrites an earlier one
    /// (last-write-wins within the batch) and re-running the whole batch
    /// converges to the same end state. Rows failing validation are skipped
    /// and counted; a datastore failure aborts the batch with a retryable
    /// error and the partial result stands.
    pub async fn reconcile(
        &self,
        owner: &str,
        rows: &[Value],
        actor: &str,
    ) -> RepoResult<ReconcileOutcome> {
        let mut processed = 0usize;
        let mut skipped = 0usize;

        for (index, raw) in rows.iter().enumerate() {
            match BulkImportRow::from_value(raw) {
                Ok(row) => {
                    self.items
                        .upsert_row(owner, &row.into_upsert(), actor)
                        .await?;
                    processed += 1;
                }
                Err(reason) => {
                    tracing::warn!(row = index, %reason, "Skipping bulk import row");
                    skipped += 1;
                }
            }
        }

        tracing::info!(processed, skipped, "Bulk import reconciled");

        let inventory = self.items.find_all(owner).await?;
        Ok(ReconcileOutcome {
            processed,
            skipped,
            inventory,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::str::FromStr;

    #[test]
    fn parses_csv_shaped_rows() {
        let row = BulkImportRow::from_value(&json!({
            "name": " Rice ",
            "description": "Long grain white rice",
            "price": "1.99",
            "quantity": "100",
            "unit": "kg",
            "category": "Grains",
            "threshold": "20"
        }))
        .unwrap();

        assert_eq!(row.name, "Rice");
        assert_eq!(row.price, Decimal::from_str("1.99").unwrap());
        assert_eq!(row.quantity, 100);
        assert_eq!(row.threshold, 20);
    }

    #[test]
    fn min_stock_level_is_a_threshold_alias() {
        let row = BulkImportRow::from_value(&json!({
            "name": "Milk",
            "minStockLevel": 10
        }))
        .unwrap();
        assert_eq!(row.threshold, 10);

        // An explicit threshold wins over the alias
        let row = BulkImportRow::from_value(&json!({
            "name": "Milk",
            "threshold": 5,
            "minStockLevel": 10
        }))
        .unwrap();
        assert_eq!(row.threshold, 5);
    }

    #[test]
    fn absent_numerics_default_to_zero() {
        let row = BulkImportRow::from_value(&json!({ "name": "Bread" })).unwrap();
        assert_eq!(row.price, Decimal::ZERO);
        assert_eq!(row.quantity, 0);
        assert_eq!(row.threshold, 0);
        assert_eq!(row.unit, "pieces");
    }

    #[test]
    fn unparseable_numerics_coerce_to_zero() {
        let row = BulkImportRow::from_value(&json!({
            "name": "Eggs",
            "price": "a dozen",
            "quantity": "plenty"
        }))
        .unwrap();
        assert_eq!(row.price, Decimal::ZERO);
        assert_eq!(row.quantity, 0);
    }

    #[test]
    fn rows_without_a_name_are_invalid() {
        assert!(BulkImportRow::from_value(&json!({ "quantity": 5 })).is_err());
        assert!(BulkImportRow::from_value(&json!({ "name": "   " })).is_err());
        assert!(BulkImportRow::from_value(&json!("just a string")).is_err());
    }

    #[test]
    fn negative_values_are_invalid() {
        assert!(BulkImportRow::from_value(&json!({ "name": "Rice", "quantity": -1 })).is_err());
        assert!(BulkImportRow::from_value(&json!({ "name": "Rice", "price": -0.5 })).is_err());
        assert!(
            BulkImportRow::from_value(&json!({ "name": "Rice", "minStockLevel": -2 })).is_err()
        );
    }
}
