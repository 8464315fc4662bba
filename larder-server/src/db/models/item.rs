//! Inventory Item Model

use super::serde_helpers;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

use crate::utils::validation::{
    MAX_DESCRIPTION_LEN, MAX_NAME_LEN, MAX_SHORT_TEXT_LEN, check_non_negative,
    check_optional_text, check_required_text,
};

/// Inventory item entity
///
/// `(owner, name)` is unique (enforced by index). Quantity and threshold are
/// never negative; quantity is only changed through field update or the atomic
/// adjustment in the repository.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    /// Owning user id (creator) — scopes visibility and mutation
    pub owner: String,
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub quantity: i64,
    /// Low-stock trigger: at or below this quantity the item is low stock
    pub threshold: i64,
    #[serde(default = "default_unit")]
    pub unit: String,
    pub category: String,
    pub last_modified_by: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn default_unit() -> String {
    "pieces".to_string()
}

impl InventoryItem {
    /// Low-stock check, computed on read and never persisted.
    /// Boundary inclusive: `quantity == threshold` is low stock.
    pub fn below_threshold(&self) -> bool {
        self.quantity <= self.threshold
    }
}

/// Create inventory item payload
///
/// Numeric fields coerce leniently (absent or unparseable → 0); name and
/// description are required non-coercible strings, checked in [`validate`].
///
/// [`validate`]: ItemCreate::validate
#[derive(Debug, Clone, Deserialize)]
pub struct ItemCreate {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, deserialize_with = "serde_helpers::lenient_decimal")]
    pub price: Decimal,
    #[serde(default, deserialize_with = "serde_helpers::lenient_int")]
    pub quantity: i64,
    #[serde(default, deserialize_with = "serde_helpers::lenient_int")]
    pub threshold: i64,
    #[serde(default = "default_unit")]
    pub unit: String,
    #[serde(default)]
    pub category: String,
}

impl ItemCreate {
    /// Field-level validation. Returns every violation, not just the first.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();
        check_required_text(&self.name, "name", MAX_NAME_LEN, &mut errors);
        check_required_text(&self.description, "description", MAX_DESCRIPTION_LEN, &mut errors);
        check_required_text(&self.category, "category", MAX_NAME_LEN, &mut errors);
        check_required_text(&self.unit, "unit", MAX_SHORT_TEXT_LEN, &mut errors);
        if self.price < Decimal::ZERO {
            errors.push("price: must not be negative".to_string());
        }
        check_non_negative(self.quantity, "quantity", &mut errors);
        check_non_negative(self.threshold, "threshold", &mut errors);
        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

/// Update inventory item payload
///
/// Only quantity, threshold, unit and category are mutable through this path.
#[derive(Debug, Clone, Deserialize)]
pub struct ItemUpdate {
    pub quantity: Option<i64>,
    pub threshold: Option<i64>,
    pub unit: Option<String>,
    pub category: Option<String>,
}

impl ItemUpdate {
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();
        if let Some(q) = self.quantity {
            check_non_negative(q, "quantity", &mut errors);
        }
        if let Some(t) = self.threshold {
            check_non_negative(t, "threshold", &mut errors);
        }
        if let Some(u) = &self.unit
            && u.trim().is_empty()
        {
            errors.push("unit: must not be empty".to_string());
        }
        check_optional_text(&self.unit, "unit", MAX_SHORT_TEXT_LEN, &mut errors);
        check_optional_text(&self.category, "category", MAX_NAME_LEN, &mut errors);
        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

/// Atomic quantity adjustment payload
#[derive(Debug, Clone, Deserialize)]
pub struct AdjustQuantity {
    /// Signed delta applied to the current quantity
    pub delta: i64,
}

/// Bulk-reconciliation upsert values, keyed by `(owner, name)`.
/// Already validated and coerced by the reconciler; applied as a full
/// replacement of the mutable fields, never an additive merge.
#[derive(Debug, Clone)]
pub struct ItemUpsert {
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub quantity: i64,
    pub threshold: i64,
    pub unit: String,
    pub category: String,
}

// =============================================================================
// API Response Types (for frontend)
// =============================================================================

/// Inventory item for list/detail views, with the derived low-stock flag
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemDetail {
    pub id: String,
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub quantity: i64,
    pub threshold: i64,
    pub unit: String,
    pub category: String,
    pub last_modified_by: String,
    pub below_threshold: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<InventoryItem> for ItemDetail {
    fn from(item: InventoryItem) -> Self {
        let below_threshold = item.below_threshold();
        Self {
            id: item.id.map(|id| id.key().to_string()).unwrap_or_default(),
            name: item.name,
            description: item.description,
            price: item.price,
            quantity: item.quantity,
            threshold: item.threshold,
            unit: item.unit,
            category: item.category,
            last_modified_by: item.last_modified_by,
            below_threshold,
            created_at: item.created_at,
            updated_at: item.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn item(quantity: i64, threshold: i64) -> InventoryItem {
        let now = Utc::now();
        InventoryItem {
            id: None,
            owner: "user:a".to_string(),
            name: "Rice".to_string(),
            description: "Long grain white rice".to_string(),
            price: Decimal::from_str("1.99").unwrap(),
            quantity,
            threshold,
            unit: "kg".to_string(),
            category: "Grains".to_string(),
            last_modified_by: "user:a".to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn below_threshold_boundary_is_inclusive() {
        assert!(item(10, 20).below_threshold());
        assert!(item(20, 20).below_threshold());
        assert!(!item(21, 20).below_threshold());
        assert!(item(0, 0).below_threshold());
    }

    #[test]
    fn create_payload_coerces_numbers() {
        let payload: ItemCreate = serde_json::from_value(serde_json::json!({
            "name": "Milk",
            "description": "Fresh whole milk",
            "price": "3.49",
            "quantity": "50",
            "category": "Dairy"
        }))
        .unwrap();

        assert_eq!(payload.price, Decimal::from_str("3.49").unwrap());
        assert_eq!(payload.quantity, 50);
        assert_eq!(payload.threshold, 0);
        assert_eq!(payload.unit, "pieces");
        assert!(payload.validate().is_ok());
    }

    #[test]
    fn create_payload_collects_all_violations() {
        let payload: ItemCreate = serde_json::from_value(serde_json::json!({
            "name": "  ",
            "price": -1,
            "quantity": -5
        }))
        .unwrap();

        let errors = payload.validate().unwrap_err();
        assert!(errors.iter().any(|e| e.starts_with("name:")));
        assert!(errors.iter().any(|e| e.starts_with("description:")));
        assert!(errors.iter().any(|e| e.starts_with("price:")));
        assert!(errors.iter().any(|e| e.starts_with("quantity:")));
    }

    #[test]
    fn update_payload_rejects_negative_threshold() {
        let update = ItemUpdate {
            quantity: None,
            threshold: Some(-1),
            unit: None,
            category: None,
        };
        assert!(update.validate().is_err());
    }
}
