//! Order Model
//!
//! Orders snapshot their line-item prices at creation. The stored total is
//! immutable afterwards; later price changes on the referenced inventory items
//! never affect it.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

// =============================================================================
// Status state machine
// =============================================================================

/// Order status
///
/// Forward-only chain `pending → processing → shipped → delivered`, with
/// `pending → cancelled` as the only other exit. `delivered` and `cancelled`
/// are terminal. The administrative override path deliberately bypasses this
/// chain (see `OrderRepository::set_status_override`).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    /// Parse one of the five enumerated literals
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(Self::Pending),
            "processing" => Some(Self::Processing),
            "shipped" => Some(Self::Shipped),
            "delivered" => Some(Self::Delivered),
            "cancelled" => Some(Self::Cancelled),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Processing => "processing",
            Self::Shipped => "shipped",
            Self::Delivered => "delivered",
            Self::Cancelled => "cancelled",
        }
    }

    /// Whether the non-admin path may move from `self` to `next`
    pub fn can_transition_to(self, next: OrderStatus) -> bool {
        use OrderStatus::*;
        matches!(
            (self, next),
            (Pending, Processing) | (Processing, Shipped) | (Shipped, Delivered) | (Pending, Cancelled)
        )
    }

    /// Terminal states permit no further transition
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Delivered | Self::Cancelled)
    }
}

/// Payment status, independent of the fulfilment lifecycle
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    #[default]
    Pending,
    Paid,
    Failed,
}

// =============================================================================
// Order entity
// =============================================================================

/// Structured shipping address
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingAddress {
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub country: String,
}

/// Order line item — a snapshot of the referenced product at order time.
/// `unit_price` and `name` are copied, never re-read live.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderLine {
    pub product: RecordId,
    pub name: String,
    pub quantity: i64,
    pub unit_price: Decimal,
}

/// Order entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    /// Owning user id
    pub owner: String,
    pub items: Vec<OrderLine>,
    pub shipping_address: ShippingAddress,
    pub payment_method: String,
    #[serde(default)]
    pub payment_status: PaymentStatus,
    /// Σ quantity × unit_price, computed at creation and stored. Immutable.
    pub total_amount: Decimal,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    /// Total over the price snapshots. Exact decimal arithmetic.
    pub fn compute_total(lines: &[OrderLine]) -> Decimal {
        lines
            .iter()
            .map(|line| line.unit_price * Decimal::from(line.quantity))
            .sum()
    }
}

// =============================================================================
// API Request Types
// =============================================================================

/// Referenced product + quantity in a create request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLineInput {
    pub product_id: String,
    pub quantity: i64,
}

/// Create order payload
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderCreate {
    pub items: Vec<OrderLineInput>,
    pub shipping_address: ShippingAddress,
    pub payment_method: String,
}

/// Administrative status overwrite payload
#[derive(Debug, Clone, Deserialize)]
pub struct SetOrderStatus {
    /// One of the five enumerated literals; anything else is a validation error
    pub status: String,
}

// =============================================================================
// API Response Types (for frontend)
// =============================================================================

/// Order line for detail view
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLineDetail {
    pub product_id: String,
    pub name: String,
    pub quantity: i64,
    pub unit_price: Decimal,
}

/// Full order detail
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDetail {
    pub id: String,
    pub owner: String,
    pub items: Vec<OrderLineDetail>,
    pub shipping_address: ShippingAddress,
    pub payment_method: String,
    pub payment_status: PaymentStatus,
    pub total_amount: Decimal,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Order> for OrderDetail {
    fn from(order: Order) -> Self {
        Self {
            id: order.id.map(|id| id.key().to_string()).unwrap_or_default(),
            owner: order.owner,
            items: order
                .items
                .into_iter()
                .map(|line| OrderLineDetail {
                    product_id: line.product.key().to_string(),
                    name: line.name,
                    quantity: line.quantity,
                    unit_price: line.unit_price,
                })
                .collect(),
            shipping_address: order.shipping_address,
            payment_method: order.payment_method,
            payment_status: order.payment_status,
            total_amount: order.total_amount,
            status: order.status,
            created_at: order.created_at,
            updated_at: order.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn forward_chain_transitions() {
        use OrderStatus::*;
        assert!(Pending.can_transition_to(Processing));
        assert!(Processing.can_transition_to(Shipped));
        assert!(Shipped.can_transition_to(Delivered));
        assert!(Pending.can_transition_to(Cancelled));
    }

    #[test]
    fn no_skipping_or_backward_transitions() {
        use OrderStatus::*;
        assert!(!Pending.can_transition_to(Shipped));
        assert!(!Pending.can_transition_to(Delivered));
        assert!(!Processing.can_transition_to(Pending));
        assert!(!Processing.can_transition_to(Cancelled));
        assert!(!Shipped.can_transition_to(Cancelled));
    }

    #[test]
    fn terminal_states_permit_nothing() {
        use OrderStatus::*;
        for status in [Delivered, Cancelled] {
            assert!(status.is_terminal());
            for next in [Pending, Processing, Shipped, Delivered, Cancelled] {
                assert!(!status.can_transition_to(next));
            }
        }
    }

    #[test]
    fn parse_accepts_exactly_five_literals() {
        assert_eq!(OrderStatus::parse("pending"), Some(OrderStatus::Pending));
        assert_eq!(OrderStatus::parse("cancelled"), Some(OrderStatus::Cancelled));
        assert_eq!(OrderStatus::parse("PENDING"), None);
        assert_eq!(OrderStatus::parse("returned"), None);
        assert_eq!(OrderStatus::parse(""), None);
    }

    #[test]
    fn total_is_exact_decimal_arithmetic() {
        let lines = vec![
            OrderLine {
                product: RecordId::from_table_key("item", "rice"),
                name: "Rice".to_string(),
                quantity: 2,
                unit_price: Decimal::from_str("2.99").unwrap(),
            },
            OrderLine {
                product: RecordId::from_table_key("item", "milk"),
                name: "Milk".to_string(),
                quantity: 1,
                unit_price: Decimal::from_str("3.99").unwrap(),
            },
        ];

        assert_eq!(Order::compute_total(&lines), Decimal::from_str("9.97").unwrap());
    }

    #[test]
    fn empty_order_totals_zero() {
        assert_eq!(Order::compute_total(&[]), Decimal::ZERO);
    }
}
