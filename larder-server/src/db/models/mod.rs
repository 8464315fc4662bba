//! Database Models

pub mod item;
pub mod order;
pub mod serde_helpers;

pub use item::{AdjustQuantity, InventoryItem, ItemCreate, ItemDetail, ItemUpdate, ItemUpsert};
pub use order::{
    Order, OrderCreate, OrderDetail, OrderLine, OrderLineInput, OrderStatus, PaymentStatus,
    SetOrderStatus, ShippingAddress,
};
