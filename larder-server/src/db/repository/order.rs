//! Order Repository
//!
//! Status mutation is split into two distinctly-named paths: the owner's
//! `cancel` (guarded by the forward-only state machine) and the
//! administrative `set_status_override` (no transition validation).

use chrono::Utc;
use surrealdb::RecordId;

use super::{BaseRepository, RepoError, RepoResult, record_key};
use crate::db::DbService;
use crate::db::models::{Order, OrderStatus};

const ORDER_TABLE: &str = "orders";

// =============================================================================
// Order Repository
// =============================================================================

#[derive(Clone)]
pub struct OrderRepository {
    base: BaseRepository,
}

impl OrderRepository {
    pub fn new(service: DbService) -> Self {
        Self {
            base: BaseRepository::new(service),
        }
    }

    /// Persist a fully-built order (snapshots and total already computed)
    pub async fn create(&self, order: Order) -> RepoResult<Order> {
        let db = self.base.db().await;
        let created: Option<Order> = self.base.run(db.create(ORDER_TABLE).content(order)).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create order".to_string()))
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Order>> {
        let key = record_key(ORDER_TABLE, id).to_string();
        let db = self.base.db().await;
        let order: Option<Order> = self.base.run(db.select((ORDER_TABLE, key))).await?;
        Ok(order)
    }

    /// All orders, newest first (administrator view)
    pub async fn find_all(&self) -> RepoResult<Vec<Order>> {
        let db = self.base.db().await;
        let mut response = self
            .base
            .run(db.query("SELECT * FROM orders ORDER BY created_at DESC"))
            .await?;
        Ok(response.take(0)?)
    }

    /// Orders owned by the caller, newest first
    pub async fn find_by_owner(&self, owner: &str) -> RepoResult<Vec<Order>> {
        let db = self.base.db().await;
        let mut response = self
            .base
            .run(
                db.query("SELECT * FROM orders WHERE owner = $owner ORDER BY created_at DESC")
                    .bind(("owner", owner.to_string())),
            )
            .await?;
        Ok(response.take(0)?)
    }

    /// Administrative status overwrite.
    ///
    /// Accepts any of the five statuses and deliberately skips
    /// `OrderStatus::can_transition_to` — administrators may set any value.
    pub async fn set_status_override(&self, id: &str, status: OrderStatus) -> RepoResult<Order> {
        let key = record_key(ORDER_TABLE, id);
        let thing = RecordId::from_table_key(ORDER_TABLE, key);

        let db = self.base.db().await;
        let mut response = self
            .base
            .run(
                db.query("UPDATE $thing SET status = $status, updated_at = $now RETURN AFTER")
                    .bind(("thing", thing))
                    .bind(("status", status))
                    .bind(("now", Utc::now())),
            )
            .await?;

        let orders: Vec<Order> = response.take(0)?;
        orders
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound(format!("Order {id} not found")))
    }

    /// Owner cancellation — legal only while the order is still pending.
    ///
    /// The status check and the transition run as one conditional UPDATE, so
    /// a concurrent admin overwrite cannot slip between check and write. The
    /// order is left unchanged when cancellation is illegal.
    pub async fn cancel(&self, owner: &str, id: &str) -> RepoResult<Order> {
        let key = record_key(ORDER_TABLE, id);
        let thing = RecordId::from_table_key(ORDER_TABLE, key);

        let db = self.base.db().await;
        let mut response = self
            .base
            .run(
                db.query(
                    "UPDATE $thing SET status = $cancelled, updated_at = $now \
                     WHERE owner = $owner AND status = $pending RETURN AFTER",
                )
                .bind(("thing", thing))
                .bind(("cancelled", OrderStatus::Cancelled))
                .bind(("pending", OrderStatus::Pending))
                .bind(("owner", owner.to_string()))
                .bind(("now", Utc::now())),
            )
            .await?;

        let orders: Vec<Order> = response.take(0)?;
        if let Some(order) = orders.into_iter().next() {
            return Ok(order);
        }

        // Matched nothing: disambiguate on the failure path
        match self.find_by_id(key).await? {
            Some(order) if order.owner == owner => {
                if order.status.can_transition_to(OrderStatus::Cancelled) {
                    // The order was pending again by the time we re-read it,
                    // i.e. we raced a concurrent status change. Retryable.
                    Err(RepoError::Unavailable(
                        "cancellation raced a concurrent update, retry".to_string(),
                    ))
                } else {
                    Err(RepoError::InvalidState(format!(
                        "Order in status '{}' cannot be cancelled",
                        order.status.as_str()
                    )))
                }
            }
            _ => Err(RepoError::NotFound(format!("Order {id} not found"))),
        }
    }
}
