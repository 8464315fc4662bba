//! Inventory Item Repository

use chrono::Utc;
use surrealdb::RecordId;

use super::{BaseRepository, RepoError, RepoResult, record_key};
use crate::db::DbService;
use crate::db::models::{InventoryItem, ItemCreate, ItemUpdate, ItemUpsert};

const ITEM_TABLE: &str = "item";

// =============================================================================
// Item Repository
// =============================================================================

#[derive(Clone)]
pub struct ItemRepository {
    base: BaseRepository,
}

impl ItemRepository {
    pub fn new(service: DbService) -> Self {
        Self {
            base: BaseRepository::new(service),
        }
    }

    /// Find all items owned by the caller, most-recently-created first
    pub async fn find_all(&self, owner: &str) -> RepoResult<Vec<InventoryItem>> {
        let db = self.base.db().await;
        let mut response = self
            .base
            .run(
                db.query("SELECT * FROM item WHERE owner = $owner ORDER BY created_at DESC")
                    .bind(("owner", owner.to_string())),
            )
            .await?;
        Ok(response.take(0)?)
    }

    /// Items at or below their threshold, filtered server-side so the result
    /// stays correct under concurrent mutation
    pub async fn find_low_stock(&self, owner: &str) -> RepoResult<Vec<InventoryItem>> {
        let db = self.base.db().await;
        let mut response = self
            .base
            .run(
                db.query(
                    "SELECT * FROM item WHERE owner = $owner AND quantity <= threshold ORDER BY created_at DESC",
                )
                .bind(("owner", owner.to_string())),
            )
            .await?;
        Ok(response.take(0)?)
    }

    /// Find an item by id, scoped to the owner
    pub async fn find_by_id(&self, owner: &str, id: &str) -> RepoResult<Option<InventoryItem>> {
        Ok(self
            .find_by_id_any(id)
            .await?
            .filter(|item| item.owner == owner))
    }

    /// Find an item by id without owner scoping (order snapshots reference
    /// items across owners, mirroring the read side)
    pub async fn find_by_id_any(&self, id: &str) -> RepoResult<Option<InventoryItem>> {
        let key = record_key(ITEM_TABLE, id).to_string();
        let db = self.base.db().await;
        let item: Option<InventoryItem> = self.base.run(db.select((ITEM_TABLE, key))).await?;
        Ok(item)
    }

    /// Create a new item
    ///
    /// The `(owner, name)` unique index rejects duplicates atomically; a
    /// pre-flight existence check would race with concurrent creates.
    pub async fn create(
        &self,
        owner: &str,
        data: ItemCreate,
        actor: &str,
    ) -> RepoResult<InventoryItem> {
        data.validate()
            .map_err(|fields| RepoError::validation("Invalid input data", fields))?;

        let now = Utc::now();
        let item = InventoryItem {
            id: None,
            owner: owner.to_string(),
            name: data.name.trim().to_string(),
            description: data.description.trim().to_string(),
            price: data.price,
            quantity: data.quantity,
            threshold: data.threshold,
            unit: data.unit.trim().to_string(),
            category: data.category.trim().to_string(),
            last_modified_by: actor.to_string(),
            created_at: now,
            updated_at: now,
        };
        let name = item.name.clone();

        let db = self.base.db().await;
        let created: Option<InventoryItem> = self
            .base
            .run(db.create(ITEM_TABLE).content(item))
            .await
            .map_err(|e| match e {
                RepoError::Duplicate(_) => {
                    RepoError::Duplicate(format!("Item '{name}' already exists"))
                }
                other => other,
            })?;

        created.ok_or_else(|| RepoError::Database("Failed to create item".to_string()))
    }

    /// Partial update — only quantity, threshold, unit and category are
    /// mutable through this path
    pub async fn update(
        &self,
        owner: &str,
        id: &str,
        data: ItemUpdate,
        actor: &str,
    ) -> RepoResult<InventoryItem> {
        data.validate()
            .map_err(|fields| RepoError::validation("Invalid input data", fields))?;

        let key = record_key(ITEM_TABLE, id);
        let thing = RecordId::from_table_key(ITEM_TABLE, key);

        // Build dynamic SET clauses with typed bindings
        let mut set_parts: Vec<&str> = vec!["last_modified_by = $actor", "updated_at = $now"];
        if data.quantity.is_some() {
            set_parts.push("quantity = $quantity");
        }
        if data.threshold.is_some() {
            set_parts.push("threshold = $threshold");
        }
        if data.unit.is_some() {
            set_parts.push("unit = $unit");
        }
        if data.category.is_some() {
            set_parts.push("category = $category");
        }

        let query_str = format!(
            "UPDATE $thing SET {} WHERE owner = $owner RETURN AFTER",
            set_parts.join(", ")
        );

        let db = self.base.db().await;
        let mut query = db
            .query(query_str)
            .bind(("thing", thing))
            .bind(("owner", owner.to_string()))
            .bind(("actor", actor.to_string()))
            .bind(("now", Utc::now()));
        if let Some(v) = data.quantity {
            query = query.bind(("quantity", v));
        }
        if let Some(v) = data.threshold {
            query = query.bind(("threshold", v));
        }
        if let Some(v) = data.unit {
            query = query.bind(("unit", v.trim().to_string()));
        }
        if let Some(v) = data.category {
            query = query.bind(("category", v.trim().to_string()));
        }

        let mut response = self.base.run(query).await?;
        let items: Vec<InventoryItem> = response.take(0)?;
        items
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound(format!("Item {id} not found")))
    }

    /// Atomically adjust the quantity by a signed delta.
    ///
    /// The read-modify-write is a single conditional UPDATE so two concurrent
    /// adjustments can never lose an update: the `quantity + $delta >= 0`
    /// guard and the increment execute as one indivisible statement. On
    /// failure the item is left unchanged.
    pub async fn adjust_quantity(
        &self,
        owner: &str,
        id: &str,
        delta: i64,
        actor: &str,
    ) -> RepoResult<InventoryItem> {
        let key = record_key(ITEM_TABLE, id);
        let thing = RecordId::from_table_key(ITEM_TABLE, key);

        let db = self.base.db().await;
        let mut response = self
            .base
            .run(
                db.query(
                    "UPDATE $thing SET quantity += $delta, last_modified_by = $actor, updated_at = $now \
                     WHERE owner = $owner AND quantity + $delta >= 0 RETURN AFTER",
                )
                .bind(("thing", thing))
                .bind(("delta", delta))
                .bind(("owner", owner.to_string()))
                .bind(("actor", actor.to_string()))
                .bind(("now", Utc::now())),
            )
            .await?;

        let items: Vec<InventoryItem> = response.take(0)?;
        if let Some(item) = items.into_iter().next() {
            return Ok(item);
        }

        // The conditional update matched nothing: separate not-found from
        // would-go-negative with a follow-up read (failure path only)
        match self.find_by_id(owner, key).await? {
            Some(item) => Err(RepoError::InsufficientStock(format!(
                "Cannot adjust '{}' by {delta}: only {} in stock",
                item.name, item.quantity
            ))),
            None => Err(RepoError::NotFound(format!("Item {id} not found"))),
        }
    }

    /// Delete an item — permitted for the owner, or for administrators
    /// regardless of ownership
    pub async fn delete(
        &self,
        owner: &str,
        id: &str,
        is_admin: bool,
    ) -> RepoResult<InventoryItem> {
        let key = record_key(ITEM_TABLE, id);
        let thing = RecordId::from_table_key(ITEM_TABLE, key);

        let query_str = if is_admin {
            "DELETE $thing RETURN BEFORE"
        } else {
            "DELETE $thing WHERE owner = $owner RETURN BEFORE"
        };

        let db = self.base.db().await;
        let mut query = db.query(query_str).bind(("thing", thing));
        if !is_admin {
            query = query.bind(("owner", owner.to_string()));
        }

        let mut response = self.base.run(query).await?;
        let items: Vec<InventoryItem> = response.take(0)?;
        items
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound(format!("Item {id} not found")))
    }

    /// Atomic per-row upsert keyed by the `(owner, name)` unique index.
    ///
    /// Create-or-replace as one statement: an existing item has its mutable
    /// fields fully overwritten, a missing one is created. Never raises
    /// `Duplicate`, and re-running the same row converges to the same state.
    pub async fn upsert_row(
        &self,
        owner: &str,
        row: &ItemUpsert,
        actor: &str,
    ) -> RepoResult<InventoryItem> {
        let now = Utc::now();
        let item = InventoryItem {
            id: None,
            owner: owner.to_string(),
            name: row.name.clone(),
            description: row.description.clone(),
            price: row.price,
            quantity: row.quantity,
            threshold: row.threshold,
            unit: row.unit.clone(),
            category: row.category.clone(),
            last_modified_by: actor.to_string(),
            created_at: now,
            updated_at: now,
        };

        let db = self.base.db().await;
        let mut response = self
            .base
            .run(
                db.query(
                    "INSERT INTO item $item ON DUPLICATE KEY UPDATE \
                     description = $input.description, price = $input.price, \
                     quantity = $input.quantity, threshold = $input.threshold, \
                     unit = $input.unit, category = $input.category, \
                     last_modified_by = $input.last_modified_by, updated_at = $input.updated_at",
                )
                .bind(("item", item)),
            )
            .await?;

        let items: Vec<InventoryItem> = response.take(0)?;
        items
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::Database("Upsert returned no record".to_string()))
    }
}
