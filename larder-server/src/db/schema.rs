//! Schema Definition
//!
//! Idempotent `DEFINE ... IF NOT EXISTS` statements, applied on every
//! (re)connect. The `(owner, name)` unique index carries both the duplicate
//! check on create and the upsert key for bulk reconciliation.

use surrealdb::Surreal;
use surrealdb::engine::remote::ws::Client;

pub(crate) async fn define(db: &Surreal<Client>) -> Result<(), surrealdb::Error> {
    db.query(
        "
        DEFINE TABLE IF NOT EXISTS item SCHEMALESS;
        DEFINE INDEX IF NOT EXISTS idx_item_owner_name ON TABLE item COLUMNS owner, name UNIQUE;

        DEFINE TABLE IF NOT EXISTS orders SCHEMALESS;
        DEFINE INDEX IF NOT EXISTS idx_orders_owner ON TABLE orders COLUMNS owner;
        ",
    )
    .await?
    .check()?;
    Ok(())
}
