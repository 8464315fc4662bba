//! Inventory API 模块

mod handler;

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/inventory", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        // Derived low-stock view (must be before /{id} to avoid path conflicts)
        .route("/low-stock", get(handler::list_low_stock))
        // Bulk reconciliation (upsert by name, never a duplicate error)
        .route("/bulk-import", post(handler::bulk_import))
        .route("/{id}", put(handler::update).delete(handler::delete))
        // The sole atomic quantity mutation
        .route("/{id}/adjust", post(handler::adjust_quantity))
}
