//! Inventory API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Serialize;
use serde_json::Value;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{AdjustQuantity, ItemCreate, ItemDetail, ItemUpdate};
use crate::db::repository::ItemRepository;
use crate::inventory::Reconciler;
use crate::utils::{AppError, AppResponse, AppResult, ok, ok_with_message};

// =============================================================================
// Inventory Handlers
// =============================================================================

/// GET /api/inventory - 获取当前用户的全部库存
pub async fn list(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<AppResponse<Vec<ItemDetail>>>> {
    let repo = ItemRepository::new(state.db.clone());
    let items = repo.find_all(&user.id).await?;

    Ok(ok(items.into_iter().map(ItemDetail::from).collect()))
}

/// GET /api/inventory/low-stock - 低库存列表 (quantity <= threshold)
pub async fn list_low_stock(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<AppResponse<Vec<ItemDetail>>>> {
    let repo = ItemRepository::new(state.db.clone());
    let items = repo.find_low_stock(&user.id).await?;

    Ok(ok(items.into_iter().map(ItemDetail::from).collect()))
}

/// POST /api/inventory - 新增库存条目
pub async fn create(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<ItemCreate>,
) -> AppResult<Json<AppResponse<ItemDetail>>> {
    let repo = ItemRepository::new(state.db.clone());
    let item = repo.create(&user.id, payload, &user.id).await?;

    Ok(ok_with_message(ItemDetail::from(item), "Item added"))
}

/// PUT /api/inventory/{id} - 更新条目 (quantity/threshold/unit/category)
pub async fn update(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
    Json(payload): Json<ItemUpdate>,
) -> AppResult<Json<AppResponse<ItemDetail>>> {
    let repo = ItemRepository::new(state.db.clone());
    let item = repo.update(&user.id, &id, payload, &user.id).await?;

    Ok(ok_with_message(ItemDetail::from(item), "Inventory updated"))
}

/// POST /api/inventory/{id}/adjust - 原子数量调整
///
/// 唯一的数量增减入口；并发调整按条目序列化，不会丢失更新。
pub async fn adjust_quantity(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
    Json(payload): Json<AdjustQuantity>,
) -> AppResult<Json<AppResponse<ItemDetail>>> {
    let repo = ItemRepository::new(state.db.clone());
    let item = repo
        .adjust_quantity(&user.id, &id, payload.delta, &user.id)
        .await?;

    Ok(ok_with_message(ItemDetail::from(item), "Quantity adjusted"))
}

/// DELETE /api/inventory/{id} - 删除条目 (所有者或管理员)
pub async fn delete(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<AppResponse<ItemDetail>>> {
    let repo = ItemRepository::new(state.db.clone());
    let item = repo.delete(&user.id, &id, user.is_admin()).await?;

    Ok(ok_with_message(ItemDetail::from(item), "Item removed"))
}

// =============================================================================
// Bulk Import
// =============================================================================

/// Bulk import result payload
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkImportResult {
    pub processed_count: usize,
    pub skipped_count: usize,
    pub final_inventory: Vec<ItemDetail>,
}

/// POST /api/inventory/bulk-import - 批量导入对账
///
/// 请求体为行对象数组 (CSV 解析由边界层完成)。按 (owner, name) upsert，
/// 无效行跳过并计数，不中断批次。
pub async fn bulk_import(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<Value>,
) -> AppResult<Json<AppResponse<BulkImportResult>>> {
    let rows = payload.as_array().ok_or_else(|| {
        AppError::validation("Invalid data format. Expected an array of items.")
    })?;

    let reconciler = Reconciler::new(ItemRepository::new(state.db.clone()));
    let outcome = reconciler.reconcile(&user.id, rows, &user.id).await?;

    let message = format!("Successfully imported {} items", outcome.processed);
    Ok(ok_with_message(
        BulkImportResult {
            processed_count: outcome.processed,
            skipped_count: outcome.skipped,
            final_inventory: outcome.inventory.into_iter().map(ItemDetail::from).collect(),
        },
        message,
    ))
}
