//! Order API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use chrono::Utc;
use surrealdb::RecordId;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{
    Order, OrderCreate, OrderDetail, OrderLine, OrderStatus, PaymentStatus, SetOrderStatus,
};
use crate::db::repository::{ItemRepository, OrderRepository, record_key};
use crate::utils::{AppError, AppResponse, AppResult, ok, ok_with_message};

const ITEM_TABLE: &str = "item";

// =============================================================================
// Order Handlers
// =============================================================================

/// GET /api/orders - 订单列表 (管理员看全部，用户看自己的)
pub async fn list(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<AppResponse<Vec<OrderDetail>>>> {
    let repo = OrderRepository::new(state.db.clone());
    let orders = if user.is_admin() {
        repo.find_all().await?
    } else {
        repo.find_by_owner(&user.id).await?
    };

    Ok(ok(orders.into_iter().map(OrderDetail::from).collect()))
}

/// POST /api/orders - 创建订单
///
/// 逐项快照当前价格并计算总额，初始状态 pending。
/// 不扣减库存——库存扣减由调用方另行通过 adjust 接口发起。
pub async fn create(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<OrderCreate>,
) -> AppResult<Json<AppResponse<OrderDetail>>> {
    if payload.items.is_empty() {
        return Err(AppError::validation_fields(
            "Invalid input data",
            vec!["items: must not be empty".to_string()],
        ));
    }
    let field_errors: Vec<String> = payload
        .items
        .iter()
        .enumerate()
        .filter(|(_, line)| line.quantity < 1)
        .map(|(i, _)| format!("items[{i}].quantity: must be at least 1"))
        .collect();
    if !field_errors.is_empty() {
        return Err(AppError::validation_fields("Invalid input data", field_errors));
    }

    // Snapshot current price and name for every referenced item
    let item_repo = ItemRepository::new(state.db.clone());
    let mut lines = Vec::with_capacity(payload.items.len());
    for input in &payload.items {
        let item = item_repo
            .find_by_id_any(&input.product_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Product {}", input.product_id)))?;

        lines.push(OrderLine {
            product: RecordId::from_table_key(ITEM_TABLE, record_key(ITEM_TABLE, &input.product_id)),
            name: item.name,
            quantity: input.quantity,
            unit_price: item.price,
        });
    }

    let now = Utc::now();
    let total_amount = Order::compute_total(&lines);
    let order = Order {
        id: None,
        owner: user.id.clone(),
        items: lines,
        shipping_address: payload.shipping_address,
        payment_method: payload.payment_method,
        payment_status: PaymentStatus::default(),
        total_amount,
        status: OrderStatus::Pending,
        created_at: now,
        updated_at: now,
    };

    let repo = OrderRepository::new(state.db.clone());
    let created = repo.create(order).await?;

    Ok(ok_with_message(
        OrderDetail::from(created),
        "Order created successfully",
    ))
}

/// GET /api/orders/{id} - 获取单个订单
///
/// 非管理员只能看到自己的订单；越权访问与不存在同样返回 404。
pub async fn get_by_id(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<AppResponse<OrderDetail>>> {
    let repo = OrderRepository::new(state.db.clone());
    let order = repo
        .find_by_id(&id)
        .await?
        .filter(|order| user.is_admin() || order.owner == user.id)
        .ok_or_else(|| AppError::not_found(format!("Order {id}")))?;

    Ok(ok(OrderDetail::from(order)))
}

/// PATCH /api/orders/{id}/status - 管理员状态覆写
///
/// 管理员可设置五个状态中的任意一个，不做顺序校验 (有意保留的行为，
/// 与用户取消路径分离)。
pub async fn set_status(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
    Json(payload): Json<SetOrderStatus>,
) -> AppResult<Json<AppResponse<OrderDetail>>> {
    if !user.is_admin() {
        return Err(AppError::forbidden("Administrator role required"));
    }

    let status = OrderStatus::parse(&payload.status).ok_or_else(|| {
        AppError::validation_fields(
            "Invalid input data",
            vec![format!(
                "status: '{}' is not one of pending, processing, shipped, delivered, cancelled",
                payload.status
            )],
        )
    })?;

    let repo = OrderRepository::new(state.db.clone());
    let order = repo.set_status_override(&id, status).await?;

    Ok(ok_with_message(
        OrderDetail::from(order),
        "Order status updated successfully",
    ))
}

/// DELETE /api/orders/{id} - 用户取消订单
///
/// 仅所有者、仅 pending 状态可取消；取消是状态流转而非物理删除。
pub async fn cancel(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<AppResponse<OrderDetail>>> {
    let repo = OrderRepository::new(state.db.clone());
    let order = repo.cancel(&user.id, &id).await?;

    Ok(ok_with_message(
        OrderDetail::from(order),
        "Order cancelled successfully",
    ))
}
