use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

use crate::{
    audit::log_audit,
    dto::orders::{OrderList, OrderWithItems},
    entity::{
        order_items::{Column as OrderItemCol, Entity as OrderItems},
        orders::{ActiveModel as OrderActive, Column as OrderCol, Entity as Orders},
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    models::{Order, OrderItem},
    response::{ApiResponse, Meta},
    routes::params::{OrderListQuery, SortOrder},
    state::AppState,
};

/// The order lifecycle. `delivered_at` is stamped when the status lands on
/// `delivered`.
pub const ORDER_STATUSES: [&str; 7] = [
    "pending",
    "confirmed",
    "processing",
    "shipped",
    "delivered",
    "cancelled",
    "returned",
];

pub async fn list_all_orders(
    state: &AppState,
    user: &AuthUser,
    query: OrderListQuery,
) -> AppResult<ApiResponse<OrderList>> {
    ensure_admin(user)?;
    let (page, limit, offset) = query.pagination.normalize();

    let mut condition = Condition::all();
    if let Some(status) = query.status.as_ref().filter(|s| !s.is_empty()) {
        condition = condition.add(OrderCol::OrderStatus.eq(status.clone()));
    }

    let mut finder = Orders::find().filter(condition);
    let sort_order = query.sort_order.unwrap_or(SortOrder::Desc);
    finder = match sort_order {
        SortOrder::Asc => finder.order_by_asc(OrderCol::CreatedAt),
        SortOrder::Desc => finder.order_by_desc(OrderCol::CreatedAt),
    };

    let total = finder.clone().count(&state.orm).await? as i64;

    let orders = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Order::from)
        .collect();

    let meta = Meta::new(page, limit, total);
    Ok(ApiResponse::success(OrderList { items: orders }, Some(meta)))
}

pub async fn get_order_admin(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<OrderWithItems>> {
    ensure_admin(user)?;

    let order = Orders::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let items = OrderItems::find()
        .filter(OrderItemCol::OrderId.eq(order.id))
        .all(&state.orm)
        .await?
        .into_iter()
        .map(OrderItem::from)
        .collect();

    Ok(ApiResponse::success(
        OrderWithItems {
            order: Order::from(order),
            items,
        },
        Some(Meta::empty()),
    ))
}

pub async fn update_order_status(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    status: String,
) -> AppResult<ApiResponse<Order>> {
    ensure_admin(user)?;
    if !ORDER_STATUSES.contains(&status.as_str()) {
        return Err(AppError::BadRequest("Invalid order status".into()));
    }

    let existing = Orders::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let mut active: OrderActive = existing.into();
    if status == "delivered" {
        active.delivered_at = Set(Some(Utc::now().into()));
    }
    active.order_status = Set(status);
    active.updated_at = Set(Utc::now().into());
    let order = active.update(&state.orm).await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "order_status_update",
        Some("orders"),
        Some(serde_json::json!({ "order_id": order.id, "status": order.order_status })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(Order::from(order), Some(Meta::empty())))
}

pub async fn mark_order_paid(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<Order>> {
    ensure_admin(user)?;

    let existing = Orders::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    if existing.payment_status == "paid" {
        return Err(AppError::BadRequest("Order already paid".into()));
    }

    let mut active: OrderActive = existing.into();
    active.payment_status = Set("paid".into());
    active.paid_at = Set(Some(Utc::now().into()));
    active.updated_at = Set(Utc::now().into());
    let order = active.update(&state.orm).await?;

    Ok(ApiResponse::success(Order::from(order), Some(Meta::empty())))
}
