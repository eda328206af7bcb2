use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use sea_orm::ActiveValue::NotSet;
use sea_orm::sea_query::Expr;
use uuid::Uuid;

use crate::{
    audit::log_audit,
    dto::orders::{CheckoutRequest, OrderList, OrderWithItems, PendingOrder},
    entity::{
        addresses::{Column as AddressCol, Entity as Addresses},
        cart_items::{Column as CartCol, Entity as CartItems},
        coupons::{ActiveModel as CouponActive, Column as CouponCol, Entity as Coupons},
        order_items::{ActiveModel as OrderItemActive, Column as OrderItemCol, Entity as OrderItems},
        orders::{ActiveModel as OrderActive, Column as OrderCol, Entity as Orders},
        product_categories::{Column as ProductCategoryCol, Entity as ProductCategories},
        products::{Column as ProdCol, Entity as Products},
    },
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::{Order, OrderItem},
    response::{ApiResponse, Meta},
    services::{coupon_service, shipping_service},
    state::AppState,
};

pub const PENDING_ORDER_COOKIE: &str = "pendingOrder";

const PAYMENT_METHODS: [&str; 3] = ["cod", "card", "paypal"];

pub async fn checkout(
    state: &AppState,
    user: &AuthUser,
    payload: CheckoutRequest,
) -> AppResult<ApiResponse<OrderWithItems>> {
    if !PAYMENT_METHODS.contains(&payload.payment_method.as_str()) {
        return Err(AppError::BadRequest("Invalid payment method".into()));
    }

    let address = Addresses::find()
        .filter(
            Condition::all()
                .add(AddressCol::Id.eq(payload.address_id))
                .add(AddressCol::UserId.eq(user.user_id)),
        )
        .one(&state.orm)
        .await?
        .ok_or_else(|| AppError::BadRequest("Address not found".into()))?;

    let txn = state.orm.begin().await?;

    let rows = CartItems::find()
        .filter(CartCol::UserId.eq(user.user_id))
        .find_also_related(Products)
        .all(&txn)
        .await?;

    if rows.is_empty() {
        return Err(AppError::BadRequest("Cart is empty".into()));
    }

    let mut subtotal: i64 = 0;
    let mut lines = Vec::with_capacity(rows.len());
    for (item, product) in rows {
        let product = product
            .ok_or_else(|| AppError::BadRequest("Cart references a removed product".into()))?;
        if item.quantity <= 0 {
            return Err(AppError::BadRequest("Cart has invalid quantity".into()));
        }
        if let Some(stock) = product.stock {
            if stock < item.quantity {
                return Err(AppError::BadRequest(format!(
                    "Insufficient stock for product {}",
                    product.id
                )));
            }
        }
        let unit_price = product.sale_price.unwrap_or(product.price);
        subtotal += unit_price * (item.quantity as i64);
        lines.push((product, item.quantity, unit_price));
    }

    let mut coupon_id = None;
    let mut discount: i64 = 0;
    if let Some(code) = payload.coupon_code.as_ref().filter(|c| !c.is_empty()) {
        let coupon = Coupons::find()
            .filter(CouponCol::Code.eq(code.as_str()))
            .one(&txn)
            .await?
            .ok_or_else(|| AppError::BadRequest("Invalid coupon code".into()))?;

        // Scoped coupons discount only the eligible lines.
        let (scope_products, scope_categories) = coupon_service::coupon_scope(&coupon);
        let eligible_subtotal = if scope_products.is_empty() && scope_categories.is_empty() {
            subtotal
        } else {
            let cart_product_ids: Vec<Uuid> =
                lines.iter().map(|(product, _, _)| product.id).collect();
            let links = ProductCategories::find()
                .filter(ProductCategoryCol::ProductId.is_in(cart_product_ids))
                .all(&txn)
                .await?;
            lines
                .iter()
                .filter(|(product, _, _)| {
                    let line_categories: Vec<Uuid> = links
                        .iter()
                        .filter(|link| link.product_id == product.id)
                        .map(|link| link.category_id)
                        .collect();
                    coupon_service::line_is_eligible(
                        product.id,
                        &line_categories,
                        &scope_products,
                        &scope_categories,
                    )
                })
                .map(|(_, quantity, unit_price)| unit_price * (*quantity as i64))
                .sum()
        };
        if eligible_subtotal == 0 {
            return Err(AppError::BadRequest(
                "Coupon does not apply to any cart item".into(),
            ));
        }

        discount = coupon_service::evaluate_coupon(&coupon, eligible_subtotal, Utc::now())
            .map_err(|reason| AppError::BadRequest(reason.into()))?;
        coupon_id = Some(coupon.id);

        let used = coupon.used_count + 1;
        let mut active: CouponActive = coupon.into();
        active.used_count = Set(used);
        active.update(&txn).await?;
    }

    let shipping_fee =
        shipping_service::fee_for(state, &address.country, &address.state, subtotal).await?;
    let total_amount = subtotal - discount + shipping_fee;

    let order_id = Uuid::new_v4();
    let order = OrderActive {
        id: Set(order_id),
        invoice_number: Set(build_invoice_number(order_id)),
        user_id: Set(user.user_id),
        address_id: Set(address.id),
        coupon_id: Set(coupon_id),
        total_amount: Set(total_amount),
        shipping_fee: Set(shipping_fee),
        payment_method: Set(payload.payment_method),
        payment_status: Set("unpaid".into()),
        order_status: Set("pending".into()),
        paid_at: Set(None),
        delivered_at: Set(None),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&txn)
    .await?;

    let mut order_items: Vec<OrderItem> = Vec::new();
    for (product, quantity, unit_price) in lines {
        let item = OrderItemActive {
            id: Set(Uuid::new_v4()),
            order_id: Set(order.id),
            product_id: Set(product.id),
            quantity: Set(quantity),
            price: Set(unit_price),
            created_at: NotSet,
        }
        .insert(&txn)
        .await?;
        order_items.push(OrderItem::from(item));

        if product.stock.is_some() {
            Products::update_many()
                .col_expr(ProdCol::Stock, Expr::col(ProdCol::Stock).sub(quantity))
                .filter(ProdCol::Id.eq(product.id))
                .exec(&txn)
                .await?;
        }
    }

    CartItems::delete_many()
        .filter(CartCol::UserId.eq(user.user_id))
        .exec(&txn)
        .await?;

    txn.commit().await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "checkout",
        Some("orders"),
        Some(serde_json::json!({ "order_id": order.id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        OrderWithItems {
            order: Order::from(order),
            items: order_items,
        },
        Some(Meta::empty()),
    ))
}

/// Order history for the cookie-authenticated user. Zero orders is an empty
/// list, not a 404.
pub async fn list_orders(state: &AppState, user: &AuthUser) -> AppResult<ApiResponse<OrderList>> {
    let orders: Vec<Order> = Orders::find()
        .filter(OrderCol::UserId.eq(user.user_id))
        .order_by_desc(OrderCol::CreatedAt)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Order::from)
        .collect();

    let total = orders.len() as i64;
    Ok(ApiResponse::success(
        OrderList { items: orders },
        Some(Meta::new(1, total.max(1), total)),
    ))
}

pub async fn get_order(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<OrderWithItems>> {
    let order = Orders::find()
        .filter(
            Condition::all()
                .add(OrderCol::UserId.eq(user.user_id))
                .add(OrderCol::Id.eq(id)),
        )
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

/// Decode the client-held pre-checkout cookie: base64 JSON, no signature.
/// Absent or incomplete state is an internal error by contract; this is
/// convenience state, not an authorization boundary.
pub fn decode_pending_order(value: &str) -> AppResult<PendingOrder> {
    let bytes = BASE64
        .decode(value)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("malformed pending-order cookie: {e}")))?;
    let pending = serde_json::from_slice(&bytes)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("malformed pending-order cookie: {e}")))?;
    Ok(pending)
}

fn build_invoice_number(order_id: Uuid) -> String {
    let date = Utc::now().format("%Y%m%d");
    let suffix = order_id.to_string();
    let short = &suffix[..8];
    format!("INV-{}-{}", date, short)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invoice_numbers_embed_date_and_order_prefix() {
        let id = Uuid::new_v4();
        let invoice = build_invoice_number(id);
        assert!(invoice.starts_with("INV-"));
        assert!(invoice.ends_with(&id.to_string()[..8]));
        assert_eq!(invoice.len(), "INV-".len() + 8 + 1 + 8);
    }

    #[test]
    fn pending_order_cookie_round_trips() {
        let pending = PendingOrder {
            address_id: Uuid::new_v4(),
            payment_method: "card".into(),
        };
        let encoded = BASE64.encode(serde_json::to_vec(&pending).unwrap());
        let decoded = decode_pending_order(&encoded).unwrap();
        assert_eq!(decoded.address_id, pending.address_id);
        assert_eq!(decoded.payment_method, "card");
    }

    #[test]
    fn pending_order_cookie_missing_fields_is_internal() {
        let encoded = BASE64.encode(br#"{"address_id":"not-even-a-uuid"}"#);
        let err = decode_pending_order(&encoded).unwrap_err();
        assert!(matches!(err, AppError::Internal(_)));
    }

    #[test]
    fn pending_order_cookie_bad_base64_is_internal() {
        let err = decode_pending_order("%%%not-base64%%%").unwrap_err();
        assert!(matches!(err, AppError::Internal(_)));
    }
}
