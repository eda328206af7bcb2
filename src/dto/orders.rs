use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::{Order, OrderItem};

#[derive(Debug, Deserialize, ToSchema)]
pub struct CheckoutRequest {
    pub address_id: Uuid,
    pub payment_method: String,
    pub coupon_code: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderWithItems {
    pub order: Order,
    pub items: Vec<OrderItem>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderList {
    pub items: Vec<Order>,
}

/// Client-held pre-checkout state: base64 JSON, no signature. Convenience
/// only, never an authorization boundary.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PendingOrder {
    pub address_id: Uuid,
    pub payment_method: String,
}
