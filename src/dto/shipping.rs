use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::ShippingPrice;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateShippingRequest {
    pub country: String,
    pub state: String,
    pub min_price: i64,
    /// Omit for an unbounded upper edge.
    pub max_price: Option<i64>,
    pub fee: i64,
    pub delivery_time: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateShippingRequest {
    pub fee: Option<i64>,
    pub delivery_time: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ShippingList {
    pub items: Vec<ShippingPrice>,
}
