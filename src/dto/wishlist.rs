use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::Product;

#[derive(Debug, Deserialize, ToSchema)]
pub struct AddToWishlistRequest {
    pub product_id: Uuid,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct WishlistList {
    pub items: Vec<Product>,
}
