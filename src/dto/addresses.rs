use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::Address;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateAddressRequest {
    pub line1: String,
    pub line2: Option<String>,
    pub city: String,
    pub state: String,
    pub country: String,
    pub postal_code: String,
    pub phone: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AddressList {
    pub items: Vec<Address>,
}
