use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::Review;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateReviewRequest {
    pub product_id: Uuid,
    pub reviewer_name: String,
    pub rating: i32,
    pub comment: String,
    pub image: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ReviewList {
    pub items: Vec<Review>,
}
