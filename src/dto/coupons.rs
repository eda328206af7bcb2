use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::Coupon;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateCouponRequest {
    pub code: String,
    pub discount_type: String,
    pub discount_value: i64,
    pub starts_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub usage_limit: Option<i32>,
    /// Restrict the coupon to these products; empty or omitted means any.
    pub product_ids: Option<Vec<Uuid>>,
    /// Restrict the coupon to these categories; empty or omitted means any.
    pub category_ids: Option<Vec<Uuid>>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateCouponRequest {
    pub discount_type: Option<String>,
    pub discount_value: Option<i64>,
    pub starts_at: Option<DateTime<Utc>>,
    pub expires_at: Option<DateTime<Utc>>,
    pub usage_limit: Option<i32>,
    pub product_ids: Option<Vec<Uuid>>,
    pub category_ids: Option<Vec<Uuid>>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ValidateCouponRequest {
    pub code: String,
    pub subtotal: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CouponQuote {
    pub discount: i64,
    pub total_after: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CouponList {
    pub items: Vec<Coupon>,
}
