use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::entity;

/// API-facing user. Password hash, OTP and reset-token fields never leave the
/// storage layer.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct User {
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
    pub role: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Address {
    pub id: Uuid,
    pub user_id: Uuid,
    pub line1: String,
    pub line2: Option<String>,
    pub city: String,
    pub state: String,
    pub country: String,
    pub postal_code: String,
    pub phone: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub sku: String,
    pub description: Option<String>,
    pub price: i64,
    pub sale_price: Option<i64>,
    pub stock: Option<i32>,
    pub images: Vec<String>,
    pub colors: Vec<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub image: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SubCategory {
    pub id: Uuid,
    pub category_id: Uuid,
    pub name: String,
    pub image: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CartItem {
    pub id: Uuid,
    pub product_id: Uuid,
    pub user_id: Uuid,
    pub quantity: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct WishlistItem {
    pub id: Uuid,
    pub product_id: Uuid,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Order {
    pub id: Uuid,
    pub invoice_number: String,
    pub user_id: Uuid,
    pub address_id: Uuid,
    pub coupon_id: Option<Uuid>,
    pub total_amount: i64,
    pub shipping_fee: i64,
    pub payment_method: String,
    pub payment_status: String,
    pub order_status: String,
    pub paid_at: Option<DateTime<Utc>>,
    pub delivered_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct OrderItem {
    pub id: Uuid,
    pub order_id: Uuid,
    pub product_id: Uuid,
    pub quantity: i32,
    pub price: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Coupon {
    pub id: Uuid,
    pub code: String,
    pub discount_type: String,
    pub discount_value: i64,
    pub starts_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub usage_limit: Option<i32>,
    pub used_count: i32,
    pub product_ids: Vec<Uuid>,
    pub category_ids: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ShippingPrice {
    pub id: Uuid,
    pub country: String,
    pub state: String,
    pub min_price: i64,
    pub max_price: Option<i64>,
    pub fee: i64,
    pub delivery_time: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Blog {
    pub id: Uuid,
    pub title: String,
    pub body: String,
    pub image: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Review {
    pub id: Uuid,
    pub product_id: Uuid,
    pub reviewer_name: String,
    pub rating: i32,
    pub comment: String,
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Faq {
    pub id: Uuid,
    pub product_id: Option<Uuid>,
    pub question: String,
    pub answer: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Benefit {
    pub id: Uuid,
    pub product_id: Uuid,
    pub title: String,
    pub description: String,
    pub image: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Video {
    pub id: Uuid,
    pub product_id: Uuid,
    pub title: String,
    pub url: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ContactMessage {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct NewsletterSubscriber {
    pub id: Uuid,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

fn json_strings(value: serde_json::Value) -> Vec<String> {
    serde_json::from_value(value).unwrap_or_default()
}

fn json_ids(value: serde_json::Value) -> Vec<Uuid> {
    serde_json::from_value(value).unwrap_or_default()
}

impl From<entity::users::Model> for User {
    fn from(m: entity::users::Model) -> Self {
        Self {
            id: m.id,
            full_name: m.full_name,
            email: m.email,
            role: m.role,
            status: m.status,
            created_at: m.created_at.with_timezone(&Utc),
        }
    }
}

impl From<entity::addresses::Model> for Address {
    fn from(m: entity::addresses::Model) -> Self {
        Self {
            id: m.id,
            user_id: m.user_id,
            line1: m.line1,
            line2: m.line2,
            city: m.city,
            state: m.state,
            country: m.country,
            postal_code: m.postal_code,
            phone: m.phone,
            created_at: m.created_at.with_timezone(&Utc),
        }
    }
}

impl From<entity::products::Model> for Product {
    fn from(m: entity::products::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            sku: m.sku,
            description: m.description,
            price: m.price,
            sale_price: m.sale_price,
            stock: m.stock,
            images: json_strings(m.images),
            colors: m.colors.map(json_strings).unwrap_or_default(),
            status: m.status,
            created_at: m.created_at.with_timezone(&Utc),
            updated_at: m.updated_at.with_timezone(&Utc),
        }
    }
}

impl From<entity::categories::Model> for Category {
    fn from(m: entity::categories::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            image: m.image,
            created_at: m.created_at.with_timezone(&Utc),
        }
    }
}

impl From<entity::sub_categories::Model> for SubCategory {
    fn from(m: entity::sub_categories::Model) -> Self {
        Self {
            id: m.id,
            category_id: m.category_id,
            name: m.name,
            image: m.image,
            created_at: m.created_at.with_timezone(&Utc),
        }
    }
}

impl From<entity::cart_items::Model> for CartItem {
    fn from(m: entity::cart_items::Model) -> Self {
        Self {
            id: m.id,
            product_id: m.product_id,
            user_id: m.user_id,
            quantity: m.quantity,
            created_at: m.created_at.with_timezone(&Utc),
        }
    }
}

impl From<entity::wishlist_items::Model> for WishlistItem {
    fn from(m: entity::wishlist_items::Model) -> Self {
        Self {
            id: m.id,
            product_id: m.product_id,
            user_id: m.user_id,
            created_at: m.created_at.with_timezone(&Utc),
        }
    }
}

impl From<entity::orders::Model> for Order {
    fn from(m: entity::orders::Model) -> Self {
        Self {
            id: m.id,
            invoice_number: m.invoice_number,
            user_id: m.user_id,
            address_id: m.address_id,
            coupon_id: m.coupon_id,
            total_amount: m.total_amount,
            shipping_fee: m.shipping_fee,
            payment_method: m.payment_method,
            payment_status: m.payment_status,
            order_status: m.order_status,
            paid_at: m.paid_at.map(|dt| dt.with_timezone(&Utc)),
            delivered_at: m.delivered_at.map(|dt| dt.with_timezone(&Utc)),
            created_at: m.created_at.with_timezone(&Utc),
            updated_at: m.updated_at.with_timezone(&Utc),
        }
    }
}

impl From<entity::order_items::Model> for OrderItem {
    fn from(m: entity::order_items::Model) -> Self {
        Self {
            id: m.id,
            order_id: m.order_id,
            product_id: m.product_id,
            quantity: m.quantity,
            price: m.price,
            created_at: m.created_at.with_timezone(&Utc),
        }
    }
}

impl From<entity::coupons::Model> for Coupon {
    fn from(m: entity::coupons::Model) -> Self {
        Self {
            id: m.id,
            code: m.code,
            discount_type: m.discount_type,
            discount_value: m.discount_value,
            starts_at: m.starts_at.with_timezone(&Utc),
            expires_at: m.expires_at.with_timezone(&Utc),
            usage_limit: m.usage_limit,
            used_count: m.used_count,
            product_ids: m.product_ids.map(json_ids).unwrap_or_default(),
            category_ids: m.category_ids.map(json_ids).unwrap_or_default(),
            created_at: m.created_at.with_timezone(&Utc),
        }
    }
}

impl From<entity::shipping_prices::Model> for ShippingPrice {
    fn from(m: entity::shipping_prices::Model) -> Self {
        Self {
            id: m.id,
            country: m.country,
            state: m.state,
            min_price: m.min_price,
            max_price: m.max_price,
            fee: m.fee,
            delivery_time: m.delivery_time,
            created_at: m.created_at.with_timezone(&Utc),
        }
    }
}

impl From<entity::blogs::Model> for Blog {
    fn from(m: entity::blogs::Model) -> Self {
        Self {
            id: m.id,
            title: m.title,
            body: m.body,
            image: m.image,
            created_at: m.created_at.with_timezone(&Utc),
            updated_at: m.updated_at.with_timezone(&Utc),
        }
    }
}

impl From<entity::reviews::Model> for Review {
    fn from(m: entity::reviews::Model) -> Self {
        Self {
            id: m.id,
            product_id: m.product_id,
            reviewer_name: m.reviewer_name,
            rating: m.rating,
            comment: m.comment,
            image: m.image,
            created_at: m.created_at.with_timezone(&Utc),
        }
    }
}

impl From<entity::faqs::Model> for Faq {
    fn from(m: entity::faqs::Model) -> Self {
        Self {
            id: m.id,
            product_id: m.product_id,
            question: m.question,
            answer: m.answer,
            created_at: m.created_at.with_timezone(&Utc),
        }
    }
}

impl From<entity::benefits::Model> for Benefit {
    fn from(m: entity::benefits::Model) -> Self {
        Self {
            id: m.id,
            product_id: m.product_id,
            title: m.title,
            description: m.description,
            image: m.image,
            created_at: m.created_at.with_timezone(&Utc),
        }
    }
}

impl From<entity::videos::Model> for Video {
    fn from(m: entity::videos::Model) -> Self {
        Self {
            id: m.id,
            product_id: m.product_id,
            title: m.title,
            url: m.url,
            created_at: m.created_at.with_timezone(&Utc),
        }
    }
}

impl From<entity::contact_messages::Model> for ContactMessage {
    fn from(m: entity::contact_messages::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            email: m.email,
            phone: m.phone,
            message: m.message,
            created_at: m.created_at.with_timezone(&Utc),
        }
    }
}

impl From<entity::newsletter_subscribers::Model> for NewsletterSubscriber {
    fn from(m: entity::newsletter_subscribers::Model) -> Self {
        Self {
            id: m.id,
            email: m.email,
            created_at: m.created_at.with_timezone(&Utc),
        }
    }
}
