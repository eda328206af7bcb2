use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::{Category, Product};

/// Fields collected from the multipart create form. Presence is validated in
/// the service so the 400 can name every missing field at once.
#[derive(Debug, Default)]
pub struct CreateProductForm {
    pub name: Option<String>,
    pub sku: Option<String>,
    pub description: Option<String>,
    pub price: Option<i64>,
    pub sale_price: Option<i64>,
    pub stock: Option<i32>,
    pub colors: Vec<String>,
    pub status: Option<String>,
    pub category_ids: Vec<Uuid>,
}

#[derive(Debug, Default)]
pub struct UpdateProductForm {
    pub name: Option<String>,
    pub sku: Option<String>,
    pub description: Option<String>,
    pub price: Option<i64>,
    pub sale_price: Option<i64>,
    pub stock: Option<i32>,
    pub colors: Option<Vec<String>>,
    pub status: Option<String>,
    pub category_ids: Option<Vec<Uuid>>,
}

#[derive(Serialize, ToSchema)]
pub struct ProductList {
    pub items: Vec<Product>,
}

/// Product populated with its categories.
#[derive(Serialize, ToSchema)]
pub struct ProductDetail {
    pub product: Product,
    pub categories: Vec<Category>,
}
