use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::{Category, SubCategory};

#[derive(Debug, Default)]
pub struct CategoryForm {
    pub name: Option<String>,
}

#[derive(Debug, Default)]
pub struct SubCategoryForm {
    pub name: Option<String>,
    pub category_id: Option<Uuid>,
}

#[derive(Serialize, ToSchema)]
pub struct CategoryList {
    pub items: Vec<Category>,
}

#[derive(Serialize, ToSchema)]
pub struct SubCategoryList {
    pub items: Vec<SubCategory>,
}
