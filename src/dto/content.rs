use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::{Benefit, Blog, Faq, Video};

#[derive(Debug, Default)]
pub struct BlogForm {
    pub title: Option<String>,
    pub body: Option<String>,
}

#[derive(Debug, Default)]
pub struct BenefitForm {
    pub product_id: Option<Uuid>,
    pub title: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateFaqRequest {
    pub product_id: Option<Uuid>,
    pub question: String,
    pub answer: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateFaqRequest {
    pub question: Option<String>,
    pub answer: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateVideoRequest {
    pub product_id: Uuid,
    pub title: String,
    pub url: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct BlogList {
    pub items: Vec<Blog>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct FaqList {
    pub items: Vec<Faq>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct BenefitList {
    pub items: Vec<Benefit>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct VideoList {
    pub items: Vec<Video>,
}
