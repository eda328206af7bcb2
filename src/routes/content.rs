use axum::{
    Json, Router,
    extract::{Multipart, Path, Query, State},
    routing::{delete, get, post, put},
};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    assets::UploadFile,
    dto::content::{
        BenefitForm, BenefitList, BlogForm, BlogList, CreateFaqRequest, CreateVideoRequest,
        FaqList, UpdateFaqRequest, VideoList,
    },
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::{Benefit, Blog, Faq, Video},
    response::ApiResponse,
    routes::forms::{parse_uuid, read_file, read_text},
    services::content_service,
    state::AppState,
};

pub fn blogs_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_blogs))
        .route("/", post(create_blog))
        .route("/{id}", get(get_blog))
        .route("/{id}", put(update_blog))
        .route("/{id}", delete(delete_blog))
}

pub fn faqs_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_faqs))
        .route("/", post(create_faq))
        .route("/{id}", put(update_faq))
        .route("/{id}", delete(delete_faq))
}

pub fn benefits_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_benefits))
        .route("/", post(create_benefit))
        .route("/{id}", delete(delete_benefit))
}

pub fn videos_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_videos))
        .route("/", post(create_video))
        .route("/{id}", delete(delete_video))
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ProductScopedQuery {
    pub product_id: Uuid,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct FaqQuery {
    pub product_id: Option<Uuid>,
}

#[utoipa::path(get, path = "/api/blogs", tag = "Content")]
pub async fn list_blogs(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<BlogList>>> {
    let resp = content_service::list_blogs(&state).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/blogs/{id}",
    params(("id" = Uuid, Path, description = "Blog ID")),
    responses(
        (status = 200, description = "Get blog", body = ApiResponse<Blog>),
        (status = 404, description = "Not Found"),
    ),
    tag = "Content"
)]
pub async fn get_blog(
    Path(id): Path<Uuid>,
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<Blog>>> {
    let resp = content_service::get_blog(&state, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/blogs",
    request_body(content = String, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Blog created", body = ApiResponse<Blog>),
        (status = 400, description = "Missing required fields"),
    ),
    tag = "Content"
)]
pub async fn create_blog(
    State(state): State<AppState>,
    user: AuthUser,
    mut multipart: Multipart,
) -> AppResult<Json<ApiResponse<Blog>>> {
    let (form, file) = read_blog_form(&mut multipart).await?;
    let resp = content_service::create_blog(&state, &user, form, file).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/blogs/{id}",
    params(("id" = Uuid, Path, description = "Blog ID")),
    request_body(content = String, content_type = "multipart/form-data"),
    tag = "Content"
)]
pub async fn update_blog(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    mut multipart: Multipart,
) -> AppResult<Json<ApiResponse<Blog>>> {
    let (form, file) = read_blog_form(&mut multipart).await?;
    let resp = content_service::update_blog(&state, &user, id, form, file).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/blogs/{id}",
    params(("id" = Uuid, Path, description = "Blog ID")),
    tag = "Content"
)]
pub async fn delete_blog(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = content_service::delete_blog(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/faqs",
    params(("product_id" = Option<Uuid>, Query, description = "Filter by product")),
    responses((status = 200, description = "FAQs; empty list is fine here", body = ApiResponse<FaqList>)),
    tag = "Content"
)]
pub async fn list_faqs(
    State(state): State<AppState>,
    Query(query): Query<FaqQuery>,
) -> AppResult<Json<ApiResponse<FaqList>>> {
    let resp = content_service::list_faqs(&state, query.product_id).await?;
    Ok(Json(resp))
}

#[utoipa::path(post, path = "/api/faqs", request_body = CreateFaqRequest, tag = "Content")]
pub async fn create_faq(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateFaqRequest>,
) -> AppResult<Json<ApiResponse<Faq>>> {
    let resp = content_service::create_faq(&state, &user, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/faqs/{id}",
    params(("id" = Uuid, Path, description = "FAQ ID")),
    request_body = UpdateFaqRequest,
    tag = "Content"
)]
pub async fn update_faq(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateFaqRequest>,
) -> AppResult<Json<ApiResponse<Faq>>> {
    let resp = content_service::update_faq(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/faqs/{id}",
    params(("id" = Uuid, Path, description = "FAQ ID")),
    tag = "Content"
)]
pub async fn delete_faq(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = content_service::delete_faq(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/benefits",
    params(("product_id" = Uuid, Query, description = "Product the benefits belong to")),
    responses(
        (status = 200, description = "Benefits for the product", body = ApiResponse<BenefitList>),
        (status = 404, description = "None recorded for this product"),
    ),
    tag = "Content"
)]
pub async fn list_benefits(
    State(state): State<AppState>,
    Query(query): Query<ProductScopedQuery>,
) -> AppResult<Json<ApiResponse<BenefitList>>> {
    let resp = content_service::list_benefits_for_product(&state, query.product_id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/benefits",
    request_body(content = String, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Benefit created", body = ApiResponse<Benefit>),
        (status = 400, description = "Missing required fields"),
    ),
    tag = "Content"
)]
pub async fn create_benefit(
    State(state): State<AppState>,
    user: AuthUser,
    mut multipart: Multipart,
) -> AppResult<Json<ApiResponse<Benefit>>> {
    let mut form = BenefitForm::default();
    let mut file = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "image" => file = Some(read_file(field).await?),
            "title" => form.title = Some(read_text(field).await?),
            "description" => form.description = Some(read_text(field).await?),
            "product_id" => {
                form.product_id = Some(parse_uuid("product_id", &read_text(field).await?)?)
            }
            _ => {}
        }
    }

    let resp = content_service::create_benefit(&state, &user, form, file).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/benefits/{id}",
    params(("id" = Uuid, Path, description = "Benefit ID")),
    tag = "Content"
)]
pub async fn delete_benefit(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = content_service::delete_benefit(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/videos",
    params(("product_id" = Uuid, Query, description = "Product the videos belong to")),
    responses(
        (status = 200, description = "Videos for the product", body = ApiResponse<VideoList>),
        (status = 404, description = "None recorded for this product"),
    ),
    tag = "Content"
)]
pub async fn list_videos(
    State(state): State<AppState>,
    Query(query): Query<ProductScopedQuery>,
) -> AppResult<Json<ApiResponse<VideoList>>> {
    let resp = content_service::list_videos_for_product(&state, query.product_id).await?;
    Ok(Json(resp))
}

#[utoipa::path(post, path = "/api/videos", request_body = CreateVideoRequest, tag = "Content")]
pub async fn create_video(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateVideoRequest>,
) -> AppResult<Json<ApiResponse<Video>>> {
    let resp = content_service::create_video(&state, &user, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/videos/{id}",
    params(("id" = Uuid, Path, description = "Video ID")),
    tag = "Content"
)]
pub async fn delete_video(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = content_service::delete_video(&state, &user, id).await?;
    Ok(Json(resp))
}

async fn read_blog_form(multipart: &mut Multipart) -> AppResult<(BlogForm, Option<UploadFile>)> {
    let mut form = BlogForm::default();
    let mut file = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "image" => file = Some(read_file(field).await?),
            "title" => form.title = Some(read_text(field).await?),
            "body" => form.body = Some(read_text(field).await?),
            _ => {}
        }
    }

    Ok((form, file))
}
