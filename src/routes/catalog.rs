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
    dto::catalog::{CategoryForm, CategoryList, SubCategoryForm, SubCategoryList},
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::{Category, SubCategory},
    response::ApiResponse,
    routes::forms::{parse_uuid, read_file, read_text},
    services::catalog_service,
    state::AppState,
};

pub fn categories_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_categories))
        .route("/", post(create_category))
        .route("/{id}", get(get_category))
        .route("/{id}", put(update_category))
        .route("/{id}", delete(delete_category))
}

pub fn sub_categories_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_sub_categories))
        .route("/", post(create_sub_category))
        .route("/{id}", delete(delete_sub_category))
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SubCategoryQuery {
    pub category_id: Option<Uuid>,
}

#[utoipa::path(
    get,
    path = "/api/categories",
    responses((status = 200, description = "List categories", body = ApiResponse<CategoryList>)),
    tag = "Catalog"
)]
pub async fn list_categories(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<CategoryList>>> {
    let resp = catalog_service::list_categories(&state).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/categories/{id}",
    params(("id" = Uuid, Path, description = "Category ID")),
    responses(
        (status = 200, description = "Get category", body = ApiResponse<Category>),
        (status = 404, description = "Not Found"),
    ),
    tag = "Catalog"
)]
pub async fn get_category(
    Path(id): Path<Uuid>,
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<Category>>> {
    let resp = catalog_service::get_category(&state, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/categories",
    request_body(content = String, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Create category", body = ApiResponse<Category>),
        (status = 400, description = "Missing required fields"),
    ),
    tag = "Catalog"
)]
pub async fn create_category(
    State(state): State<AppState>,
    user: AuthUser,
    mut multipart: Multipart,
) -> AppResult<Json<ApiResponse<Category>>> {
    let (form, file) = read_category_form(&mut multipart).await?;
    let resp = catalog_service::create_category(&state, &user, form, file).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/categories/{id}",
    params(("id" = Uuid, Path, description = "Category ID")),
    request_body(content = String, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Updated category", body = ApiResponse<Category>),
        (status = 404, description = "Not Found"),
    ),
    tag = "Catalog"
)]
pub async fn update_category(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    mut multipart: Multipart,
) -> AppResult<Json<ApiResponse<Category>>> {
    let (form, file) = read_category_form(&mut multipart).await?;
    let resp = catalog_service::update_category(&state, &user, id, form, file).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/categories/{id}",
    params(("id" = Uuid, Path, description = "Category ID")),
    responses(
        (status = 200, description = "Deleted; asset cleanup is best effort"),
        (status = 404, description = "Not Found"),
    ),
    tag = "Catalog"
)]
pub async fn delete_category(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = catalog_service::delete_category(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/subcategories",
    params(("category_id" = Option<Uuid>, Query, description = "Filter by parent category")),
    responses((status = 200, description = "List sub-categories", body = ApiResponse<SubCategoryList>)),
    tag = "Catalog"
)]
pub async fn list_sub_categories(
    State(state): State<AppState>,
    Query(query): Query<SubCategoryQuery>,
) -> AppResult<Json<ApiResponse<SubCategoryList>>> {
    let resp = catalog_service::list_sub_categories(&state, query.category_id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/subcategories",
    request_body(content = String, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Create sub-category", body = ApiResponse<SubCategory>),
        (status = 400, description = "Missing fields or unknown category"),
    ),
    tag = "Catalog"
)]
pub async fn create_sub_category(
    State(state): State<AppState>,
    user: AuthUser,
    mut multipart: Multipart,
) -> AppResult<Json<ApiResponse<SubCategory>>> {
    let mut form = SubCategoryForm::default();
    let mut file = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "image" => file = Some(read_file(field).await?),
            "name" => form.name = Some(read_text(field).await?),
            "category_id" => {
                form.category_id = Some(parse_uuid("category_id", &read_text(field).await?)?)
            }
            _ => {}
        }
    }

    let resp = catalog_service::create_sub_category(&state, &user, form, file).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/subcategories/{id}",
    params(("id" = Uuid, Path, description = "Sub-category ID")),
    responses(
        (status = 200, description = "Deleted sub-category"),
        (status = 404, description = "Not Found"),
    ),
    tag = "Catalog"
)]
pub async fn delete_sub_category(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = catalog_service::delete_sub_category(&state, &user, id).await?;
    Ok(Json(resp))
}

async fn read_category_form(
    multipart: &mut Multipart,
) -> AppResult<(CategoryForm, Option<UploadFile>)> {
    let mut form = CategoryForm::default();
    let mut file = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "image" => file = Some(read_file(field).await?),
            "name" => form.name = Some(read_text(field).await?),
            _ => {}
        }
    }

    Ok((form, file))
}
