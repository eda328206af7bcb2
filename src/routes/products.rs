use axum::{
    Json, Router,
    extract::{Multipart, Path, Query, State},
    routing::{delete, get, post, put},
};
use uuid::Uuid;

use crate::{
    assets::UploadFile,
    dto::products::{CreateProductForm, ProductDetail, ProductList, UpdateProductForm},
    error::AppResult,
    middleware::auth::AuthUser,
    models::Product,
    response::ApiResponse,
    routes::forms::{parse_i32, parse_i64, parse_uuid, read_file, read_text},
    routes::params::ProductQuery,
    services::product_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_products))
        .route("/", post(create_product))
        .route("/{id}", get(get_product))
        .route("/{id}", put(update_product))
        .route("/{id}", delete(delete_product))
        .route("/{id}/related", get(related_products))
}

#[utoipa::path(
    get,
    path = "/api/products",
    params(
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("per_page" = Option<i64>, Query, description = "Items per page, default 20"),
        ("q" = Option<String>, Query, description = "Search in name and description"),
        ("category_id" = Option<Uuid>, Query, description = "Filter by category"),
    ),
    responses(
        (status = 200, description = "List products", body = ApiResponse<ProductList>)
    ),
    tag = "Products"
)]
pub async fn list_products(
    State(state): State<AppState>,
    Query(query): Query<ProductQuery>,
) -> AppResult<Json<ApiResponse<ProductList>>> {
    let resp = product_service::list_products(&state, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/products/{id}",
    params(("id" = Uuid, Path, description = "Product ID")),
    responses(
        (status = 200, description = "Product with populated categories", body = ApiResponse<ProductDetail>),
        (status = 404, description = "Product not found"),
    ),
    tag = "Products"
)]
pub async fn get_product(
    Path(id): Path<Uuid>,
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<ProductDetail>>> {
    let resp = product_service::get_product(&state, id).await?;
    Ok(Json(resp))
}

// Returns a bare array; storefront clients consume it without an envelope.
#[utoipa::path(
    get,
    path = "/api/products/{id}/related",
    params(("id" = String, Path, description = "Product ID")),
    responses(
        (status = 200, description = "Related products, never an empty panel", body = Vec<Product>),
        (status = 400, description = "Malformed id"),
    ),
    tag = "Products"
)]
pub async fn related_products(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> AppResult<Json<Vec<Product>>> {
    let items = product_service::related_products(&state, &id).await?;
    Ok(Json(items))
}

#[utoipa::path(
    post,
    path = "/api/products",
    request_body(content = String, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Create product", body = ApiResponse<Product>),
        (status = 400, description = "Missing required fields"),
        (status = 409, description = "Duplicate SKU"),
    ),
    tag = "Products"
)]
pub async fn create_product(
    State(state): State<AppState>,
    user: AuthUser,
    mut multipart: Multipart,
) -> AppResult<Json<ApiResponse<Product>>> {
    let mut form = CreateProductForm::default();
    let mut files: Vec<UploadFile> = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| crate::error::AppError::BadRequest(e.to_string()))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "images" => files.push(read_file(field).await?),
            "name" => form.name = Some(read_text(field).await?),
            "sku" => form.sku = Some(read_text(field).await?),
            "description" => form.description = Some(read_text(field).await?),
            "price" => form.price = Some(parse_i64("price", &read_text(field).await?)?),
            "sale_price" => {
                form.sale_price = Some(parse_i64("sale_price", &read_text(field).await?)?)
            }
            "stock" => form.stock = Some(parse_i32("stock", &read_text(field).await?)?),
            "status" => form.status = Some(read_text(field).await?),
            "colors" => form.colors.push(read_text(field).await?),
            "category_ids" => form
                .category_ids
                .push(parse_uuid("category_ids", &read_text(field).await?)?),
            _ => {}
        }
    }

    let resp = product_service::create_product(&state, &user, form, files).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/products/{id}",
    params(("id" = Uuid, Path, description = "Product ID")),
    request_body(content = String, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Updated product", body = ApiResponse<Product>),
        (status = 404, description = "Not Found"),
    ),
    tag = "Products"
)]
pub async fn update_product(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    mut multipart: Multipart,
) -> AppResult<Json<ApiResponse<Product>>> {
    let mut form = UpdateProductForm::default();
    let mut files: Vec<UploadFile> = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| crate::error::AppError::BadRequest(e.to_string()))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "images" => files.push(read_file(field).await?),
            "name" => form.name = Some(read_text(field).await?),
            "sku" => form.sku = Some(read_text(field).await?),
            "description" => form.description = Some(read_text(field).await?),
            "price" => form.price = Some(parse_i64("price", &read_text(field).await?)?),
            "sale_price" => {
                form.sale_price = Some(parse_i64("sale_price", &read_text(field).await?)?)
            }
            "stock" => form.stock = Some(parse_i32("stock", &read_text(field).await?)?),
            "status" => form.status = Some(read_text(field).await?),
            "colors" => form
                .colors
                .get_or_insert_with(Vec::new)
                .push(read_text(field).await?),
            "category_ids" => form
                .category_ids
                .get_or_insert_with(Vec::new)
                .push(parse_uuid("category_ids", &read_text(field).await?)?),
            _ => {}
        }
    }

    let resp = product_service::update_product(&state, &user, id, form, files).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/products/{id}",
    params(("id" = Uuid, Path, description = "Product ID")),
    responses(
        (status = 200, description = "Deleted product"),
        (status = 404, description = "Not Found"),
    ),
    tag = "Products"
)]
pub async fn delete_product(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = product_service::delete_product(&state, &user, id).await?;
    Ok(Json(resp))
}
