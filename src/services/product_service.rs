use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};
use sea_orm::ActiveValue::NotSet;
use sea_orm::sea_query::Expr;
use sea_orm::sea_query::extension::postgres::PgExpr;
use chrono::Utc;
use uuid::Uuid;

use crate::{
    assets::UploadFile,
    audit::log_audit,
    dto::{
        ensure_required,
        products::{CreateProductForm, ProductDetail, ProductList, UpdateProductForm},
    },
    entity::{
        categories::Entity as Categories,
        product_categories::{
            ActiveModel as ProductCategoryActive, Column as ProductCategoryCol,
            Entity as ProductCategories,
        },
        products::{ActiveModel, Column, Entity as Products},
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    models::Product,
    response::{ApiResponse, Meta},
    routes::params::{ProductQuery, ProductSortBy, SortOrder},
    state::AppState,
};

const VALID_STATUS: [&str; 3] = ["active", "inactive", "draft"];

pub async fn list_products(
    state: &AppState,
    query: ProductQuery,
) -> AppResult<ApiResponse<ProductList>> {
    let (page, limit, offset) = query.pagination.normalize();
    let mut condition = Condition::all();

    if let Some(search) = query.q.as_ref().filter(|s| !s.is_empty()) {
        let pattern = format!("%{}%", search);
        condition = condition.add(
            Condition::any()
                .add(Expr::col(Column::Name).ilike(pattern.clone()))
                .add(Expr::col(Column::Description).ilike(pattern)),
        );
    }

    if let Some(status) = query.status.as_ref().filter(|s| !s.is_empty()) {
        condition = condition.add(Column::Status.eq(status.clone()));
    }

    if let Some(min_price) = query.min_price {
        condition = condition.add(Column::Price.gte(min_price));
    }

    if let Some(max_price) = query.max_price {
        condition = condition.add(Column::Price.lte(max_price));
    }

    if let Some(category_id) = query.category_id {
        let product_ids: Vec<Uuid> = ProductCategories::find()
            .filter(ProductCategoryCol::CategoryId.eq(category_id))
            .all(&state.orm)
            .await?
            .into_iter()
            .map(|link| link.product_id)
            .collect();
        condition = condition.add(Column::Id.is_in(product_ids));
    }

    let sort_by = query.sort_by.unwrap_or(ProductSortBy::CreatedAt);
    let sort_order = query.sort_order.unwrap_or(SortOrder::Desc);
    let sort_col = match sort_by {
        ProductSortBy::CreatedAt => Column::CreatedAt,
        ProductSortBy::Price => Column::Price,
        ProductSortBy::Name => Column::Name,
    };

    let mut finder = Products::find().filter(condition);
    finder = match sort_order {
        SortOrder::Asc => finder.order_by_asc(sort_col),
        SortOrder::Desc => finder.order_by_desc(sort_col),
    };

    let total = finder.clone().count(&state.orm).await? as i64;

    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Product::from)
        .collect();

    let meta = Meta::new(page, limit, total);
    Ok(ApiResponse::success(ProductList { items }, Some(meta)))
}

pub async fn get_product(state: &AppState, id: Uuid) -> AppResult<ApiResponse<ProductDetail>> {
    let mut rows = Products::find_by_id(id)
        .find_with_related(Categories)
        .all(&state.orm)
        .await?;

    let (product, categories) = match rows.pop() {
        Some(row) => row,
        None => return Err(AppError::NotFound),
    };

    let detail = ProductDetail {
        product: Product::from(product),
        categories: categories.into_iter().map(Into::into).collect(),
    };
    Ok(ApiResponse::success(detail, None))
}

/// Fallback chain for the storefront's related panel: same-category products
/// first, every other product when that set is empty or the reference itself
/// is gone. The panel is never served empty on purpose.
pub async fn related_products(state: &AppState, raw_id: &str) -> AppResult<Vec<Product>> {
    let id = Uuid::parse_str(raw_id)
        .map_err(|_| AppError::BadRequest("Invalid product id".into()))?;

    let product = Products::find_by_id(id).one(&state.orm).await?;

    let Some(product) = product else {
        return all_products_except(state, id).await;
    };

    let category_ids: Vec<Uuid> = ProductCategories::find()
        .filter(ProductCategoryCol::ProductId.eq(product.id))
        .all(&state.orm)
        .await?
        .into_iter()
        .map(|link| link.category_id)
        .collect();

    if category_ids.is_empty() {
        return all_products_except(state, id).await;
    }

    let mut sibling_ids: Vec<Uuid> = ProductCategories::find()
        .filter(
            Condition::all()
                .add(ProductCategoryCol::CategoryId.is_in(category_ids))
                .add(ProductCategoryCol::ProductId.ne(id)),
        )
        .all(&state.orm)
        .await?
        .into_iter()
        .map(|link| link.product_id)
        .collect();
    sibling_ids.sort();
    sibling_ids.dedup();

    if sibling_ids.is_empty() {
        return all_products_except(state, id).await;
    }

    let items = Products::find()
        .filter(Column::Id.is_in(sibling_ids))
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Product::from)
        .collect();
    Ok(items)
}

async fn all_products_except(state: &AppState, id: Uuid) -> AppResult<Vec<Product>> {
    let items = Products::find()
        .filter(Column::Id.ne(id))
        .order_by_desc(Column::CreatedAt)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Product::from)
        .collect();
    Ok(items)
}

pub async fn create_product(
    state: &AppState,
    user: &AuthUser,
    form: CreateProductForm,
    files: Vec<UploadFile>,
) -> AppResult<ApiResponse<Product>> {
    ensure_admin(user)?;

    let mut missing = Vec::new();
    if form.name.as_deref().unwrap_or("").trim().is_empty() {
        missing.push("name");
    }
    if form.sku.as_deref().unwrap_or("").trim().is_empty() {
        missing.push("sku");
    }
    if form.price.is_none() {
        missing.push("price");
    }
    // Stock is only optional for variant products that track it per color.
    if form.stock.is_none() && form.colors.is_empty() {
        missing.push("stock");
    }
    if files.is_empty() {
        missing.push("images");
    }
    ensure_required(missing)?;

    let name = form.name.unwrap_or_default();
    let sku = form.sku.unwrap_or_default();
    let status = form.status.unwrap_or_else(|| "active".to_string());
    if !VALID_STATUS.contains(&status.as_str()) {
        return Err(AppError::BadRequest("Invalid product status".into()));
    }

    let duplicate = Products::find()
        .filter(Column::Sku.eq(sku.as_str()))
        .one(&state.orm)
        .await?;
    if duplicate.is_some() {
        return Err(AppError::Conflict("SKU is already in use".into()));
    }

    if !form.category_ids.is_empty() {
        let known = Categories::find()
            .filter(
                crate::entity::categories::Column::Id.is_in(form.category_ids.clone()),
            )
            .count(&state.orm)
            .await? as usize;
        if known != form.category_ids.len() {
            return Err(AppError::BadRequest("Unknown category reference".into()));
        }
    }

    // Uploads run before the insert; a failed upload must leave no row behind.
    let mut image_urls = Vec::with_capacity(files.len());
    for file in files {
        let url = state
            .assets
            .upload(file)
            .await
            .map_err(|e| AppError::Asset(e.to_string()))?;
        image_urls.push(url);
    }

    let id = Uuid::new_v4();
    let colors = if form.colors.is_empty() {
        None
    } else {
        Some(serde_json::json!(form.colors))
    };

    let product = ActiveModel {
        id: Set(id),
        name: Set(name),
        sku: Set(sku),
        description: Set(form.description),
        price: Set(form.price.unwrap_or_default()),
        sale_price: Set(form.sale_price),
        stock: Set(form.stock),
        images: Set(serde_json::json!(image_urls)),
        colors: Set(colors),
        status: Set(status),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    for category_id in form.category_ids {
        ProductCategoryActive {
            id: Set(Uuid::new_v4()),
            product_id: Set(product.id),
            category_id: Set(category_id),
        }
        .insert(&state.orm)
        .await?;
    }

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "product_create",
        Some("products"),
        Some(serde_json::json!({ "product_id": product.id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        Product::from(product),
        Some(Meta::empty()),
    ))
}

pub async fn update_product(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    form: UpdateProductForm,
    files: Vec<UploadFile>,
) -> AppResult<ApiResponse<Product>> {
    ensure_admin(user)?;

    let existing = Products::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    if let Some(status) = form.status.as_deref() {
        if !VALID_STATUS.contains(&status) {
            return Err(AppError::BadRequest("Invalid product status".into()));
        }
    }

    if let Some(sku) = form.sku.as_deref() {
        let duplicate = Products::find()
            .filter(
                Condition::all()
                    .add(Column::Sku.eq(sku))
                    .add(Column::Id.ne(id)),
            )
            .one(&state.orm)
            .await?;
        if duplicate.is_some() {
            return Err(AppError::Conflict("SKU is already in use".into()));
        }
    }

    let old_images: Vec<String> =
        serde_json::from_value(existing.images.clone()).unwrap_or_default();

    let mut new_images = None;
    if !files.is_empty() {
        let mut urls = Vec::with_capacity(files.len());
        for file in files {
            let url = state
                .assets
                .upload(file)
                .await
                .map_err(|e| AppError::Asset(e.to_string()))?;
            urls.push(url);
        }
        new_images = Some(urls);
    }

    let mut active: ActiveModel = existing.into();
    if let Some(name) = form.name {
        active.name = Set(name);
    }
    if let Some(sku) = form.sku {
        active.sku = Set(sku);
    }
    if let Some(description) = form.description {
        active.description = Set(Some(description));
    }
    if let Some(price) = form.price {
        active.price = Set(price);
    }
    if let Some(sale_price) = form.sale_price {
        active.sale_price = Set(Some(sale_price));
    }
    if let Some(stock) = form.stock {
        active.stock = Set(Some(stock));
    }
    if let Some(colors) = form.colors {
        active.colors = Set(Some(serde_json::json!(colors)));
    }
    if let Some(status) = form.status {
        active.status = Set(status);
    }
    if let Some(urls) = new_images.clone() {
        active.images = Set(serde_json::json!(urls));
    }
    active.updated_at = Set(Utc::now().into());

    let product = active.update(&state.orm).await?;

    if let Some(category_ids) = form.category_ids {
        ProductCategories::delete_many()
            .filter(ProductCategoryCol::ProductId.eq(id))
            .exec(&state.orm)
            .await?;
        for category_id in category_ids {
            ProductCategoryActive {
                id: Set(Uuid::new_v4()),
                product_id: Set(id),
                category_id: Set(category_id),
            }
            .insert(&state.orm)
            .await?;
        }
    }

    // Replaced images are cleaned up after the write; a miss only orphans
    // an asset, it never fails the update.
    if new_images.is_some() {
        for url in old_images {
            if let Err(err) = state.assets.delete(&url).await {
                tracing::warn!(url = %url, error = %err, "asset cleanup failed");
            }
        }
    }

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "product_update",
        Some("products"),
        Some(serde_json::json!({ "product_id": product.id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        Product::from(product),
        Some(Meta::empty()),
    ))
}

pub async fn delete_product(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_admin(user)?;

    let existing = Products::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let images: Vec<String> =
        serde_json::from_value(existing.images.clone()).unwrap_or_default();

    Products::delete_by_id(id).exec(&state.orm).await?;

    for url in images {
        if let Err(err) = state.assets.delete(&url).await {
            tracing::warn!(url = %url, error = %err, "asset cleanup failed");
        }
    }

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "product_delete",
        Some("products"),
        Some(serde_json::json!({ "product_id": id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}
