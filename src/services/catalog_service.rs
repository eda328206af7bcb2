use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use sea_orm::ActiveValue::NotSet;
use uuid::Uuid;

use crate::{
    assets::UploadFile,
    audit::log_audit,
    dto::{
        catalog::{CategoryForm, CategoryList, SubCategoryForm, SubCategoryList},
        ensure_required,
    },
    entity::{
        categories::{ActiveModel as CategoryActive, Column as CategoryCol, Entity as Categories},
        sub_categories::{
            ActiveModel as SubCategoryActive, Column as SubCategoryCol, Entity as SubCategories,
        },
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    models::{Category, SubCategory},
    response::{ApiResponse, Meta},
    state::AppState,
};

pub async fn list_categories(state: &AppState) -> AppResult<ApiResponse<CategoryList>> {
    let items = Categories::find()
        .order_by_asc(CategoryCol::Name)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Category::from)
        .collect();

    Ok(ApiResponse::success(
        CategoryList { items },
        Some(Meta::empty()),
    ))
}

pub async fn get_category(state: &AppState, id: Uuid) -> AppResult<ApiResponse<Category>> {
    let category = Categories::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(ApiResponse::success(Category::from(category), None))
}

pub async fn create_category(
    state: &AppState,
    user: &AuthUser,
    form: CategoryForm,
    file: Option<UploadFile>,
) -> AppResult<ApiResponse<Category>> {
    ensure_admin(user)?;

    let mut missing = Vec::new();
    if form.name.as_deref().unwrap_or("").trim().is_empty() {
        missing.push("name");
    }
    if file.is_none() {
        missing.push("image");
    }
    ensure_required(missing)?;
    let file = file.ok_or_else(|| AppError::BadRequest("Missing required fields: image".into()))?;

    let image = state
        .assets
        .upload(file)
        .await
        .map_err(|e| AppError::Asset(e.to_string()))?;

    let category = CategoryActive {
        id: Set(Uuid::new_v4()),
        name: Set(form.name.unwrap_or_default()),
        image: Set(image),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "category_create",
        Some("categories"),
        Some(serde_json::json!({ "category_id": category.id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        Category::from(category),
        Some(Meta::empty()),
    ))
}

pub async fn update_category(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    form: CategoryForm,
    file: Option<UploadFile>,
) -> AppResult<ApiResponse<Category>> {
    ensure_admin(user)?;

    let existing = Categories::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let old_image = existing.image.clone();
    let mut replaced = false;

    let mut active: CategoryActive = existing.into();
    if let Some(name) = form.name {
        active.name = Set(name);
    }
    if let Some(file) = file {
        let image = state
            .assets
            .upload(file)
            .await
            .map_err(|e| AppError::Asset(e.to_string()))?;
        active.image = Set(image);
        replaced = true;
    }

    let category = active.update(&state.orm).await?;

    if replaced {
        if let Err(err) = state.assets.delete(&old_image).await {
            tracing::warn!(url = %old_image, error = %err, "asset cleanup failed");
        }
    }

    Ok(ApiResponse::success(
        Category::from(category),
        Some(Meta::empty()),
    ))
}

/// The row goes first; a failed asset delete is logged and swallowed so the
/// category never survives its own deletion.
pub async fn delete_category(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_admin(user)?;

    let existing = Categories::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let image = existing.image.clone();
    Categories::delete_by_id(id).exec(&state.orm).await?;

    if let Err(err) = state.assets.delete(&image).await {
        tracing::warn!(url = %image, error = %err, "asset cleanup failed");
    }

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "category_delete",
        Some("categories"),
        Some(serde_json::json!({ "category_id": id })),
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

pub async fn list_sub_categories(
    state: &AppState,
    category_id: Option<Uuid>,
) -> AppResult<ApiResponse<SubCategoryList>> {
    let mut finder = SubCategories::find().order_by_asc(SubCategoryCol::Name);
    if let Some(category_id) = category_id {
        finder = finder.filter(SubCategoryCol::CategoryId.eq(category_id));
    }

    let items = finder
        .all(&state.orm)
        .await?
        .into_iter()
        .map(SubCategory::from)
        .collect();

    Ok(ApiResponse::success(
        SubCategoryList { items },
        Some(Meta::empty()),
    ))
}

pub async fn create_sub_category(
    state: &AppState,
    user: &AuthUser,
    form: SubCategoryForm,
    file: Option<UploadFile>,
) -> AppResult<ApiResponse<SubCategory>> {
    ensure_admin(user)?;

    let mut missing = Vec::new();
    if form.name.as_deref().unwrap_or("").trim().is_empty() {
        missing.push("name");
    }
    if form.category_id.is_none() {
        missing.push("category_id");
    }
    if file.is_none() {
        missing.push("image");
    }
    ensure_required(missing)?;
    let category_id = form
        .category_id
        .ok_or_else(|| AppError::BadRequest("Missing required fields: category_id".into()))?;
    let file = file.ok_or_else(|| AppError::BadRequest("Missing required fields: image".into()))?;

    let parent = Categories::find_by_id(category_id).one(&state.orm).await?;
    if parent.is_none() {
        return Err(AppError::BadRequest("Unknown category reference".into()));
    }

    let image = state
        .assets
        .upload(file)
        .await
        .map_err(|e| AppError::Asset(e.to_string()))?;

    let sub_category = SubCategoryActive {
        id: Set(Uuid::new_v4()),
        category_id: Set(category_id),
        name: Set(form.name.unwrap_or_default()),
        image: Set(image),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    Ok(ApiResponse::success(
        SubCategory::from(sub_category),
        Some(Meta::empty()),
    ))
}

pub async fn delete_sub_category(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_admin(user)?;

    let existing = SubCategories::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let image = existing.image.clone();
    SubCategories::delete_by_id(id).exec(&state.orm).await?;

    if let Err(err) = state.assets.delete(&image).await {
        tracing::warn!(url = %image, error = %err, "asset cleanup failed");
    }

    Ok(ApiResponse::success(
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}
