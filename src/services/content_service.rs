use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use sea_orm::ActiveValue::NotSet;
use uuid::Uuid;

use crate::{
    assets::UploadFile,
    dto::{
        content::{
            BenefitForm, BenefitList, BlogForm, BlogList, CreateFaqRequest, CreateVideoRequest,
            FaqList, UpdateFaqRequest, VideoList,
        },
        ensure_required,
    },
    entity::{
        benefits::{ActiveModel as BenefitActive, Column as BenefitCol, Entity as Benefits},
        blogs::{ActiveModel as BlogActive, Column as BlogCol, Entity as Blogs},
        faqs::{ActiveModel as FaqActive, Column as FaqCol, Entity as Faqs},
        products::Entity as Products,
        videos::{ActiveModel as VideoActive, Column as VideoCol, Entity as Videos},
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    models::{Benefit, Blog, Faq, Video},
    response::{ApiResponse, Meta},
    state::AppState,
};

// --- blogs -----------------------------------------------------------------

pub async fn list_blogs(state: &AppState) -> AppResult<ApiResponse<BlogList>> {
    let items = Blogs::find()
        .order_by_desc(BlogCol::CreatedAt)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Blog::from)
        .collect();

    Ok(ApiResponse::success(BlogList { items }, Some(Meta::empty())))
}

pub async fn get_blog(state: &AppState, id: Uuid) -> AppResult<ApiResponse<Blog>> {
    let blog = Blogs::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(ApiResponse::success(Blog::from(blog), None))
}

pub async fn create_blog(
    state: &AppState,
    user: &AuthUser,
    form: BlogForm,
    file: Option<UploadFile>,
) -> AppResult<ApiResponse<Blog>> {
    ensure_admin(user)?;

    let mut missing = Vec::new();
    if form.title.as_deref().unwrap_or("").trim().is_empty() {
        missing.push("title");
    }
    if form.body.as_deref().unwrap_or("").trim().is_empty() {
        missing.push("body");
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

    let blog = BlogActive {
        id: Set(Uuid::new_v4()),
        title: Set(form.title.unwrap_or_default()),
        body: Set(form.body.unwrap_or_default()),
        image: Set(image),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    Ok(ApiResponse::success(Blog::from(blog), Some(Meta::empty())))
}

pub async fn update_blog(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    form: BlogForm,
    file: Option<UploadFile>,
) -> AppResult<ApiResponse<Blog>> {
    ensure_admin(user)?;

    let existing = Blogs::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let old_image = existing.image.clone();
    let mut replaced = false;

    let mut active: BlogActive = existing.into();
    if let Some(title) = form.title {
        active.title = Set(title);
    }
    if let Some(body) = form.body {
        active.body = Set(body);
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
    active.updated_at = Set(Utc::now().into());

    let blog = active.update(&state.orm).await?;

    if replaced {
        if let Err(err) = state.assets.delete(&old_image).await {
            tracing::warn!(url = %old_image, error = %err, "asset cleanup failed");
        }
    }

    Ok(ApiResponse::success(Blog::from(blog), Some(Meta::empty())))
}

pub async fn delete_blog(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_admin(user)?;

    let existing = Blogs::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let image = existing.image.clone();
    Blogs::delete_by_id(id).exec(&state.orm).await?;

    if let Err(err) = state.assets.delete(&image).await {
        tracing::warn!(url = %image, error = %err, "asset cleanup failed");
    }

    Ok(ApiResponse::success(
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}

// --- faqs ------------------------------------------------------------------

pub async fn list_faqs(
    state: &AppState,
    product_id: Option<Uuid>,
) -> AppResult<ApiResponse<FaqList>> {
    let mut finder = Faqs::find().order_by_asc(FaqCol::CreatedAt);
    if let Some(product_id) = product_id {
        finder = finder.filter(FaqCol::ProductId.eq(product_id));
    }

    let items = finder
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Faq::from)
        .collect();

    Ok(ApiResponse::success(FaqList { items }, Some(Meta::empty())))
}

pub async fn create_faq(
    state: &AppState,
    user: &AuthUser,
    payload: CreateFaqRequest,
) -> AppResult<ApiResponse<Faq>> {
    ensure_admin(user)?;

    let mut missing = Vec::new();
    if payload.question.trim().is_empty() {
        missing.push("question");
    }
    if payload.answer.trim().is_empty() {
        missing.push("answer");
    }
    ensure_required(missing)?;

    if let Some(product_id) = payload.product_id {
        let product = Products::find_by_id(product_id).one(&state.orm).await?;
        if product.is_none() {
            return Err(AppError::BadRequest("product not found".into()));
        }
    }

    let faq = FaqActive {
        id: Set(Uuid::new_v4()),
        product_id: Set(payload.product_id),
        question: Set(payload.question),
        answer: Set(payload.answer),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    Ok(ApiResponse::success(Faq::from(faq), Some(Meta::empty())))
}

pub async fn update_faq(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateFaqRequest,
) -> AppResult<ApiResponse<Faq>> {
    ensure_admin(user)?;

    let existing = Faqs::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let mut active: FaqActive = existing.into();
    if let Some(question) = payload.question {
        active.question = Set(question);
    }
    if let Some(answer) = payload.answer {
        active.answer = Set(answer);
    }

    let faq = active.update(&state.orm).await?;
    Ok(ApiResponse::success(Faq::from(faq), Some(Meta::empty())))
}

pub async fn delete_faq(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_admin(user)?;

    let result = Faqs::delete_by_id(id).exec(&state.orm).await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }

    Ok(ApiResponse::success(
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}

// --- benefits --------------------------------------------------------------

/// Benefits for a product page. Empty means 404 by contract.
pub async fn list_benefits_for_product(
    state: &AppState,
    product_id: Uuid,
) -> AppResult<ApiResponse<BenefitList>> {
    let items: Vec<Benefit> = Benefits::find()
        .filter(BenefitCol::ProductId.eq(product_id))
        .order_by_asc(BenefitCol::CreatedAt)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Benefit::from)
        .collect();

    if items.is_empty() {
        return Err(AppError::NotFound);
    }

    Ok(ApiResponse::success(
        BenefitList { items },
        Some(Meta::empty()),
    ))
}

pub async fn create_benefit(
    state: &AppState,
    user: &AuthUser,
    form: BenefitForm,
    file: Option<UploadFile>,
) -> AppResult<ApiResponse<Benefit>> {
    ensure_admin(user)?;

    let mut missing = Vec::new();
    if form.product_id.is_none() {
        missing.push("product_id");
    }
    if form.title.as_deref().unwrap_or("").trim().is_empty() {
        missing.push("title");
    }
    if form.description.as_deref().unwrap_or("").trim().is_empty() {
        missing.push("description");
    }
    if file.is_none() {
        missing.push("image");
    }
    ensure_required(missing)?;
    let product_id = form
        .product_id
        .ok_or_else(|| AppError::BadRequest("Missing required fields: product_id".into()))?;
    let file = file.ok_or_else(|| AppError::BadRequest("Missing required fields: image".into()))?;

    let product = Products::find_by_id(product_id).one(&state.orm).await?;
    if product.is_none() {
        return Err(AppError::BadRequest("product not found".into()));
    }

    let image = state
        .assets
        .upload(file)
        .await
        .map_err(|e| AppError::Asset(e.to_string()))?;

    let benefit = BenefitActive {
        id: Set(Uuid::new_v4()),
        product_id: Set(product_id),
        title: Set(form.title.unwrap_or_default()),
        description: Set(form.description.unwrap_or_default()),
        image: Set(image),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    Ok(ApiResponse::success(
        Benefit::from(benefit),
        Some(Meta::empty()),
    ))
}

pub async fn delete_benefit(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_admin(user)?;

    let existing = Benefits::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let image = existing.image.clone();
    Benefits::delete_by_id(id).exec(&state.orm).await?;

    if let Err(err) = state.assets.delete(&image).await {
        tracing::warn!(url = %image, error = %err, "asset cleanup failed");
    }

    Ok(ApiResponse::success(
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}

// --- videos ----------------------------------------------------------------

/// Videos for a product page. Empty means 404 by contract.
pub async fn list_videos_for_product(
    state: &AppState,
    product_id: Uuid,
) -> AppResult<ApiResponse<VideoList>> {
    let items: Vec<Video> = Videos::find()
        .filter(VideoCol::ProductId.eq(product_id))
        .order_by_asc(VideoCol::CreatedAt)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Video::from)
        .collect();

    if items.is_empty() {
        return Err(AppError::NotFound);
    }

    Ok(ApiResponse::success(
        VideoList { items },
        Some(Meta::empty()),
    ))
}

pub async fn create_video(
    state: &AppState,
    user: &AuthUser,
    payload: CreateVideoRequest,
) -> AppResult<ApiResponse<Video>> {
    ensure_admin(user)?;

    let mut missing = Vec::new();
    if payload.title.trim().is_empty() {
        missing.push("title");
    }
    if payload.url.trim().is_empty() {
        missing.push("url");
    }
    ensure_required(missing)?;

    let product = Products::find_by_id(payload.product_id)
        .one(&state.orm)
        .await?;
    if product.is_none() {
        return Err(AppError::BadRequest("product not found".into()));
    }

    let video = VideoActive {
        id: Set(Uuid::new_v4()),
        product_id: Set(payload.product_id),
        title: Set(payload.title),
        url: Set(payload.url),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    Ok(ApiResponse::success(Video::from(video), Some(Meta::empty())))
}

pub async fn delete_video(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_admin(user)?;

    let result = Videos::delete_by_id(id).exec(&state.orm).await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }

    Ok(ApiResponse::success(
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}
