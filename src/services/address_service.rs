use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use sea_orm::ActiveValue::NotSet;
use uuid::Uuid;

use crate::{
    dto::{
        addresses::{AddressList, CreateAddressRequest},
        ensure_required,
    },
    entity::addresses::{ActiveModel, Column, Entity as Addresses},
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::Address,
    response::{ApiResponse, Meta},
    state::AppState,
};

pub async fn list_addresses(
    state: &AppState,
    user: &AuthUser,
) -> AppResult<ApiResponse<AddressList>> {
    let items = Addresses::find()
        .filter(Column::UserId.eq(user.user_id))
        .order_by_desc(Column::CreatedAt)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Address::from)
        .collect();

    Ok(ApiResponse::success(
        AddressList { items },
        Some(Meta::empty()),
    ))
}

pub async fn create_address(
    state: &AppState,
    user: &AuthUser,
    payload: CreateAddressRequest,
) -> AppResult<ApiResponse<Address>> {
    let mut missing = Vec::new();
    if payload.line1.trim().is_empty() {
        missing.push("line1");
    }
    if payload.city.trim().is_empty() {
        missing.push("city");
    }
    if payload.state.trim().is_empty() {
        missing.push("state");
    }
    if payload.country.trim().is_empty() {
        missing.push("country");
    }
    if payload.postal_code.trim().is_empty() {
        missing.push("postal_code");
    }
    if payload.phone.trim().is_empty() {
        missing.push("phone");
    }
    ensure_required(missing)?;

    let address = ActiveModel {
        id: Set(Uuid::new_v4()),
        user_id: Set(user.user_id),
        line1: Set(payload.line1),
        line2: Set(payload.line2),
        city: Set(payload.city),
        state: Set(payload.state),
        country: Set(payload.country),
        postal_code: Set(payload.postal_code),
        phone: Set(payload.phone),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    Ok(ApiResponse::success(
        Address::from(address),
        Some(Meta::empty()),
    ))
}

pub async fn delete_address(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let existing = Addresses::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;
    if existing.user_id != user.user_id {
        return Err(AppError::Forbidden);
    }

    Addresses::delete_by_id(id).exec(&state.orm).await?;

    Ok(ApiResponse::success(
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}
