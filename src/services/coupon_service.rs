use chrono::{DateTime, Utc};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use sea_orm::ActiveValue::NotSet;
use uuid::Uuid;

use crate::{
    audit::log_audit,
    dto::{
        coupons::{
            CouponList, CouponQuote, CreateCouponRequest, UpdateCouponRequest,
            ValidateCouponRequest,
        },
        ensure_required,
    },
    entity::coupons::{ActiveModel, Column, Entity as Coupons, Model as CouponModel},
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    models::Coupon,
    response::{ApiResponse, Meta},
    state::AppState,
};

pub const DISCOUNT_PERCENT: &str = "percent";
pub const DISCOUNT_FIXED: &str = "fixed";

pub async fn list_coupons(
    state: &AppState,
    user: &AuthUser,
) -> AppResult<ApiResponse<CouponList>> {
    ensure_admin(user)?;

    let items = Coupons::find()
        .order_by_desc(Column::CreatedAt)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Coupon::from)
        .collect();

    Ok(ApiResponse::success(
        CouponList { items },
        Some(Meta::empty()),
    ))
}

pub async fn create_coupon(
    state: &AppState,
    user: &AuthUser,
    payload: CreateCouponRequest,
) -> AppResult<ApiResponse<Coupon>> {
    ensure_admin(user)?;

    let mut missing = Vec::new();
    if payload.code.trim().is_empty() {
        missing.push("code");
    }
    if payload.discount_type.trim().is_empty() {
        missing.push("discount_type");
    }
    ensure_required(missing)?;

    validate_discount(&payload.discount_type, payload.discount_value)?;
    if payload.expires_at <= payload.starts_at {
        return Err(AppError::BadRequest(
            "expires_at must be after starts_at".into(),
        ));
    }

    let duplicate = Coupons::find()
        .filter(Column::Code.eq(payload.code.as_str()))
        .one(&state.orm)
        .await?;
    if duplicate.is_some() {
        return Err(AppError::Conflict("Coupon code already exists".into()));
    }

    let coupon = ActiveModel {
        id: Set(Uuid::new_v4()),
        code: Set(payload.code),
        discount_type: Set(payload.discount_type),
        discount_value: Set(payload.discount_value),
        starts_at: Set(payload.starts_at.into()),
        expires_at: Set(payload.expires_at.into()),
        usage_limit: Set(payload.usage_limit),
        used_count: Set(0),
        product_ids: Set(payload.product_ids.map(|ids| serde_json::json!(ids))),
        category_ids: Set(payload.category_ids.map(|ids| serde_json::json!(ids))),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "coupon_create",
        Some("coupons"),
        Some(serde_json::json!({ "coupon_id": coupon.id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        Coupon::from(coupon),
        Some(Meta::empty()),
    ))
}

pub async fn update_coupon(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateCouponRequest,
) -> AppResult<ApiResponse<Coupon>> {
    ensure_admin(user)?;

    let existing = Coupons::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let discount_type = payload
        .discount_type
        .clone()
        .unwrap_or_else(|| existing.discount_type.clone());
    let discount_value = payload.discount_value.unwrap_or(existing.discount_value);
    validate_discount(&discount_type, discount_value)?;

    let mut active: ActiveModel = existing.into();
    if let Some(discount_type) = payload.discount_type {
        active.discount_type = Set(discount_type);
    }
    if let Some(discount_value) = payload.discount_value {
        active.discount_value = Set(discount_value);
    }
    if let Some(starts_at) = payload.starts_at {
        active.starts_at = Set(starts_at.into());
    }
    if let Some(expires_at) = payload.expires_at {
        active.expires_at = Set(expires_at.into());
    }
    if let Some(usage_limit) = payload.usage_limit {
        active.usage_limit = Set(Some(usage_limit));
    }
    if let Some(product_ids) = payload.product_ids {
        active.product_ids = Set(Some(serde_json::json!(product_ids)));
    }
    if let Some(category_ids) = payload.category_ids {
        active.category_ids = Set(Some(serde_json::json!(category_ids)));
    }

    let coupon = active.update(&state.orm).await?;
    Ok(ApiResponse::success(
        Coupon::from(coupon),
        Some(Meta::empty()),
    ))
}

pub async fn delete_coupon(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_admin(user)?;

    let result = Coupons::delete_by_id(id).exec(&state.orm).await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }

    Ok(ApiResponse::success(
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}

/// Storefront preview of a coupon against a cart subtotal.
pub async fn validate_coupon(
    state: &AppState,
    payload: ValidateCouponRequest,
) -> AppResult<ApiResponse<CouponQuote>> {
    let coupon = Coupons::find()
        .filter(Column::Code.eq(payload.code.as_str()))
        .one(&state.orm)
        .await?
        .ok_or_else(|| AppError::BadRequest("Invalid coupon code".into()))?;

    let discount = evaluate_coupon(&coupon, payload.subtotal, Utc::now())
        .map_err(|reason| AppError::BadRequest(reason.into()))?;

    Ok(ApiResponse::success(
        CouponQuote {
            discount,
            total_after: payload.subtotal - discount,
        },
        Some(Meta::empty()),
    ))
}

fn validate_discount(discount_type: &str, value: i64) -> AppResult<()> {
    match discount_type {
        DISCOUNT_PERCENT => {
            if !(1..=100).contains(&value) {
                return Err(AppError::BadRequest(
                    "Percent discount must be between 1 and 100".into(),
                ));
            }
        }
        DISCOUNT_FIXED => {
            if value <= 0 {
                return Err(AppError::BadRequest(
                    "Fixed discount must be positive".into(),
                ));
            }
        }
        _ => return Err(AppError::BadRequest("Invalid discount type".into())),
    }
    Ok(())
}

/// The coupon's applicability sets, parsed from storage.
pub fn coupon_scope(coupon: &CouponModel) -> (Vec<Uuid>, Vec<Uuid>) {
    let parse = |value: &Option<sea_orm::prelude::Json>| {
        value
            .clone()
            .and_then(|v| serde_json::from_value(v).ok())
            .unwrap_or_default()
    };
    (parse(&coupon.product_ids), parse(&coupon.category_ids))
}

/// Whether one cart line counts toward the coupon's discount base. Empty
/// scope sets mean the coupon applies to the whole cart.
pub fn line_is_eligible(
    product_id: Uuid,
    line_category_ids: &[Uuid],
    scope_products: &[Uuid],
    scope_categories: &[Uuid],
) -> bool {
    if scope_products.is_empty() && scope_categories.is_empty() {
        return true;
    }
    scope_products.contains(&product_id)
        || line_category_ids
            .iter()
            .any(|category| scope_categories.contains(category))
}

/// Discount for a subtotal, or the reason the coupon cannot apply.
pub fn evaluate_coupon(
    coupon: &CouponModel,
    subtotal: i64,
    now: DateTime<Utc>,
) -> Result<i64, &'static str> {
    if now < coupon.starts_at {
        return Err("Coupon is not active yet");
    }
    if now > coupon.expires_at {
        return Err("Coupon has expired");
    }
    if let Some(limit) = coupon.usage_limit {
        if coupon.used_count >= limit {
            return Err("Coupon usage limit reached");
        }
    }

    let discount = match coupon.discount_type.as_str() {
        DISCOUNT_PERCENT => subtotal * coupon.discount_value / 100,
        DISCOUNT_FIXED => coupon.discount_value.min(subtotal),
        _ => return Err("Invalid discount type"),
    };
    Ok(discount)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn coupon(discount_type: &str, value: i64, usage_limit: Option<i32>) -> CouponModel {
        let now = Utc::now();
        CouponModel {
            id: Uuid::new_v4(),
            code: "SAVE10".into(),
            discount_type: discount_type.into(),
            discount_value: value,
            starts_at: (now - Duration::days(1)).into(),
            expires_at: (now + Duration::days(1)).into(),
            usage_limit,
            used_count: 0,
            product_ids: None,
            category_ids: None,
            created_at: now.into(),
        }
    }

    #[test]
    fn percent_discount_scales_with_subtotal() {
        let c = coupon(DISCOUNT_PERCENT, 10, None);
        assert_eq!(evaluate_coupon(&c, 2000, Utc::now()), Ok(200));
    }

    #[test]
    fn fixed_discount_never_exceeds_subtotal() {
        let c = coupon(DISCOUNT_FIXED, 5000, None);
        assert_eq!(evaluate_coupon(&c, 2000, Utc::now()), Ok(2000));
    }

    #[test]
    fn expired_coupon_is_rejected() {
        let mut c = coupon(DISCOUNT_PERCENT, 10, None);
        c.expires_at = (Utc::now() - Duration::hours(1)).into();
        assert!(evaluate_coupon(&c, 2000, Utc::now()).is_err());
    }

    #[test]
    fn exhausted_coupon_is_rejected() {
        let mut c = coupon(DISCOUNT_PERCENT, 10, Some(5));
        c.used_count = 5;
        assert_eq!(
            evaluate_coupon(&c, 2000, Utc::now()),
            Err("Coupon usage limit reached")
        );
    }

    #[test]
    fn unscoped_coupon_covers_every_line() {
        let product = Uuid::new_v4();
        assert!(line_is_eligible(product, &[], &[], &[]));
    }

    #[test]
    fn scoped_coupon_matches_by_product_or_category() {
        let product = Uuid::new_v4();
        let category = Uuid::new_v4();
        let other = Uuid::new_v4();

        assert!(line_is_eligible(product, &[], &[product], &[]));
        assert!(line_is_eligible(other, &[category], &[], &[category]));
        assert!(!line_is_eligible(other, &[other], &[product], &[category]));
    }

    #[test]
    fn coupon_scope_parses_stored_sets() {
        let mut c = coupon(DISCOUNT_PERCENT, 10, None);
        let product = Uuid::new_v4();
        c.product_ids = Some(serde_json::json!([product]));
        let (products, categories) = coupon_scope(&c);
        assert_eq!(products, vec![product]);
        assert!(categories.is_empty());
    }
}
