use sea_orm::{ActiveModelTrait, ColumnTrait, Condition, EntityTrait, QueryFilter, QueryOrder, Set};
use sea_orm::ActiveValue::NotSet;
use uuid::Uuid;

use crate::{
    audit::log_audit,
    dto::{
        ensure_required,
        shipping::{CreateShippingRequest, ShippingList, UpdateShippingRequest},
    },
    entity::shipping_prices::{ActiveModel, Column, Entity as ShippingPrices},
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    models::ShippingPrice,
    response::{ApiResponse, Meta},
    state::AppState,
};

pub async fn list_rules(state: &AppState) -> AppResult<ApiResponse<ShippingList>> {
    let items = ShippingPrices::find()
        .order_by_asc(Column::Country)
        .order_by_asc(Column::State)
        .order_by_asc(Column::MinPrice)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(ShippingPrice::from)
        .collect();

    Ok(ApiResponse::success(
        ShippingList { items },
        Some(Meta::empty()),
    ))
}

pub async fn create_rule(
    state: &AppState,
    user: &AuthUser,
    payload: CreateShippingRequest,
) -> AppResult<ApiResponse<ShippingPrice>> {
    ensure_admin(user)?;

    let mut missing = Vec::new();
    if payload.country.trim().is_empty() {
        missing.push("country");
    }
    if payload.state.trim().is_empty() {
        missing.push("state");
    }
    if payload.delivery_time.trim().is_empty() {
        missing.push("delivery_time");
    }
    ensure_required(missing)?;

    if payload.min_price < 0 || payload.fee < 0 {
        return Err(AppError::BadRequest("Prices must not be negative".into()));
    }
    if let Some(max) = payload.max_price {
        if max < payload.min_price {
            return Err(AppError::BadRequest(
                "max_price must not be below min_price".into(),
            ));
        }
    }

    let existing = ShippingPrices::find()
        .filter(
            Condition::all()
                .add(Column::Country.eq(payload.country.as_str()))
                .add(Column::State.eq(payload.state.as_str())),
        )
        .all(&state.orm)
        .await?;

    let collides = existing.iter().any(|rule| {
        ranges_overlap(
            payload.min_price,
            payload.max_price,
            rule.min_price,
            rule.max_price,
        )
    });
    if collides {
        return Err(AppError::Conflict(
            "Price range overlaps an existing rule for this region".into(),
        ));
    }

    let rule = ActiveModel {
        id: Set(Uuid::new_v4()),
        country: Set(payload.country),
        state: Set(payload.state),
        min_price: Set(payload.min_price),
        max_price: Set(payload.max_price),
        fee: Set(payload.fee),
        delivery_time: Set(payload.delivery_time),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "shipping_rule_create",
        Some("shipping_prices"),
        Some(serde_json::json!({ "rule_id": rule.id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        ShippingPrice::from(rule),
        Some(Meta::empty()),
    ))
}

/// Only fee and delivery estimate are mutable; changing a range means
/// deleting and recreating the rule through the overlap check.
pub async fn update_rule(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateShippingRequest,
) -> AppResult<ApiResponse<ShippingPrice>> {
    ensure_admin(user)?;

    let existing = ShippingPrices::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let mut active: ActiveModel = existing.into();
    if let Some(fee) = payload.fee {
        if fee < 0 {
            return Err(AppError::BadRequest("Prices must not be negative".into()));
        }
        active.fee = Set(fee);
    }
    if let Some(delivery_time) = payload.delivery_time {
        active.delivery_time = Set(delivery_time);
    }

    let rule = active.update(&state.orm).await?;
    Ok(ApiResponse::success(
        ShippingPrice::from(rule),
        Some(Meta::empty()),
    ))
}

pub async fn delete_rule(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_admin(user)?;

    let result = ShippingPrices::delete_by_id(id).exec(&state.orm).await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }

    Ok(ApiResponse::success(
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}

/// Find the fee for an order subtotal shipped to a region. No matching rule
/// means free shipping.
pub async fn fee_for(
    state: &AppState,
    country: &str,
    region: &str,
    subtotal: i64,
) -> AppResult<i64> {
    let rules = ShippingPrices::find()
        .filter(
            Condition::all()
                .add(Column::Country.eq(country))
                .add(Column::State.eq(region)),
        )
        .all(&state.orm)
        .await?;

    let fee = rules
        .iter()
        .find(|rule| {
            subtotal >= rule.min_price && subtotal <= rule.max_price.unwrap_or(i64::MAX)
        })
        .map(|rule| rule.fee)
        .unwrap_or(0);
    Ok(fee)
}

/// Overlap check behind rule creation. A missing max is unbounded above.
/// Three cases: the new range contains an existing one, its minimum falls
/// inside one, or its maximum falls inside one.
pub fn ranges_overlap(
    new_min: i64,
    new_max: Option<i64>,
    existing_min: i64,
    existing_max: Option<i64>,
) -> bool {
    let new_max = new_max.unwrap_or(i64::MAX);
    let existing_max = existing_max.unwrap_or(i64::MAX);

    (new_min <= existing_min && new_max >= existing_max)
        || (new_min >= existing_min && new_min <= existing_max)
        || (new_max >= existing_min && new_max <= existing_max)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contained_range_overlaps() {
        assert!(ranges_overlap(20, Some(30), 10, Some(50)));
    }

    #[test]
    fn min_inside_existing_overlaps() {
        assert!(ranges_overlap(40, Some(60), 10, Some(50)));
    }

    #[test]
    fn max_inside_existing_overlaps() {
        assert!(ranges_overlap(5, Some(20), 10, Some(50)));
    }

    #[test]
    fn containing_range_overlaps() {
        assert!(ranges_overlap(5, Some(60), 10, Some(50)));
    }

    #[test]
    fn disjoint_range_is_accepted() {
        assert!(!ranges_overlap(60, Some(100), 10, Some(50)));
        assert!(!ranges_overlap(0, Some(9), 10, Some(50)));
    }

    #[test]
    fn unbounded_max_reaches_everything_above() {
        assert!(ranges_overlap(60, Some(100), 10, None));
        assert!(ranges_overlap(0, None, 10, Some(50)));
        assert!(!ranges_overlap(0, Some(9), 10, None));
    }
}
