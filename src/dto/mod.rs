use crate::error::AppError;

pub mod addresses;
pub mod auth;
pub mod cart;
pub mod catalog;
pub mod content;
pub mod coupons;
pub mod engagement;
pub mod orders;
pub mod products;
pub mod reviews;
pub mod shipping;
pub mod wishlist;

/// Reject with a 400 naming every absent required field.
pub fn ensure_required(missing: Vec<&'static str>) -> Result<(), AppError> {
    if missing.is_empty() {
        return Ok(());
    }
    Err(AppError::BadRequest(format!(
        "Missing required fields: {}",
        missing.join(", ")
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ensure_required_passes_with_no_missing_fields() {
        assert!(ensure_required(vec![]).is_ok());
    }

    #[test]
    fn ensure_required_lists_every_missing_field() {
        let err = ensure_required(vec!["name", "sku"]).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("name"));
        assert!(msg.contains("sku"));
    }
}
