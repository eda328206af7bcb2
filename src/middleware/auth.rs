use axum::extract::FromRequestParts;
use axum_extra::extract::cookie::CookieJar;
use jsonwebtoken::{DecodingKey, Validation, decode};
use uuid::Uuid;

use crate::{dto::auth::Claims, error::AppError};

/// Session cookie carried by storefront clients.
pub const AUTH_COOKIE: &str = "userAuthToken";

/// Sessions last seven days; the JWT expiry matches the cookie max-age.
pub const SESSION_MAX_AGE_SECS: i64 = 7 * 24 * 60 * 60;

pub const ROLE_USER: &str = "user";
pub const ROLE_SUPER_ADMIN: &str = "super_admin";

#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub role: String,
}

pub fn ensure_role(user: &AuthUser, role: &str) -> Result<(), AppError> {
    if user.role != role {
        return Err(AppError::Forbidden);
    }
    Ok(())
}

pub fn ensure_admin(user: &AuthUser) -> Result<(), AppError> {
    ensure_role(user, ROLE_SUPER_ADMIN)
}

/// Render the `Set-Cookie` value for a fresh session token.
pub fn session_cookie(token: &str, secure: bool) -> String {
    let mut cookie = format!(
        "{AUTH_COOKIE}={token}; Path=/; HttpOnly; SameSite=Strict; Max-Age={SESSION_MAX_AGE_SECS}"
    );
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        _state: &S,
    ) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        let cookie = jar
            .get(AUTH_COOKIE)
            .ok_or_else(|| AppError::Unauthorized("Missing auth cookie".into()))?;

        let secret = std::env::var("JWT_SECRET")
            .map_err(|_| AppError::Internal(anyhow::anyhow!("JWT_SECRET is not set")))?;

        let decoded = decode::<Claims>(
            cookie.value(),
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::default(),
        )
        .map_err(|_| AppError::Unauthorized("Invalid or expired token".into()))?;

        // A verified token without a usable id claim is the caller's bug,
        // not an auth failure.
        let user_id = Uuid::parse_str(&decoded.claims.sub)
            .map_err(|_| AppError::BadRequest("Invalid user id in token".into()))?;

        Ok(AuthUser {
            user_id,
            role: decoded.claims.role.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_cookie_carries_required_attributes() {
        let cookie = session_cookie("tok123", false);
        assert!(cookie.starts_with("userAuthToken=tok123"));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("SameSite=Strict"));
        assert!(cookie.contains("Max-Age=604800"));
        assert!(!cookie.contains("Secure"));
    }

    #[test]
    fn session_cookie_is_secure_in_production() {
        let cookie = session_cookie("tok123", true);
        assert!(cookie.ends_with("; Secure"));
    }

    #[test]
    fn admin_check_rejects_base_role() {
        let user = AuthUser {
            user_id: Uuid::new_v4(),
            role: ROLE_USER.into(),
        };
        assert!(ensure_admin(&user).is_err());

        let admin = AuthUser {
            user_id: Uuid::new_v4(),
            role: ROLE_SUPER_ADMIN.into(),
        };
        assert!(ensure_admin(&admin).is_ok());
    }
}
