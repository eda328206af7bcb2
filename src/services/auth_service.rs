use argon2::{
    Argon2, PasswordHasher,
    password_hash::{PasswordHash, PasswordVerifier, SaltString},
};
use chrono::{Duration, Utc};
use jsonwebtoken::{EncodingKey, Header, encode};
use password_hash::rand_core::OsRng;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};
use sea_orm::ActiveValue::NotSet;
use uuid::Uuid;

use crate::{
    audit::log_audit,
    dto::{
        auth::{
            Claims, ForgotPasswordRequest, LoginRequest, OAuthSignInRequest, OtpRequest,
            OtpVerifyRequest, RegisterRequest, ResetPasswordRequest, SessionResponse,
        },
        ensure_required,
    },
    entity::users::{ActiveModel as UserActive, Column as UserCol, Entity as Users},
    error::{AppError, AppResult},
    mail::{generate_otp_code, generate_reset_token},
    middleware::auth::{ROLE_USER, SESSION_MAX_AGE_SECS, session_cookie},
    models::User,
    response::{ApiResponse, Meta},
    state::AppState,
};

pub const STATUS_BLOCKED: &str = "blocked";
pub const STATUS_PENDING: &str = "pending";
pub const STATUS_IN_REVIEW: &str = "in_review";
pub const STATUS_ACTIVE: &str = "active";

const OTP_TTL_MINUTES: i64 = 10;
const RESET_TOKEN_TTL_HOURS: i64 = 1;
const OAUTH_PROVIDERS: [&str; 2] = ["google", "facebook"];

pub async fn register(
    state: &AppState,
    payload: RegisterRequest,
) -> AppResult<ApiResponse<User>> {
    let RegisterRequest {
        full_name,
        email,
        password,
    } = payload;

    let mut missing = Vec::new();
    if full_name.trim().is_empty() {
        missing.push("full_name");
    }
    if email.trim().is_empty() {
        missing.push("email");
    }
    if password.is_empty() {
        missing.push("password");
    }
    ensure_required(missing)?;

    if !is_valid_email(&email) {
        return Err(AppError::BadRequest("Invalid email address".into()));
    }

    let exists = Users::find()
        .filter(UserCol::Email.eq(email.as_str()))
        .one(&state.orm)
        .await?;
    if exists.is_some() {
        return Err(AppError::Conflict("Email is already taken".into()));
    }

    let password_hash = hash_password(&password)?;

    let user = UserActive {
        id: Set(Uuid::new_v4()),
        full_name: Set(full_name),
        email: Set(email),
        password_hash: Set(password_hash),
        role: Set(ROLE_USER.into()),
        status: Set(STATUS_ACTIVE.into()),
        otp_code: Set(None),
        otp_expires_at: Set(None),
        reset_token: Set(None),
        reset_token_expires_at: Set(None),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.id),
        "user_register",
        Some("users"),
        Some(serde_json::json!({ "user_id": user.id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(User::from(user), None))
}

/// Credentials login. Returns the `Set-Cookie` value alongside the body.
pub async fn login(
    state: &AppState,
    payload: LoginRequest,
) -> AppResult<(String, ApiResponse<SessionResponse>)> {
    let LoginRequest { email, password } = payload;

    let user = Users::find()
        .filter(UserCol::Email.eq(email.as_str()))
        .one(&state.orm)
        .await?
        .ok_or_else(|| AppError::BadRequest("Invalid email or password".into()))?;

    let parsed_hash = PasswordHash::new(&user.password_hash)
        .map_err(|_| AppError::Internal(anyhow::anyhow!("Invalid password hash")))?;
    if Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_err()
    {
        return Err(AppError::BadRequest("Invalid email or password".into()));
    }

    if user.status == STATUS_BLOCKED {
        return Err(AppError::Forbidden);
    }

    let token = issue_session_token(user.id, &user.role)?;
    let cookie = session_cookie(&token, state.cookie_secure);

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.id),
        "user_login",
        Some("users"),
        Some(serde_json::json!({ "user_id": user.id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    let body = ApiResponse::success(
        SessionResponse {
            user: User::from(user),
        },
        Some(Meta::empty()),
    );
    Ok((cookie, body))
}

/// First step of the passwordless flow: persist a fresh code and mail it.
pub async fn request_otp(
    state: &AppState,
    payload: OtpRequest,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let user = Users::find()
        .filter(UserCol::Email.eq(payload.email.as_str()))
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let code = generate_otp_code();
    let expires_at = Utc::now() + Duration::minutes(OTP_TTL_MINUTES);

    let email = user.email.clone();
    let mut active: UserActive = user.into();
    active.otp_code = Set(Some(code.clone()));
    active.otp_expires_at = Set(Some(expires_at.into()));
    active.updated_at = Set(Utc::now().into());
    active.update(&state.orm).await?;

    state
        .mailer
        .send_otp_code(&email, &code)
        .await
        .map_err(|e| AppError::Mail(e.to_string()))?;

    Ok(ApiResponse::success(
        serde_json::json!({ "sent": true }),
        Some(Meta::empty()),
    ))
}

/// Second step: check the code, then clear it and issue the session in the
/// same write so the code cannot be replayed.
pub async fn verify_otp(
    state: &AppState,
    payload: OtpVerifyRequest,
) -> AppResult<(String, ApiResponse<SessionResponse>)> {
    let user = Users::find()
        .filter(UserCol::Email.eq(payload.email.as_str()))
        .one(&state.orm)
        .await?
        .ok_or_else(|| AppError::BadRequest("Invalid code".into()))?;

    let stored = user
        .otp_code
        .as_deref()
        .ok_or_else(|| AppError::BadRequest("Invalid code".into()))?;
    if stored != payload.code {
        return Err(AppError::BadRequest("Invalid code".into()));
    }

    let expires_at = user
        .otp_expires_at
        .ok_or_else(|| AppError::BadRequest("Invalid code".into()))?;
    if expires_at < Utc::now() {
        return Err(AppError::BadRequest("Code expired".into()));
    }

    // Only active base-role accounts may finish a passwordless login.
    if user.status != STATUS_ACTIVE || user.role != ROLE_USER {
        return Err(AppError::Forbidden);
    }

    let user_id = user.id;
    let role = user.role.clone();
    let mut active: UserActive = user.into();
    active.otp_code = Set(None);
    active.otp_expires_at = Set(None);
    active.updated_at = Set(Utc::now().into());
    let user = active.update(&state.orm).await?;

    let token = issue_session_token(user_id, &role)?;
    let cookie = session_cookie(&token, state.cookie_secure);

    if let Err(err) = log_audit(
        &state.pool,
        Some(user_id),
        "otp_login",
        Some("users"),
        Some(serde_json::json!({ "user_id": user_id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    let body = ApiResponse::success(
        SessionResponse {
            user: User::from(user),
        },
        Some(Meta::empty()),
    );
    Ok((cookie, body))
}

pub async fn forgot_password(
    state: &AppState,
    payload: ForgotPasswordRequest,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let user = Users::find()
        .filter(UserCol::Email.eq(payload.email.as_str()))
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let token = generate_reset_token();
    let expires_at = Utc::now() + Duration::hours(RESET_TOKEN_TTL_HOURS);

    let email = user.email.clone();
    let mut active: UserActive = user.into();
    active.reset_token = Set(Some(token.clone()));
    active.reset_token_expires_at = Set(Some(expires_at.into()));
    active.updated_at = Set(Utc::now().into());
    active.update(&state.orm).await?;

    state
        .mailer
        .send_password_reset(&email, &token)
        .await
        .map_err(|e| AppError::Mail(e.to_string()))?;

    Ok(ApiResponse::success(
        serde_json::json!({ "sent": true }),
        Some(Meta::empty()),
    ))
}

/// Completion looks the user up by token alone. The stored expiry is written
/// on issue but not checked here; the system owner has been asked whether
/// that is intended before we tighten it.
pub async fn reset_password(
    state: &AppState,
    payload: ResetPasswordRequest,
) -> AppResult<ApiResponse<serde_json::Value>> {
    if payload.password.is_empty() {
        return Err(AppError::BadRequest("Missing required fields: password".into()));
    }

    let user = Users::find()
        .filter(UserCol::ResetToken.eq(payload.token.as_str()))
        .one(&state.orm)
        .await?
        .ok_or_else(|| AppError::BadRequest("Invalid reset token".into()))?;

    let password_hash = hash_password(&payload.password)?;

    let user_id = user.id;
    let mut active: UserActive = user.into();
    active.password_hash = Set(password_hash);
    active.reset_token = Set(None);
    active.reset_token_expires_at = Set(None);
    active.updated_at = Set(Utc::now().into());
    active.update(&state.orm).await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user_id),
        "password_reset",
        Some("users"),
        Some(serde_json::json!({ "user_id": user_id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        serde_json::json!({ "reset": true }),
        Some(Meta::empty()),
    ))
}

/// Provider-verified sign-in. Provisions the account on first contact,
/// attaches the existing one afterwards.
pub async fn oauth_sign_in(
    state: &AppState,
    payload: OAuthSignInRequest,
) -> AppResult<(String, ApiResponse<SessionResponse>)> {
    if !OAUTH_PROVIDERS.contains(&payload.provider.as_str()) {
        return Err(AppError::BadRequest("Unknown identity provider".into()));
    }
    if !is_valid_email(&payload.email) {
        return Err(AppError::BadRequest("Invalid email address".into()));
    }

    let existing = Users::find()
        .filter(UserCol::Email.eq(payload.email.as_str()))
        .one(&state.orm)
        .await?;

    let user = match existing {
        Some(user) => user,
        None => {
            // No credential ever reaches us for these accounts; store an
            // unguessable hash so password login stays closed.
            let password_hash = hash_password(&generate_reset_token())?;
            UserActive {
                id: Set(Uuid::new_v4()),
                full_name: Set(payload.full_name),
                email: Set(payload.email),
                password_hash: Set(password_hash),
                role: Set(ROLE_USER.into()),
                status: Set(STATUS_ACTIVE.into()),
                otp_code: Set(None),
                otp_expires_at: Set(None),
                reset_token: Set(None),
                reset_token_expires_at: Set(None),
                created_at: NotSet,
                updated_at: NotSet,
            }
            .insert(&state.orm)
            .await?
        }
    };

    if user.status == STATUS_BLOCKED {
        return Err(AppError::Forbidden);
    }

    let token = issue_session_token(user.id, &user.role)?;
    let cookie = session_cookie(&token, state.cookie_secure);

    let body = ApiResponse::success(
        SessionResponse {
            user: User::from(user),
        },
        Some(Meta::empty()),
    );
    Ok((cookie, body))
}

pub fn issue_session_token(user_id: Uuid, role: &str) -> AppResult<String> {
    let secret = std::env::var("JWT_SECRET")
        .map_err(|_| AppError::Internal(anyhow::anyhow!("JWT_SECRET is not set")))?;

    let expiration = Utc::now()
        .checked_add_signed(Duration::seconds(SESSION_MAX_AGE_SECS))
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Failed to set expiration")))?;

    let claims = Claims {
        sub: user_id.to_string(),
        role: role.to_string(),
        exp: expiration.timestamp() as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))
}

pub fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))?
        .to_string();
    Ok(hash)
}

pub fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_validation_accepts_plain_addresses() {
        assert!(is_valid_email("shopper@example.com"));
        assert!(is_valid_email("a.b@mail.example.co"));
    }

    #[test]
    fn email_validation_rejects_malformed_addresses() {
        assert!(!is_valid_email("not-an-email"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("user@nodot"));
        assert!(!is_valid_email("user@.com"));
    }

    #[test]
    fn password_hashes_verify_and_differ_per_salt() {
        let first = hash_password("hunter2").unwrap();
        let second = hash_password("hunter2").unwrap();
        assert_ne!(first, second);

        let parsed = PasswordHash::new(&first).unwrap();
        assert!(
            Argon2::default()
                .verify_password(b"hunter2", &parsed)
                .is_ok()
        );
        assert!(
            Argon2::default()
                .verify_password(b"wrong", &parsed)
                .is_err()
        );
    }
}
