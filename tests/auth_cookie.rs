use axum::extract::FromRequestParts;
use axum::http::{Request, header};
use jsonwebtoken::{EncodingKey, Header, encode};
use uuid::Uuid;

use axum_storefront_api::{
    dto::auth::Claims,
    error::AppError,
    middleware::auth::{AUTH_COOKIE, AuthUser, session_cookie},
    services::auth_service::issue_session_token,
};

const SECRET: &str = "cookie-test-secret";

fn set_secret() {
    // Safe here: every test writes the same value.
    unsafe { std::env::set_var("JWT_SECRET", SECRET) };
}

async fn extract(cookie_header: Option<String>) -> Result<AuthUser, AppError> {
    let mut builder = Request::builder().uri("/api/orders");
    if let Some(value) = cookie_header {
        builder = builder.header(header::COOKIE, value);
    }
    let (mut parts, ()) = builder.body(()).unwrap().into_parts();
    AuthUser::from_request_parts(&mut parts, &()).await
}

#[tokio::test]
async fn missing_cookie_is_unauthorized() {
    set_secret();
    let err = extract(None).await.unwrap_err();
    assert!(matches!(err, AppError::Unauthorized(_)));
}

#[tokio::test]
async fn tampered_token_is_unauthorized() {
    set_secret();
    let user_id = Uuid::new_v4();
    let token = issue_session_token(user_id, "user").unwrap();
    let tampered = format!("{}x", token);

    let err = extract(Some(format!("{AUTH_COOKIE}={tampered}")))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Unauthorized(_)));
}

#[tokio::test]
async fn valid_cookie_yields_the_signed_identity() {
    set_secret();
    let user_id = Uuid::new_v4();
    let token = issue_session_token(user_id, "user").unwrap();

    let user = extract(Some(format!("{AUTH_COOKIE}={token}")))
        .await
        .unwrap();
    assert_eq!(user.user_id, user_id);
    assert_eq!(user.role, "user");
}

#[tokio::test]
async fn token_without_usable_id_claim_is_bad_request() {
    set_secret();
    let exp = (chrono::Utc::now() + chrono::Duration::hours(1)).timestamp() as usize;
    let claims = Claims {
        sub: "not-a-uuid".into(),
        role: "user".into(),
        exp,
    };
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(SECRET.as_bytes()),
    )
    .unwrap();

    let err = extract(Some(format!("{AUTH_COOKIE}={token}")))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));
}

#[tokio::test]
async fn session_cookie_can_be_read_back_by_the_extractor() {
    set_secret();
    let user_id = Uuid::new_v4();
    let token = issue_session_token(user_id, "user").unwrap();
    let set_cookie = session_cookie(&token, false);

    // The value before the first attribute is what the client sends back.
    let pair = set_cookie.split(';').next().unwrap().to_string();
    let user = extract(Some(pair)).await.unwrap();
    assert_eq!(user.user_id, user_id);
}
