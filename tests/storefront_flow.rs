use chrono::{Duration, Utc};
use sea_orm::ActiveValue::NotSet;
use sea_orm::{ActiveModelTrait, ConnectionTrait, EntityTrait, Set, Statement};
use uuid::Uuid;

use axum_storefront_api::{
    assets::AssetClient,
    config::{AssetConfig, SmtpConfig},
    db::{create_orm_conn, create_pool, run_migrations},
    dto::{
        auth::{OtpVerifyRequest, RegisterRequest},
        cart::AddToCartRequest,
        coupons::CreateCouponRequest,
        orders::CheckoutRequest,
        shipping::CreateShippingRequest,
    },
    entity::{
        addresses::ActiveModel as AddressActive,
        categories::{ActiveModel as CategoryActive, Entity as Categories},
        product_categories::ActiveModel as ProductCategoryActive,
        products::{ActiveModel as ProductActive, Entity as Products},
        users::{ActiveModel as UserActive, Entity as Users},
    },
    error::AppError,
    mail::Mailer,
    middleware::auth::{AUTH_COOKIE, AuthUser},
    routes::params::{OrderListQuery, Pagination},
    services::{
        admin_service, auth_service, cart_service, catalog_service, coupon_service,
        order_service, product_service, shipping_service,
    },
    state::AppState,
};

// Full storefront flow: catalog -> related panel -> cart -> coupon/shipping ->
// checkout -> history -> admin status updates, plus the OTP single-use and
// unique-field properties. Skips itself when no database is configured.
#[tokio::test]
async fn storefront_checkout_and_admin_flow() -> anyhow::Result<()> {
    let Some(state) = setup_state().await? else {
        eprintln!(
            "Skipping test: set TEST_DATABASE_URL or DATABASE_URL to run integration flow tests."
        );
        return Ok(());
    };

    let user_id = create_user(&state, "user", "active", "shopper@example.com").await?;
    let other_id = create_user(&state, "user", "active", "other@example.com").await?;
    let admin_id = create_user(&state, "super_admin", "active", "admin@example.com").await?;

    let auth_user = AuthUser {
        user_id,
        role: "user".into(),
    };
    let auth_other = AuthUser {
        user_id: other_id,
        role: "user".into(),
    };
    let auth_admin = AuthUser {
        user_id: admin_id,
        role: "super_admin".into(),
    };

    // Catalog: two products share a category, one sits alone in its own,
    // one has no category at all.
    let cat_main = create_category(&state, "Protein").await?;
    let cat_lone = create_category(&state, "Sleep").await?;
    let product_a = create_product(&state, "Whey Isolate", "WHEY-1", 1000, 10).await?;
    let product_b = create_product(&state, "Casein Blend", "CAS-1", 1500, 10).await?;
    let product_d = create_product(&state, "Magnesium", "MAG-1", 800, 10).await?;
    let product_c = create_product(&state, "Shaker", "SHAKE-1", 300, 10).await?;
    link_category(&state, product_a, cat_main).await?;
    link_category(&state, product_b, cat_main).await?;
    link_category(&state, product_d, cat_lone).await?;

    // Related panel fallback chain.
    let err = product_service::related_products(&state, "not-a-uuid")
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));

    let ghost = Uuid::new_v4();
    let related = product_service::related_products(&state, &ghost.to_string()).await?;
    assert_eq!(related.len(), 4, "missing product falls back to everything");
    assert!(related.iter().all(|p| p.id != ghost));

    let related = product_service::related_products(&state, &product_a.to_string()).await?;
    assert_eq!(related.len(), 1);
    assert_eq!(related[0].id, product_b);

    let related = product_service::related_products(&state, &product_d.to_string()).await?;
    assert_eq!(related.len(), 3, "lone category falls back to all others");
    assert!(related.iter().all(|p| p.id != product_d));

    let related = product_service::related_products(&state, &product_c.to_string()).await?;
    assert_eq!(related.len(), 3, "uncategorized falls back to all others");

    // Shipping rule for the checkout region, then the overlap matrix.
    shipping_service::create_rule(
        &state,
        &auth_admin,
        rule("US", "CA", 0, Some(100_000), 500),
    )
    .await?;

    shipping_service::create_rule(&state, &auth_admin, rule("DE", "BE", 10, Some(50), 4))
        .await?;
    for (min, max) in [(20, Some(30)), (5, Some(20)), (40, Some(60))] {
        let err = shipping_service::create_rule(&state, &auth_admin, rule("DE", "BE", min, max, 4))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)), "range [{min},{max:?}]");
    }
    shipping_service::create_rule(&state, &auth_admin, rule("DE", "BE", 60, Some(100), 4))
        .await?;

    // Coupon, address, cart, checkout.
    coupon_service::create_coupon(
        &state,
        &auth_admin,
        CreateCouponRequest {
            code: "SAVE10".into(),
            discount_type: "percent".into(),
            discount_value: 10,
            starts_at: Utc::now() - Duration::hours(1),
            expires_at: Utc::now() + Duration::days(1),
            usage_limit: Some(5),
            product_ids: None,
            category_ids: None,
        },
    )
    .await?;

    let duplicate_code = coupon_service::create_coupon(
        &state,
        &auth_admin,
        CreateCouponRequest {
            code: "SAVE10".into(),
            discount_type: "percent".into(),
            discount_value: 20,
            starts_at: Utc::now(),
            expires_at: Utc::now() + Duration::days(1),
            usage_limit: None,
            product_ids: None,
            category_ids: None,
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(duplicate_code, AppError::Conflict(_)));

    let address_id = create_address(&state, user_id).await?;

    cart_service::add_to_cart(
        &state,
        &auth_user,
        AddToCartRequest {
            product_id: product_a,
            quantity: 2,
        },
    )
    .await?;

    let checkout = order_service::checkout(
        &state,
        &auth_user,
        CheckoutRequest {
            address_id,
            payment_method: "cod".into(),
            coupon_code: Some("SAVE10".into()),
        },
    )
    .await?;
    let placed = checkout.data.expect("checkout body");
    // subtotal 2000, 10% off, 500 shipping
    assert_eq!(placed.order.total_amount, 2300);
    assert_eq!(placed.order.shipping_fee, 500);
    assert_eq!(placed.items.len(), 1);
    assert!(placed.order.invoice_number.starts_with("INV-"));

    let stocked = Products::find_by_id(product_a)
        .one(&state.orm)
        .await?
        .expect("product");
    assert_eq!(stocked.stock, Some(8));

    let cart = cart_service::list_cart(&state, &auth_user).await?;
    assert!(cart.data.expect("cart body").items.is_empty());

    // History: the buyer sees one order, everyone else an empty 200 list.
    let history = order_service::list_orders(&state, &auth_user).await?;
    assert_eq!(history.data.expect("history").items.len(), 1);
    let empty = order_service::list_orders(&state, &auth_other).await?;
    assert!(empty.data.expect("empty history").items.is_empty());

    // Admin order management.
    let all = admin_service::list_all_orders(
        &state,
        &auth_admin,
        OrderListQuery {
            pagination: Pagination {
                page: None,
                per_page: None,
            },
            status: None,
            sort_order: None,
        },
    )
    .await?;
    assert_eq!(all.data.expect("orders").items.len(), 1);

    let updated =
        admin_service::update_order_status(&state, &auth_admin, placed.order.id, "shipped".into())
            .await?;
    assert_eq!(updated.data.expect("order").order_status, "shipped");

    let bad_status =
        admin_service::update_order_status(&state, &auth_admin, placed.order.id, "teleported".into())
            .await
            .unwrap_err();
    assert!(matches!(bad_status, AppError::BadRequest(_)));

    let forbidden =
        admin_service::update_order_status(&state, &auth_user, placed.order.id, "shipped".into())
            .await
            .unwrap_err();
    assert!(matches!(forbidden, AppError::Forbidden));

    // OTP login is single-use: the session write clears the code.
    seed_otp(&state, user_id, "123456").await?;
    let (cookie, _) = auth_service::verify_otp(
        &state,
        OtpVerifyRequest {
            email: "shopper@example.com".into(),
            code: "123456".into(),
        },
    )
    .await?;
    assert!(cookie.starts_with(AUTH_COOKIE));
    assert!(cookie.contains("HttpOnly"));

    let cleared = Users::find_by_id(user_id)
        .one(&state.orm)
        .await?
        .expect("user");
    assert_eq!(cleared.otp_code, None);
    assert_eq!(cleared.otp_expires_at, None);

    let replay = auth_service::verify_otp(
        &state,
        OtpVerifyRequest {
            email: "shopper@example.com".into(),
            code: "123456".into(),
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(replay, AppError::BadRequest(_)));

    // Unique email is enforced on register.
    let duplicate_email = auth_service::register(
        &state,
        RegisterRequest {
            full_name: "Shadow".into(),
            email: "shopper@example.com".into(),
            password: "hunter2".into(),
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(duplicate_email, AppError::Conflict(_)));

    // Category delete survives a dead asset host: the row goes, the asset
    // cleanup failure is swallowed.
    catalog_service::delete_category(&state, &auth_admin, cat_lone).await?;
    let gone = Categories::find_by_id(cat_lone).one(&state.orm).await?;
    assert!(gone.is_none());

    Ok(())
}

async fn setup_state() -> anyhow::Result<Option<AppState>> {
    let database_url = match std::env::var("TEST_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
    {
        Ok(url) => url,
        Err(_) => return Ok(None),
    };

    unsafe { std::env::set_var("JWT_SECRET", "integration-test-secret") };

    let pool = create_pool(&database_url).await?;
    let orm = create_orm_conn(&database_url).await?;
    run_migrations(&orm).await?;

    // Clean tables between runs
    let backend = orm.get_database_backend();
    orm.execute(Statement::from_string(
        backend,
        "TRUNCATE TABLE order_items, orders, cart_items, wishlist_items, product_categories, \
         sub_categories, reviews, faqs, benefits, videos, blogs, contact_messages, \
         newsletter_subscribers, shipping_prices, coupons, addresses, audit_logs, categories, \
         products, users RESTART IDENTITY CASCADE",
    ))
    .await?;

    let mailer = Mailer::new(
        &SmtpConfig {
            host: "localhost".into(),
            port: 2525,
            username: String::new(),
            password: String::new(),
            from_address: "no-reply@localhost".into(),
        },
        "http://localhost:3000",
    )?;

    // A dead port: every asset call fails fast, exercising best-effort paths.
    let assets = AssetClient::new(&AssetConfig {
        base_url: "http://127.0.0.1:9".into(),
        api_key: String::new(),
    });

    Ok(Some(AppState {
        pool,
        orm,
        mailer,
        assets,
        cookie_secure: false,
    }))
}

async fn create_user(
    state: &AppState,
    role: &str,
    status: &str,
    email: &str,
) -> anyhow::Result<Uuid> {
    let user = UserActive {
        id: Set(Uuid::new_v4()),
        full_name: Set("Test Person".into()),
        email: Set(email.to_string()),
        password_hash: Set("dummy".into()),
        role: Set(role.into()),
        status: Set(status.into()),
        otp_code: Set(None),
        otp_expires_at: Set(None),
        reset_token: Set(None),
        reset_token_expires_at: Set(None),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&state.orm)
    .await?;
    Ok(user.id)
}

async fn create_category(state: &AppState, name: &str) -> anyhow::Result<Uuid> {
    let category = CategoryActive {
        id: Set(Uuid::new_v4()),
        name: Set(name.into()),
        image: Set(format!(
            "http://127.0.0.1:9/assets/{}.webp",
            name.to_lowercase()
        )),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;
    Ok(category.id)
}

async fn create_product(
    state: &AppState,
    name: &str,
    sku: &str,
    price: i64,
    stock: i32,
) -> anyhow::Result<Uuid> {
    let product = ProductActive {
        id: Set(Uuid::new_v4()),
        name: Set(name.into()),
        sku: Set(sku.into()),
        description: Set(None),
        price: Set(price),
        sale_price: Set(None),
        stock: Set(Some(stock)),
        images: Set(serde_json::json!(["http://127.0.0.1:9/assets/p.webp"])),
        colors: Set(None),
        status: Set("active".into()),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&state.orm)
    .await?;
    Ok(product.id)
}

async fn link_category(
    state: &AppState,
    product_id: Uuid,
    category_id: Uuid,
) -> anyhow::Result<()> {
    ProductCategoryActive {
        id: Set(Uuid::new_v4()),
        product_id: Set(product_id),
        category_id: Set(category_id),
    }
    .insert(&state.orm)
    .await?;
    Ok(())
}

async fn create_address(state: &AppState, user_id: Uuid) -> anyhow::Result<Uuid> {
    let address = AddressActive {
        id: Set(Uuid::new_v4()),
        user_id: Set(user_id),
        line1: Set("1 Main St".into()),
        line2: Set(None),
        city: Set("Oakland".into()),
        state: Set("CA".into()),
        country: Set("US".into()),
        postal_code: Set("94601".into()),
        phone: Set("+15550100".into()),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;
    Ok(address.id)
}

async fn seed_otp(state: &AppState, user_id: Uuid, code: &str) -> anyhow::Result<()> {
    let user = Users::find_by_id(user_id)
        .one(&state.orm)
        .await?
        .expect("user");
    let mut active: UserActive = user.into();
    active.otp_code = Set(Some(code.into()));
    active.otp_expires_at = Set(Some((Utc::now() + Duration::minutes(5)).into()));
    active.update(&state.orm).await?;
    Ok(())
}

fn rule(
    country: &str,
    state: &str,
    min: i64,
    max: Option<i64>,
    fee: i64,
) -> CreateShippingRequest {
    CreateShippingRequest {
        country: country.into(),
        state: state.into(),
        min_price: min,
        max_price: max,
        fee,
        delivery_time: "3-5 days".into(),
    }
}
