use argon2::{
    Argon2, PasswordHasher,
    password_hash::{SaltString, rand_core::OsRng},
};
use axum_storefront_api::{config::AppConfig, db::create_pool};
use uuid::Uuid;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let pool = create_pool(&config.database_url).await?;
    sqlx::migrate!("./migrations").run(&pool).await?;

    let admin_id = ensure_user(&pool, "admin@example.com", "admin123", "super_admin").await?;
    let user_id = ensure_user(&pool, "user@example.com", "user123", "user").await?;
    let category_id = seed_category(&pool, "Protein").await?;
    seed_products(&pool, category_id).await?;

    println!("Seed completed. Admin ID: {admin_id}, User ID: {user_id}");
    Ok(())
}

async fn ensure_user(
    pool: &sqlx::PgPool,
    email: &str,
    password: &str,
    role: &str,
) -> anyhow::Result<Uuid> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let password_hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!(e.to_string()))?
        .to_string();

    let row: Option<(Uuid,)> = sqlx::query_as(
        r#"
        INSERT INTO users (id, full_name, email, password_hash, role, status)
        VALUES ($1, $2, $3, $4, $5, 'active')
        ON CONFLICT (email) DO UPDATE SET role = EXCLUDED.role
        RETURNING id
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(email.split('@').next().unwrap_or("Shopper"))
    .bind(email)
    .bind(password_hash)
    .bind(role)
    .fetch_optional(pool)
    .await?;

    let user_id = match row {
        Some((id,)) => id,
        None => {
            let existing: (Uuid,) = sqlx::query_as("SELECT id FROM users WHERE email = $1")
                .bind(email)
                .fetch_one(pool)
                .await?;
            existing.0
        }
    };

    println!("Ensured user {email} (role={role})");
    Ok(user_id)
}

async fn seed_category(pool: &sqlx::PgPool, name: &str) -> anyhow::Result<Uuid> {
    let row: Option<(Uuid,)> = sqlx::query_as(
        r#"
        INSERT INTO categories (id, name, image)
        VALUES ($1, $2, 'https://assets.example.com/seed/protein.webp')
        ON CONFLICT (name) DO NOTHING
        RETURNING id
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(name)
    .fetch_optional(pool)
    .await?;

    let category_id = match row {
        Some((id,)) => id,
        None => {
            let existing: (Uuid,) = sqlx::query_as("SELECT id FROM categories WHERE name = $1")
                .bind(name)
                .fetch_one(pool)
                .await?;
            existing.0
        }
    };
    Ok(category_id)
}

async fn seed_products(pool: &sqlx::PgPool, category_id: Uuid) -> anyhow::Result<()> {
    let products: Vec<(&str, &str, &str, i64, i32)> = vec![
        ("Whey Isolate 2kg", "WHEY-ISO-2KG", "Fast-absorbing protein", 549900, 120),
        ("Creatine Monohydrate", "CREA-MONO-500", "Daily strength staple", 189900, 300),
        ("Omega-3 Fish Oil", "OMEGA3-120", "High-EPA softgels", 129900, 200),
        ("Magnesium Glycinate", "MAG-GLY-90", "Sleep and recovery support", 99900, 150),
    ];

    for (name, sku, desc, price, stock) in products {
        let row: Option<(Uuid,)> = sqlx::query_as(
            r#"
            INSERT INTO products (id, name, sku, description, price, stock, images, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7, 'active')
            ON CONFLICT (sku) DO NOTHING
            RETURNING id
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(name)
        .bind(sku)
        .bind(desc)
        .bind(price)
        .bind(stock)
        .bind(serde_json::json!([format!(
            "https://assets.example.com/seed/{}.webp",
            sku.to_lowercase()
        )]))
        .fetch_optional(pool)
        .await?;

        if let Some((product_id,)) = row {
            sqlx::query(
                r#"
                INSERT INTO product_categories (id, product_id, category_id)
                VALUES ($1, $2, $3)
                ON CONFLICT DO NOTHING
                "#,
            )
            .bind(Uuid::new_v4())
            .bind(product_id)
            .bind(category_id)
            .execute(pool)
            .await?;
        }
    }

    println!("Seeded products");
    Ok(())
}
