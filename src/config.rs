use std::env;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    /// Session cookies carry `Secure` only in production.
    pub cookie_secure: bool,
    /// Base URL embedded in password-reset links.
    pub public_url: String,
    pub smtp: SmtpConfig,
    pub assets: AssetConfig,
}

#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub from_address: String,
}

#[derive(Debug, Clone)]
pub struct AssetConfig {
    pub base_url: String,
    pub api_key: String,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = env::var("DATABASE_URL")?;
        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(3000);
        let cookie_secure = env::var("APP_ENV")
            .map(|e| e == "production")
            .unwrap_or(false);
        let public_url =
            env::var("PUBLIC_URL").unwrap_or_else(|_| "http://localhost:3000".to_string());

        let smtp = SmtpConfig {
            host: env::var("SMTP_HOST").unwrap_or_else(|_| "localhost".to_string()),
            port: env::var("SMTP_PORT")
                .ok()
                .and_then(|p| p.parse::<u16>().ok())
                .unwrap_or(587),
            username: env::var("SMTP_USERNAME").unwrap_or_default(),
            password: env::var("SMTP_PASSWORD").unwrap_or_default(),
            from_address: env::var("SMTP_FROM")
                .unwrap_or_else(|_| "no-reply@localhost".to_string()),
        };

        let assets = AssetConfig {
            base_url: env::var("ASSET_HOST_URL")
                .unwrap_or_else(|_| "http://localhost:9000".to_string()),
            api_key: env::var("ASSET_HOST_KEY").unwrap_or_default(),
        };

        Ok(Self {
            database_url,
            host,
            port,
            cookie_secure,
            public_url,
            smtp,
            assets,
        })
    }
}
