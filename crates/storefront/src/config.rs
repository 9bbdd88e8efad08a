use anyhow::{Context, Result, anyhow};

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_flag(key: &str) -> bool {
    std::env::var(key)
        .map(|v| v == "true" || v == "1")
        .unwrap_or(false)
}

#[derive(Debug, Clone)]
pub struct StripeConfig {
    pub secret_key: String,
    pub webhook_secret: String,
    pub api_base: String,
}

#[derive(Debug, Clone)]
pub struct AdminConfig {
    pub username: String,
    pub password_hash: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub run_migrations: bool,
    pub port: u16,
    pub db_max_conn: u32,
    pub db_min_conn: u32,
    pub jwt_secret: String,
    pub default_currency: String,
    pub otel_endpoint: String,
    pub is_dev: bool,
    pub enable_file_log: bool,
    pub stripe: StripeConfig,
    pub admin: AdminConfig,
}

impl Config {
    pub fn init() -> Result<Self> {
        let database_url =
            std::env::var("DATABASE_URL").context("Missing environment variable: DATABASE_URL")?;
        let jwt_secret =
            std::env::var("JWT_SECRET").context("Missing environment variable: JWT_SECRET")?;
        let run_migrations_str = env_or("RUN_MIGRATIONS", "false");
        let port_str = std::env::var("PORT").context("Missing environment variable: PORT")?;

        let run_migrations = match run_migrations_str.as_str() {
            "true" => true,
            "false" => false,
            other => {
                return Err(anyhow!(
                    "RUN_MIGRATIONS must be 'true' or 'false', got '{}'",
                    other
                ));
            }
        };

        let port = port_str
            .parse::<u16>()
            .context("PORT must be a valid u16 integer")?;

        let db_max_conn: u32 = env_or("DB_MAX_CONNECTION", "5")
            .parse::<u32>()
            .context("Unable to parse DB_MAX_CONNECTION as u32")?;

        let db_min_conn: u32 = env_or("DB_MIN_CONNECTION", "1")
            .parse::<u32>()
            .context("Unable to parse DB_MIN_CONNECTION as u32")?;

        // stripe
        let secret_key = std::env::var("STRIPE_SECRET_KEY")
            .context("Missing environment variable: STRIPE_SECRET_KEY")?;
        let webhook_secret = std::env::var("STRIPE_WEBHOOK_SECRET")
            .context("Missing environment variable: STRIPE_WEBHOOK_SECRET")?;
        let api_base = env_or("STRIPE_API_BASE", "https://api.stripe.com");

        // admin console
        let username = std::env::var("ADMIN_USERNAME")
            .context("Missing environment variable: ADMIN_USERNAME")?;
        let password_hash = std::env::var("ADMIN_PASSWORD_HASH")
            .context("Missing environment variable: ADMIN_PASSWORD_HASH")?;

        let default_currency = env_or("DEFAULT_CURRENCY", "usd").to_lowercase();
        let otel_endpoint = env_or("OTEL_ENDPOINT", "http://otel-collector:4317");

        Ok(Self {
            database_url,
            run_migrations,
            port,
            db_max_conn,
            db_min_conn,
            jwt_secret,
            default_currency,
            otel_endpoint,
            is_dev: env_flag("DEV_MODE"),
            enable_file_log: env_flag("ENABLE_FILE_LOG"),
            stripe: StripeConfig {
                secret_key,
                webhook_secret,
                api_base,
            },
            admin: AdminConfig {
                username,
                password_hash,
            },
        })
    }
}
