use std::{env, time::Duration};

/// Used when `RUST_LOG` is unset. Request spans from `TraceLayer` log at debug.
pub const DEFAULT_LOG_FILTER: &str = "info,stockportal=debug,tower_http=debug";

#[derive(Debug, Clone)]
pub struct Settings {
    pub host: String,
    pub port: u16,

    pub mongodb_uri: String,
    pub mongodb_db: String,
    // "mongo" (default) or "memory"
    pub user_store: String,

    pub jwt_secret: String,
    pub access_token_minutes: i64,
    pub refresh_token_days: i64,
    pub bcrypt_cost: u32,

    pub itick_api_key: Option<String>,
    pub itick_base_url: String,
    pub upstream_timeout: Duration,
}

fn env_or(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}

fn env_parse<T: std::str::FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|s| s.trim().parse::<T>().ok())
        .unwrap_or(default)
}

pub fn load() -> Settings {
    // Loads .env if present (no crash if missing)
    dotenvy::dotenv().ok();

    // blank key counts as missing
    let itick_api_key = env::var("ITICK_API_KEY")
        .ok()
        .map(|k| k.trim().to_string())
        .filter(|k| !k.is_empty());

    Settings {
        host: env_or("HOST", "127.0.0.1"),
        port: env_parse("PORT", 8000),

        mongodb_uri: env_or("MONGODB_URI", "mongodb://localhost:27017"),
        mongodb_db: env_or("MONGODB_DB", "stock_portal"),
        user_store: env_or("USER_STORE", "mongo"),

        jwt_secret: env_or("JWT_SECRET", "change-me-dev-secret"),
        access_token_minutes: env_parse("ACCESS_TOKEN_MINUTES", 60),
        refresh_token_days: env_parse("REFRESH_TOKEN_DAYS", 1),
        bcrypt_cost: env_parse("BCRYPT_COST", bcrypt::DEFAULT_COST),

        itick_api_key,
        itick_base_url: env_or("ITICK_BASE_URL", "https://api.itick.org"),
        upstream_timeout: Duration::from_secs(env_parse("UPSTREAM_TIMEOUT_SECS", 10)),
    }
}
