use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub rust_log: String,
    /// Lifetime of access sessions issued at login, in minutes.
    pub access_ttl_minutes: i64,
    /// Lifetime of refresh sessions issued at login, in minutes.
    pub refresh_ttl_minutes: i64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            access_ttl_minutes: env_i64("ACCESS_TTL_MINUTES", 120)?,
            refresh_ttl_minutes: env_i64("REFRESH_TTL_MINUTES", 1440)?,
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn env_i64(key: &str, default: i64) -> Result<i64> {
    match std::env::var(key) {
        Ok(v) => v
            .parse::<i64>()
            .with_context(|| format!("{key} must be an integer number of minutes")),
        Err(_) => Ok(default),
    }
}
