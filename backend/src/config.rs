//! Typed application configuration.
//!
//! Values resolve in three layers: compiled-in defaults, then an optional
//! `config/rustbank.toml` file, then `RUSTBANK_*` environment variables.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub listen_addr: String,
    pub database_url: String,
    /// HMAC secret for token signing. The default is for local
    /// development only; deployments override it via RUSTBANK_JWT_SECRET.
    pub jwt_secret: String,
    pub token_ttl_secs: i64,
    pub min_password_length: usize,
    pub require_pin_digits: usize,
    pub transfer_retry_limit: u32,
}

pub fn load_config() -> Result<AppConfig, ConfigError> {
    let settings = Config::builder()
        // Set defaults
        .set_default("listen_addr", "127.0.0.1:3000")?
        .set_default("database_url", "sqlite:rustbank.db")?
        .set_default("jwt_secret", "insecure-dev-secret")?
        .set_default("token_ttl_secs", 900i64)?
        .set_default("min_password_length", 8i64)?
        .set_default("require_pin_digits", 4i64)?
        .set_default("transfer_retry_limit", 3i64)?
        // Add configuration from a file, when present
        .add_source(File::with_name("config/rustbank").required(false))
        // Add configuration from environment variables
        .add_source(Environment::with_prefix("RUSTBANK"))
        .build()?;

    settings.try_deserialize()
}
