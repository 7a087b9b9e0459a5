//! Configuration loading from environment.

use std::env;

/// Application configuration.
#[derive(Debug)]
pub struct Config {
    pub port: u16,
    pub database_url: String,
    pub jwt_secret: String,
    pub jwt_issuer: Option<String>,
    pub jwt_audience: Option<String>,
    pub rate_limit_per_minute: u32,
    pub otlp_endpoint: Option<String>,
}

impl Config {
    /// Loads configuration from environment variables.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Loads configuration through `lookup`, which returns a variable's value if set.
    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let optional = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let port = optional("PORT")
            .unwrap_or_else(|| "3000".to_string())
            .parse()?;

        let database_url = optional("DATABASE_URL")
            .ok_or_else(|| anyhow::anyhow!("DATABASE_URL environment variable is required"))?;

        let jwt_secret = optional("JWT_SECRET")
            .ok_or_else(|| anyhow::anyhow!("JWT_SECRET environment variable is required"))?;

        let rate_limit_per_minute = optional("RATE_LIMIT_PER_MINUTE")
            .unwrap_or_else(|| "100".to_string())
            .parse()?;

        Ok(Self {
            port,
            database_url,
            jwt_secret,
            jwt_issuer: optional("JWT_ISSUER"),
            jwt_audience: optional("JWT_AUDIENCE"),
            rate_limit_per_minute,
            otlp_endpoint: optional("OTEL_EXPORTER_OTLP_ENDPOINT"),
        })
    }
}
