use std::env;

use chrono::Duration;

use crate::error::AppError;

/// Runtime settings, read from the process environment.
#[derive(Debug, Clone)]
pub struct Config {
    /// Postgres connection string. `None` runs the service on the in-memory store.
    pub database_url: Option<String>,
    pub server_port: u16,
    pub server_host: String,
    pub jwt_secret: String,
    /// Lifetime of issued session tokens.
    pub token_ttl: Duration,
    pub bcrypt_cost: u32,
    /// Allowed CORS origins. Empty means any origin.
    pub allowed_origins: Vec<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        let jwt_secret = env::var("JWT_SECRET")
            .ok()
            .filter(|s| !s.is_empty())
            .ok_or_else(|| AppError::InternalServerError("JWT_SECRET must be set".into()))?;

        let token_ttl_hours: i64 = parse_var("TOKEN_TTL_HOURS", 24)?;
        if token_ttl_hours <= 0 {
            return Err(AppError::InternalServerError(
                "TOKEN_TTL_HOURS must be positive".into(),
            ));
        }
        let token_ttl = Duration::try_hours(token_ttl_hours).ok_or_else(|| {
            AppError::InternalServerError("TOKEN_TTL_HOURS out of range".into())
        })?;

        let bcrypt_cost: u32 = parse_var("BCRYPT_COST", bcrypt::DEFAULT_COST)?;
        if !(4..=31).contains(&bcrypt_cost) {
            return Err(AppError::InternalServerError(
                "BCRYPT_COST must be between 4 and 31".into(),
            ));
        }

        Ok(Self {
            database_url: env::var("DATABASE_URL").ok().filter(|s| !s.is_empty()),
            server_port: parse_var("SERVER_PORT", 5000)?,
            server_host: env::var("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            jwt_secret,
            token_ttl,
            bcrypt_cost,
            allowed_origins: parse_origins(env::var("CORS_ALLOWED_ORIGINS").ok().as_deref()),
        })
    }

    pub fn server_url(&self) -> String {
        format!("http://{}:{}", self.server_host, self.server_port)
    }
}

fn parse_var<T: std::str::FromStr>(name: &str, default: T) -> Result<T, AppError> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| AppError::InternalServerError(format!("{} must be a number", name))),
        Err(_) => Ok(default),
    }
}

fn parse_origins(raw: Option<&str>) -> Vec<String> {
    raw.unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty() && *origin != "*")
        .map(String::from)
        .collect()
}
