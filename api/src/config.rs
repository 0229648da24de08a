use std::env;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{bail, Context, Result};

const TEN_YEARS_SECS: u64 = 60 * 60 * 24 * 365 * 10;
const THREE_DAYS_SECS: u64 = 60 * 60 * 24 * 3;
const DEV_SESSION_SECRET: &str = "dev-secret-not-for-production";

/// Sustained rate and burst for the GraphQL endpoint, per client IP
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimit {
    pub per_second: u64,
    pub burst: u32,
}

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub redis_url: String,
    /// Key for signing session cookies (HMAC-SHA256)
    pub session_secret: String,
    /// Origin allowed to make credentialed cross-site requests
    pub cors_origin: String,
    pub port: u16,
    /// Production mode marks cookies `Secure`
    pub production: bool,
    pub session_ttl: Duration,
    pub reset_token_ttl: Duration,
    /// Base URL of the web client, used in password reset links
    pub frontend_url: String,
    pub request_timeout: Duration,
    pub rate_limit: RateLimit,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let cors_origin = var_or("CORS_ORIGIN", "http://localhost:3000".to_string())?;
        let production = var_or("APP_ENV", "development".to_string())? == "production";

        let session_secret = match env::var("SESSION_SECRET") {
            Ok(secret) if !secret.trim().is_empty() => secret,
            _ if production => bail!("SESSION_SECRET must be set in production"),
            _ => {
                tracing::warn!("SESSION_SECRET not set, using the development secret");
                DEV_SESSION_SECRET.to_string()
            }
        };

        Ok(Self {
            database_url: env::var("DATABASE_URL").context("DATABASE_URL must be set")?,
            redis_url: var_or("REDIS_URL", "redis://127.0.0.1:6379".to_string())?,
            session_secret,
            frontend_url: var_or("FRONTEND_URL", cors_origin.clone())?,
            cors_origin,
            port: var_or("PORT", 4000)?,
            production,
            session_ttl: Duration::from_secs(var_or("SESSION_TTL_SECS", TEN_YEARS_SECS)?),
            reset_token_ttl: Duration::from_secs(var_or("RESET_TOKEN_TTL_SECS", THREE_DAYS_SECS)?),
            request_timeout: Duration::from_secs(var_or("REQUEST_TIMEOUT_SECS", 30)?),
            rate_limit: RateLimit {
                per_second: var_or("RATE_LIMIT_PER_SECOND", 10)?,
                burst: var_or("RATE_LIMIT_BURST", 50)?,
            },
        })
    }
}

fn var_or<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    parse_or(key, env::var(key).ok(), default)
}

fn parse_or<T>(key: &str, raw: Option<String>, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match raw {
        Some(value) if !value.trim().is_empty() => value
            .trim()
            .parse()
            .with_context(|| format!("{} has an invalid value: {:?}", key, value)),
        _ => Ok(default),
    }
}

#[cfg(test)]
impl Config {
    /// Configuration for tests; no external services are contacted with it
    pub fn for_tests() -> Self {
        Self {
            database_url: String::new(),
            redis_url: String::new(),
            session_secret: "test-secret".to_string(),
            cors_origin: "http://localhost:3000".to_string(),
            port: 0,
            production: false,
            session_ttl: Duration::from_secs(TEN_YEARS_SECS),
            reset_token_ttl: Duration::from_secs(THREE_DAYS_SECS),
            frontend_url: "http://localhost:3000".to_string(),
            request_timeout: Duration::from_secs(30),
            rate_limit: RateLimit {
                per_second: 10,
                burst: 50,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_value_uses_default() {
        assert_eq!(parse_or("PORT", None, 4000u16).unwrap(), 4000);
        assert_eq!(parse_or("PORT", Some("  ".into()), 4000u16).unwrap(), 4000);
    }

    #[test]
    fn present_value_is_parsed() {
        assert_eq!(parse_or("PORT", Some("8080".into()), 4000u16).unwrap(), 8080);
    }

    #[test]
    fn invalid_value_names_the_variable() {
        let err = parse_or("PORT", Some("eighty".into()), 4000u16).unwrap_err();
        assert!(err.to_string().contains("PORT"));
    }
}
