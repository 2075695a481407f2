//! Runtime configuration from environment (after `.env` is loaded by the binary).

use std::env;

#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: String,
    pub secret_key: String,
    pub port: u16,
    pub bcrypt_cost: u32,
    pub jwt_expiry_hours: i64,
}

impl Config {
    pub fn from_env() -> Self {
        let is_test = env::var("APP_ENV").map(|v| v == "test").unwrap_or(false);
        let default_db = if is_test {
            "postgres://localhost/jobly_test"
        } else {
            "postgres://localhost/jobly"
        };
        Config {
            database_url: env::var("DATABASE_URL").unwrap_or_else(|_| default_db.into()),
            secret_key: env::var("SECRET_KEY").unwrap_or_else(|_| "secret-dev".into()),
            port: parse_or("PORT", 3001),
            // bcrypt's minimum cost keeps test suites fast.
            bcrypt_cost: parse_or("BCRYPT_WORK_FACTOR", if is_test { 4 } else { 12 }),
            jwt_expiry_hours: parse_or("JWT_EXPIRY_HOURS", 24),
        }
    }

    /// Fixed values for tests; never reads the environment.
    pub fn for_tests() -> Self {
        Config {
            database_url: "postgres://localhost/jobly_test".into(),
            secret_key: "test-secret".into(),
            port: 0,
            bcrypt_cost: 4,
            jwt_expiry_hours: 1,
        }
    }
}

fn parse_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    match env::var(key) {
        Ok(v) => v.parse().unwrap_or_else(|_| {
            tracing::warn!(key, value = %v, "ignoring unparsable setting");
            default
        }),
        Err(_) => default,
    }
}
