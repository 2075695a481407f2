//! JWT issue and verification (HS256, shared secret from config).

use crate::config::Config;
use crate::error::AppError;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Claims {
    pub username: String,
    pub is_admin: bool,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    pub fn new(username: &str, is_admin: bool, expiry_hours: i64) -> Self {
        let now = Utc::now();
        Claims {
            username: username.to_string(),
            is_admin,
            iat: now.timestamp(),
            exp: (now + Duration::hours(expiry_hours)).timestamp(),
        }
    }
}

pub fn create_token(config: &Config, username: &str, is_admin: bool) -> Result<String, AppError> {
    let claims = Claims::new(username, is_admin, config.jwt_expiry_hours);
    let key = EncodingKey::from_secret(config.secret_key.as_bytes());
    Ok(encode(&Header::default(), &claims, &key)?)
}

/// Decode and verify signature and expiry.
pub fn verify_token(config: &Config, token: &str) -> Result<Claims, AppError> {
    let key = DecodingKey::from_secret(config.secret_key.as_bytes());
    let data = decode::<Claims>(token, &key, &Validation::default())
        .map_err(|e| AppError::Unauthorized(format!("invalid token: {}", e)))?;
    Ok(data.claims)
}

pub fn hash_password(config: &Config, password: &str) -> Result<String, AppError> {
    Ok(bcrypt::hash(password, config.bcrypt_cost)?)
}

pub fn verify_password(password: &str, hash: &str) -> Result<bool, AppError> {
    Ok(bcrypt::verify(password, hash)?)
}
