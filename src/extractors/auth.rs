//! Pull the caller's JWT claims from the `Authorization: Bearer` header.

use crate::auth::{verify_token, Claims};
use crate::error::AppError;
use crate::state::AppState;
use async_trait::async_trait;
use axum::{extract::FromRequestParts, http::request::Parts};

/// Claims when a valid token was sent, otherwise None. Never rejects.
#[derive(Clone, Debug)]
pub(crate) struct MaybeUser(pub(crate) Option<Claims>);

/// Any logged-in user; 401 otherwise.
#[derive(Clone, Debug)]
pub struct LoggedIn(pub Claims);

/// Logged-in admin; 401 otherwise.
#[derive(Clone, Debug)]
pub struct Admin(pub Claims);

fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

#[async_trait]
impl FromRequestParts<AppState> for MaybeUser {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let claims = bearer_token(parts).and_then(|token| match verify_token(&state.config, token) {
            Ok(c) => Some(c),
            Err(e) => {
                tracing::debug!(error = %e, "ignoring bad token");
                None
            }
        });
        Ok(MaybeUser(claims))
    }
}

#[async_trait]
impl FromRequestParts<AppState> for LoggedIn {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let MaybeUser(claims) = MaybeUser::from_request_parts(parts, state).await.unwrap_or(MaybeUser(None));
        claims.map(LoggedIn).ok_or_else(AppError::unauthorized)
    }
}

#[async_trait]
impl FromRequestParts<AppState> for Admin {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let LoggedIn(claims) = LoggedIn::from_request_parts(parts, state).await?;
        if !claims.is_admin {
            return Err(AppError::unauthorized());
        }
        Ok(Admin(claims))
    }
}

impl LoggedIn {
    /// The token belongs to `username`, or to an admin.
    pub fn ensure_self_or_admin(&self, username: &str) -> Result<(), AppError> {
        if self.0.is_admin || self.0.username == username {
            Ok(())
        } else {
            Err(AppError::unauthorized())
        }
    }
}
