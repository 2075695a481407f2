//! Token issue: login and self-registration.

use crate::auth::create_token;
use crate::error::AppError;
use crate::models::{NewUser, Users};
use crate::response::{created, single};
use crate::service::{schemas, RequestValidator};
use crate::state::AppState;
use axum::{extract::State, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Serialize)]
pub struct TokenBody {
    pub token: String,
}

#[derive(Deserialize)]
struct Login {
    username: String,
    password: String,
}

pub async fn token(State(state): State<AppState>, Json(body): Json<Value>) -> Result<impl IntoResponse, AppError> {
    let body = RequestValidator::validate(body, &schemas::USER_AUTH)?;
    let login: Login = crate::models::from_body(body)?;
    let user = Users::authenticate(&state.pool, &login.username, &login.password).await?;
    let token = create_token(&state.config, &user.username, user.is_admin)?;
    Ok(single(TokenBody { token }))
}

/// Self-registration never grants admin.
pub async fn register(State(state): State<AppState>, Json(body): Json<Value>) -> Result<impl IntoResponse, AppError> {
    let body = RequestValidator::validate(body, &schemas::USER_REGISTER)?;
    let data: NewUser = crate::models::from_body(body)?;
    let user = Users::register(&state.pool, &state.config, &NewUser { is_admin: false, ..data }).await?;
    let token = create_token(&state.config, &user.username, false)?;
    tracing::info!(username = %user.username, "user registered");
    Ok(created(TokenBody { token }))
}
