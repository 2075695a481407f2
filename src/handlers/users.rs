//! User handlers. Listing and creating need an admin; the rest need that user or an admin.

use super::jobs::parse_id;
use crate::auth::create_token;
use crate::error::AppError;
use crate::extractors::{Admin, LoggedIn};
use crate::models::{NewUser, User, Users};
use crate::response::{created, deleted, many, single};
use crate::service::{schemas, RequestValidator};
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use serde::Serialize;
use serde_json::Value;

#[derive(Serialize)]
pub struct CreatedUser {
    pub user: User,
    pub token: String,
}

#[derive(Serialize)]
pub struct Applied {
    pub applied: i32,
}

pub async fn create(
    State(state): State<AppState>,
    _admin: Admin,
    Json(body): Json<Value>,
) -> Result<impl IntoResponse, AppError> {
    let body = RequestValidator::validate(body, &schemas::USER_NEW)?;
    let data: NewUser = crate::models::from_body(body)?;
    let user = Users::register(&state.pool, &state.config, &data).await?;
    let token = create_token(&state.config, &user.username, user.is_admin)?;
    tracing::info!(username = %user.username, is_admin = user.is_admin, "user created by admin");
    Ok(created(CreatedUser { user, token }))
}

pub async fn list(State(state): State<AppState>, _admin: Admin) -> Result<impl IntoResponse, AppError> {
    let users = Users::find_all(&state.pool).await?;
    Ok(many(users))
}

pub async fn read(
    State(state): State<AppState>,
    caller: LoggedIn,
    Path(username): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    caller.ensure_self_or_admin(&username)?;
    let user = Users::get(&state.pool, &username).await?;
    Ok(single(user))
}

pub async fn update(
    State(state): State<AppState>,
    caller: LoggedIn,
    Path(username): Path<String>,
    Json(body): Json<Value>,
) -> Result<impl IntoResponse, AppError> {
    caller.ensure_self_or_admin(&username)?;
    let body = RequestValidator::validate(body, &schemas::USER_UPDATE)?;
    // Only admins may grant or revoke admin.
    if body.contains_key("isAdmin") && !caller.0.is_admin {
        return Err(AppError::unauthorized());
    }
    let user = Users::update(&state.pool, &state.config, &username, body).await?;
    Ok(single(user))
}

pub async fn delete(
    State(state): State<AppState>,
    caller: LoggedIn,
    Path(username): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    caller.ensure_self_or_admin(&username)?;
    Users::remove(&state.pool, &username).await?;
    tracing::info!(username = %username, "user deleted");
    Ok(deleted(username))
}

pub async fn apply(
    State(state): State<AppState>,
    caller: LoggedIn,
    Path((username, id_str)): Path<(String, String)>,
) -> Result<impl IntoResponse, AppError> {
    caller.ensure_self_or_admin(&username)?;
    let job_id = parse_id(&id_str)?;
    Users::apply_to_job(&state.pool, &username, job_id).await?;
    Ok(single(Applied { applied: job_id }))
}
