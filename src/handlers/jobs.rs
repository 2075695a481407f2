//! Job handlers. Reads are public; writes need an admin token.

use crate::error::AppError;
use crate::extractors::Admin;
use crate::models::{JobFilter, Jobs, NewJob};
use crate::response::{created, deleted, many, single};
use crate::service::{schemas, RequestValidator};
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Json,
};
use serde_json::Value;
use std::collections::HashMap;

pub(crate) fn parse_id(id_str: &str) -> Result<i32, AppError> {
    id_str
        .parse()
        .map_err(|_| AppError::BadRequest(format!("invalid job id: {}", id_str)))
}

pub async fn create(
    State(state): State<AppState>,
    _admin: Admin,
    Json(body): Json<Value>,
) -> Result<impl IntoResponse, AppError> {
    let body = RequestValidator::validate(body, &schemas::JOB_NEW)?;
    let data: NewJob = crate::models::from_body(body)?;
    let job = Jobs::create(&state.pool, &data).await?;
    tracing::info!(id = job.id, company = %job.company_handle, "job created");
    Ok(created(job))
}

pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<impl IntoResponse, AppError> {
    let filter = JobFilter::from_params(&params)?;
    let jobs = Jobs::find_all(&state.pool, &filter).await?;
    Ok(many(jobs))
}

pub async fn read(
    State(state): State<AppState>,
    Path(id_str): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let job = Jobs::get(&state.pool, parse_id(&id_str)?).await?;
    Ok(single(job))
}

pub async fn update(
    State(state): State<AppState>,
    _admin: Admin,
    Path(id_str): Path<String>,
    Json(body): Json<Value>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id_str)?;
    let body = RequestValidator::validate(body, &schemas::JOB_UPDATE)?;
    let job = Jobs::update(&state.pool, id, &body).await?;
    Ok(single(job))
}

pub async fn delete(
    State(state): State<AppState>,
    _admin: Admin,
    Path(id_str): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id_str)?;
    Jobs::remove(&state.pool, id).await?;
    tracing::info!(id, "job deleted");
    Ok(deleted(id))
}
