//! Company handlers. Reads are public; writes need an admin token.

use crate::error::AppError;
use crate::extractors::Admin;
use crate::models::{Companies, CompanyFilter, NewCompany};
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

pub async fn create(
    State(state): State<AppState>,
    _admin: Admin,
    Json(body): Json<Value>,
) -> Result<impl IntoResponse, AppError> {
    let body = RequestValidator::validate(body, &schemas::COMPANY_NEW)?;
    let data: NewCompany = crate::models::from_body(body)?;
    let company = Companies::create(&state.pool, &data).await?;
    tracing::info!(handle = %company.handle, "company created");
    Ok(created(company))
}

pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<impl IntoResponse, AppError> {
    let filter = CompanyFilter::from_params(&params)?;
    let companies = Companies::find_all(&state.pool, &filter).await?;
    Ok(many(companies))
}

pub async fn read(
    State(state): State<AppState>,
    Path(handle): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let company = Companies::get(&state.pool, &handle).await?;
    Ok(single(company))
}

pub async fn update(
    State(state): State<AppState>,
    _admin: Admin,
    Path(handle): Path<String>,
    Json(body): Json<Value>,
) -> Result<impl IntoResponse, AppError> {
    let body = RequestValidator::validate(body, &schemas::COMPANY_UPDATE)?;
    let company = Companies::update(&state.pool, &handle, &body).await?;
    Ok(single(company))
}

pub async fn delete(
    State(state): State<AppState>,
    _admin: Admin,
    Path(handle): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    Companies::remove(&state.pool, &handle).await?;
    tracing::info!(handle = %handle, "company deleted");
    Ok(deleted(handle))
}
