//! Resource models: SQL for companies, jobs and users.

pub mod company;
pub mod job;
pub mod user;

pub use company::{Company, CompanyDetail, CompanyFilter, Companies, NewCompany};
pub use job::{Job, JobDetail, JobFilter, JobSummary, Jobs, NewJob};
pub use user::{NewUser, User, UserDetail, Users};

use crate::error::AppError;
use crate::sql::{bind_all, PgBindValue};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use sqlx::postgres::PgRow;
use sqlx::{FromRow, PgPool};
use std::collections::HashMap;

pub(crate) async fn fetch_optional<T>(pool: &PgPool, sql: &str, params: Vec<PgBindValue>) -> Result<Option<T>, AppError>
where
    T: for<'r> FromRow<'r, PgRow>,
{
    tracing::debug!(sql = %sql, params = ?params, "query");
    let row = bind_all(sqlx::query(sql), params).fetch_optional(pool).await?;
    Ok(row.map(|r| T::from_row(&r)).transpose()?)
}

pub(crate) async fn fetch_all<T>(pool: &PgPool, sql: &str, params: Vec<PgBindValue>) -> Result<Vec<T>, AppError>
where
    T: for<'r> FromRow<'r, PgRow>,
{
    tracing::debug!(sql = %sql, params = ?params, "query");
    let rows = bind_all(sqlx::query(sql), params).fetch_all(pool).await?;
    Ok(rows.iter().map(T::from_row).collect::<Result<Vec<_>, _>>()?)
}

/// Table constraints a request can still trip after validation, with the message the caller sees.
const CONSTRAINTS: &[(&str, &str)] = &[
    ("companies_pkey", "Duplicate company"),
    ("companies_name_key", "Duplicate company name"),
    ("companies_handle_check", "handle must be lower case"),
    ("companies_num_employees_check", "numEmployees must be at least 0"),
    ("jobs_salary_check", "salary must be at least 0"),
    ("jobs_equity_check", "equity must be at most 1"),
    ("jobs_company_handle_fkey", "No such company"),
    ("users_pkey", "Duplicate username"),
    ("users_email_check", "email must be a valid email"),
];

/// Unique, check and foreign-key violations become a 400; other errors pass through.
pub(crate) fn constraint_violation(err: AppError) -> AppError {
    match constraint_message(&err) {
        Some(message) => AppError::BadRequest(message),
        None => err,
    }
}

fn constraint_message(err: &AppError) -> Option<String> {
    let AppError::Db(sqlx::Error::Database(db)) = err else {
        return None;
    };
    if !(db.is_unique_violation() || db.is_check_violation() || db.is_foreign_key_violation()) {
        return None;
    }
    let constraint = db.constraint().unwrap_or_default();
    tracing::debug!(constraint, error = %db, "constraint violation");
    let message = CONSTRAINTS
        .iter()
        .find(|(name, _)| *name == constraint)
        .map(|(_, message)| message.to_string())
        .unwrap_or_else(|| format!("Conflicts with existing data ({})", constraint));
    Some(message)
}

/// Turn a validated body into its typed form.
pub(crate) fn from_body<T: DeserializeOwned>(body: Map<String, Value>) -> Result<T, AppError> {
    serde_json::from_value(Value::Object(body)).map_err(|e| AppError::BadRequest(e.to_string()))
}

/// Integer query parameter; absent is None, garbage is a 400.
pub(crate) fn int_param(params: &HashMap<String, String>, key: &str) -> Result<Option<i32>, AppError> {
    params
        .get(key)
        .map(|v| {
            v.trim()
                .parse::<i32>()
                .map_err(|_| AppError::BadRequest(format!("{} must be an integer", key)))
        })
        .transpose()
}

/// Reject query keys a resource does not filter on.
pub(crate) fn only_known_params(params: &HashMap<String, String>, known: &[&str]) -> Result<(), AppError> {
    let mut unknown: Vec<&str> = params
        .keys()
        .map(String::as_str)
        .filter(|k| !known.contains(k))
        .collect();
    if unknown.is_empty() {
        return Ok(());
    }
    unknown.sort_unstable();
    Err(AppError::BadRequest(format!("unknown filter: {}", unknown.join(", "))))
}
