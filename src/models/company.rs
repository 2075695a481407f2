//! Companies: keyed by handle, with the jobs they post.

use super::{constraint_violation, fetch_all, fetch_optional, int_param, only_known_params, JobSummary};
use crate::error::AppError;
use crate::sql::{set_clause_from_object, typed_params, ColumnKind, FieldNames, PgBindValue, WhereBuf};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sqlx::{FromRow, PgPool};
use std::collections::HashMap;

const COLUMNS: &str = "handle, name, description, num_employees, logo_url";

/// Column kinds by API field name, for binding update values.
const KINDS: &[(&str, ColumnKind)] = &[
    ("handle", ColumnKind::Text),
    ("name", ColumnKind::Text),
    ("description", ColumnKind::Text),
    ("numEmployees", ColumnKind::Int),
    ("logoUrl", ColumnKind::Text),
];

fn field_names() -> FieldNames {
    [("numEmployees", "num_employees"), ("logoUrl", "logo_url")]
        .into_iter()
        .collect()
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    pub handle: String,
    pub name: String,
    pub description: Option<String>,
    pub num_employees: Option<i32>,
    pub logo_url: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCompany {
    pub handle: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub num_employees: Option<i32>,
    #[serde(default)]
    pub logo_url: Option<String>,
}

#[derive(Clone, Debug, Serialize)]
pub struct CompanyDetail {
    #[serde(flatten)]
    pub company: Company,
    pub jobs: Vec<JobSummary>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct CompanyFilter {
    pub name_like: Option<String>,
    pub min_employees: Option<i32>,
    pub max_employees: Option<i32>,
}

impl CompanyFilter {
    /// From query string: `nameLike`, `minEmployees`, `maxEmployees`.
    pub fn from_params(params: &HashMap<String, String>) -> Result<Self, AppError> {
        only_known_params(params, &["nameLike", "minEmployees", "maxEmployees"])?;
        let filter = CompanyFilter {
            name_like: params.get("nameLike").cloned(),
            min_employees: int_param(params, "minEmployees")?,
            max_employees: int_param(params, "maxEmployees")?,
        };
        if let (Some(min), Some(max)) = (filter.min_employees, filter.max_employees) {
            if min > max {
                return Err(AppError::BadRequest("minEmployees cannot be greater than maxEmployees".into()));
            }
        }
        Ok(filter)
    }

    fn where_clause(&self) -> WhereBuf {
        let mut w = WhereBuf::new();
        if let Some(name) = &self.name_like {
            w.ilike_contains("name", name);
        }
        if let Some(min) = self.min_employees {
            w.compare("num_employees", ">=", PgBindValue::Int(Some(min)));
        }
        if let Some(max) = self.max_employees {
            w.compare("num_employees", "<=", PgBindValue::Int(Some(max)));
        }
        w
    }
}

pub struct Companies;

impl Companies {
    pub async fn create(pool: &PgPool, data: &NewCompany) -> Result<Company, AppError> {
        let dup: Option<(String,)> = sqlx::query_as("SELECT handle FROM companies WHERE handle = $1")
            .bind(&data.handle)
            .fetch_optional(pool)
            .await?;
        if dup.is_some() {
            return Err(AppError::BadRequest(format!("Duplicate company: {}", data.handle)));
        }
        let sql = format!(
            "INSERT INTO companies (handle, name, description, num_employees, logo_url) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {}",
            COLUMNS
        );
        let params = vec![
            PgBindValue::Text(Some(data.handle.clone())),
            PgBindValue::Text(Some(data.name.clone())),
            PgBindValue::Text(data.description.clone()),
            PgBindValue::Int(data.num_employees),
            PgBindValue::Text(data.logo_url.clone()),
        ];
        fetch_optional(pool, &sql, params)
            .await
            .map_err(constraint_violation)?
            .ok_or(AppError::Db(sqlx::Error::RowNotFound))
    }

    /// Matching companies ordered by name; no match is an empty list.
    pub async fn find_all(pool: &PgPool, filter: &CompanyFilter) -> Result<Vec<Company>, AppError> {
        let w = filter.where_clause();
        let sql = format!("SELECT {} FROM companies{} ORDER BY name", COLUMNS, w.sql());
        fetch_all(pool, &sql, w.params).await
    }

    pub async fn get(pool: &PgPool, handle: &str) -> Result<CompanyDetail, AppError> {
        let sql = format!("SELECT {} FROM companies WHERE handle = $1", COLUMNS);
        let company: Company = fetch_optional(pool, &sql, vec![PgBindValue::Text(Some(handle.into()))])
            .await?
            .ok_or_else(|| not_found(handle))?;
        let jobs: Vec<JobSummary> = fetch_all(
            pool,
            "SELECT id, title, salary, equity::text AS equity FROM jobs WHERE company_handle = $1 ORDER BY id",
            vec![PgBindValue::Text(Some(handle.into()))],
        )
        .await?;
        Ok(CompanyDetail { company, jobs })
    }

    /// Partial update; only fields present in `data` change.
    pub async fn update(pool: &PgPool, handle: &str, data: &Map<String, Value>) -> Result<Company, AppError> {
        let mut set = set_clause_from_object(data, &field_names())?;
        let handle_idx = set.push_param(Value::String(handle.into()));
        let sql = format!(
            "UPDATE companies SET {} WHERE handle = ${} RETURNING {}",
            set.sql, handle_idx, COLUMNS
        );
        let fields = data.keys().map(String::as_str).chain(["handle"]);
        let params = typed_params(fields, &set.params, KINDS)?;
        fetch_optional(pool, &sql, params)
            .await
            .map_err(constraint_violation)?
            .ok_or_else(|| not_found(handle))
    }

    pub async fn remove(pool: &PgPool, handle: &str) -> Result<(), AppError> {
        let deleted: Option<(String,)> = sqlx::query_as("DELETE FROM companies WHERE handle = $1 RETURNING handle")
            .bind(handle)
            .fetch_optional(pool)
            .await?;
        deleted.map(|_| ()).ok_or_else(|| not_found(handle))
    }
}

fn not_found(handle: &str) -> AppError {
    AppError::NotFound(format!("No company: {}", handle))
}
