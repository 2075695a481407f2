//! Jobs: numeric id, posted by one company.

use super::{constraint_violation, fetch_all, fetch_optional, int_param, only_known_params, Company};
use crate::error::AppError;
use crate::sql::{set_clause_from_object, typed_params, ColumnKind, FieldNames, PgBindValue, WhereBuf};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sqlx::{FromRow, PgPool};
use std::collections::HashMap;

/// Equity is NUMERIC; read it back as text so no precision is lost.
const COLUMNS: &str = "id, title, salary, equity::text AS equity, company_handle";

const KINDS: &[(&str, ColumnKind)] = &[
    ("id", ColumnKind::Int),
    ("title", ColumnKind::Text),
    ("salary", ColumnKind::Int),
    ("equity", ColumnKind::Numeric),
];

#[derive(Clone, Debug, PartialEq, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: i32,
    pub title: String,
    pub salary: Option<i32>,
    pub equity: Option<String>,
    pub company_handle: String,
}

/// Job as listed under its company.
#[derive(Clone, Debug, PartialEq, Serialize, FromRow)]
pub struct JobSummary {
    pub id: i32,
    pub title: String,
    pub salary: Option<i32>,
    pub equity: Option<String>,
}

#[derive(Clone, Debug, Serialize)]
pub struct JobDetail {
    pub id: i32,
    pub title: String,
    pub salary: Option<i32>,
    pub equity: Option<String>,
    pub company: Company,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewJob {
    pub title: String,
    #[serde(default)]
    pub salary: Option<i32>,
    #[serde(default)]
    pub equity: Option<Value>,
    pub company_handle: String,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct JobFilter {
    pub title: Option<String>,
    pub min_salary: Option<i32>,
    pub has_equity: bool,
}

impl JobFilter {
    /// From query string: `title`, `minSalary`, `hasEquity`.
    pub fn from_params(params: &HashMap<String, String>) -> Result<Self, AppError> {
        only_known_params(params, &["title", "minSalary", "hasEquity"])?;
        let has_equity = match params.get("hasEquity").map(|s| s.trim().to_ascii_lowercase()) {
            None => false,
            Some(s) if s == "true" => true,
            Some(s) if s == "false" => false,
            Some(_) => return Err(AppError::BadRequest("hasEquity must be true or false".into())),
        };
        Ok(JobFilter {
            title: params.get("title").cloned(),
            min_salary: int_param(params, "minSalary")?,
            has_equity,
        })
    }

    fn where_clause(&self) -> WhereBuf {
        let mut w = WhereBuf::new();
        if let Some(title) = &self.title {
            w.ilike_contains("title", title);
        }
        if let Some(min) = self.min_salary {
            w.compare("salary", ">=", PgBindValue::Int(Some(min)));
        }
        if self.has_equity {
            w.raw("equity > 0");
        }
        w
    }
}

pub struct Jobs;

impl Jobs {
    pub async fn create(pool: &PgPool, data: &NewJob) -> Result<Job, AppError> {
        let equity = match &data.equity {
            Some(v) => PgBindValue::from_json(v, ColumnKind::Numeric)?,
            None => PgBindValue::Numeric(None),
        };
        let sql = format!(
            "INSERT INTO jobs (title, salary, equity, company_handle) VALUES ($1, $2, $3, $4) RETURNING {}",
            COLUMNS
        );
        let params = vec![
            PgBindValue::Text(Some(data.title.clone())),
            PgBindValue::Int(data.salary),
            equity,
            PgBindValue::Text(Some(data.company_handle.clone())),
        ];
        let row = fetch_optional(pool, &sql, params).await.map_err(|e| match e {
            AppError::Db(sqlx::Error::Database(db)) if db.is_foreign_key_violation() => {
                AppError::BadRequest(format!("No company: {}", data.company_handle))
            }
            other => constraint_violation(other),
        })?;
        row.ok_or(AppError::Db(sqlx::Error::RowNotFound))
    }

    /// Matching jobs ordered by title then company; no match is an empty list.
    pub async fn find_all(pool: &PgPool, filter: &JobFilter) -> Result<Vec<Job>, AppError> {
        let w = filter.where_clause();
        let sql = format!("SELECT {} FROM jobs{} ORDER BY title, company_handle", COLUMNS, w.sql());
        fetch_all(pool, &sql, w.params).await
    }

    pub async fn get(pool: &PgPool, id: i32) -> Result<JobDetail, AppError> {
        let sql = format!("SELECT {} FROM jobs WHERE id = $1", COLUMNS);
        let job: Job = fetch_optional(pool, &sql, vec![PgBindValue::Int(Some(id))])
            .await?
            .ok_or_else(|| not_found(id))?;
        let company: Company = fetch_optional(
            pool,
            "SELECT handle, name, description, num_employees, logo_url FROM companies WHERE handle = $1",
            vec![PgBindValue::Text(Some(job.company_handle.clone()))],
        )
        .await?
        .ok_or_else(|| AppError::NotFound(format!("No company: {}", job.company_handle)))?;
        Ok(JobDetail {
            id: job.id,
            title: job.title,
            salary: job.salary,
            equity: job.equity,
            company,
        })
    }

    /// Partial update. API and column names coincide for jobs, so the name map is empty.
    pub async fn update(pool: &PgPool, id: i32, data: &Map<String, Value>) -> Result<Job, AppError> {
        let mut set = set_clause_from_object(data, &FieldNames::new())?;
        let id_idx = set.push_param(Value::from(id));
        let sql = format!("UPDATE jobs SET {} WHERE id = ${} RETURNING {}", set.sql, id_idx, COLUMNS);
        let fields = data.keys().map(String::as_str).chain(["id"]);
        let params = typed_params(fields, &set.params, KINDS)?;
        fetch_optional(pool, &sql, params)
            .await
            .map_err(constraint_violation)?
            .ok_or_else(|| not_found(id))
    }

    pub async fn remove(pool: &PgPool, id: i32) -> Result<(), AppError> {
        let deleted: Option<(i32,)> = sqlx::query_as("DELETE FROM jobs WHERE id = $1 RETURNING id")
            .bind(id)
            .fetch_optional(pool)
            .await?;
        deleted.map(|_| ()).ok_or_else(|| not_found(id))
    }
}

fn not_found(id: i32) -> AppError {
    AppError::NotFound(format!("No job: {}", id))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn equity_filter_has_no_param() {
        let f = JobFilter::from_params(&params(&[("hasEquity", "true"), ("minSalary", "150")])).unwrap();
        let w = f.where_clause();
        assert_eq!(w.sql(), " WHERE salary >= $1 AND equity > 0");
        assert_eq!(w.params, vec![PgBindValue::Int(Some(150))]);
    }

    #[test]
    fn has_equity_false_is_no_filter() {
        let f = JobFilter::from_params(&params(&[("hasEquity", "false")])).unwrap();
        assert_eq!(f.where_clause().sql(), "");
    }

    #[test]
    fn bad_filters_are_rejected() {
        assert!(JobFilter::from_params(&params(&[("hasEquity", "maybe")])).is_err());
        assert!(JobFilter::from_params(&params(&[("minSalary", "lots")])).is_err());
        assert!(JobFilter::from_params(&params(&[("companyHandle", "c1")])).is_err());
    }

    #[test]
    fn update_binds_nulls_with_column_types() {
        let data = match serde_json::json!({ "salary": null, "equity": null }) {
            Value::Object(m) => m,
            _ => unreachable!(),
        };
        let mut set = set_clause_from_object(&data, &FieldNames::new()).unwrap();
        assert_eq!(set.sql, r#""salary"=$1, "equity"=$2"#);
        assert_eq!(set.push_param(Value::from(7)), 3);
        let fields = data.keys().map(String::as_str).chain(["id"]);
        let params = typed_params(fields, &set.params, KINDS).unwrap();
        assert_eq!(
            params,
            vec![PgBindValue::Int(None), PgBindValue::Numeric(None), PgBindValue::Int(Some(7))]
        );
    }
}
