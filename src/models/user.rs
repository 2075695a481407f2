//! Users: credentials, profile, admin flag and job applications.

use super::{constraint_violation, fetch_all, fetch_optional};
use crate::auth::{hash_password, verify_password};
use crate::config::Config;
use crate::error::AppError;
use crate::sql::{set_clause_from_object, typed_params, ColumnKind, FieldNames, PgBindValue};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sqlx::{FromRow, PgPool};

const COLUMNS: &str = "username, first_name, last_name, email, is_admin";

const KINDS: &[(&str, ColumnKind)] = &[
    ("username", ColumnKind::Text),
    ("password", ColumnKind::Text),
    ("firstName", ColumnKind::Text),
    ("lastName", ColumnKind::Text),
    ("email", ColumnKind::Text),
    ("isAdmin", ColumnKind::Bool),
];

fn field_names() -> FieldNames {
    [("firstName", "first_name"), ("lastName", "last_name"), ("isAdmin", "is_admin")]
        .into_iter()
        .collect()
}

#[derive(Clone, Debug, PartialEq, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub is_admin: bool,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub username: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(default)]
    pub is_admin: bool,
}

#[derive(Clone, Debug, Serialize)]
pub struct UserDetail {
    #[serde(flatten)]
    pub user: User,
    /// Ids of jobs applied to.
    pub applications: Vec<i32>,
}

#[derive(FromRow)]
struct Credentials {
    password: String,
    #[sqlx(flatten)]
    user: User,
}

pub struct Users;

impl Users {
    /// User for valid credentials; any mismatch is the same 401.
    pub async fn authenticate(pool: &PgPool, username: &str, password: &str) -> Result<User, AppError> {
        let sql = format!("SELECT password, {} FROM users WHERE username = $1", COLUMNS);
        let found: Option<Credentials> =
            fetch_optional(pool, &sql, vec![PgBindValue::Text(Some(username.into()))]).await?;
        if let Some(creds) = found {
            if verify_password(password, &creds.password)? {
                return Ok(creds.user);
            }
        }
        Err(AppError::Unauthorized("Invalid username/password".into()))
    }

    pub async fn register(pool: &PgPool, config: &Config, data: &NewUser) -> Result<User, AppError> {
        let dup: Option<(String,)> = sqlx::query_as("SELECT username FROM users WHERE username = $1")
            .bind(&data.username)
            .fetch_optional(pool)
            .await?;
        if dup.is_some() {
            return Err(AppError::BadRequest(format!("Duplicate username: {}", data.username)));
        }
        let hashed = hash_password(config, &data.password)?;
        let sql = format!(
            "INSERT INTO users (username, password, first_name, last_name, email, is_admin) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING {}",
            COLUMNS
        );
        let params = vec![
            PgBindValue::Text(Some(data.username.clone())),
            PgBindValue::Text(Some(hashed)),
            PgBindValue::Text(Some(data.first_name.clone())),
            PgBindValue::Text(Some(data.last_name.clone())),
            PgBindValue::Text(Some(data.email.clone())),
            PgBindValue::Bool(Some(data.is_admin)),
        ];
        fetch_optional(pool, &sql, params)
            .await
            .map_err(constraint_violation)?
            .ok_or(AppError::Db(sqlx::Error::RowNotFound))
    }

    pub async fn find_all(pool: &PgPool) -> Result<Vec<User>, AppError> {
        let sql = format!("SELECT {} FROM users ORDER BY username", COLUMNS);
        fetch_all(pool, &sql, Vec::new()).await
    }

    pub async fn get(pool: &PgPool, username: &str) -> Result<UserDetail, AppError> {
        let sql = format!("SELECT {} FROM users WHERE username = $1", COLUMNS);
        let user: User = fetch_optional(pool, &sql, vec![PgBindValue::Text(Some(username.into()))])
            .await?
            .ok_or_else(|| not_found(username))?;
        let applications: Vec<(i32,)> = fetch_all(
            pool,
            "SELECT job_id FROM applications WHERE username = $1 ORDER BY job_id",
            vec![PgBindValue::Text(Some(username.into()))],
        )
        .await?;
        Ok(UserDetail {
            user,
            applications: applications.into_iter().map(|(id,)| id).collect(),
        })
    }

    /// Partial update. A new password is hashed before it reaches the SET clause.
    pub async fn update(
        pool: &PgPool,
        config: &Config,
        username: &str,
        mut data: Map<String, Value>,
    ) -> Result<User, AppError> {
        if let Some(Value::String(plain)) = data.get("password") {
            let hashed = hash_password(config, plain)?;
            data.insert("password".into(), Value::String(hashed));
        }
        let mut set = set_clause_from_object(&data, &field_names())?;
        let user_idx = set.push_param(Value::String(username.into()));
        let sql = format!(
            "UPDATE users SET {} WHERE username = ${} RETURNING {}",
            set.sql, user_idx, COLUMNS
        );
        let fields = data.keys().map(String::as_str).chain(["username"]);
        let params = typed_params(fields, &set.params, KINDS)?;
        fetch_optional(pool, &sql, params)
            .await
            .map_err(constraint_violation)?
            .ok_or_else(|| not_found(username))
    }

    pub async fn remove(pool: &PgPool, username: &str) -> Result<(), AppError> {
        let deleted: Option<(String,)> = sqlx::query_as("DELETE FROM users WHERE username = $1 RETURNING username")
            .bind(username)
            .fetch_optional(pool)
            .await?;
        deleted.map(|_| ()).ok_or_else(|| not_found(username))
    }

    /// Record that `username` applied to job `job_id`. Both must exist.
    pub async fn apply_to_job(pool: &PgPool, username: &str, job_id: i32) -> Result<(), AppError> {
        let job: Option<(i32,)> = sqlx::query_as("SELECT id FROM jobs WHERE id = $1")
            .bind(job_id)
            .fetch_optional(pool)
            .await?;
        if job.is_none() {
            return Err(AppError::NotFound(format!("No job: {}", job_id)));
        }
        let user: Option<(String,)> = sqlx::query_as("SELECT username FROM users WHERE username = $1")
            .bind(username)
            .fetch_optional(pool)
            .await?;
        if user.is_none() {
            return Err(not_found(username));
        }
        sqlx::query("INSERT INTO applications (username, job_id) VALUES ($1, $2) ON CONFLICT DO NOTHING")
            .bind(username)
            .bind(job_id)
            .execute(pool)
            .await?;
        Ok(())
    }
}

fn not_found(username: &str) -> AppError {
    AppError::NotFound(format!("No user: {}", username))
}
