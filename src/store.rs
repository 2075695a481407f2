//! Database bootstrap: create the database if missing, then the tables (idempotent).

use crate::error::AppError;
use sqlx::postgres::PgConnectOptions;
use sqlx::{ConnectOptions, PgPool};
use std::str::FromStr;
use url::Url;

const TABLES: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS companies (
        handle VARCHAR(25) PRIMARY KEY CHECK (handle = lower(handle)),
        name TEXT UNIQUE NOT NULL,
        description TEXT,
        num_employees INTEGER CHECK (num_employees >= 0),
        logo_url TEXT
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS jobs (
        id SERIAL PRIMARY KEY,
        title TEXT NOT NULL,
        salary INTEGER CHECK (salary >= 0),
        equity NUMERIC CHECK (equity <= 1.0),
        company_handle VARCHAR(25) NOT NULL REFERENCES companies ON DELETE CASCADE
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS users (
        username VARCHAR(30) PRIMARY KEY,
        password TEXT NOT NULL,
        first_name TEXT NOT NULL,
        last_name TEXT NOT NULL,
        email TEXT NOT NULL CHECK (position('@' IN email) > 1),
        is_admin BOOLEAN NOT NULL DEFAULT FALSE
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS applications (
        username VARCHAR(30) REFERENCES users ON DELETE CASCADE,
        job_id INTEGER REFERENCES jobs ON DELETE CASCADE,
        PRIMARY KEY (username, job_id)
    )
    "#,
];

/// Create companies, jobs, users and applications in dependency order.
pub async fn ensure_tables(pool: &PgPool) -> Result<(), AppError> {
    for ddl in TABLES {
        sqlx::query(ddl).execute(pool).await?;
    }
    tracing::info!(tables = TABLES.len(), "schema ready");
    Ok(())
}

/// Connect to the `postgres` maintenance DB and create the target database if it does not exist.
pub async fn ensure_database_exists(database_url: &str) -> Result<(), AppError> {
    let (maintenance, db_name) = maintenance_target(database_url)?;
    if db_name == "postgres" {
        return Ok(());
    }
    let opts = PgConnectOptions::from_str(maintenance.as_str())
        .map_err(|e| AppError::Config(format!("DATABASE_URL: {}", e)))?;
    let mut conn: sqlx::PgConnection = opts.connect().await?;
    let exists: (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM pg_database WHERE datname = $1)")
        .bind(&db_name)
        .fetch_one(&mut conn)
        .await?;
    if !exists.0 {
        sqlx::query(&format!("CREATE DATABASE {}", quote_ident(&db_name)))
            .execute(&mut conn)
            .await?;
        tracing::info!(database = %db_name, "created database");
    }
    Ok(())
}

/// The same server pointed at `postgres`, plus the database named in `database_url`.
fn maintenance_target(database_url: &str) -> Result<(Url, String), AppError> {
    let mut url = Url::parse(database_url).map_err(|e| AppError::Config(format!("DATABASE_URL: {}", e)))?;
    let db_name = url.path().trim_start_matches('/').to_string();
    if db_name.is_empty() {
        return Err(AppError::Config("DATABASE_URL has no database name".into()));
    }
    url.set_path("/postgres");
    Ok((url, db_name))
}

fn quote_ident(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}
