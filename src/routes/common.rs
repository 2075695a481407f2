//! Service routes: liveness, readiness, build info, and the JSON 404.

use crate::error::AppError;
use crate::state::AppState;
use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use serde::Serialize;

/// Answer for /health and /ready. `database` is only reported by /ready.
#[derive(Debug, Serialize, PartialEq)]
struct Status {
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    database: Option<&'static str>,
}

async fn health() -> Json<Status> {
    Json(Status {
        status: "ok",
        database: None,
    })
}

/// 503 until the pool can run a query.
async fn ready(State(state): State<AppState>) -> (StatusCode, Json<Status>) {
    let reachable = sqlx::query("SELECT 1")
        .execute(&state.pool)
        .await
        .map_err(|e| tracing::warn!(error = %e, "database not reachable"))
        .is_ok();
    let (code, status, database) = if reachable {
        (StatusCode::OK, "ok", "ok")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "degraded", "unavailable")
    };
    (
        code,
        Json(Status {
            status,
            database: Some(database),
        }),
    )
}

#[derive(Serialize)]
struct Build {
    name: &'static str,
    version: &'static str,
}

async fn version() -> Json<Build> {
    Json(Build {
        name: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Fallback for unmatched paths.
pub async fn not_found() -> AppError {
    AppError::NotFound("Not Found".into())
}

pub fn common_routes(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/ready", get(ready))
        .route("/version", get(version))
        .with_state(state)
}
