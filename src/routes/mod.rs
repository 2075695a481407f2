//! Router assembly.

mod common;
mod resources;

pub use common::common_routes;
pub use resources::{auth_routes, company_routes, job_routes, user_routes};

use crate::state::AppState;
use axum::Router;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Full application: all routes, JSON 404 fallback, tracing and body limit.
pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(common_routes(state.clone()))
        .merge(auth_routes(state.clone()))
        .merge(company_routes(state.clone()))
        .merge(job_routes(state.clone()))
        .merge(user_routes(state))
        .fallback(common::not_found)
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
}
