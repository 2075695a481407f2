//! Resource routes: auth, companies, jobs, users.

use crate::handlers::{auth, companies, jobs, users};
use crate::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};

pub fn auth_routes(state: AppState) -> Router {
    Router::new()
        .route("/auth/token", post(auth::token))
        .route("/auth/register", post(auth::register))
        .with_state(state)
}

pub fn company_routes(state: AppState) -> Router {
    Router::new()
        .route("/companies", get(companies::list).post(companies::create))
        .route(
            "/companies/:handle",
            get(companies::read).patch(companies::update).delete(companies::delete),
        )
        .with_state(state)
}

pub fn job_routes(state: AppState) -> Router {
    Router::new()
        .route("/jobs", get(jobs::list).post(jobs::create))
        .route("/jobs/:id", get(jobs::read).patch(jobs::update).delete(jobs::delete))
        .with_state(state)
}

pub fn user_routes(state: AppState) -> Router {
    Router::new()
        .route("/users", get(users::list).post(users::create))
        .route(
            "/users/:username",
            get(users::read).patch(users::update).delete(users::delete),
        )
        .route("/users/:username/jobs/:id", post(users::apply))
        .with_state(state)
}
