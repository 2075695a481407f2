//! Jobly: REST backend for companies, jobs and the users who apply to them.

pub mod auth;
pub mod config;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod models;
pub mod response;
pub mod routes;
pub mod service;
pub mod sql;
pub mod state;
pub mod store;

pub use config::Config;
pub use error::AppError;
pub use routes::app;
pub use sql::{build_set_clause, FieldNames, SetClause};
pub use state::AppState;
pub use store::{ensure_database_exists, ensure_tables};
