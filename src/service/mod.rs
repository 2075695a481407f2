//! Request validation: schemas and the validator that applies them.

pub mod schemas;
mod validation;
pub use validation::{FieldKind, FieldRule, Format, RequestValidator, Schema};
