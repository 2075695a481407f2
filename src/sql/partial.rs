//! SET clause for partial updates: only the fields the client sent are written.

use crate::error::AppError;
use serde_json::{Map, Value};
use std::collections::HashMap;

/// External (API) field name -> storage column name. Fields not listed keep their name.
pub type FieldNames = HashMap<&'static str, &'static str>;

/// `"col"=$1, "col2"=$2` plus the values for those placeholders, in the same order.
#[derive(Debug, Clone, PartialEq)]
pub struct SetClause {
    pub sql: String,
    pub params: Vec<Value>,
}

impl SetClause {
    /// Appends a trailing parameter (e.g. the row key for WHERE) and returns its placeholder number.
    pub fn push_param(&mut self, v: Value) -> usize {
        self.params.push(v);
        self.params.len()
    }
}

/// Quote identifier for PostgreSQL.
fn quoted(s: &str) -> String {
    format!("\"{}\"", s)
}

/// Build the SET fragment for `data`, translating field names through `field_names`.
///
/// Order of `data` decides placeholder numbering: the Nth field gets `$N` and `params[N-1]`.
/// Explicit nulls are kept as values. Fails with "No data" when there is nothing to set.
pub fn build_set_clause<'a, I>(data: I, field_names: &FieldNames) -> Result<SetClause, AppError>
where
    I: IntoIterator<Item = (&'a String, &'a Value)>,
{
    let mut data = data.into_iter().peekable();
    if data.peek().is_none() {
        return Err(AppError::InvalidArgument("No data".into()));
    }

    let mut sets = Vec::new();
    let mut params = Vec::new();
    for (idx, (field, value)) in data.enumerate() {
        let column = field_names.get(field.as_str()).copied().unwrap_or(field.as_str());
        sets.push(format!("{}=${}", quoted(column), idx + 1));
        params.push(value.clone());
    }
    Ok(SetClause {
        sql: sets.join(", "),
        params,
    })
}

/// Convenience over a JSON object body; key order is the order the client sent.
pub fn set_clause_from_object(data: &Map<String, Value>, field_names: &FieldNames) -> Result<SetClause, AppError> {
    build_set_clause(data.iter(), field_names)
}
