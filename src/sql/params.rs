//! Convert serde_json::Value to types that sqlx can bind.

use crate::error::AppError;
use bigdecimal::BigDecimal;
use serde_json::Value;
use sqlx::postgres::{PgArguments, Postgres};
use sqlx::query::Query;
use std::str::FromStr;

/// Storage type of a column, used to pick the bind type for a JSON value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColumnKind {
    Text,
    Int,
    Numeric,
    Bool,
}

/// A value that can be bound to a PostgreSQL query. Nulls keep their column type.
#[derive(Clone, Debug, PartialEq)]
pub enum PgBindValue {
    Text(Option<String>),
    Int(Option<i32>),
    Numeric(Option<BigDecimal>),
    Bool(Option<bool>),
}

impl PgBindValue {
    pub fn from_json(v: &Value, kind: ColumnKind) -> Result<Self, AppError> {
        let mismatch = || AppError::BadRequest(format!("cannot use {} as {:?}", v, kind));
        Ok(match kind {
            ColumnKind::Text => PgBindValue::Text(match v {
                Value::Null => None,
                Value::String(s) => Some(s.clone()),
                _ => return Err(mismatch()),
            }),
            ColumnKind::Int => PgBindValue::Int(match v {
                Value::Null => None,
                Value::Number(n) => Some(
                    n.as_i64()
                        .and_then(|i| i32::try_from(i).ok())
                        .ok_or_else(mismatch)?,
                ),
                _ => return Err(mismatch()),
            }),
            ColumnKind::Numeric => PgBindValue::Numeric(match v {
                Value::Null => None,
                Value::Number(n) => Some(BigDecimal::from_str(&n.to_string()).map_err(|_| mismatch())?),
                Value::String(s) => Some(BigDecimal::from_str(s).map_err(|_| mismatch())?),
                _ => return Err(mismatch()),
            }),
            ColumnKind::Bool => PgBindValue::Bool(match v {
                Value::Null => None,
                Value::Bool(b) => Some(*b),
                _ => return Err(mismatch()),
            }),
        })
    }

    /// Bind onto a query; each variant binds with its own Postgres type.
    pub fn bind_to<'q>(self, query: Query<'q, Postgres, PgArguments>) -> Query<'q, Postgres, PgArguments> {
        match self {
            PgBindValue::Text(v) => query.bind(v),
            PgBindValue::Int(v) => query.bind(v),
            PgBindValue::Numeric(v) => query.bind(v),
            PgBindValue::Bool(v) => query.bind(v),
        }
    }
}

/// Convert payload values to bind values, looking each column's kind up in `columns`.
/// `fields` and `values` are parallel; unknown fields are treated as text.
pub fn typed_params<'a>(
    fields: impl IntoIterator<Item = &'a str>,
    values: &[Value],
    columns: &[(&str, ColumnKind)],
) -> Result<Vec<PgBindValue>, AppError> {
    fields
        .into_iter()
        .zip(values)
        .map(|(field, v)| {
            let kind = columns
                .iter()
                .find(|(name, _)| *name == field)
                .map(|(_, k)| *k)
                .unwrap_or(ColumnKind::Text);
            PgBindValue::from_json(v, kind)
        })
        .collect()
}

/// Bind every value in order.
pub fn bind_all<'q>(
    mut query: Query<'q, Postgres, PgArguments>,
    params: Vec<PgBindValue>,
) -> Query<'q, Postgres, PgArguments> {
    for p in params {
        query = p.bind_to(query);
    }
    query
}
