//! Request body validation against declarative per-request schemas.

use crate::error::AppError;
use bigdecimal::BigDecimal;
use regex::Regex;
use serde_json::{Map, Value};
use std::str::FromStr;
use std::sync::LazyLock;

static DECIMAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^-?([0-9]+(\.[0-9]+)?|\.[0-9]+)$").expect("decimal regex"));
static EMAIL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email regex"));
static URI: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9+.-]*://\S+$").expect("uri regex"));

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldKind {
    String,
    Integer,
    Boolean,
    /// Decimal given as a JSON number or a numeric string (e.g. "0.05").
    Decimal,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Format {
    Email,
    Uri,
    /// No upper-case letters (company handles).
    Lowercase,
}

#[derive(Clone, Copy, Debug)]
pub struct FieldRule {
    pub kind: FieldKind,
    pub required: bool,
    pub nullable: bool,
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
    pub minimum: Option<f64>,
    pub maximum: Option<f64>,
    pub format: Option<Format>,
}

impl FieldRule {
    pub const fn of(kind: FieldKind) -> Self {
        FieldRule {
            kind,
            required: false,
            nullable: false,
            min_length: None,
            max_length: None,
            minimum: None,
            maximum: None,
            format: None,
        }
    }

    pub const fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub const fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    pub const fn length(mut self, min: usize, max: usize) -> Self {
        self.min_length = Some(min);
        self.max_length = Some(max);
        self
    }

    pub const fn min_length(mut self, min: usize) -> Self {
        self.min_length = Some(min);
        self
    }

    pub const fn range(mut self, min: Option<f64>, max: Option<f64>) -> Self {
        self.minimum = min;
        self.maximum = max;
        self
    }

    pub const fn format(mut self, f: Format) -> Self {
        self.format = Some(f);
        self
    }
}

/// Allowed fields of one request body; anything else is rejected.
pub struct Schema {
    pub fields: &'static [(&'static str, FieldRule)],
}

pub struct RequestValidator;

impl RequestValidator {
    /// Validate `body` and hand back its fields in the order the client sent them.
    /// Every violation is reported, not just the first.
    pub fn validate(body: Value, schema: &Schema) -> Result<Map<String, Value>, AppError> {
        let obj = match body {
            Value::Object(m) => m,
            _ => return Err(AppError::BadRequest("body must be a JSON object".into())),
        };
        let mut errors = Vec::new();
        for key in obj.keys() {
            if !schema.fields.iter().any(|(name, _)| name == key) {
                errors.push(format!("{} is not an allowed field", key));
            }
        }
        for (name, rule) in schema.fields {
            match obj.get(*name) {
                None if rule.required => errors.push(format!("{} is required", name)),
                None => {}
                Some(v) => {
                    if let Err(msg) = check_field(name, v, rule) {
                        errors.push(msg);
                    }
                }
            }
        }
        if errors.is_empty() {
            Ok(obj)
        } else {
            Err(AppError::Validation(errors))
        }
    }
}

fn check_field(col: &str, v: &Value, rule: &FieldRule) -> Result<(), String> {
    if v.is_null() {
        return if rule.nullable {
            Ok(())
        } else {
            Err(format!("{} must not be null", col))
        };
    }
    match rule.kind {
        FieldKind::String => {
            let s = v.as_str().ok_or_else(|| format!("{} must be a string", col))?;
            let len = s.chars().count();
            if let Some(min) = rule.min_length {
                if len < min {
                    return Err(format!("{} must be at least {} characters", col, min));
                }
            }
            if let Some(max) = rule.max_length {
                if len > max {
                    return Err(format!("{} must be at most {} characters", col, max));
                }
            }
            if let Some(format) = rule.format {
                check_format(col, s, format)?;
            }
            Ok(())
        }
        FieldKind::Integer => {
            let n = v.as_i64().ok_or_else(|| format!("{} must be an integer", col))?;
            check_range(col, &(n as f64), rule, Some)
        }
        FieldKind::Boolean => {
            v.as_bool().ok_or_else(|| format!("{} must be a boolean", col))?;
            Ok(())
        }
        FieldKind::Decimal => {
            let d = match v {
                Value::Number(n) => BigDecimal::from_str(&n.to_string()).ok(),
                Value::String(s) if DECIMAL.is_match(s) => BigDecimal::from_str(s).ok(),
                _ => None,
            }
            .ok_or_else(|| format!("{} must be a decimal number", col))?;
            // Compared exactly; the column is NUMERIC.
            check_range(col, &d, rule, |b| BigDecimal::from_str(&b.to_string()).ok())
        }
    }
}

fn check_range<T: PartialOrd>(col: &str, n: &T, rule: &FieldRule, bound: impl Fn(f64) -> Option<T>) -> Result<(), String> {
    if let Some(min) = rule.minimum {
        if bound(min).is_some_and(|b| *n < b) {
            return Err(format!("{} must be at least {}", col, min));
        }
    }
    if let Some(max) = rule.maximum {
        if bound(max).is_some_and(|b| *n > b) {
            return Err(format!("{} must be at most {}", col, max));
        }
    }
    Ok(())
}

fn check_format(col: &str, s: &str, format: Format) -> Result<(), String> {
    match format {
        Format::Email => {
            if !EMAIL.is_match(s) {
                return Err(format!("{} must be a valid email", col));
            }
        }
        Format::Uri => {
            if !URI.is_match(s) {
                return Err(format!("{} must be a valid URI", col));
            }
        }
        Format::Lowercase => {
            if s.chars().any(char::is_uppercase) {
                return Err(format!("{} must be lower case", col));
            }
        }
    }
    Ok(())
}
