//! WHERE clauses for filtered list queries. Conditions are ANDed, values bound positionally.

use super::params::PgBindValue;

#[derive(Debug, Default)]
pub struct WhereBuf {
    parts: Vec<String>,
    pub params: Vec<PgBindValue>,
}

impl WhereBuf {
    pub fn new() -> Self {
        Self::default()
    }

    fn push_param(&mut self, v: PgBindValue) -> usize {
        self.params.push(v);
        self.params.len()
    }

    /// `<expr> <op> $n`
    pub fn compare(&mut self, expr: &str, op: &str, v: PgBindValue) -> &mut Self {
        let n = self.push_param(v);
        self.parts.push(format!("{} {} ${}", expr, op, n));
        self
    }

    /// Case-insensitive substring match.
    pub fn ilike_contains(&mut self, expr: &str, needle: &str) -> &mut Self {
        let pattern = format!("%{}%", escape_like(needle));
        self.compare(expr, "ILIKE", PgBindValue::Text(Some(pattern)))
    }

    /// Condition without a parameter.
    pub fn raw(&mut self, cond: &str) -> &mut Self {
        self.parts.push(cond.to_string());
        self
    }

    /// ` WHERE a AND b`, or empty when no conditions were added.
    pub fn sql(&self) -> String {
        if self.parts.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", self.parts.join(" AND "))
        }
    }
}

fn escape_like(s: &str) -> String {
    s.replace('\\', "\\\\").replace('%', "\\%").replace('_', "\\_")
}
