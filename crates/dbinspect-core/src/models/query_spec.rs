use serde::{Deserialize, Serialize};

/// Query text of one sub-query.
///
/// `fallback` runs once, only when `sql` fails. `union_parts` run after the
/// primary query; their rows are appended in order and the sub-query fails
/// only when every part fails.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuerySpec {
    pub sql: String,
    pub fallback: Option<String>,
    pub union_parts: Vec<String>,
}

impl QuerySpec {
    pub fn new(sql: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            fallback: None,
            union_parts: Vec::new(),
        }
    }

    pub fn with_fallback(mut self, sql: impl Into<String>) -> Self {
        self.fallback = Some(sql.into());
        self
    }

    pub fn with_union_part(mut self, sql: impl Into<String>) -> Self {
        self.union_parts.push(sql.into());
        self
    }
}

impl From<&str> for QuerySpec {
    fn from(sql: &str) -> Self {
        Self::new(sql)
    }
}
