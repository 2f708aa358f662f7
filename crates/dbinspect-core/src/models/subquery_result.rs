use crate::errors::QueryError;

/// Outcome of one sub-query.
///
/// `value` is always initialized, empty on error, so callers check `error`
/// once and never null-check `value`.
#[derive(Debug, Clone, PartialEq)]
pub struct SubQueryResult<R> {
    pub value: Vec<R>,
    pub error: Option<QueryError>,
    /// Rows dropped because they failed projection.
    pub skipped_rows: usize,
    /// Whether `value` came from the fallback query.
    pub used_fallback: bool,
}

impl<R> SubQueryResult<R> {
    pub fn ok(value: Vec<R>) -> Self {
        Self {
            value,
            error: None,
            skipped_rows: 0,
            used_fallback: false,
        }
    }

    pub fn failed(error: QueryError) -> Self {
        Self {
            value: Vec::new(),
            error: Some(error),
            skipped_rows: 0,
            used_fallback: false,
        }
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

impl<R> Default for SubQueryResult<R> {
    fn default() -> Self {
        Self::ok(Vec::new())
    }
}
