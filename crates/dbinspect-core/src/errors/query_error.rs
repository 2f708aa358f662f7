/// Sub-query level errors.
///
/// Everything that stops a query from producing a cursor, or breaks the
/// cursor mid-flight, ends up here. Row-level failures never do: those are
/// [`ProjectionError`](super::ProjectionError)s and only skip the row.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum QueryError {
    #[error("failed to prepare query: {message}")]
    Prepare { message: String },

    #[error("failed to read column list: {message}")]
    Columns { message: String },

    #[error("cursor failed: {message}")]
    Cursor { message: String },

    #[error("connection unavailable: {message}")]
    Connection { message: String },

    #[error("query cancelled")]
    Cancelled,

    #[error("module timed out after {elapsed_ms}ms")]
    TimedOut { elapsed_ms: u64 },

    #[error("not attempted: {reason}")]
    Skipped { reason: String },

    #[error("sub-query task aborted: {message}")]
    Aborted { message: String },

    /// Both the primary query and its fallback failed. Both errors are kept.
    #[error("{primary}; fallback also failed: {fallback}")]
    FallbackExhausted {
        primary: Box<QueryError>,
        fallback: Box<QueryError>,
    },

    /// Every part of a union sub-query failed. Errors are in part order.
    #[error("every union part failed: {}", join_errors(.errors))]
    UnionExhausted { errors: Vec<QueryError> },
}

fn join_errors(errors: &[QueryError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl QueryError {
    /// Wrap a driver message produced while preparing or starting a statement.
    pub fn prepare(message: impl Into<String>) -> Self {
        Self::Prepare {
            message: message.into(),
        }
    }

    /// Wrap a driver message produced while iterating a cursor.
    pub fn cursor(message: impl Into<String>) -> Self {
        Self::Cursor {
            message: message.into(),
        }
    }

    /// Whether the error came from cancellation or a deadline rather than the database.
    pub fn is_interruption(&self) -> bool {
        matches!(self, Self::Cancelled | Self::TimedOut { .. })
    }
}
