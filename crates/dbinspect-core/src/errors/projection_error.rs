/// Row-level errors raised while projecting one row onto a record.
/// A projection error skips the row; it never fails the sub-query.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ProjectionError {
    #[error("row has {found} cells but the cursor reported {expected} columns")]
    Arity { expected: usize, found: usize },

    #[error("column {column} -> field {field}: cannot convert {found} into {expected}")]
    Conversion {
        column: String,
        field: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("column {column} -> field {field}: null into non-nullable field")]
    NullIntoRequired { column: String, field: String },

    #[error("column {column} -> field {field}: bytes are not valid UTF-8")]
    Undecodable { column: String, field: String },
}
