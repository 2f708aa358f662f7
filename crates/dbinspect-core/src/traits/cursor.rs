use crate::cell::Cell;
use crate::errors::QueryError;

/// One step of a cursor.
#[derive(Debug, Clone, PartialEq)]
pub enum RowFetch {
    /// One cell per column, in column order.
    Row(Vec<Cell>),
    /// The driver could not scan this row. The cursor remains usable.
    Failed(String),
    /// The cursor is exhausted.
    Done,
}

/// Iterator over the rows of one running query.
///
/// An `Err` from either method is cursor-level and ends the query.
pub trait ResultCursor {
    /// Column names as reported by the engine, in column order.
    fn column_names(&mut self) -> Result<Vec<String>, QueryError>;

    /// Advance to the next row.
    fn fetch(&mut self) -> Result<RowFetch, QueryError>;
}
