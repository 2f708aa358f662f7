//! Statement execution and row reading with cancellation support.

use rusqlite::types::ValueRef;
use rusqlite::{Connection, Rows};

use dbinspect_core::{Cancellable, CancellationToken, Cell, QueryError, ResultCursor, RowFetch};

/// SQLite VM instructions between two cancellation checks.
const PROGRESS_INTERVAL: i32 = 1_000;

/// Installs a progress handler that interrupts the running statement once the
/// token is cancelled. Removed on drop.
struct InterruptGuard<'c> {
    conn: &'c Connection,
}

impl<'c> InterruptGuard<'c> {
    fn install(conn: &'c Connection, cancel: &CancellationToken) -> Self {
        let token = cancel.clone();
        conn.progress_handler(PROGRESS_INTERVAL, Some(move || token.is_cancelled()));
        Self { conn }
    }
}

impl Drop for InterruptGuard<'_> {
    fn drop(&mut self) {
        self.conn.progress_handler(0, None::<fn() -> bool>);
    }
}

fn classify(
    err: rusqlite::Error,
    cancel: &CancellationToken,
    wrap: fn(String) -> QueryError,
) -> QueryError {
    if cancel.is_cancelled() {
        QueryError::Cancelled
    } else {
        wrap(err.to_string())
    }
}

fn prepare_error(message: String) -> QueryError {
    QueryError::Prepare { message }
}

fn cursor_error(message: String) -> QueryError {
    QueryError::Cursor { message }
}

fn cell_from_value(value: ValueRef<'_>) -> Cell {
    match value {
        ValueRef::Null => Cell::Null,
        ValueRef::Integer(i) => Cell::Integer(i),
        ValueRef::Real(r) => Cell::Real(r),
        ValueRef::Text(bytes) => match std::str::from_utf8(bytes) {
            Ok(text) => Cell::Text(text.to_owned()),
            Err(_) => Cell::Bytes(bytes.to_vec()),
        },
        ValueRef::Blob(bytes) => Cell::Bytes(bytes.to_vec()),
    }
}

struct SqliteCursor<'s> {
    rows: Rows<'s>,
    columns: Vec<String>,
    cancel: CancellationToken,
}

impl ResultCursor for SqliteCursor<'_> {
    fn column_names(&mut self) -> Result<Vec<String>, QueryError> {
        Ok(self.columns.clone())
    }

    fn fetch(&mut self) -> Result<RowFetch, QueryError> {
        let width = self.columns.len();
        let row = match self.rows.next() {
            Ok(Some(row)) => row,
            Ok(None) => return Ok(RowFetch::Done),
            Err(e) => return Err(classify(e, &self.cancel, cursor_error)),
        };

        let mut cells = Vec::with_capacity(width);
        for idx in 0..width {
            match row.get_ref(idx) {
                Ok(value) => cells.push(cell_from_value(value)),
                Err(e) => return Ok(RowFetch::Failed(e.to_string())),
            }
        }
        Ok(RowFetch::Row(cells))
    }
}

/// Prepare `sql`, start it, and hand the cursor to `visit`.
pub(super) fn run_query(
    conn: &Connection,
    sql: &str,
    cancel: &CancellationToken,
    visit: &mut dyn FnMut(&mut dyn ResultCursor) -> Result<(), QueryError>,
) -> Result<(), QueryError> {
    let _guard = InterruptGuard::install(conn, cancel);
    let mut stmt = conn
        .prepare(sql)
        .map_err(|e| classify(e, cancel, prepare_error))?;
    let columns: Vec<String> = stmt
        .column_names()
        .into_iter()
        .map(String::from)
        .collect();
    let rows = stmt
        .query([])
        .map_err(|e| classify(e, cancel, prepare_error))?;

    let mut cursor = SqliteCursor {
        rows,
        columns,
        cancel: cancel.clone(),
    };
    visit(&mut cursor)
}
