//! PRAGMA configuration applied to every pooled connection.

use rusqlite::Connection;

use dbinspect_core::QueryError;

/// Make the connection read-only and wait up to 5s on locks.
pub fn apply_read_pragmas(conn: &Connection) -> Result<(), QueryError> {
    conn.execute_batch(
        "
        PRAGMA query_only = ON;
        PRAGMA busy_timeout = 5000;
        ",
    )
    .map_err(|e| QueryError::Connection {
        message: e.to_string(),
    })
}

/// Whether `query_only` is active on a connection.
pub fn verify_query_only(conn: &Connection) -> Result<bool, QueryError> {
    conn.pragma_query_value(None, "query_only", |row| row.get::<_, i64>(0))
        .map(|v| v == 1)
        .map_err(|e| QueryError::Connection {
            message: e.to_string(),
        })
}
