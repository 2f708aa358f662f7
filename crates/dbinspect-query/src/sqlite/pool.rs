//! Pool of read connections, preferring whichever one is idle.

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, TryLockError};

use rusqlite::{Connection, OpenFlags};

use dbinspect_core::{CancellationToken, DbConnection, QueryError, ResultCursor};

use super::cursor::run_query;
use super::pragmas::apply_read_pragmas;

/// Maximum number of read connections.
const MAX_POOL_SIZE: usize = 8;

/// A pool of read-only SQLite connections.
///
/// Sub-queries running in parallel each lock one connection for the duration
/// of their statement.
pub struct SqlitePool {
    connections: Vec<Mutex<Connection>>,
    next: AtomicUsize,
}

impl SqlitePool {
    /// Open a pool of read connections to the given database path.
    pub fn open(path: &Path, pool_size: usize) -> Result<Self, QueryError> {
        let size = pool_size.clamp(1, MAX_POOL_SIZE);
        let mut connections = Vec::with_capacity(size);
        for _ in 0..size {
            let conn = Connection::open_with_flags(
                path,
                OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
            )
            .map_err(|e| QueryError::Connection {
                message: e.to_string(),
            })?;
            connections.push(conn);
        }
        Self::from_connections(connections)
    }

    /// Wrap already-open connections (e.g. an in-memory database seeded by a test).
    pub fn from_connections(connections: Vec<Connection>) -> Result<Self, QueryError> {
        if connections.is_empty() {
            return Err(QueryError::Connection {
                message: "pool needs at least one connection".to_string(),
            });
        }
        let mut pooled = Vec::with_capacity(connections.len());
        for conn in connections {
            apply_read_pragmas(&conn)?;
            pooled.push(Mutex::new(conn));
        }
        Ok(Self {
            connections: pooled,
            next: AtomicUsize::new(0),
        })
    }

    /// Execute a closure with a connection from the pool.
    ///
    /// The first idle connection is taken, scanning from a rotating start.
    /// Only when every connection is busy does the caller wait on one.
    pub fn with_conn<F, T>(&self, f: F) -> Result<T, QueryError>
    where
        F: FnOnce(&Connection) -> Result<T, QueryError>,
    {
        let guard = self.acquire()?;
        f(&guard)
    }

    fn acquire(&self) -> Result<MutexGuard<'_, Connection>, QueryError> {
        let len = self.connections.len();
        let start = self.next.fetch_add(1, Ordering::Relaxed) % len;
        for offset in 0..len {
            match self.connections[(start + offset) % len].try_lock() {
                Ok(guard) => return Ok(guard),
                Err(TryLockError::WouldBlock) => continue,
                Err(TryLockError::Poisoned(e)) => return Err(poisoned(e)),
            }
        }
        self.connections[start].lock().map_err(poisoned)
    }

    /// Number of connections in the pool.
    pub fn size(&self) -> usize {
        self.connections.len()
    }
}

fn poisoned<E: std::fmt::Display>(e: E) -> QueryError {
    QueryError::Connection {
        message: format!("pool lock poisoned: {e}"),
    }
}

impl DbConnection for SqlitePool {
    fn query(
        &self,
        sql: &str,
        cancel: &CancellationToken,
        visit: &mut dyn FnMut(&mut dyn ResultCursor) -> Result<(), QueryError>,
    ) -> Result<(), QueryError> {
        self.with_conn(|conn| run_query(conn, sql, cancel, visit))
    }
}
