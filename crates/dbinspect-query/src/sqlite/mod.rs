//! rusqlite adapter: a pooled [`DbConnection`](dbinspect_core::DbConnection).

mod cursor;
pub mod pool;
pub mod pragmas;

pub use pool::SqlitePool;
