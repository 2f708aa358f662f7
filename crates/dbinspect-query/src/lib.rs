//! # dbinspect-query
//!
//! Maps query result sets onto statically typed records and drives cursors
//! to completion.
//!
//! - [`record!`] declares a record type together with its column mapping.
//! - [`ColumnPlan`] resolves columns to fields once per cursor.
//! - [`QueryExecutor`] runs a [`QuerySpec`](dbinspect_core::QuerySpec), with
//!   fallback and union parts, skipping rows that fail projection.
//! - [`sqlite::SqlitePool`] adapts rusqlite to [`DbConnection`](dbinspect_core::DbConnection).

pub mod convert;
pub mod executor;
pub mod projector;
pub mod record;
pub mod sqlite;

pub use convert::{ConvertError, FromCell};
pub use dbinspect_core::Cell;
pub use executor::QueryExecutor;
pub use projector::ColumnPlan;
pub use record::{FieldBinding, Record, Setter};
