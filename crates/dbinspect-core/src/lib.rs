//! # dbinspect-core
//!
//! Foundation crate for the dbinspect report engine.
//! Defines cells, errors, config, cancellation, report models and the
//! traits that connect the query layer to the report layer.
//! Every other crate in the workspace depends on this.

pub mod cancellation;
pub mod cell;
pub mod config;
pub mod constants;
pub mod errors;
pub mod models;
pub mod traits;

// Re-export the most commonly used types at the crate root.
pub use cancellation::{Cancellable, CancellationToken};
pub use cell::Cell;
pub use config::InspectConfig;
pub use errors::{InspectError, InspectResult, ProjectionError, QueryError};
pub use models::{QuerySpec, Report, Section, SubQueryResult, Widget, WidgetKind};
pub use traits::{DbConnection, ReportStore, ResultCursor, RowFetch};
