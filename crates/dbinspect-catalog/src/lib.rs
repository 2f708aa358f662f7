//! # dbinspect-catalog
//!
//! The Oracle inspection modules and the [`Inspector`] that runs them.
//!
//! Each module in [`modules`] is a fixed set of typed sub-queries. The
//! inspector fans every requested module out through the aggregator,
//! assembles its widgets into a section and stores the finished report.

pub mod access;
pub mod inspector;
pub mod module_id;
pub mod modules;
pub mod oracle;

pub use access::{AccessProblem, ViewAccess, CRITICAL_VIEWS};
pub use inspector::Inspector;
pub use module_id::ModuleId;
