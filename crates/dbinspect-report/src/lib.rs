//! # dbinspect-report
//!
//! Turns a module's sub-queries into report widgets.
//!
//! - [`subquery`]: sub-query descriptors and the row shapes they reduce to.
//! - [`aggregator`]: bounded parallel fan-out with a per-module deadline.
//!   Every sub-query is attempted; none can fail its siblings.
//! - [`assembler`]: error cards, "no data found" cards, tables and charts.
//! - [`store`]: moka-backed report store with TTL and capacity bounds.

pub mod aggregate;
pub mod aggregator;
pub mod assembler;
pub mod palette;
pub mod report_id;
pub mod store;
pub mod subquery;

pub use aggregate::{ModuleAggregate, SlotResult};
pub use aggregator::Aggregator;
pub use assembler::{Assembler, JsonSeriesEncoder, SeriesEncoder};
pub use report_id::generate_report_id;
pub use store::MokaReportStore;
pub use subquery::{
    CardRow, ChartLayout, Rows, SampleValue, SeriesRow, SeriesSample, SubQuery, SubQuerySet,
    TableRow,
};
