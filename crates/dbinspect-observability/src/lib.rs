//! # dbinspect-observability
//!
//! Tracing setup, structured events, span macros and the sub-query
//! latency log.

pub mod query_log;
pub mod tracing_setup;

pub use query_log::{QueryLog, QueryLogEntry};
pub use tracing_setup::{events, init_tracing, init_tracing_with_filter};
