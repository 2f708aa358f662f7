//! Compiled defaults, the lowest configuration layer.

pub const DEFAULT_MAX_PARALLEL_SUBQUERIES: usize = 4;
pub const DEFAULT_MODULE_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_POOL_SIZE: usize = 4;
pub const DEFAULT_MAX_REPORTS: u64 = 256;
pub const DEFAULT_REPORT_TTL_SECS: u64 = 3_600;
pub const DEFAULT_LOG_LEVEL: &str = "info";
