use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::defaults;

/// How a module reacts to the failure of its lead sub-query.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Every sub-query runs regardless of its siblings.
    #[default]
    Isolate,
    /// Modules that declare a lead sub-query skip the rest when the lead fails.
    AbortOnLeadFailure,
}

/// Sub-query execution configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExecutionConfig {
    /// Upper bound on sub-queries of one module running at the same time.
    pub max_parallel_subqueries: usize,
    /// Deadline for one module, covering all of its sub-queries.
    pub module_timeout_secs: u64,
    /// Number of pooled database connections.
    pub pool_size: usize,
    pub failure_policy: FailurePolicy,
    /// Keep rows accumulated before a cursor-level failure.
    pub retain_partial_rows: bool,
}

impl ExecutionConfig {
    pub fn module_timeout(&self) -> Duration {
        Duration::from_secs(self.module_timeout_secs)
    }
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self {
            max_parallel_subqueries: defaults::DEFAULT_MAX_PARALLEL_SUBQUERIES,
            module_timeout_secs: defaults::DEFAULT_MODULE_TIMEOUT_SECS,
            pool_size: defaults::DEFAULT_POOL_SIZE,
            failure_policy: FailurePolicy::Isolate,
            retain_partial_rows: false,
        }
    }
}
