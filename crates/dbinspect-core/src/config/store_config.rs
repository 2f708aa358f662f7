use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::defaults;

/// Report store configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Maximum number of reports held at once.
    pub max_reports: u64,
    /// Time a stored report stays readable.
    pub ttl_secs: u64,
}

impl StoreConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            max_reports: defaults::DEFAULT_MAX_REPORTS,
            ttl_secs: defaults::DEFAULT_REPORT_TTL_SECS,
        }
    }
}
