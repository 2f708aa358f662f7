//! moka-backed report store.

use std::sync::Arc;
use std::time::Duration;

use dbinspect_core::config::StoreConfig;
use dbinspect_core::models::Report;
use dbinspect_core::ReportStore;
use dbinspect_observability::events;
use moka::notification::RemovalCause;
use moka::sync::Cache;

/// Report store bounded by entry count, with a time-to-live per report.
///
/// Writers insert fully assembled reports; readers share them as `Arc`s.
#[derive(Clone)]
pub struct MokaReportStore {
    cache: Cache<String, Arc<Report>>,
}

impl MokaReportStore {
    pub fn new(max_reports: u64, ttl: Duration) -> Self {
        let cache = Cache::builder()
            .max_capacity(max_reports)
            .time_to_live(ttl)
            .eviction_listener(|id: Arc<String>, _report, cause: RemovalCause| {
                events::report_evicted(&id, &format!("{cause:?}").to_lowercase());
            })
            .build();
        Self { cache }
    }

    pub fn from_config(config: &StoreConfig) -> Self {
        Self::new(config.max_reports, config.ttl())
    }

    /// Apply pending evictions so `len` is exact.
    pub fn run_pending_tasks(&self) {
        self.cache.run_pending_tasks();
    }
}

impl ReportStore for MokaReportStore {
    fn put(&self, report: Report) -> Arc<Report> {
        let report = Arc::new(report);
        self.cache.insert(report.id.clone(), Arc::clone(&report));
        report
    }

    fn get(&self, id: &str) -> Option<Arc<Report>> {
        self.cache.get(id)
    }

    fn evict(&self, id: &str) -> bool {
        self.cache.remove(id).is_some()
    }

    fn len(&self) -> u64 {
        self.cache.entry_count()
    }
}
