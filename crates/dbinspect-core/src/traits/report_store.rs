use std::sync::Arc;

use crate::models::Report;

/// Storage of assembled reports, addressed by report ID.
///
/// Reports are immutable once stored. Implementations bound their size and
/// expire old entries.
pub trait ReportStore: Send + Sync {
    /// Store a fully built report under its own `id`.
    fn put(&self, report: Report) -> Arc<Report>;

    fn get(&self, id: &str) -> Option<Arc<Report>>;

    /// Remove a report. Returns whether it was present.
    fn evict(&self, id: &str) -> bool;

    /// Number of stored reports. May lag behind recent writes.
    fn len(&self) -> u64;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
