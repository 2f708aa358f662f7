//! Sub-query performance log: module, sub-query, latency, row counts, failure.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// A single sub-query log entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryLogEntry {
    pub module: String,
    pub subquery: String,
    pub latency: Duration,
    pub rows: usize,
    pub skipped_rows: usize,
    pub failed: bool,
    pub timestamp_epoch_ms: i64,
}

impl QueryLogEntry {
    /// Create a new entry with the timestamp set to now.
    pub fn new(
        module: impl Into<String>,
        subquery: impl Into<String>,
        latency: Duration,
        rows: usize,
        skipped_rows: usize,
        failed: bool,
    ) -> Self {
        Self {
            module: module.into(),
            subquery: subquery.into(),
            latency,
            rows,
            skipped_rows,
            failed,
            timestamp_epoch_ms: chrono::Utc::now().timestamp_millis(),
        }
    }
}

/// Bounded query log (ring buffer behavior).
#[derive(Debug, Clone)]
pub struct QueryLog {
    entries: Vec<QueryLogEntry>,
    max_entries: usize,
}

impl QueryLog {
    pub fn new() -> Self {
        Self::with_capacity(10_000)
    }

    /// Create with a custom capacity.
    pub fn with_capacity(max_entries: usize) -> Self {
        Self {
            entries: Vec::new(),
            max_entries: max_entries.max(1),
        }
    }

    /// Record a sub-query run.
    pub fn record(&mut self, entry: QueryLogEntry) {
        tracing::debug!(
            event = "query_logged",
            module = %entry.module,
            subquery = %entry.subquery,
            latency_ms = entry.latency.as_millis() as u64,
            rows = entry.rows,
            skipped_rows = entry.skipped_rows,
            failed = entry.failed,
            "query logged"
        );

        self.entries.push(entry);
        if self.entries.len() > self.max_entries {
            self.entries.drain(..self.entries.len() - self.max_entries);
        }
    }

    /// Get all entries, oldest first.
    pub fn entries(&self) -> &[QueryLogEntry] {
        &self.entries
    }

    /// Average latency across all logged sub-queries.
    pub fn avg_latency(&self) -> Duration {
        if self.entries.is_empty() {
            return Duration::ZERO;
        }
        let total: Duration = self.entries.iter().map(|e| e.latency).sum();
        total / self.entries.len() as u32
    }

    /// Share of logged sub-queries that failed (0.0–1.0).
    pub fn failure_rate(&self) -> f64 {
        if self.entries.is_empty() {
            return 0.0;
        }
        let failed = self.entries.iter().filter(|e| e.failed).count();
        failed as f64 / self.entries.len() as f64
    }

    /// Entries of one module.
    pub fn for_module<'a>(&'a self, module: &'a str) -> impl Iterator<Item = &'a QueryLogEntry> {
        self.entries.iter().filter(move |e| e.module == module)
    }

    /// Total number of logged sub-queries.
    pub fn count(&self) -> usize {
        self.entries.len()
    }
}

impl Default for QueryLog {
    fn default() -> Self {
        Self::new()
    }
}
