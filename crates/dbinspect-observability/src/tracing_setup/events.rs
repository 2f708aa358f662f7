//! Structured log events for key pipeline operations.
//!
//! Each function emits a `tracing` event with structured fields.

/// Log a row dropped by projection.
pub fn row_skipped(sql: &str, row_index: usize, reason: &str) {
    tracing::warn!(
        event = "row_skipped",
        sql = %sql,
        row_index = row_index,
        reason = %reason,
        "row skipped"
    );
}

/// Log a column that matched a field with no setter.
pub fn readonly_column_discarded(column: &str, field: &str) {
    tracing::warn!(
        event = "readonly_column_discarded",
        column = %column,
        field = %field,
        "column matched a non-writable field and was discarded"
    );
}

/// Log a primary query failure that triggers the fallback query.
pub fn fallback_attempted(sql: &str, primary_error: &str) {
    tracing::info!(
        event = "fallback_attempted",
        sql = %sql,
        primary_error = %primary_error,
        "primary query failed, trying fallback"
    );
}

/// Log one failed part of a union sub-query.
pub fn union_part_failed(sql: &str, error: &str) {
    tracing::warn!(
        event = "union_part_failed",
        sql = %sql,
        error = %error,
        "union part failed"
    );
}

/// Log a sub-query failure.
pub fn subquery_failed(module: &str, subquery: &str, error: &str) {
    tracing::warn!(
        event = "subquery_failed",
        module = %module,
        subquery = %subquery,
        error = %error,
        "sub-query failed"
    );
}

/// Log a sub-query completion.
pub fn subquery_completed(module: &str, subquery: &str, rows: usize, skipped: usize, latency_ms: u64) {
    tracing::debug!(
        event = "subquery_completed",
        module = %module,
        subquery = %subquery,
        rows = rows,
        skipped = skipped,
        latency_ms = latency_ms,
        "sub-query completed"
    );
}

/// Log a module that hit its deadline.
pub fn module_timed_out(module: &str, pending: usize, timeout_ms: u64) {
    tracing::warn!(
        event = "module_timed_out",
        module = %module,
        pending = pending,
        timeout_ms = timeout_ms,
        "module timed out, pending sub-queries cancelled"
    );
}

/// Log a module whose lead sub-query failed under the abort-on-lead policy.
pub fn module_aborted(module: &str, lead: &str, error: &str) {
    tracing::warn!(
        event = "module_aborted",
        module = %module,
        lead = %lead,
        error = %error,
        "lead sub-query failed, remaining sub-queries skipped"
    );
}

/// Log a module completion.
pub fn module_completed(module: &str, subqueries: usize, failed: usize, latency_ms: u64) {
    tracing::info!(
        event = "module_completed",
        module = %module,
        subqueries = subqueries,
        failed = failed,
        latency_ms = latency_ms,
        "module completed"
    );
}

/// Log a chart series dropped because it could not be serialized.
pub fn series_dropped(chart_id: &str, series: &str, error: &str) {
    tracing::warn!(
        event = "series_dropped",
        chart_id = %chart_id,
        series = %series,
        error = %error,
        "chart series dropped"
    );
}

/// Log a stored report.
pub fn report_stored(report_id: &str, sections: usize, failed_sections: usize) {
    tracing::info!(
        event = "report_stored",
        report_id = %report_id,
        sections = sections,
        failed_sections = failed_sections,
        "report stored"
    );
}

/// Log a report removed from the store.
pub fn report_evicted(report_id: &str, cause: &str) {
    tracing::debug!(
        event = "report_evicted",
        report_id = %report_id,
        cause = %cause,
        "report evicted"
    );
}
