//! Typed query execution: cursor to records, with fallback and union parts.

use dbinspect_core::{
    Cancellable, CancellationToken, DbConnection, QueryError, QuerySpec, ResultCursor, RowFetch,
    SubQueryResult,
};
use dbinspect_observability::events;

use crate::projector::ColumnPlan;
use crate::record::Record;

/// Runs queries against one connection and projects rows onto records.
pub struct QueryExecutor<'c> {
    conn: &'c dyn DbConnection,
    cancel: CancellationToken,
    retain_partial_rows: bool,
}

impl<'c> QueryExecutor<'c> {
    pub fn new(conn: &'c dyn DbConnection) -> Self {
        Self {
            conn,
            cancel: CancellationToken::new(),
            retain_partial_rows: false,
        }
    }

    /// Token checked before every row and handed to the driver.
    pub fn with_cancel(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Keep rows read before a cursor-level failure instead of discarding them.
    /// Callers must still check `error` before trusting `value`.
    pub fn retain_partial_rows(mut self, retain: bool) -> Self {
        self.retain_partial_rows = retain;
        self
    }

    /// Execute a sub-query.
    ///
    /// The primary query runs first. Its fallback runs at most once, only if
    /// the primary failed for a reason other than cancellation. Union parts
    /// then run in order and their rows are appended.
    pub fn execute<R: Record>(&self, spec: &QuerySpec) -> SubQueryResult<R> {
        let primary = self.execute_with_fallback::<R>(&spec.sql, spec.fallback.as_deref());
        if spec.union_parts.is_empty() {
            return primary;
        }

        let mut parts = Vec::with_capacity(spec.union_parts.len() + 1);
        parts.push((spec.sql.as_str(), primary));
        for sql in &spec.union_parts {
            parts.push((sql.as_str(), self.run::<R>(sql)));
        }
        merge_union_parts(parts)
    }

    fn execute_with_fallback<R: Record>(
        &self,
        sql: &str,
        fallback: Option<&str>,
    ) -> SubQueryResult<R> {
        let mut primary = self.run::<R>(sql);
        let Some(fallback_sql) = fallback else {
            return primary;
        };
        let primary_error = match primary.error.take() {
            Some(err) if !err.is_interruption() => err,
            other => {
                primary.error = other;
                return primary;
            }
        };

        events::fallback_attempted(sql, &primary_error.to_string());
        let mut secondary = self.run::<R>(fallback_sql);
        secondary.used_fallback = true;
        if let Some(fallback_error) = secondary.error.take() {
            secondary.error = Some(QueryError::FallbackExhausted {
                primary: Box::new(primary_error),
                fallback: Box::new(fallback_error),
            });
        }
        secondary
    }

    /// Run one statement to exhaustion.
    fn run<R: Record>(&self, sql: &str) -> SubQueryResult<R> {
        if self.cancel.is_cancelled() {
            return SubQueryResult::failed(QueryError::Cancelled);
        }

        let mut records: Vec<R> = Vec::new();
        let mut skipped = 0usize;
        let outcome = self.conn.query(
            sql,
            &self.cancel,
            &mut |cursor: &mut dyn ResultCursor| -> Result<(), QueryError> {
                let columns = cursor.column_names()?;
                let plan = ColumnPlan::<R>::build(&columns);
                let mut row_index = 0usize;
                loop {
                    if self.cancel.is_cancelled() {
                        return Err(QueryError::Cancelled);
                    }
                    match cursor.fetch()? {
                        RowFetch::Done => return Ok(()),
                        RowFetch::Row(cells) => match plan.project(cells) {
                            Ok(record) => records.push(record),
                            Err(err) => {
                                skipped += 1;
                                events::row_skipped(sql, row_index, &err.to_string());
                            }
                        },
                        RowFetch::Failed(message) => {
                            skipped += 1;
                            events::row_skipped(sql, row_index, &message);
                        }
                    }
                    row_index += 1;
                }
            },
        );

        match outcome {
            Ok(()) => SubQueryResult {
                value: records,
                error: None,
                skipped_rows: skipped,
                used_fallback: false,
            },
            Err(error) => {
                if !self.retain_partial_rows {
                    records.clear();
                }
                SubQueryResult {
                    value: records,
                    error: Some(error),
                    skipped_rows: skipped,
                    used_fallback: false,
                }
            }
        }
    }
}

/// Concatenate union parts. The result fails only when every part failed,
/// and then carries all of their errors.
fn merge_union_parts<R>(parts: Vec<(&str, SubQueryResult<R>)>) -> SubQueryResult<R> {
    let mut merged = SubQueryResult::ok(Vec::new());
    let mut errors = Vec::new();
    let mut succeeded = 0usize;

    for (sql, part) in parts {
        merged.skipped_rows += part.skipped_rows;
        merged.used_fallback |= part.used_fallback;
        match part.error {
            None => {
                succeeded += 1;
                merged.value.extend(part.value);
            }
            Some(err) => {
                events::union_part_failed(sql, &err.to_string());
                errors.push(err);
            }
        }
    }

    if succeeded == 0 && !errors.is_empty() {
        merged.error = Some(QueryError::UnionExhausted { errors });
    }
    merged
}
