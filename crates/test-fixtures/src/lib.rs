//! Scripted database fixtures shared by tests across the workspace.
//!
//! [`ScriptedConnection`] maps exact SQL text to a canned result: rows,
//! per-row scan failures, a failure to start, a failure to read the column
//! list, a cursor failure after some rows, or an artificial delay.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use chrono::{NaiveDate, NaiveDateTime};
use dbinspect_core::{
    Cancellable, CancellationToken, Cell, DbConnection, QueryError, ResultCursor, RowFetch,
};

/// Oracle's message for a missing table or view.
pub const ORA_00942: &str = "ORA-00942: table or view does not exist";

/// Oracle's message for a missing privilege.
pub const ORA_01031: &str = "ORA-01031: insufficient privileges";

#[derive(Debug, Clone)]
enum ScriptedRow {
    Cells(Vec<Cell>),
    ScanFailure(String),
}

/// Canned result of one SQL statement.
#[derive(Debug, Clone, Default)]
pub struct ScriptedResult {
    columns: Vec<String>,
    rows: Vec<ScriptedRow>,
    start_error: Option<QueryError>,
    columns_error: Option<QueryError>,
    cursor_error: Option<QueryError>,
    delay: Duration,
}

impl ScriptedResult {
    pub fn rows(columns: &[&str], rows: Vec<Vec<Cell>>) -> Self {
        Self {
            columns: columns.iter().map(|c| c.to_string()).collect(),
            rows: rows.into_iter().map(ScriptedRow::Cells).collect(),
            ..Default::default()
        }
    }

    pub fn empty(columns: &[&str]) -> Self {
        Self::rows(columns, Vec::new())
    }

    /// The statement fails before producing a cursor.
    pub fn error(error: QueryError) -> Self {
        Self {
            start_error: Some(error),
            ..Default::default()
        }
    }

    /// The cursor starts but its column list cannot be read.
    pub fn column_error(error: QueryError) -> Self {
        Self {
            columns_error: Some(error),
            ..Default::default()
        }
    }

    /// Replace row `index` with a scan failure.
    pub fn with_scan_failure(mut self, index: usize, message: &str) -> Self {
        if let Some(row) = self.rows.get_mut(index) {
            *row = ScriptedRow::ScanFailure(message.to_string());
        }
        self
    }

    /// Fail the cursor after all scripted rows were read.
    pub fn then_fail(mut self, error: QueryError) -> Self {
        self.cursor_error = Some(error);
        self
    }

    /// Block for `delay` before the cursor starts. Cancellation cuts it short.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

struct ScriptedCursor<'a> {
    script: &'a ScriptedResult,
    next: usize,
    cancel: &'a CancellationToken,
}

impl ResultCursor for ScriptedCursor<'_> {
    fn column_names(&mut self) -> Result<Vec<String>, QueryError> {
        match &self.script.columns_error {
            Some(err) => Err(err.clone()),
            None => Ok(self.script.columns.clone()),
        }
    }

    fn fetch(&mut self) -> Result<RowFetch, QueryError> {
        if self.cancel.is_cancelled() {
            return Err(QueryError::Cancelled);
        }
        let Some(row) = self.script.rows.get(self.next) else {
            return match &self.script.cursor_error {
                Some(err) => Err(err.clone()),
                None => Ok(RowFetch::Done),
            };
        };
        self.next += 1;
        Ok(match row {
            ScriptedRow::Cells(cells) => RowFetch::Row(cells.clone()),
            ScriptedRow::ScanFailure(message) => RowFetch::Failed(message.clone()),
        })
    }
}

/// In-memory [`DbConnection`] answering from scripts.
#[derive(Default)]
pub struct ScriptedConnection {
    scripts: HashMap<String, ScriptedResult>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedConnection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `sql` with `result`.
    pub fn on(mut self, sql: &str, result: ScriptedResult) -> Self {
        self.scripts.insert(sql.to_string(), result);
        self
    }

    /// Every statement received, in arrival order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    pub fn call_count(&self, sql: &str) -> usize {
        self.calls().iter().filter(|c| c.as_str() == sql).count()
    }

    fn wait(delay: Duration, cancel: &CancellationToken) -> Result<(), QueryError> {
        let deadline = Instant::now() + delay;
        while Instant::now() < deadline {
            if cancel.is_cancelled() {
                return Err(QueryError::Cancelled);
            }
            std::thread::sleep(Duration::from_millis(5));
        }
        Ok(())
    }
}

impl DbConnection for ScriptedConnection {
    fn query(
        &self,
        sql: &str,
        cancel: &CancellationToken,
        visit: &mut dyn FnMut(&mut dyn ResultCursor) -> Result<(), QueryError>,
    ) -> Result<(), QueryError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(sql.to_string());
        }
        let script = self.scripts.get(sql).ok_or_else(|| QueryError::Prepare {
            message: format!("{ORA_00942} (no script for `{sql}`)"),
        })?;
        Self::wait(script.delay, cancel)?;
        if let Some(err) = &script.start_error {
            return Err(err.clone());
        }
        let mut cursor = ScriptedCursor {
            script,
            next: 0,
            cancel,
        };
        visit(&mut cursor)
    }
}

/// Text cell.
pub fn text(s: &str) -> Cell {
    Cell::Text(s.to_string())
}

/// Integer cell.
pub fn int(i: i64) -> Cell {
    Cell::Integer(i)
}

/// Real cell.
pub fn real(r: f64) -> Cell {
    Cell::Real(r)
}

/// Timestamp cell at `2024-01-01 hh:mm:00`.
pub fn at(hour: u32, minute: u32) -> Cell {
    Cell::Timestamp(ts(hour, minute))
}

/// `2024-01-01 hh:mm:00`.
pub fn ts(hour: u32, minute: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 1, 1)
        .and_then(|d| d.and_hms_opt(hour, minute, 0))
        .unwrap_or_default()
}
