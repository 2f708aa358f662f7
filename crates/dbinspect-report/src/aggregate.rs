//! Module aggregate: one result slot per sub-query, always fully populated.

use std::time::Duration;

use dbinspect_core::{QueryError, WidgetKind};

use crate::subquery::{ChartLayout, Rows, ShapedResult, SubQuery};

/// Outcome of one sub-query inside a module.
///
/// `rows` is always present, empty when `error` is set.
#[derive(Debug, Clone, PartialEq)]
pub struct SlotResult {
    pub name: String,
    pub title: String,
    pub kind: WidgetKind,
    pub layout: ChartLayout,
    pub unit: Option<String>,
    pub rows: Rows,
    pub error: Option<QueryError>,
    pub skipped_rows: usize,
    pub used_fallback: bool,
    pub elapsed: Duration,
}

impl SlotResult {
    pub(crate) fn from_shaped(subquery: &SubQuery, shaped: ShapedResult, elapsed: Duration) -> Self {
        Self {
            name: subquery.name.clone(),
            title: subquery.title.clone(),
            kind: subquery.kind,
            layout: subquery.layout,
            unit: subquery.unit.clone(),
            rows: shaped.rows,
            error: shaped.error,
            skipped_rows: shaped.skipped_rows,
            used_fallback: shaped.used_fallback,
            elapsed,
        }
    }

    /// A slot for a sub-query that produced no result of its own.
    pub fn failed(subquery: &SubQuery, error: QueryError) -> Self {
        Self {
            name: subquery.name.clone(),
            title: subquery.title.clone(),
            kind: subquery.kind,
            layout: subquery.layout,
            unit: subquery.unit.clone(),
            rows: Rows::empty(subquery.kind),
            error: Some(error),
            skipped_rows: 0,
            used_fallback: false,
            elapsed: Duration::ZERO,
        }
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// All sub-query results of one module, in declared order.
#[derive(Debug, Clone, PartialEq)]
pub struct ModuleAggregate {
    pub module: String,
    pub slots: Vec<SlotResult>,
    pub elapsed: Duration,
}

impl ModuleAggregate {
    pub fn slot(&self, name: &str) -> Option<&SlotResult> {
        self.slots.iter().find(|s| s.name == name)
    }

    pub fn failed(&self) -> impl Iterator<Item = &SlotResult> {
        self.slots.iter().filter(|s| s.error.is_some())
    }

    /// `"<title>: <error>"` for every failed slot.
    pub fn error_messages(&self) -> Vec<String> {
        self.failed()
            .filter_map(|s| s.error.as_ref().map(|e| format!("{}: {e}", s.title)))
            .collect()
    }
}
