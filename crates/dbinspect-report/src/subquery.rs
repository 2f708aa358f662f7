//! Sub-query descriptors.
//!
//! A [`SubQuery`] pairs query text with a typed record and reduces the
//! record list to [`Rows`], the shape its widget kind renders from. The
//! record type is erased behind a function pointer so a module's sub-queries
//! can live in one list.

use std::time::Instant;

use chrono::NaiveDateTime;
use dbinspect_core::models::Card;
use dbinspect_core::{
    CancellationToken, DbConnection, QueryError, QuerySpec, SubQueryResult, WidgetKind,
};
use dbinspect_query::{QueryExecutor, Record};

use crate::aggregate::SlotResult;

/// A record rendered as one table row.
pub trait TableRow: Record {
    fn headers() -> Vec<&'static str>;

    /// One display string per header.
    fn cells(&self) -> Vec<String>;
}

/// Y value of one chart sample as read from the database.
#[derive(Debug, Clone, PartialEq)]
pub enum SampleValue {
    Missing,
    Number(f64),
    /// Parsed by the assembler; unparseable text skips the point.
    Text(String),
}

impl From<Option<f64>> for SampleValue {
    fn from(v: Option<f64>) -> Self {
        v.map_or(SampleValue::Missing, SampleValue::Number)
    }
}

impl From<Option<String>> for SampleValue {
    fn from(v: Option<String>) -> Self {
        v.map_or(SampleValue::Missing, SampleValue::Text)
    }
}

/// A record rendered as one point of a time series.
pub trait SeriesRow: Record {
    /// Records with the same key form one series.
    fn series_key(&self) -> String;
    fn x(&self) -> Option<NaiveDateTime>;
    fn y(&self) -> SampleValue;
}

/// A record rendered as one or more key-value cards.
pub trait CardRow: Record {
    fn cards(&self) -> Vec<Card>;
}

/// One chart sample before grouping.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesSample {
    pub series: String,
    pub x: Option<NaiveDateTime>,
    pub y: SampleValue,
}

/// Records reduced to the shape of their widget kind.
#[derive(Debug, Clone, PartialEq)]
pub enum Rows {
    Table {
        headers: Vec<String>,
        rows: Vec<Vec<String>>,
    },
    Series(Vec<SeriesSample>),
    Cards(Vec<Card>),
}

impl Rows {
    /// Empty rows of the given kind.
    pub fn empty(kind: WidgetKind) -> Self {
        match kind {
            WidgetKind::Table => Rows::Table {
                headers: Vec::new(),
                rows: Vec::new(),
            },
            WidgetKind::Chart => Rows::Series(Vec::new()),
            WidgetKind::ScalarCard => Rows::Cards(Vec::new()),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Rows::Table { rows, .. } => rows.len(),
            Rows::Series(samples) => samples.len(),
            Rows::Cards(cards) => cards.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// How chart samples are laid out into widgets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ChartLayout {
    /// One chart holding every series.
    #[default]
    Combined,
    /// One chart per series.
    PerSeries,
}

/// Typed execution reduced to rows.
pub struct ShapedResult {
    pub rows: Rows,
    pub error: Option<QueryError>,
    pub skipped_rows: usize,
    pub used_fallback: bool,
}

impl ShapedResult {
    fn from_result<R>(result: SubQueryResult<R>, shape: impl FnOnce(Vec<R>) -> Rows) -> Self {
        Self {
            rows: shape(result.value),
            error: result.error,
            skipped_rows: result.skipped_rows,
            used_fallback: result.used_fallback,
        }
    }
}

type Runner = fn(&QueryExecutor<'_>, &QuerySpec) -> ShapedResult;

/// Decides whether a failure means "nothing to report" rather than an error.
pub type Tolerance = fn(&QueryError) -> bool;

fn run_table<R: TableRow>(exec: &QueryExecutor<'_>, spec: &QuerySpec) -> ShapedResult {
    ShapedResult::from_result(exec.execute::<R>(spec), |records| Rows::Table {
        headers: R::headers().into_iter().map(String::from).collect(),
        rows: records.iter().map(TableRow::cells).collect(),
    })
}

fn run_chart<R: SeriesRow>(exec: &QueryExecutor<'_>, spec: &QuerySpec) -> ShapedResult {
    ShapedResult::from_result(exec.execute::<R>(spec), |records| {
        Rows::Series(
            records
                .iter()
                .map(|r| SeriesSample {
                    series: r.series_key(),
                    x: r.x(),
                    y: r.y(),
                })
                .collect(),
        )
    })
}

fn run_cards<R: CardRow>(exec: &QueryExecutor<'_>, spec: &QuerySpec) -> ShapedResult {
    ShapedResult::from_result(exec.execute::<R>(spec), |records| {
        Rows::Cards(records.iter().flat_map(CardRow::cards).collect())
    })
}

/// One named, independently failable query of a module.
#[derive(Clone)]
pub struct SubQuery {
    pub name: String,
    pub title: String,
    pub kind: WidgetKind,
    pub spec: QuerySpec,
    pub layout: ChartLayout,
    /// Y-axis caption of chart sub-queries.
    pub unit: Option<String>,
    tolerance: Option<Tolerance>,
    runner: Runner,
}

impl SubQuery {
    fn with_runner(
        name: &str,
        title: &str,
        kind: WidgetKind,
        spec: impl Into<QuerySpec>,
        runner: Runner,
    ) -> Self {
        Self {
            name: name.to_string(),
            title: title.to_string(),
            kind,
            spec: spec.into(),
            layout: ChartLayout::Combined,
            unit: None,
            tolerance: None,
            runner,
        }
    }

    pub fn table<R: TableRow>(name: &str, title: &str, spec: impl Into<QuerySpec>) -> Self {
        Self::with_runner(name, title, WidgetKind::Table, spec, run_table::<R>)
    }

    pub fn chart<R: SeriesRow>(name: &str, title: &str, spec: impl Into<QuerySpec>) -> Self {
        Self::with_runner(name, title, WidgetKind::Chart, spec, run_chart::<R>)
    }

    pub fn cards<R: CardRow>(name: &str, title: &str, spec: impl Into<QuerySpec>) -> Self {
        Self::with_runner(name, title, WidgetKind::ScalarCard, spec, run_cards::<R>)
    }

    pub fn with_layout(mut self, layout: ChartLayout) -> Self {
        self.layout = layout;
        self
    }

    pub fn with_unit(mut self, unit: &str) -> Self {
        self.unit = Some(unit.to_string());
        self
    }

    /// Treat errors accepted by `tolerance` as an empty successful result.
    pub fn tolerating(mut self, tolerance: Tolerance) -> Self {
        self.tolerance = Some(tolerance);
        self
    }

    /// Execute synchronously on the calling thread.
    pub fn run(
        &self,
        conn: &dyn DbConnection,
        cancel: &CancellationToken,
        retain_partial_rows: bool,
    ) -> SlotResult {
        let started = Instant::now();
        let exec = QueryExecutor::new(conn)
            .with_cancel(cancel.clone())
            .retain_partial_rows(retain_partial_rows);
        let mut shaped = (self.runner)(&exec, &self.spec);

        let tolerated = match (&shaped.error, self.tolerance) {
            (Some(err), Some(tolerance)) => tolerance(err),
            _ => false,
        };
        if tolerated {
            if let Some(err) = shaped.error.take() {
                tracing::info!(
                    subquery = %self.name,
                    error = %err,
                    "tolerated failure reported as empty result"
                );
            }
            shaped.rows = Rows::empty(self.kind);
        }
        SlotResult::from_shaped(self, shaped, started.elapsed())
    }
}

impl std::fmt::Debug for SubQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubQuery")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("spec", &self.spec)
            .finish_non_exhaustive()
    }
}

/// The fixed sub-query list of one module.
#[derive(Debug, Clone)]
pub struct SubQuerySet {
    pub module: String,
    pub subqueries: Vec<SubQuery>,
    /// The first sub-query gates the rest under
    /// [`FailurePolicy::AbortOnLeadFailure`](dbinspect_core::config::FailurePolicy).
    pub has_lead: bool,
}

impl SubQuerySet {
    pub fn new(module: &str, subqueries: Vec<SubQuery>) -> Self {
        Self {
            module: module.to_string(),
            subqueries,
            has_lead: false,
        }
    }

    pub fn with_lead(mut self) -> Self {
        self.has_lead = true;
        self
    }

    pub fn len(&self) -> usize {
        self.subqueries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subqueries.is_empty()
    }
}
