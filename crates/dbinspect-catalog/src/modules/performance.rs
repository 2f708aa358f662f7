//! System metrics from the AWR summary history.

use chrono::NaiveDateTime;
use dbinspect_query::record;
use dbinspect_report::{ChartLayout, SampleValue, SeriesRow, SubQuery, SubQuerySet, TableRow};

use super::opt;

/// Metrics charted by the performance module.
pub const METRICS: &[&str] = &[
    "DB Time Per Sec",
    "Average Active Sessions",
    "CPU Usage Per Sec",
    "Host CPU Utilization (%)",
    "Executions Per Sec",
    "User Commits Per Sec",
    "Physical Read Total Bytes Per Sec",
    "Physical Write Total Bytes Per Sec",
    "Redo Generated Per Sec",
    "Network Traffic Volume Per Sec",
    "SQL Service Response Time",
    "Database CPU Time Ratio",
    "Physical Reads Per Sec",
    "Physical Writes Per Sec",
    "Logons Cumulative",
    "User Rollbacks Per Sec",
    "DB Block Changes Per Sec",
    "GC CR Block Received Per Second",
    "Logical Reads Per Sec",
    "PGA Cache Hit %",
    "Total PGA Used for Workareas",
];

/// Per-metric averages over the last day.
pub fn summary_sql() -> String {
    format!(
        "SELECT METRIC_NAME, METRIC_UNIT, AVG(AVERAGE) AS AVERAGE, MAX(MAXVAL) AS MAXVAL \
         FROM DBA_HIST_SYSMETRIC_SUMMARY \
         WHERE END_TIME >= SYSDATE - 1 AND METRIC_NAME IN ({}) \
         GROUP BY METRIC_NAME, METRIC_UNIT \
         ORDER BY METRIC_NAME",
        metric_list()
    )
}

/// Every snapshot of every charted metric over the last day.
pub fn history_sql() -> String {
    format!(
        "SELECT BEGIN_TIME, END_TIME, METRIC_NAME, METRIC_UNIT, AVERAGE AS VALUE \
         FROM DBA_HIST_SYSMETRIC_SUMMARY \
         WHERE END_TIME >= SYSDATE - 1 AND METRIC_NAME IN ({}) \
         ORDER BY METRIC_NAME, BEGIN_TIME",
        metric_list()
    )
}

fn metric_list() -> String {
    METRICS
        .iter()
        .map(|m| format!("'{m}'"))
        .collect::<Vec<_>>()
        .join(", ")
}

record! {
    #[derive(Debug, Default, Clone)]
    pub struct MetricSummary {
        pub metric_name: String,
        pub metric_unit: Option<String>,
        pub average: Option<f64>,
        pub maxval: Option<f64>,
    }
}

impl TableRow for MetricSummary {
    fn headers() -> Vec<&'static str> {
        vec!["Metric", "Unit", "Average", "Maximum"]
    }

    fn cells(&self) -> Vec<String> {
        let num = |v: Option<f64>| v.map(|v| format!("{v:.2}")).unwrap_or_default();
        vec![
            self.metric_name.clone(),
            opt(&self.metric_unit),
            num(self.average),
            num(self.maxval),
        ]
    }
}

record! {
    /// One AWR snapshot of one metric. `value` is parsed at assembly.
    #[derive(Debug, Default, Clone)]
    pub struct MetricSample {
        pub begin_time: Option<NaiveDateTime>,
        pub end_time: Option<NaiveDateTime>,
        pub metric_name: String,
        pub metric_unit: Option<String>,
        pub value: Option<String>,
    }
}

impl SeriesRow for MetricSample {
    fn series_key(&self) -> String {
        self.metric_name.clone()
    }

    fn x(&self) -> Option<NaiveDateTime> {
        self.begin_time
    }

    fn y(&self) -> SampleValue {
        self.value.clone().into()
    }
}

pub fn subqueries() -> SubQuerySet {
    SubQuerySet::new(
        "performance",
        vec![
            SubQuery::table::<MetricSummary>(
                "summary",
                "System Metrics (Last 24 Hours)",
                summary_sql().as_str(),
            ),
            SubQuery::chart::<MetricSample>("history", "System Metric History", history_sql().as_str())
                .with_layout(ChartLayout::PerSeries),
        ],
    )
}
