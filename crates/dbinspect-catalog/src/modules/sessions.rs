//! Current sessions and active session history.

use chrono::NaiveDateTime;
use dbinspect_query::record;
use dbinspect_report::{SampleValue, SeriesRow, SubQuery, SubQuerySet, TableRow};

use super::opt;

pub const OVERVIEW_SQL: &str = "\
SELECT inst_id, username, machine, status, COUNT(*) AS session_count
FROM gv$session
GROUP BY inst_id, username, machine, status
ORDER BY inst_id, username, machine, status";

pub const BY_EVENT_SQL: &str = "\
SELECT event, COUNT(*) AS session_count
FROM gv$session
GROUP BY event
ORDER BY session_count DESC, event";

pub const HISTORY_SQL: &str = "\
SELECT TO_CHAR(sample_time, 'YYYY-MM-DD HH24:MI') AS sample_time, COUNT(*) AS session_count
FROM gv$active_session_history
WHERE sample_time > SYSDATE - INTERVAL '1' DAY
GROUP BY TO_CHAR(sample_time, 'YYYY-MM-DD HH24:MI')
ORDER BY sample_time";

/// Label of the single session-history series.
pub const HISTORY_SERIES: &str = "Active Sessions";

record! {
    #[derive(Debug, Default, Clone)]
    pub struct SessionGroup {
        pub inst_id: i64,
        pub username: Option<String>,
        pub machine: Option<String>,
        pub status: String,
        pub session_count: i64,
    }
}

impl TableRow for SessionGroup {
    fn headers() -> Vec<&'static str> {
        vec!["Instance", "Username", "Machine", "Status", "Sessions"]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.inst_id.to_string(),
            opt(&self.username),
            opt(&self.machine),
            self.status.clone(),
            self.session_count.to_string(),
        ]
    }
}

record! {
    #[derive(Debug, Default, Clone)]
    pub struct EventCount {
        pub event: String,
        pub session_count: i64,
    }
}

impl TableRow for EventCount {
    fn headers() -> Vec<&'static str> {
        vec!["Event", "Sessions"]
    }

    fn cells(&self) -> Vec<String> {
        vec![self.event.clone(), self.session_count.to_string()]
    }
}

record! {
    #[derive(Debug, Default, Clone)]
    pub struct HistoryPoint {
        pub sample_time: Option<NaiveDateTime>,
        pub session_count: Option<f64>,
    }
}

impl SeriesRow for HistoryPoint {
    fn series_key(&self) -> String {
        HISTORY_SERIES.to_string()
    }

    fn x(&self) -> Option<NaiveDateTime> {
        self.sample_time
    }

    fn y(&self) -> SampleValue {
        self.session_count.into()
    }
}

pub fn subqueries() -> SubQuerySet {
    SubQuerySet::new(
        "sessions",
        vec![
            SubQuery::table::<SessionGroup>("overview", "Session Overview", OVERVIEW_SQL),
            SubQuery::table::<EventCount>("by_event", "Sessions by Wait Event", BY_EVENT_SQL),
            SubQuery::chart::<HistoryPoint>(
                "history",
                "Active Session History (Last 24 Hours)",
                HISTORY_SQL,
            )
            .with_unit("Sessions"),
        ],
    )
}
