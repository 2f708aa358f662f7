//! Archiving, RMAN, flashback, recycle bin and Data Pump.
//!
//! The archive log mode query leads the module: under
//! `FailurePolicy::AbortOnLeadFailure` a failure there skips the rest.

use chrono::NaiveDateTime;
use dbinspect_core::models::Card;
use dbinspect_core::QuerySpec;
use dbinspect_query::record;
use dbinspect_report::{CardRow, SubQuery, SubQuerySet, TableRow};

use super::opt;

pub const LOG_MODE_SQL: &str = "SELECT LOG_MODE FROM V$DATABASE";

pub const RMAN_JOBS_SQL: &str = "\
SELECT SESSION_KEY, START_TIME, END_TIME, INPUT_BYTES_DISPLAY, OUTPUT_BYTES_DISPLAY,
       STATUS, TIME_TAKEN_DISPLAY, OPTIMIZED, COMPRESSION_RATIO
FROM V$RMAN_BACKUP_JOB_DETAILS
WHERE START_TIME >= SYSDATE - 7
ORDER BY START_TIME DESC";

/// Older releases and restricted grants lack the job view; backup sets
/// cover completed data file backups only.
pub const BACKUP_SETS_SQL: &str = "\
SELECT RECID AS SESSION_KEY, START_TIME, COMPLETION_TIME AS END_TIME,
       NULL AS INPUT_BYTES_DISPLAY, TO_CHAR(BYTES) AS OUTPUT_BYTES_DISPLAY,
       'COMPLETED' AS STATUS, TO_CHAR(ELAPSED_SECONDS) || ' seconds' AS TIME_TAKEN_DISPLAY,
       NULL AS OPTIMIZED, NULL AS COMPRESSION_RATIO
FROM V$BACKUP_SET
WHERE COMPLETION_TIME >= SYSDATE - 7 AND BACKUP_TYPE != 'L'
ORDER BY COMPLETION_TIME DESC";

pub const FLASHBACK_SQL: &str = "\
SELECT d.FLASHBACK_ON, l.OLDEST_FLASHBACK_SCN, l.OLDEST_FLASHBACK_TIME,
       TO_NUMBER(p.VALUE) AS RETENTION_TARGET
FROM V$DATABASE d
LEFT JOIN V$FLASHBACK_DATABASE_LOG l ON 1 = 1
LEFT JOIN V$PARAMETER p ON p.NAME = 'db_flashback_retention_target'";

pub const RECYCLE_BIN_SQL: &str = "\
SELECT OWNER, OBJECT_NAME, ORIGINAL_NAME, TYPE, TS_NAME, CREATETIME, DROPTIME, SPACE, CAN_UNDROP
FROM DBA_RECYCLEBIN
WHERE CAN_UNDROP = 'YES' AND TYPE != 'INDEX'
ORDER BY DROPTIME DESC";

pub const DATA_PUMP_SQL: &str = "\
SELECT JOB_NAME, OWNER_NAME, OPERATION, JOB_MODE, STATE, ATTACHED_SESSIONS
FROM DBA_DATAPUMP_JOBS
ORDER BY OWNER_NAME, JOB_NAME";

const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

record! {
    #[derive(Debug, Default, Clone)]
    pub struct LogMode {
        pub log_mode: String,
    }
}

impl CardRow for LogMode {
    fn cards(&self) -> Vec<Card> {
        vec![Card::new("Archive Log Mode", self.log_mode.clone())]
    }
}

record! {
    #[derive(Debug, Default, Clone)]
    pub struct BackupJob {
        pub session_key: i64,
        pub start_time: Option<NaiveDateTime>,
        pub end_time: Option<NaiveDateTime>,
        pub input_bytes_display: Option<String>,
        pub output_bytes_display: Option<String>,
        pub status: String,
        pub time_taken_display: Option<String>,
        pub optimized: Option<String>,
        pub compression_ratio: Option<f64>,
    }
}

impl TableRow for BackupJob {
    fn headers() -> Vec<&'static str> {
        vec![
            "Session", "Start", "End", "Input", "Output", "Status", "Duration", "Optimized",
            "Compression Ratio",
        ]
    }

    fn cells(&self) -> Vec<String> {
        let date = |d: &Option<NaiveDateTime>| {
            d.map(|d| d.format(DATE_FORMAT).to_string())
                .unwrap_or_default()
        };
        vec![
            self.session_key.to_string(),
            date(&self.start_time),
            date(&self.end_time),
            opt(&self.input_bytes_display).trim().to_string(),
            opt(&self.output_bytes_display).trim().to_string(),
            self.status.clone(),
            opt(&self.time_taken_display),
            opt(&self.optimized),
            self.compression_ratio
                .map(|r| format!("{r:.2}"))
                .unwrap_or_default(),
        ]
    }
}

record! {
    #[derive(Debug, Default, Clone)]
    pub struct Flashback {
        pub flashback_on: String,
        pub oldest_flashback_scn: Option<i64>,
        pub oldest_flashback_time: Option<NaiveDateTime>,
        pub retention_target: Option<i64>,
    }
}

impl CardRow for Flashback {
    fn cards(&self) -> Vec<Card> {
        let mut cards = vec![Card::new("Flashback Database", self.flashback_on.clone())];
        if let Some(minutes) = self.retention_target {
            cards.push(Card::new("Flashback Retention Target", format!("{minutes} minutes")));
        }
        if let Some(time) = self.oldest_flashback_time {
            cards.push(Card::new(
                "Oldest Flashback Time",
                time.format(DATE_FORMAT).to_string(),
            ));
        }
        if let Some(scn) = self.oldest_flashback_scn {
            cards.push(Card::new("Oldest Flashback SCN", scn.to_string()));
        }
        cards
    }
}

record! {
    #[derive(Debug, Default, Clone)]
    pub struct RecycledObject {
        pub owner: String,
        pub object_name: String,
        pub original_name: Option<String>,
        pub kind: Option<String> => "TYPE",
        pub ts_name: Option<String>,
        pub createtime: Option<String>,
        pub droptime: Option<String>,
        pub space: Option<i64>,
        pub can_undrop: Option<String>,
    }
}

impl TableRow for RecycledObject {
    fn headers() -> Vec<&'static str> {
        vec![
            "Owner", "Object Name", "Original Name", "Type", "Tablespace", "Created", "Dropped",
            "Space (blocks)", "Can Undrop",
        ]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.owner.clone(),
            self.object_name.clone(),
            opt(&self.original_name),
            opt(&self.kind),
            opt(&self.ts_name),
            opt(&self.createtime),
            opt(&self.droptime),
            opt(&self.space),
            opt(&self.can_undrop),
        ]
    }
}

record! {
    #[derive(Debug, Default, Clone)]
    pub struct DataPumpJob {
        pub job_name: String,
        pub owner_name: String,
        pub operation: Option<String>,
        pub job_mode: Option<String>,
        pub state: Option<String>,
        pub attached_sessions: Option<i64>,
    }
}

impl TableRow for DataPumpJob {
    fn headers() -> Vec<&'static str> {
        vec!["Job", "Owner", "Operation", "Mode", "State", "Attached Sessions"]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.job_name.clone(),
            self.owner_name.clone(),
            opt(&self.operation),
            opt(&self.job_mode),
            opt(&self.state),
            opt(&self.attached_sessions),
        ]
    }
}

pub fn subqueries() -> SubQuerySet {
    SubQuerySet::new(
        "backup",
        vec![
            SubQuery::cards::<LogMode>("log_mode", "Archive Log Mode", LOG_MODE_SQL),
            SubQuery::table::<BackupJob>(
                "rman_jobs",
                "RMAN Backup Jobs (Last 7 Days)",
                QuerySpec::new(RMAN_JOBS_SQL).with_fallback(BACKUP_SETS_SQL),
            ),
            SubQuery::cards::<Flashback>("flashback", "Flashback Database", FLASHBACK_SQL),
            SubQuery::table::<RecycledObject>("recycle_bin", "Recycle Bin", RECYCLE_BIN_SQL),
            SubQuery::table::<DataPumpJob>("data_pump", "Data Pump Jobs", DATA_PUMP_SQL),
        ],
    )
    .with_lead()
}
