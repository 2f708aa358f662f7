//! Control files, redo, data files, tablespaces, archiving and ASM.

use dbinspect_core::QuerySpec;
use dbinspect_query::record;
use dbinspect_report::{SubQuery, SubQuerySet, TableRow};

use super::{mb, opt};
use crate::oracle;

pub const CONTROL_FILES_SQL: &str =
    "SELECT NAME, ROUND(BLOCK_SIZE * FILE_SIZE_BLKS / 1024 / 1024) AS SIZE_MB FROM V$CONTROLFILE";

pub const REDO_LOGS_SQL: &str = "\
SELECT g.GROUP# AS GROUP_NO, g.THREAD# AS THREAD_NO, g.SEQUENCE# AS SEQUENCE_NO, g.MEMBERS,
       l.MEMBER, ROUND(g.BYTES / 1024 / 1024) AS SIZE_MB, g.STATUS, l.TYPE, g.ARCHIVED
FROM V$LOG g JOIN V$LOGFILE l ON g.GROUP# = l.GROUP#
ORDER BY g.GROUP#, l.MEMBER";

pub const DATA_FILES_SQL: &str = "\
SELECT df.TABLESPACE_NAME, df.FILE_ID, df.FILE_NAME, df.BYTES / 1024 / 1024 AS SIZE_MB,
       df.STATUS, df.AUTOEXTENSIBLE
FROM DBA_DATA_FILES df
UNION ALL
SELECT tf.TABLESPACE_NAME, tf.FILE_ID, tf.FILE_NAME, tf.BYTES / 1024 / 1024 AS SIZE_MB,
       tf.STATUS, tf.AUTOEXTENSIBLE
FROM DBA_TEMP_FILES tf
ORDER BY TABLESPACE_NAME, FILE_ID";

pub const TABLESPACES_SQL: &str = "\
SELECT d.status, d.tablespace_name, d.contents, d.extent_management, d.segment_space_management,
       NVL(b.allocatesize - NVL(f.freesize, 0), 0) AS used_mb,
       b.allocatesize AS current_size_mb,
       TO_CHAR(NVL((b.allocatesize - NVL(f.freesize, 0)) / b.allocatesize * 100, 0), '990.99') || '%' AS pct_used,
       a.maxsize AS canextend_size_mb
FROM dba_tablespaces d,
     (SELECT tablespace_name, SUM(maxsize) maxsize
        FROM (SELECT tablespace_name,
                     DECODE(autoextensible, 'YES', ROUND(SUM(maxbytes) / 1024 / 1024), ROUND(SUM(bytes) / 1024 / 1024)) maxsize
                FROM dba_data_files GROUP BY tablespace_name, autoextensible)
       GROUP BY tablespace_name) a,
     (SELECT tablespace_name, SUM(bytes) / 1024 / 1024 allocatesize FROM dba_data_files GROUP BY tablespace_name) b,
     (SELECT tablespace_name, SUM(bytes) / 1024 / 1024 freesize FROM dba_free_space GROUP BY tablespace_name) f
WHERE d.tablespace_name = a.tablespace_name(+)
  AND d.tablespace_name = b.tablespace_name(+)
  AND d.tablespace_name = f.tablespace_name(+)
  AND d.contents IN ('PERMANENT', 'UNDO')";

pub const TEMP_TABLESPACES_SQL: &str = "\
SELECT d.status, d.tablespace_name, d.contents, d.extent_management, d.segment_space_management,
       NVL(b.allocatesize - NVL(f.usedsize, 0), 0) AS used_mb,
       b.allocatesize AS current_size_mb,
       TO_CHAR(NVL(NVL(f.usedsize, 0) / b.allocatesize * 100, 0), '990.99') || '%' AS pct_used,
       a.maxsize AS canextend_size_mb
FROM sys.dba_tablespaces d,
     (SELECT tablespace_name, SUM(maxsize) maxsize
        FROM (SELECT tablespace_name,
                     DECODE(autoextensible, 'YES', ROUND(SUM(maxbytes) / 1024 / 1024), ROUND(SUM(bytes) / 1024 / 1024)) maxsize
                FROM dba_temp_files GROUP BY tablespace_name, autoextensible)
       GROUP BY tablespace_name) a,
     (SELECT tablespace_name, SUM(bytes) / 1024 / 1024 allocatesize FROM dba_temp_files GROUP BY tablespace_name) b,
     (SELECT tablespace_name, SUM(bytes_cached) / 1024 / 1024 usedsize FROM v$temp_extent_pool GROUP BY tablespace_name) f
WHERE d.tablespace_name = a.tablespace_name(+)
  AND d.tablespace_name = b.tablespace_name(+)
  AND d.tablespace_name = f.tablespace_name(+)
  AND d.extent_management LIKE 'LOCAL'
  AND d.contents LIKE 'TEMPORARY'";

pub const ARCHIVED_LOGS_SQL: &str = "\
SELECT TO_CHAR(TRUNC(COMPLETION_TIME), 'YYYY-MM-DD') AS DAY,
       COUNT(*) AS LOG_COUNT,
       SUM(BLOCKS * BLOCK_SIZE) / 1024 / 1024 AS TOTAL_SIZE_MB
FROM V$ARCHIVED_LOG
WHERE COMPLETION_TIME >= TRUNC(SYSDATE) - 7 AND COMPLETION_TIME < TRUNC(SYSDATE) + 1
GROUP BY TRUNC(COMPLETION_TIME)
ORDER BY DAY DESC";

pub const ASM_DISKGROUPS_SQL: &str = "\
SELECT name, total_mb, free_mb,
       ROUND((1 - COALESCE(free_mb, 0) / DECODE(COALESCE(total_mb, 0), 0, 1, COALESCE(total_mb, 0))) * 100, 2) AS used_percent,
       state, type AS redundancy_type
FROM V$ASM_DISKGROUP
ORDER BY name";

record! {
    #[derive(Debug, Default, Clone)]
    pub struct ControlFile {
        pub name: String,
        pub size_mb: f64,
    }
}

impl TableRow for ControlFile {
    fn headers() -> Vec<&'static str> {
        vec!["Name", "Size (MB)"]
    }

    fn cells(&self) -> Vec<String> {
        vec![self.name.clone(), mb(self.size_mb)]
    }
}

record! {
    #[derive(Debug, Default, Clone)]
    pub struct RedoLog {
        pub group_no: i64,
        pub thread_no: i64,
        pub sequence_no: Option<i64>,
        pub members: i64,
        pub member: String,
        pub size_mb: f64,
        pub status: Option<String>,
        pub kind: Option<String> => "TYPE",
        pub archived: Option<String>,
    }
}

impl TableRow for RedoLog {
    fn headers() -> Vec<&'static str> {
        vec![
            "Group", "Thread", "Sequence", "Members", "Member", "Size (MB)", "Status", "Type",
            "Archived",
        ]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.group_no.to_string(),
            self.thread_no.to_string(),
            opt(&self.sequence_no),
            self.members.to_string(),
            self.member.clone(),
            mb(self.size_mb),
            opt(&self.status),
            opt(&self.kind),
            opt(&self.archived),
        ]
    }
}

record! {
    #[derive(Debug, Default, Clone)]
    pub struct DataFile {
        pub tablespace_name: String,
        pub file_id: i64,
        pub file_name: String,
        pub size_mb: f64,
        pub status: Option<String>,
        pub autoextensible: Option<String>,
    }
}

impl TableRow for DataFile {
    fn headers() -> Vec<&'static str> {
        vec!["Tablespace", "File ID", "File Name", "Size (MB)", "Status", "Autoextensible"]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.tablespace_name.clone(),
            self.file_id.to_string(),
            self.file_name.clone(),
            mb(self.size_mb),
            opt(&self.status),
            opt(&self.autoextensible),
        ]
    }
}

record! {
    #[derive(Debug, Default, Clone)]
    pub struct Tablespace {
        pub status: Option<String>,
        pub name: String => "TABLESPACE_NAME",
        pub contents: Option<String>,
        pub extent_management: Option<String>,
        pub segment_space_management: Option<String>,
        pub used_mb: Option<f64>,
        pub total_mb: Option<f64> => "CURRENT_SIZE_MB",
        pub pct_used: Option<String>,
        pub can_extend_mb: Option<f64> => "CANEXTEND_SIZE_MB",
    }
}

impl TableRow for Tablespace {
    fn headers() -> Vec<&'static str> {
        vec![
            "Status", "Name", "Type", "Extent Management", "Segment Space Management",
            "Used (MB)", "Total (MB)", "Used %", "Can Extend To (MB)",
        ]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            opt(&self.status),
            self.name.clone(),
            opt(&self.contents),
            opt(&self.extent_management),
            opt(&self.segment_space_management),
            self.used_mb.map(mb).unwrap_or_default(),
            self.total_mb.map(mb).unwrap_or_default(),
            self.pct_used.as_deref().map(str::trim).unwrap_or_default().to_string(),
            self.can_extend_mb.map(mb).unwrap_or_default(),
        ]
    }
}

record! {
    #[derive(Debug, Default, Clone)]
    pub struct ArchivedLogDay {
        pub day: String,
        pub log_count: i64,
        pub total_size_mb: Option<f64>,
    }
}

impl TableRow for ArchivedLogDay {
    fn headers() -> Vec<&'static str> {
        vec!["Day", "Log Count", "Total Size (MB)"]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.day.clone(),
            self.log_count.to_string(),
            self.total_size_mb.map(mb).unwrap_or_default(),
        ]
    }
}

record! {
    #[derive(Debug, Default, Clone)]
    pub struct AsmDiskgroup {
        pub name: String,
        pub total_mb: Option<i64>,
        pub free_mb: Option<i64>,
        pub used_percent: Option<f64>,
        pub state: Option<String>,
        pub redundancy_type: Option<String>,
    }
}

impl TableRow for AsmDiskgroup {
    fn headers() -> Vec<&'static str> {
        vec!["Name", "Total (MB)", "Free (MB)", "Used %", "State", "Redundancy"]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.name.clone(),
            opt(&self.total_mb),
            opt(&self.free_mb),
            self.used_percent.map(|p| format!("{p:.2}%")).unwrap_or_default(),
            opt(&self.state),
            opt(&self.redundancy_type),
        ]
    }
}

pub fn subqueries() -> SubQuerySet {
    SubQuerySet::new(
        "storage",
        vec![
            SubQuery::table::<ControlFile>("control_files", "Control Files", CONTROL_FILES_SQL),
            SubQuery::table::<RedoLog>("redo_logs", "Redo Log Groups", REDO_LOGS_SQL),
            SubQuery::table::<DataFile>("data_files", "Data Files", DATA_FILES_SQL),
            SubQuery::table::<Tablespace>(
                "tablespaces",
                "Tablespace Usage",
                QuerySpec::new(TABLESPACES_SQL).with_union_part(TEMP_TABLESPACES_SQL),
            ),
            SubQuery::table::<ArchivedLogDay>(
                "archived_logs",
                "Archived Log Summary (Last 7 Days)",
                ARCHIVED_LOGS_SQL,
            ),
            // No V$ASM_DISKGROUP means no ASM, not a failure.
            SubQuery::table::<AsmDiskgroup>("asm_diskgroups", "ASM Disk Groups", ASM_DISKGROUPS_SQL)
                .tolerating(oracle::is_table_not_found),
        ],
    )
}
