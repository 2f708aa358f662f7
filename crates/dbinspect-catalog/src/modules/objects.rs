//! Application schema objects.

use dbinspect_query::record;
use dbinspect_report::{SubQuery, SubQuerySet, TableRow};

use super::{mb, opt};

/// Owners left out of every object query.
const EXCLUDED_OWNERS: &str = "\
owner NOT IN ('SYS', 'SYSTEM', 'DBSNMP', 'OUTLN', 'DIP', 'TSMSYS', 'ORACLE_OCM', 'APPQOSSYS',
  'GSMADMIN_INTERNAL', 'XDB', 'WMSYS', 'AUDSYS', 'CTXSYS', 'LBACSYS', 'ORDDATA', 'ORDSYS',
  'SI_INFORMTN_SCHEMA', 'MDSYS', 'DVSYS', 'EXFSYS', 'OLAPSYS', 'GGSYS', 'ANONYMOUS', 'XS$NULL',
  'OJVMSYS', 'DBSFWUSER', 'REMOTE_SCHEDULER_AGENT', 'SYS$UMF', 'SYSBACKUP', 'SYSDG', 'SYSKM',
  'SYSRAC', 'DVF', 'ORDPLUGINS')
  AND owner NOT LIKE 'APEX%' AND owner NOT LIKE 'FLOWS_%'
  AND owner NOT LIKE 'GG%' AND owner NOT LIKE 'RDSADMIN%'";

pub fn overview_sql() -> String {
    format!(
        "SELECT owner, object_type, COUNT(*) AS object_count FROM dba_objects \
         WHERE {EXCLUDED_OWNERS} GROUP BY owner, object_type ORDER BY owner, object_type"
    )
}

pub fn top_segments_sql() -> String {
    format!(
        "SELECT owner, segment_type, segment_name, size_mb FROM ( \
           SELECT owner, segment_type, segment_name, SUM(bytes) / 1024 / 1024 AS size_mb \
           FROM dba_segments WHERE {EXCLUDED_OWNERS} \
           GROUP BY owner, segment_type, segment_name ORDER BY size_mb DESC \
         ) WHERE ROWNUM < 11"
    )
}

pub fn invalid_objects_sql() -> String {
    format!(
        "SELECT owner, object_name, object_type, \
           TO_CHAR(created, 'YYYY-MM-DD HH24:MI:SS') AS created, \
           TO_CHAR(last_ddl_time, 'YYYY-MM-DD HH24:MI:SS') AS last_ddl_time \
         FROM dba_objects WHERE status = 'INVALID' AND {EXCLUDED_OWNERS} \
         ORDER BY owner, object_type, object_name"
    )
}

record! {
    #[derive(Debug, Default, Clone)]
    pub struct ObjectCount {
        pub owner: String,
        pub object_type: String,
        pub object_count: i64,
    }
}

impl TableRow for ObjectCount {
    fn headers() -> Vec<&'static str> {
        vec!["Owner", "Object Type", "Count"]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.owner.clone(),
            self.object_type.clone(),
            self.object_count.to_string(),
        ]
    }
}

record! {
    #[derive(Debug, Default, Clone)]
    pub struct Segment {
        pub owner: String,
        pub segment_type: String,
        pub segment_name: String,
        pub size_mb: f64,
    }
}

impl TableRow for Segment {
    fn headers() -> Vec<&'static str> {
        vec!["Owner", "Segment Type", "Segment Name", "Size (MB)"]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.owner.clone(),
            self.segment_type.clone(),
            self.segment_name.clone(),
            mb(self.size_mb),
        ]
    }
}

record! {
    #[derive(Debug, Default, Clone)]
    pub struct InvalidObject {
        pub owner: String,
        pub object_name: String,
        pub object_type: String,
        pub created: Option<String>,
        pub last_ddl_time: Option<String>,
    }
}

impl TableRow for InvalidObject {
    fn headers() -> Vec<&'static str> {
        vec!["Owner", "Object Name", "Object Type", "Created", "Last DDL"]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.owner.clone(),
            self.object_name.clone(),
            self.object_type.clone(),
            opt(&self.created),
            opt(&self.last_ddl_time),
        ]
    }
}

pub fn subqueries() -> SubQuerySet {
    SubQuerySet::new(
        "objects",
        vec![
            SubQuery::table::<ObjectCount>("overview", "Object Overview", overview_sql().as_str()),
            SubQuery::table::<Segment>("top_segments", "Top 10 Segments", top_segments_sql().as_str()),
            SubQuery::table::<InvalidObject>(
                "invalid_objects",
                "Invalid Objects",
                invalid_objects_sql().as_str(),
            ),
        ],
    )
}
