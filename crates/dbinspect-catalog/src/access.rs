//! Read-access probe for the views the modules depend on.

use std::fmt;

use dbinspect_core::QueryError;
use dbinspect_query::record;
use dbinspect_report::{SlotResult, SubQuery, SubQuerySet, TableRow};
use serde::{Deserialize, Serialize};

use crate::oracle;

/// Views every module set together reads from.
pub const CRITICAL_VIEWS: &[&str] = &[
    "gv$active_session_history",
    "gv$instance",
    "gv$session",
    "v$archived_log",
    "v$asm_diskgroup",
    "v$backup_set",
    "v$controlfile",
    "v$database",
    "v$flashback_database_log",
    "v$log",
    "v$logfile",
    "v$parameter",
    "v$rman_backup_job_details",
    "v$temp_extent_pool",
    "dba_data_files",
    "dba_datapump_jobs",
    "dba_free_space",
    "dba_hist_sysmetric_summary",
    "dba_objects",
    "dba_profiles",
    "dba_recyclebin",
    "dba_role_privs",
    "dba_roles",
    "dba_segments",
    "dba_sys_privs",
    "dba_tablespaces",
    "dba_temp_files",
    "dba_users",
    "nls_database_parameters",
    "role_role_privs",
];

/// Why a view could not be read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AccessProblem {
    /// The view is missing or not granted to the session.
    Denied { code: String },
    Failed { message: String },
}

impl fmt::Display for AccessProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccessProblem::Denied { code } => {
                write!(f, "missing or not granted ({code})")
            }
            AccessProblem::Failed { message } => f.write_str(message),
        }
    }
}

/// Probe outcome of one view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewAccess {
    pub view: String,
    pub problem: Option<AccessProblem>,
}

impl ViewAccess {
    pub fn is_accessible(&self) -> bool {
        self.problem.is_none()
    }

    pub(crate) fn from_slot(slot: &SlotResult) -> Self {
        Self {
            view: slot.name.clone(),
            problem: slot.error.as_ref().map(classify),
        }
    }
}

fn classify(err: &QueryError) -> AccessProblem {
    if oracle::is_missing_or_denied(err) {
        let message = err.to_string();
        let code = oracle::ora_codes(&message)
            .into_iter()
            .find(|c| c == oracle::ORA_TABLE_NOT_FOUND || c == oracle::ORA_INSUFFICIENT_PRIVILEGES)
            .unwrap_or_default();
        return AccessProblem::Denied { code };
    }
    AccessProblem::Failed {
        message: err.to_string(),
    }
}

record! {
    #[derive(Debug, Default, Clone)]
    pub struct Probe {
        pub probe: i64,
    }
}

impl TableRow for Probe {
    fn headers() -> Vec<&'static str> {
        vec!["Rows"]
    }

    fn cells(&self) -> Vec<String> {
        vec![self.probe.to_string()]
    }
}

/// One probe sub-query per view, named after the view.
pub fn probe_sql(view: &str) -> String {
    format!("SELECT COUNT(*) AS PROBE FROM {view} WHERE ROWNUM = 1")
}

pub(crate) fn probes(views: &[&str]) -> SubQuerySet {
    SubQuerySet::new(
        "access",
        views
            .iter()
            .map(|view| SubQuery::table::<Probe>(view, view, probe_sql(view).as_str()))
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn denial_codes_classify_as_denied() {
        let err = QueryError::prepare("ORA-01031: insufficient privileges");
        assert_eq!(
            classify(&err),
            AccessProblem::Denied {
                code: "ORA-01031".to_string()
            }
        );
    }

    #[test]
    fn other_errors_keep_their_message() {
        let err = QueryError::Connection {
            message: "ORA-03113: end-of-file on communication channel".to_string(),
        };
        let problem = classify(&err);
        assert!(matches!(problem, AccessProblem::Failed { ref message } if message.contains("ORA-03113")));
    }
}
