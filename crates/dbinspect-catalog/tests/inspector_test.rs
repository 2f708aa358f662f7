//! Inspector: sections, stored reports, query log and access probes.

use std::sync::Arc;
use std::time::Duration;

use dbinspect_catalog::access::{probe_sql, AccessProblem};
use dbinspect_catalog::modules::{backup, parameters, storage};
use dbinspect_catalog::Inspector;
use dbinspect_core::config::{ExecutionConfig, FailurePolicy};
use dbinspect_core::{Cancellable, CancellationToken, InspectConfig, InspectError, QueryError};
use dbinspect_report::Aggregator;
use test_fixtures::{int, real, text, ScriptedConnection, ScriptedResult, ORA_00942, ORA_01031};

fn inspector(conn: ScriptedConnection) -> Inspector {
    Inspector::new(Arc::new(conn), &InspectConfig::default())
}

fn storage_conn() -> ScriptedConnection {
    ScriptedConnection::new()
        .on(
            storage::CONTROL_FILES_SQL,
            ScriptedResult::rows(
                &["NAME", "SIZE_MB"],
                vec![
                    vec![text("/u01/control01.ctl"), real(18.0)],
                    vec![text("/u02/control02.ctl"), real(18.0)],
                ],
            ),
        )
        .on(
            storage::REDO_LOGS_SQL,
            ScriptedResult::error(QueryError::prepare(ORA_00942)),
        )
        .on(
            storage::DATA_FILES_SQL,
            ScriptedResult::empty(&["TABLESPACE_NAME", "FILE_ID", "FILE_NAME"]),
        )
        .on(
            storage::TABLESPACES_SQL,
            ScriptedResult::rows(
                &["TABLESPACE_NAME", "CONTENTS"],
                vec![vec![text("USERS"), text("PERMANENT")]],
            ),
        )
        .on(
            storage::TEMP_TABLESPACES_SQL,
            ScriptedResult::rows(
                &["TABLESPACE_NAME", "CONTENTS"],
                vec![vec![text("TEMP"), text("TEMPORARY")]],
            ),
        )
        .on(
            storage::ARCHIVED_LOGS_SQL,
            ScriptedResult::empty(&["DAY", "LOG_COUNT", "TOTAL_SIZE_MB"]),
        )
}

// ── Sections ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn storage_section_isolates_each_failure() {
    let inspector = inspector(storage_conn());
    let report = inspector
        .inspect("db01:1521/orcl", &["storage"], &CancellationToken::new())
        .await
        .unwrap();

    let section = report.section("storage").expect("storage section");
    assert_eq!(section.widgets.len(), 6);

    let control = section.widgets[0].as_table().unwrap();
    assert_eq!(control.rows.len(), 2);

    let redo = section.widgets[1].as_card().unwrap();
    assert!(redo.value.contains("ORA-00942"));

    assert_eq!(section.widgets[2].as_card().unwrap().value, "no data found");
    assert_eq!(section.widgets[3].as_table().unwrap().rows.len(), 2);
    assert_eq!(section.widgets[4].as_card().unwrap().value, "no data found");
    // Unscripted ASM view reads as ORA-00942, which means no ASM.
    assert_eq!(section.widgets[5].as_card().unwrap().value, "no data found");

    let error = section.error.as_deref().unwrap();
    assert!(error.starts_with("Redo Log Groups: "));
    assert!(!error.contains("; "), "only the redo query failed: {error}");
}

#[tokio::test]
async fn sections_follow_caller_order_and_unknown_modules_are_reported() {
    let conn = storage_conn().on(
        parameters::PARAMETERS_SQL,
        ScriptedResult::rows(&["NAME", "VALUE"], vec![vec![text("processes"), text("300")]]),
    );
    let report = inspector(conn)
        .inspect("db01", &["Params", "asm", "storage"], &CancellationToken::new())
        .await
        .unwrap();

    let ids: Vec<&str> = report.sections.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(ids, vec!["parameters", "asm", "storage"]);

    assert!(report.sections[0].error.is_none());
    let unknown = &report.sections[1];
    assert!(unknown.widgets.is_empty());
    assert_eq!(unknown.error.as_deref(), Some("unknown module: asm"));
}

#[tokio::test]
async fn fully_failed_module_joins_every_error() {
    let report = inspector(ScriptedConnection::new())
        .inspect("db01", &["dbinfo"], &CancellationToken::new())
        .await
        .unwrap();

    let section = report.section("dbinfo").unwrap();
    assert_eq!(section.widgets.len(), 2);
    assert!(section.widgets.iter().all(|w| w.as_card().is_some()));
    let error = section.error.as_deref().unwrap();
    assert_eq!(error.split("; ").filter(|e| e.starts_with("Instances: ")).count(), 1);
    assert!(error.contains("Database: "));
    assert!(error.contains("fallback also failed"));
}

#[tokio::test]
async fn cancelled_before_start_is_an_error() {
    let cancel = CancellationToken::new();
    cancel.cancel();
    let result = inspector(ScriptedConnection::new())
        .inspect("db01", &["dbinfo"], &cancel)
        .await;
    assert!(matches!(result, Err(InspectError::Query(QueryError::Cancelled))));
}

#[tokio::test]
async fn module_timeout_is_reported_in_its_section() {
    let conn = Arc::new(ScriptedConnection::new().on(
        parameters::PARAMETERS_SQL,
        ScriptedResult::rows(&["NAME", "VALUE"], vec![vec![text("processes"), text("300")]])
            .with_delay(Duration::from_secs(30)),
    ));
    let aggregator = Aggregator::new(conn.clone(), &ExecutionConfig::default())
        .with_module_timeout(Duration::from_millis(50));
    let inspector = Inspector::new(conn, &InspectConfig::default()).with_aggregator(aggregator);

    let report = inspector
        .inspect("db01", &["parameters"], &CancellationToken::new())
        .await
        .unwrap();
    let error = report.sections[0].error.as_deref().unwrap();
    assert!(error.contains("timed out"), "{error}");
}

// ── Backup lead ─────────────────────────────────────────────────────────────

fn backup_conn(log_mode: ScriptedResult) -> Arc<ScriptedConnection> {
    Arc::new(
        ScriptedConnection::new()
            .on(backup::LOG_MODE_SQL, log_mode)
            .on(
                backup::BACKUP_SETS_SQL,
                ScriptedResult::rows(
                    &["SESSION_KEY", "STATUS", "OUTPUT_BYTES_DISPLAY"],
                    vec![vec![int(7), text("COMPLETED"), text("1048576")]],
                ),
            ),
    )
}

#[tokio::test]
async fn rman_view_failure_uses_backup_sets() {
    let conn = backup_conn(ScriptedResult::rows(&["LOG_MODE"], vec![vec![text("ARCHIVELOG")]]));
    let report = Inspector::new(conn, &InspectConfig::default())
        .inspect("db01", &["backup"], &CancellationToken::new())
        .await
        .unwrap();

    let section = report.section("backup").unwrap();
    assert_eq!(section.widgets[0].as_card().unwrap().value, "ARCHIVELOG");
    let jobs = section.widgets[1].as_table().unwrap();
    assert_eq!(jobs.rows[0][0], "7");
}

#[tokio::test]
async fn failed_lead_skips_backup_under_abort_policy() {
    let conn = backup_conn(ScriptedResult::error(QueryError::prepare(ORA_01031)));
    let execution = ExecutionConfig {
        failure_policy: FailurePolicy::AbortOnLeadFailure,
        ..ExecutionConfig::default()
    };
    let aggregator = Aggregator::new(conn.clone(), &execution);
    let report = Inspector::new(conn.clone(), &InspectConfig::default())
        .with_aggregator(aggregator)
        .inspect("db01", &["backup"], &CancellationToken::new())
        .await
        .unwrap();

    let section = report.section("backup").unwrap();
    assert_eq!(section.widgets.len(), 5);
    assert!(section.widgets[1].as_card().unwrap().value.contains("not attempted"));
    assert_eq!(conn.call_count(backup::BACKUP_SETS_SQL), 0);
}

#[tokio::test]
async fn failed_lead_is_isolated_by_default() {
    let conn = backup_conn(ScriptedResult::error(QueryError::prepare(ORA_01031)));
    let report = Inspector::new(conn.clone(), &InspectConfig::default())
        .inspect("db01", &["backup"], &CancellationToken::new())
        .await
        .unwrap();

    let section = report.section("backup").unwrap();
    assert!(section.widgets[1].as_table().is_some());
    assert_eq!(conn.call_count(backup::BACKUP_SETS_SQL), 1);
}

// ── Store and log ───────────────────────────────────────────────────────────

#[tokio::test]
async fn reports_are_stored_under_their_id() {
    let inspector = inspector(storage_conn());
    let report = inspector
        .inspect("db01", &["storage"], &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(report.id.len(), 32);
    assert!(report.id.chars().all(|c| c.is_ascii_hexdigit()));
    let stored = inspector.report(&report.id).expect("stored");
    assert_eq!(*stored, *report);

    let again = inspector
        .inspect("db01", &["storage"], &CancellationToken::new())
        .await
        .unwrap();
    assert_ne!(again.id, report.id);
}

#[tokio::test]
async fn query_log_records_every_subquery() {
    let inspector = inspector(storage_conn());
    inspector
        .inspect("db01", &["storage", "dbinfo"], &CancellationToken::new())
        .await
        .unwrap();

    let log = inspector.query_log();
    assert_eq!(log.count(), 8);
    assert_eq!(log.for_module("storage").count(), 6);
    assert_eq!(log.for_module("dbinfo").filter(|e| e.failed).count(), 2);
}

// ── Access probe ────────────────────────────────────────────────────────────

#[tokio::test]
async fn access_probe_classifies_each_view() {
    let conn = ScriptedConnection::new()
        .on(
            &probe_sql("v$database"),
            ScriptedResult::rows(&["PROBE"], vec![vec![int(1)]]),
        )
        .on(
            &probe_sql("dba_users"),
            ScriptedResult::error(QueryError::prepare(ORA_01031)),
        )
        .on(
            &probe_sql("v$session"),
            ScriptedResult::error(QueryError::Connection {
                message: "ORA-03113: end-of-file on communication channel".to_string(),
            }),
        );
    let results = inspector(conn)
        .check_access(
            &["v$database", "dba_users", "v$session", "v$asm_diskgroup"],
            &CancellationToken::new(),
        )
        .await;

    let views: Vec<&str> = results.iter().map(|r| r.view.as_str()).collect();
    assert_eq!(views, vec!["v$database", "dba_users", "v$session", "v$asm_diskgroup"]);
    assert!(results[0].is_accessible());
    assert_eq!(
        results[1].problem,
        Some(AccessProblem::Denied {
            code: "ORA-01031".to_string()
        })
    );
    assert!(matches!(results[2].problem, Some(AccessProblem::Failed { .. })));
    assert_eq!(
        results[3].problem,
        Some(AccessProblem::Denied {
            code: "ORA-00942".to_string()
        })
    );
}
