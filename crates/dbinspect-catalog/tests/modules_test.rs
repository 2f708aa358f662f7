//! Module catalog: sub-query sets and record mapping against scripted rows.

use std::collections::HashSet;

use dbinspect_catalog::modules::{self, backup, dbinfo, parameters, performance, sessions, storage};
use dbinspect_catalog::{ModuleId, CRITICAL_VIEWS};
use dbinspect_core::{CancellationToken, Cell, QueryError, WidgetKind};
use dbinspect_report::{Assembler, ChartLayout, ModuleAggregate, Rows, SampleValue, SlotResult};
use regex::Regex;
use test_fixtures::{at, int, real, text, ScriptedConnection, ScriptedResult, ORA_00942};

fn run(conn: &ScriptedConnection, module: ModuleId, subquery: &str) -> SlotResult {
    let set = modules::subqueries(module);
    let sq = set
        .subqueries
        .iter()
        .find(|s| s.name == subquery)
        .expect("sub-query exists");
    sq.run(conn, &CancellationToken::new(), false)
}

// ── Catalog shape ───────────────────────────────────────────────────────────

#[test]
fn critical_views_cover_every_view_the_modules_read() {
    let source = Regex::new(r"(?i)\b(?:FROM|JOIN)\s+(?:sys\.)?([a-z_$]+)").unwrap();
    let listed: HashSet<&str> = CRITICAL_VIEWS.iter().copied().collect();
    let mut read = HashSet::new();
    for module in ModuleId::ALL {
        for sq in modules::subqueries(module).subqueries {
            let spec = &sq.spec;
            let statements = std::iter::once(&spec.sql)
                .chain(spec.fallback.iter())
                .chain(spec.union_parts.iter());
            for sql in statements {
                for caps in source.captures_iter(sql) {
                    read.insert(caps[1].to_ascii_lowercase());
                }
            }
        }
    }
    for view in &read {
        assert!(listed.contains(view.as_str()), "{view} is read but not probed");
    }
    for view in &listed {
        assert!(read.contains(*view), "{view} is probed but never read");
    }
}

#[test]
fn every_module_has_uniquely_named_subqueries() {
    for module in ModuleId::ALL {
        let set = modules::subqueries(module);
        assert_eq!(set.module, module.as_str());
        assert!(!set.is_empty(), "{module} has no sub-queries");
        let names: HashSet<&str> = set.subqueries.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names.len(), set.len(), "{module} repeats a sub-query name");
    }
}

#[test]
fn only_backup_declares_a_lead() {
    for module in ModuleId::ALL {
        let set = modules::subqueries(module);
        assert_eq!(set.has_lead, module == ModuleId::Backup, "{module}");
    }
    let backup = modules::subqueries(ModuleId::Backup);
    assert_eq!(backup.subqueries[0].name, "log_mode");
}

#[test]
fn performance_history_charts_each_metric_separately() {
    let set = modules::subqueries(ModuleId::Performance);
    let history = set.subqueries.iter().find(|s| s.name == "history").unwrap();
    assert_eq!(history.kind, WidgetKind::Chart);
    assert_eq!(history.layout, ChartLayout::PerSeries);
    for metric in performance::METRICS {
        assert!(performance::history_sql().contains(&format!("'{metric}'")));
    }
}

#[test]
fn rman_jobs_fall_back_to_backup_sets() {
    let set = modules::subqueries(ModuleId::Backup);
    let jobs = set.subqueries.iter().find(|s| s.name == "rman_jobs").unwrap();
    assert_eq!(jobs.spec.sql, backup::RMAN_JOBS_SQL);
    assert_eq!(jobs.spec.fallback.as_deref(), Some(backup::BACKUP_SETS_SQL));
}

// ── Record mapping ──────────────────────────────────────────────────────────

#[test]
fn null_parameter_value_renders_empty() {
    let conn = ScriptedConnection::new().on(
        parameters::PARAMETERS_SQL,
        ScriptedResult::rows(
            &["NAME", "VALUE"],
            vec![
                vec![text("processes"), text("300")],
                vec![text("db_domain"), Cell::Null],
            ],
        ),
    );
    let slot = run(&conn, ModuleId::Parameters, "non_default");
    assert!(slot.is_ok());
    match slot.rows {
        Rows::Table { headers, rows } => {
            assert_eq!(headers, vec!["Parameter", "Value"]);
            assert_eq!(rows[1], vec!["db_domain".to_string(), String::new()]);
        }
        other => panic!("expected table rows, got {other:?}"),
    }
}

#[test]
fn legacy_database_query_is_the_fallback() {
    let conn = ScriptedConnection::new()
        .on(
            dbinfo::DATABASE_SQL,
            ScriptedResult::error(QueryError::prepare("ORA-00904: \"CDB\": invalid identifier")),
        )
        .on(
            dbinfo::DATABASE_LEGACY_SQL,
            ScriptedResult::rows(
                &["DBID", "NAME", "LOG_MODE", "CDB"],
                vec![vec![int(1234), text("ORCL"), text("ARCHIVELOG"), text("NO")]],
            ),
        );
    let slot = run(&conn, ModuleId::DbInfo, "database");
    assert!(slot.is_ok());
    assert!(slot.used_fallback);
    match slot.rows {
        Rows::Cards(cards) => {
            let name = cards.iter().find(|c| c.title == "DB Name").unwrap();
            assert_eq!(name.value, "ORCL");
            let dbid = cards.iter().find(|c| c.title == "DBID").unwrap();
            assert_eq!(dbid.value, "1234");
        }
        other => panic!("expected cards, got {other:?}"),
    }
}

#[test]
fn missing_asm_view_reads_as_no_asm() {
    let conn = ScriptedConnection::new().on(
        storage::ASM_DISKGROUPS_SQL,
        ScriptedResult::error(QueryError::prepare(ORA_00942)),
    );
    let slot = run(&conn, ModuleId::Storage, "asm_diskgroups");
    assert!(slot.is_ok());
    assert!(slot.rows.is_empty());
}

#[test]
fn other_asm_failures_still_fail() {
    let conn = ScriptedConnection::new().on(
        storage::ASM_DISKGROUPS_SQL,
        ScriptedResult::error(QueryError::Connection {
            message: "ORA-03113: end-of-file on communication channel".to_string(),
        }),
    );
    let slot = run(&conn, ModuleId::Storage, "asm_diskgroups");
    assert!(slot.error.is_some());
}

#[test]
fn tablespaces_survive_a_failed_temporary_part() {
    let conn = ScriptedConnection::new().on(
        storage::TABLESPACES_SQL,
        ScriptedResult::rows(
            &["STATUS", "TABLESPACE_NAME", "CONTENTS", "USED_MB", "CURRENT_SIZE_MB", "PCT_USED"],
            vec![vec![
                text("ONLINE"),
                text("USERS"),
                text("PERMANENT"),
                real(50.0),
                real(100.0),
                text("  50.00%"),
            ]],
        ),
    );
    let slot = run(&conn, ModuleId::Storage, "tablespaces");
    assert!(slot.is_ok());
    match slot.rows {
        Rows::Table { rows, .. } => {
            assert_eq!(rows.len(), 1);
            assert_eq!(rows[0][1], "USERS");
            assert_eq!(rows[0][5], "50.00");
            assert_eq!(rows[0][7], "50.00%");
        }
        other => panic!("expected table rows, got {other:?}"),
    }
}

#[test]
fn session_history_parses_minute_timestamps() {
    let conn = ScriptedConnection::new().on(
        sessions::HISTORY_SQL,
        ScriptedResult::rows(
            &["SAMPLE_TIME", "SESSION_COUNT"],
            vec![
                vec![text("2024-01-01 10:00"), int(3)],
                vec![text("2024-01-01 10:01"), int(5)],
            ],
        ),
    );
    let slot = run(&conn, ModuleId::Sessions, "history");
    match &slot.rows {
        Rows::Series(samples) => {
            assert_eq!(samples.len(), 2);
            assert!(samples.iter().all(|s| s.series == sessions::HISTORY_SERIES));
            assert!(samples[0].x.is_some());
            assert_eq!(samples[1].y, SampleValue::Number(5.0));
        }
        other => panic!("expected series, got {other:?}"),
    }
}

#[test]
fn metric_history_renders_one_chart_per_metric() {
    let conn = ScriptedConnection::new().on(
        &performance::history_sql(),
        ScriptedResult::rows(
            &["BEGIN_TIME", "END_TIME", "METRIC_NAME", "METRIC_UNIT", "VALUE"],
            vec![
                vec![at(10, 0), at(11, 0), text("DB Time Per Sec"), text("CentiSeconds"), text("12.5")],
                vec![at(11, 0), at(12, 0), text("DB Time Per Sec"), text("CentiSeconds"), Cell::Null],
                vec![at(10, 0), at(11, 0), text("Host CPU Utilization (%)"), text("%"), real(40.0)],
            ],
        ),
    );
    let slot = run(&conn, ModuleId::Performance, "history");
    assert!(slot.is_ok());
    let aggregate = ModuleAggregate {
        module: "performance".to_string(),
        slots: vec![slot],
        elapsed: std::time::Duration::ZERO,
    };

    let widgets = Assembler::new().assemble(&aggregate);
    let ids: Vec<&str> = widgets
        .iter()
        .filter_map(|w| w.as_chart())
        .map(|c| c.id.as_str())
        .collect();
    assert_eq!(
        ids,
        vec![
            "chart-performance-history-db-time-per-sec",
            "chart-performance-history-host-cpu-utilization"
        ]
    );
    assert_eq!(widgets[0].as_chart().unwrap().series[0].points.len(), 1);
}
