//! Fan-out, join, deadline and failure isolation.

use std::sync::Arc;
use std::time::{Duration, Instant};

use dbinspect_core::config::{ExecutionConfig, FailurePolicy};
use dbinspect_core::{Cancellable, CancellationToken, QueryError};
use dbinspect_query::record;
use dbinspect_report::{Aggregator, SubQuery, SubQuerySet, TableRow};
use test_fixtures::{int, text, ScriptedConnection, ScriptedResult, ORA_00942};

record! {
    #[derive(Debug, Default, Clone)]
    pub struct NameRow {
        pub name: String,
        pub total: Option<i64>,
    }
}

impl TableRow for NameRow {
    fn headers() -> Vec<&'static str> {
        vec!["Name", "Total"]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.name.clone(),
            self.total.map(|t| t.to_string()).unwrap_or_default(),
        ]
    }
}

fn rows(n: usize) -> ScriptedResult {
    ScriptedResult::rows(
        &["NAME", "TOTAL"],
        (0..n).map(|i| vec![text(&format!("row{i}")), int(i as i64)]).collect(),
    )
}

fn q(i: usize) -> String {
    format!("SELECT name, total FROM v{i}")
}

fn set_of(n: usize) -> SubQuerySet {
    SubQuerySet::new(
        "storage",
        (1..=n)
            .map(|i| SubQuery::table::<NameRow>(&format!("q{i}"), &format!("Query {i}"), q(i).as_str()))
            .collect(),
    )
}

fn aggregator(conn: ScriptedConnection) -> (Arc<ScriptedConnection>, Aggregator) {
    let conn = Arc::new(conn);
    let aggregator = Aggregator::new(conn.clone(), &ExecutionConfig::default());
    (conn, aggregator)
}

// ── Independence ────────────────────────────────────────────────────────────

#[tokio::test]
async fn one_failure_never_stops_siblings() {
    let (conn, aggregator) = aggregator(
        ScriptedConnection::new()
            .on(&q(1), rows(1))
            .on(&q(2), ScriptedResult::error(QueryError::prepare(ORA_00942)))
            .on(&q(3), rows(3))
            .on(&q(4), rows(4)),
    );

    let aggregate = aggregator.aggregate(&set_of(4), &CancellationToken::new()).await;

    assert_eq!(aggregate.slots.len(), 4);
    for i in 1..=4 {
        assert_eq!(conn.call_count(&q(i)), 1, "q{i} must run");
    }
    assert!(aggregate.slots[0].is_ok());
    assert!(aggregate.slots[1].error.as_ref().unwrap().to_string().contains("ORA-00942"));
    assert!(aggregate.slots[1].rows.is_empty());
    assert_eq!(aggregate.slots[2].rows.len(), 3);
    assert_eq!(aggregate.slots[3].rows.len(), 4);
}

#[tokio::test]
async fn slots_keep_declared_order_regardless_of_completion_order() {
    let (_conn, aggregator) = aggregator(
        ScriptedConnection::new()
            .on(&q(1), rows(1).with_delay(Duration::from_millis(80)))
            .on(&q(2), rows(2))
            .on(&q(3), rows(3)),
    );

    let aggregate = aggregator.aggregate(&set_of(3), &CancellationToken::new()).await;
    let names: Vec<&str> = aggregate.slots.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["q1", "q2", "q3"]);
    assert_eq!(aggregate.slot("q1").unwrap().rows.len(), 1);
}

#[tokio::test]
async fn parallelism_bound_of_one_runs_sequentially() {
    let delay = Duration::from_millis(40);
    let (_conn, aggregator) = aggregator(
        ScriptedConnection::new()
            .on(&q(1), rows(1).with_delay(delay))
            .on(&q(2), rows(1).with_delay(delay))
            .on(&q(3), rows(1).with_delay(delay)),
    );
    let aggregator = aggregator.with_max_parallel(1);

    let started = Instant::now();
    let aggregate = aggregator.aggregate(&set_of(3), &CancellationToken::new()).await;
    assert!(started.elapsed() >= delay * 3);
    assert!(aggregate.slots.iter().all(|s| s.is_ok()));
}

// ── Deadline and cancellation ───────────────────────────────────────────────

#[tokio::test]
async fn module_timeout_marks_only_pending_slots() {
    let (_conn, aggregator) = aggregator(
        ScriptedConnection::new()
            .on(&q(1), rows(2))
            .on(&q(2), rows(1).with_delay(Duration::from_secs(30))),
    );
    let aggregator = aggregator.with_module_timeout(Duration::from_millis(200));
    let caller = CancellationToken::new();

    let started = Instant::now();
    let aggregate = aggregator.aggregate(&set_of(2), &caller).await;

    assert!(started.elapsed() < Duration::from_secs(5));
    assert_eq!(aggregate.slots[0].rows.len(), 2);
    assert!(matches!(
        aggregate.slots[1].error,
        Some(QueryError::TimedOut { .. })
    ));
    assert!(!caller.is_cancelled(), "module timeout must not cancel the caller");
}

#[tokio::test]
async fn caller_cancellation_reaches_every_slot() {
    let (conn, aggregator) = aggregator(
        ScriptedConnection::new()
            .on(&q(1), rows(1))
            .on(&q(2), rows(1)),
    );
    let caller = CancellationToken::new();
    caller.cancel();

    let aggregate = aggregator.aggregate(&set_of(2), &caller).await;
    assert!(aggregate
        .slots
        .iter()
        .all(|s| s.error == Some(QueryError::Cancelled)));
    assert!(conn.calls().is_empty());
}

// ── Failure policy ──────────────────────────────────────────────────────────

fn lead_fails() -> ScriptedConnection {
    ScriptedConnection::new()
        .on(&q(1), ScriptedResult::error(QueryError::prepare(ORA_00942)))
        .on(&q(2), rows(2))
        .on(&q(3), rows(3))
}

#[tokio::test]
async fn isolate_policy_ignores_lead_failure() {
    let (conn, aggregator) = aggregator(lead_fails());
    let aggregate = aggregator
        .aggregate(&set_of(3).with_lead(), &CancellationToken::new())
        .await;

    assert!(aggregate.slots[0].error.is_some());
    assert!(aggregate.slots[1].is_ok());
    assert!(aggregate.slots[2].is_ok());
    assert_eq!(conn.call_count(&q(3)), 1);
}

#[tokio::test]
async fn abort_on_lead_failure_skips_the_rest_but_fills_every_slot() {
    let (conn, aggregator) = aggregator(lead_fails());
    let aggregator = aggregator.with_policy(FailurePolicy::AbortOnLeadFailure);
    let aggregate = aggregator
        .aggregate(&set_of(3).with_lead(), &CancellationToken::new())
        .await;

    assert_eq!(aggregate.slots.len(), 3);
    assert!(matches!(
        aggregate.slots[1].error,
        Some(QueryError::Skipped { .. })
    ));
    assert!(matches!(
        aggregate.slots[2].error,
        Some(QueryError::Skipped { .. })
    ));
    assert_eq!(conn.call_count(&q(2)), 0);
}

#[tokio::test]
async fn abort_policy_without_declared_lead_isolates() {
    let (conn, aggregator) = aggregator(lead_fails());
    let aggregator = aggregator.with_policy(FailurePolicy::AbortOnLeadFailure);
    let aggregate = aggregator.aggregate(&set_of(3), &CancellationToken::new()).await;

    assert!(aggregate.slots[1].is_ok());
    assert_eq!(conn.call_count(&q(2)), 1);
}

// ── Tolerated failures ──────────────────────────────────────────────────────

#[tokio::test]
async fn tolerated_error_becomes_empty_result() {
    let (_conn, aggregator) = aggregator(
        ScriptedConnection::new().on(&q(1), ScriptedResult::error(QueryError::prepare(ORA_00942))),
    );
    let set = SubQuerySet::new(
        "storage",
        vec![SubQuery::table::<NameRow>("asm", "ASM", q(1).as_str())
            .tolerating(|err| err.to_string().contains("ORA-00942"))],
    );

    let aggregate = aggregator.aggregate(&set, &CancellationToken::new()).await;
    assert!(aggregate.slots[0].is_ok());
    assert!(aggregate.slots[0].rows.is_empty());
}
