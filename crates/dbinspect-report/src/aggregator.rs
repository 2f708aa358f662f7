//! Partial-failure fan-out.
//!
//! Every sub-query of a module runs on the blocking pool, at most
//! `max_parallel` at a time. Results are joined into their declared slot.
//! A module-wide deadline cancels whatever is still running; those slots get
//! [`QueryError::TimedOut`]. No sub-query's failure reaches its siblings
//! unless the module opts into [`FailurePolicy::AbortOnLeadFailure`].

use std::sync::Arc;
use std::time::{Duration, Instant};

use dbinspect_core::config::{ExecutionConfig, FailurePolicy};
use dbinspect_core::{Cancellable, CancellationToken, DbConnection, QueryError};
use dbinspect_observability::events;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use crate::aggregate::{ModuleAggregate, SlotResult};
use crate::subquery::SubQuerySet;

/// Runs sub-query sets against one shared connection source.
#[derive(Clone)]
pub struct Aggregator {
    conn: Arc<dyn DbConnection>,
    max_parallel: usize,
    module_timeout: Duration,
    policy: FailurePolicy,
    retain_partial_rows: bool,
}

impl Aggregator {
    pub fn new(conn: Arc<dyn DbConnection>, config: &ExecutionConfig) -> Self {
        Self {
            conn,
            max_parallel: config.max_parallel_subqueries.max(1),
            module_timeout: config.module_timeout(),
            policy: config.failure_policy,
            retain_partial_rows: config.retain_partial_rows,
        }
    }

    pub fn with_max_parallel(mut self, max_parallel: usize) -> Self {
        self.max_parallel = max_parallel.max(1);
        self
    }

    pub fn with_module_timeout(mut self, timeout: Duration) -> Self {
        self.module_timeout = timeout;
        self
    }

    pub fn with_policy(mut self, policy: FailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Run every sub-query of `set` and collect one slot per sub-query.
    ///
    /// `cancel` is the caller's token; the module works on a child of it so a
    /// module timeout never cancels the caller.
    pub async fn aggregate(&self, set: &SubQuerySet, cancel: &CancellationToken) -> ModuleAggregate {
        let started = Instant::now();
        let module_cancel = cancel.child();
        let deadline = tokio::time::Instant::now() + self.module_timeout;
        let mut slots: Vec<Option<SlotResult>> = (0..set.len()).map(|_| None).collect();

        let mut pending: Vec<usize> = (0..set.len()).collect();
        if self.policy == FailurePolicy::AbortOnLeadFailure && set.has_lead && !set.is_empty() {
            self.run_batch(set, &[0], &module_cancel, deadline, &mut slots)
                .await;
            pending.remove(0);

            let lead_error = slots[0].as_ref().and_then(|s| s.error.clone());
            if let Some(err) = lead_error {
                let lead = &set.subqueries[0].name;
                events::module_aborted(&set.module, lead, &err.to_string());
                for idx in pending.drain(..) {
                    slots[idx] = Some(SlotResult::failed(
                        &set.subqueries[idx],
                        QueryError::Skipped {
                            reason: format!("lead sub-query {lead} failed"),
                        },
                    ));
                }
            }
        }
        self.run_batch(set, &pending, &module_cancel, deadline, &mut slots)
            .await;

        let slots: Vec<SlotResult> = slots
            .into_iter()
            .zip(&set.subqueries)
            .map(|(slot, subquery)| {
                slot.unwrap_or_else(|| {
                    SlotResult::failed(
                        subquery,
                        QueryError::Aborted {
                            message: "sub-query task ended without a result".to_string(),
                        },
                    )
                })
            })
            .collect();

        let elapsed = started.elapsed();
        let failed = slots.iter().filter(|s| s.error.is_some()).count();
        events::module_completed(&set.module, slots.len(), failed, elapsed.as_millis() as u64);

        ModuleAggregate {
            module: set.module.clone(),
            slots,
            elapsed,
        }
    }

    async fn run_batch(
        &self,
        set: &SubQuerySet,
        indices: &[usize],
        cancel: &CancellationToken,
        deadline: tokio::time::Instant,
        slots: &mut [Option<SlotResult>],
    ) {
        if indices.is_empty() {
            return;
        }

        let semaphore = Arc::new(Semaphore::new(self.max_parallel));
        let mut tasks = JoinSet::new();
        for &idx in indices {
            let subquery = set.subqueries[idx].clone();
            let conn = Arc::clone(&self.conn);
            let token = cancel.clone();
            let semaphore = Arc::clone(&semaphore);
            let module = set.module.clone();
            let retain = self.retain_partial_rows;

            tasks.spawn(async move {
                let permit = match semaphore.acquire_owned().await {
                    Ok(permit) => permit,
                    Err(e) => {
                        return (
                            idx,
                            Err(QueryError::Aborted {
                                message: e.to_string(),
                            }),
                        )
                    }
                };
                if token.is_cancelled() {
                    return (idx, Err(QueryError::Cancelled));
                }
                let outcome = tokio::task::spawn_blocking(move || {
                    let _permit = permit;
                    let _span = dbinspect_observability::subquery_span!(module, subquery.name)
                        .entered();
                    subquery.run(conn.as_ref(), &token, retain)
                })
                .await
                .map_err(|e| QueryError::Aborted {
                    message: e.to_string(),
                });
                (idx, outcome)
            });
        }

        let mut timed_out = false;
        loop {
            match tokio::time::timeout_at(deadline, tasks.join_next()).await {
                Ok(Some(Ok((idx, outcome)))) => {
                    let subquery = &set.subqueries[idx];
                    let slot = outcome.unwrap_or_else(|err| SlotResult::failed(subquery, err));
                    match &slot.error {
                        Some(err) => events::subquery_failed(&set.module, &slot.name, &err.to_string()),
                        None => events::subquery_completed(
                            &set.module,
                            &slot.name,
                            slot.rows.len(),
                            slot.skipped_rows,
                            slot.elapsed.as_millis() as u64,
                        ),
                    }
                    slots[idx] = Some(slot);
                }
                Ok(Some(Err(join_err))) => {
                    tracing::error!(module = %set.module, error = %join_err, "sub-query task failed");
                }
                Ok(None) => break,
                Err(_) => {
                    timed_out = true;
                    cancel.cancel();
                    events::module_timed_out(
                        &set.module,
                        tasks.len(),
                        self.module_timeout.as_millis() as u64,
                    );
                    tasks.abort_all();
                    break;
                }
            }
        }

        if timed_out {
            let elapsed_ms = self.module_timeout.as_millis() as u64;
            for &idx in indices {
                if slots[idx].is_none() {
                    slots[idx] = Some(SlotResult::failed(
                        &set.subqueries[idx],
                        QueryError::TimedOut { elapsed_ms },
                    ));
                }
            }
        }
    }
}
