//! The inspection facade: modules in, stored report out.

use std::sync::{Arc, Mutex};

use chrono::Utc;
use dbinspect_core::constants::SECTION_ERROR_SEPARATOR;
use dbinspect_core::{
    Cancellable, CancellationToken, DbConnection, InspectConfig, InspectResult, QueryError, Report,
    ReportStore, Section,
};
use dbinspect_observability::{events, inspection_span, module_span, QueryLog, QueryLogEntry};
use dbinspect_report::{generate_report_id, Aggregator, Assembler, ModuleAggregate, MokaReportStore};
use tracing::Instrument;

use crate::access::{self, ViewAccess};
use crate::module_id::ModuleId;
use crate::modules;

/// Runs inspection modules against one database and keeps the reports.
pub struct Inspector {
    aggregator: Aggregator,
    assembler: Assembler,
    store: Arc<dyn ReportStore>,
    query_log: Mutex<QueryLog>,
}

impl Inspector {
    pub fn new(conn: Arc<dyn DbConnection>, config: &InspectConfig) -> Self {
        Self {
            aggregator: Aggregator::new(conn, &config.execution),
            assembler: Assembler::new(),
            store: Arc::new(MokaReportStore::from_config(&config.store)),
            query_log: Mutex::new(QueryLog::new()),
        }
    }

    pub fn with_aggregator(mut self, aggregator: Aggregator) -> Self {
        self.aggregator = aggregator;
        self
    }

    pub fn with_assembler(mut self, assembler: Assembler) -> Self {
        self.assembler = assembler;
        self
    }

    pub fn with_store(mut self, store: Arc<dyn ReportStore>) -> Self {
        self.store = store;
        self
    }

    /// Inspect `target` with the named modules and store the report.
    ///
    /// Sections follow the order of `modules`. A module that fails, in whole
    /// or in part, still yields its section; an unknown name yields a section
    /// carrying only an error. Fails only when `cancel` is already cancelled.
    pub async fn inspect(
        &self,
        target: &str,
        modules: &[&str],
        cancel: &CancellationToken,
    ) -> InspectResult<Arc<Report>> {
        if cancel.is_cancelled() {
            return Err(QueryError::Cancelled.into());
        }

        let span = inspection_span!(target, modules.len());
        let sections = async {
            let mut sections = Vec::with_capacity(modules.len());
            for name in modules {
                sections.push(self.section(name, cancel).await);
            }
            sections
        }
        .instrument(span)
        .await;

        let generated_at = Utc::now();
        let report = Report {
            id: generate_report_id(target, generated_at),
            generated_at,
            target: target.to_string(),
            sections,
        };
        let failed = report.failed_sections().count();
        let report = self.store.put(report);
        events::report_stored(&report.id, report.sections.len(), failed);
        Ok(report)
    }

    /// A stored report, unless it expired or was evicted.
    pub fn report(&self, id: &str) -> Option<Arc<Report>> {
        self.store.get(id)
    }

    /// Snapshot of the sub-query log.
    pub fn query_log(&self) -> QueryLog {
        self.query_log
            .lock()
            .map(|log| log.clone())
            .unwrap_or_default()
    }

    /// Probe read access to `views`, one result per view in the given order.
    pub async fn check_access(&self, views: &[&str], cancel: &CancellationToken) -> Vec<ViewAccess> {
        let aggregate = self.aggregator.aggregate(&access::probes(views), cancel).await;
        aggregate.slots.iter().map(ViewAccess::from_slot).collect()
    }

    async fn section(&self, name: &str, cancel: &CancellationToken) -> Section {
        let module = match name.parse::<ModuleId>() {
            Ok(module) => module,
            Err(err) => {
                return Section {
                    id: name.trim().to_ascii_lowercase(),
                    name: name.trim().to_string(),
                    widgets: Vec::new(),
                    error: Some(err.to_string()),
                }
            }
        };

        let set = modules::subqueries(module);
        let aggregate = self
            .aggregator
            .aggregate(&set, cancel)
            .instrument(module_span!(module))
            .await;
        self.record(&aggregate);

        let errors = aggregate.error_messages();
        Section {
            id: module.as_str().to_string(),
            name: module.title().to_string(),
            widgets: self.assembler.assemble(&aggregate),
            error: (!errors.is_empty()).then(|| errors.join(SECTION_ERROR_SEPARATOR)),
        }
    }

    fn record(&self, aggregate: &ModuleAggregate) {
        let Ok(mut log) = self.query_log.lock() else {
            return;
        };
        for slot in &aggregate.slots {
            log.record(QueryLogEntry::new(
                &aggregate.module,
                &slot.name,
                slot.elapsed,
                slot.rows.len(),
                slot.skipped_rows,
                slot.error.is_some(),
            ));
        }
    }
}
