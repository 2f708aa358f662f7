//! The inspection modules.
//!
//! Every module is a [`SubQuerySet`] of typed sub-queries. SQL text lives
//! here as public constants, so tests can answer it from a scripted
//! connection.

pub mod backup;
pub mod dbinfo;
pub mod objects;
pub mod parameters;
pub mod performance;
pub mod security;
pub mod sessions;
pub mod storage;

use std::fmt::Display;

use dbinspect_report::SubQuerySet;

use crate::module_id::ModuleId;

/// Sub-queries of one module.
pub fn subqueries(module: ModuleId) -> SubQuerySet {
    match module {
        ModuleId::DbInfo => dbinfo::subqueries(),
        ModuleId::Parameters => parameters::subqueries(),
        ModuleId::Storage => storage::subqueries(),
        ModuleId::Sessions => sessions::subqueries(),
        ModuleId::Security => security::subqueries(),
        ModuleId::Backup => backup::subqueries(),
        ModuleId::Performance => performance::subqueries(),
        ModuleId::Objects => objects::subqueries(),
    }
}

/// Display form of a nullable column; null renders empty.
pub(crate) fn opt<T: Display>(value: &Option<T>) -> String {
    value.as_ref().map(ToString::to_string).unwrap_or_default()
}

/// Megabytes with two decimals.
pub(crate) fn mb(value: f64) -> String {
    format!("{value:.2}")
}
