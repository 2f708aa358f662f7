//! Span constructors for the inspection pipeline.

/// Span covering one inspection run.
#[macro_export]
macro_rules! inspection_span {
    ($target:expr, $modules:expr) => {
        tracing::info_span!("inspection", target = %$target, modules = $modules)
    };
}

/// Span covering one module: fan-out, join and assembly.
#[macro_export]
macro_rules! module_span {
    ($module:expr) => {
        tracing::info_span!("module", module = %$module)
    };
}

/// Span covering one sub-query, including its fallback.
#[macro_export]
macro_rules! subquery_span {
    ($module:expr, $subquery:expr) => {
        tracing::debug_span!("subquery", module = %$module, subquery = %$subquery)
    };
}
