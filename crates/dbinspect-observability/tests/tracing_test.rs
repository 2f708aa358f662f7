use dbinspect_core::config::ObservabilityConfig;
use dbinspect_observability::{events, init_tracing};

#[test]
fn init_tracing_is_idempotent() {
    let config = ObservabilityConfig::default();
    init_tracing(&config);
    init_tracing(&config);
    events::report_stored("abc", 2, 0);
}
