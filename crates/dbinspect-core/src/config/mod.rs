//! Configuration for the report engine.
//! Every section is `#[serde(default)]`, so an empty TOML document is a valid config.

pub mod defaults;
pub mod execution_config;
pub mod inspect_config;
pub mod observability_config;
pub mod store_config;

pub use execution_config::{ExecutionConfig, FailurePolicy};
pub use inspect_config::InspectConfig;
pub use observability_config::ObservabilityConfig;
pub use store_config::StoreConfig;
