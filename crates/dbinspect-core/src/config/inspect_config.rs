//! Top-level configuration with layered resolution.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{ExecutionConfig, FailurePolicy, ObservabilityConfig, StoreConfig};
use crate::errors::ConfigError;

/// Top-level configuration aggregating all sub-configs.
///
/// Resolution order (highest priority first):
/// 1. Environment variables (`DBINSPECT_*`)
/// 2. Config file passed to [`InspectConfig::load`]
/// 3. Compiled defaults
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct InspectConfig {
    pub execution: ExecutionConfig,
    pub store: StoreConfig,
    pub observability: ObservabilityConfig,
}

impl InspectConfig {
    /// Load configuration from an optional TOML file, apply environment
    /// overrides, then validate.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        Self::apply_env_overrides(&mut config);
        Self::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a TOML string (for testing).
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml_str).map_err(|e| ConfigError::ParseError {
            path: "<string>".to_string(),
            message: e.to_string(),
        })
    }

    fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.display().to_string(),
        })?;
        toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }

    /// Validate the configuration values.
    pub fn validate(config: &InspectConfig) -> Result<(), ConfigError> {
        if config.execution.max_parallel_subqueries == 0 {
            return Err(ConfigError::ValidationFailed {
                field: "execution.max_parallel_subqueries".to_string(),
                message: "must be greater than 0".to_string(),
            });
        }
        if config.execution.module_timeout_secs == 0 {
            return Err(ConfigError::ValidationFailed {
                field: "execution.module_timeout_secs".to_string(),
                message: "must be greater than 0".to_string(),
            });
        }
        if config.execution.pool_size == 0 {
            return Err(ConfigError::ValidationFailed {
                field: "execution.pool_size".to_string(),
                message: "must be greater than 0".to_string(),
            });
        }
        if config.store.max_reports == 0 {
            return Err(ConfigError::ValidationFailed {
                field: "store.max_reports".to_string(),
                message: "must be greater than 0".to_string(),
            });
        }
        if config.store.ttl_secs == 0 {
            return Err(ConfigError::ValidationFailed {
                field: "store.ttl_secs".to_string(),
                message: "must be greater than 0".to_string(),
            });
        }
        Ok(())
    }

    /// Apply environment variable overrides.
    /// Pattern: `DBINSPECT_MAX_PARALLEL_SUBQUERIES`, `DBINSPECT_STORE_TTL_SECS`, etc.
    /// Unparseable values are ignored.
    fn apply_env_overrides(config: &mut InspectConfig) {
        if let Ok(val) = std::env::var("DBINSPECT_MAX_PARALLEL_SUBQUERIES") {
            if let Ok(v) = val.parse::<usize>() {
                config.execution.max_parallel_subqueries = v;
            }
        }
        if let Ok(val) = std::env::var("DBINSPECT_MODULE_TIMEOUT_SECS") {
            if let Ok(v) = val.parse::<u64>() {
                config.execution.module_timeout_secs = v;
            }
        }
        if let Ok(val) = std::env::var("DBINSPECT_POOL_SIZE") {
            if let Ok(v) = val.parse::<usize>() {
                config.execution.pool_size = v;
            }
        }
        if let Ok(val) = std::env::var("DBINSPECT_FAILURE_POLICY") {
            match val.to_ascii_lowercase().as_str() {
                "isolate" => config.execution.failure_policy = FailurePolicy::Isolate,
                "abort_on_lead_failure" => {
                    config.execution.failure_policy = FailurePolicy::AbortOnLeadFailure
                }
                _ => {}
            }
        }
        if let Ok(val) = std::env::var("DBINSPECT_STORE_MAX_REPORTS") {
            if let Ok(v) = val.parse::<u64>() {
                config.store.max_reports = v;
            }
        }
        if let Ok(val) = std::env::var("DBINSPECT_STORE_TTL_SECS") {
            if let Ok(v) = val.parse::<u64>() {
                config.store.ttl_secs = v;
            }
        }
        if let Ok(val) = std::env::var("DBINSPECT_LOG_JSON") {
            if let Ok(v) = val.parse::<bool>() {
                config.observability.json = v;
            }
        }
    }

    /// Serialize the config back to TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ParseError {
            path: "<serialization>".to_string(),
            message: e.to_string(),
        })
    }
}
