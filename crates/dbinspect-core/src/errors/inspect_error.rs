use super::{ConfigError, ProjectionError, QueryError, RenderError};

/// Top-level error for the dbinspect report engine.
#[derive(Debug, thiserror::Error)]
pub enum InspectError {
    #[error("query error: {0}")]
    Query(#[from] QueryError),

    #[error("projection error: {0}")]
    Projection(#[from] ProjectionError),

    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    #[error("render error: {0}")]
    Render(#[from] RenderError),

    #[error("unknown module: {name}")]
    UnknownModule { name: String },
}

/// Convenience alias.
pub type InspectResult<T> = Result<T, InspectError>;
