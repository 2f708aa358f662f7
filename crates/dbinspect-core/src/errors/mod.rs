//! Error handling for dbinspect.
//! One error enum per subsystem, `thiserror` only.

pub mod config_error;
pub mod inspect_error;
pub mod projection_error;
pub mod query_error;
pub mod render_error;

pub use config_error::ConfigError;
pub use inspect_error::{InspectError, InspectResult};
pub use projection_error::ProjectionError;
pub use query_error::QueryError;
pub use render_error::RenderError;
