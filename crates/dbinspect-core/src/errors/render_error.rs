/// Errors raised while turning assembled widgets into transport-ready data.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RenderError {
    #[error("failed to serialize series {series}: {message}")]
    Serialization { series: String, message: String },
}
