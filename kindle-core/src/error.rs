/// Errors produced by the `kindle-core` crate.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum CoreError {
    /// An instance identifier was empty or contained whitespace or control characters.
    #[error("invalid instance id {value:?}: {reason}")]
    InvalidInstanceId { value: String, reason: &'static str },

    /// A startup event could not be decoded.
    #[error("invalid startup event: {0}")]
    InvalidEvent(#[from] serde_json::Error),
}
