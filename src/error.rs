//! Structured error types for xlscene.
//!
//! Per-element failures during reconstruction are recovered by the driver;
//! these types exist so the recovery points have something structured to log.

/// All errors that can occur while parsing a layout document or
/// reconstructing it against a scene store.
#[derive(Debug, thiserror::Error)]
pub enum XlsceneError {
    /// Layout document deserialization error.
    #[error("Document parsing: {0}")]
    Document(#[from] serde_json::Error),

    /// Drawing anchor missing required fields or unresolvable.
    #[error("Invalid anchor: {0}")]
    Anchor(String),

    /// Image payload missing, undecodable, or not base64.
    #[error("Image payload: {0}")]
    Image(String),

    /// Color string that could not be parsed as #RRGGBB.
    #[error("Invalid color: {0}")]
    Color(String),

    /// Scene store rejected an object or asset.
    #[error("Scene store: {0}")]
    Store(String),

    /// Catch-all for string errors.
    #[error("{0}")]
    Other(String),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, XlsceneError>;

impl From<String> for XlsceneError {
    fn from(s: String) -> Self {
        Self::Other(s)
    }
}

impl From<&str> for XlsceneError {
    fn from(s: &str) -> Self {
        Self::Other(s.to_string())
    }
}

impl From<base64::DecodeError> for XlsceneError {
    fn from(e: base64::DecodeError) -> Self {
        Self::Image(e.to_string())
    }
}
