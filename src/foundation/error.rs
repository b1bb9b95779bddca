/// Result alias used across the crate.
pub type ReelResult<T> = Result<T, ReelError>;

/// Error type for every fallible composition step.
///
/// Display strings carry a stable prefix so callers can surface them directly.
#[derive(thiserror::Error, Debug)]
pub enum ReelError {
    /// Invalid script or render configuration, raised before any work begins.
    #[error("validation error: {0}")]
    Validation(String),

    /// A required asset could not be read or decoded.
    #[error("asset error: {0}")]
    Asset(String),

    /// Frame generation or compositing failed.
    #[error("render error: {0}")]
    Render(String),

    /// The encoder rejected the stream or exited unsuccessfully.
    #[error("encode error: {0}")]
    Encode(String),

    /// JSON (de)serialization failed.
    #[error("serialization error: {0}")]
    Serde(String),

    /// No scene produced a clip, either because the script is empty or every scene was skipped.
    #[error("no video clips were produced: {0}")]
    NoClips(String),

    /// Anything else, with its source chain preserved.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ReelError {
    /// Build a [`ReelError::Validation`].
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`ReelError::Asset`].
    pub fn asset(msg: impl Into<String>) -> Self {
        Self::Asset(msg.into())
    }

    /// Build a [`ReelError::Render`].
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`ReelError::Encode`].
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    /// Build a [`ReelError::Serde`].
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// Build a [`ReelError::NoClips`].
    pub fn no_clips(msg: impl Into<String>) -> Self {
        Self::NoClips(msg.into())
    }
}

impl From<serde_json::Error> for ReelError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serde(e.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
