/// Convenience result type used across the crate.
pub type VanishResult<T> = Result<T, VanishError>;

/// Top-level error taxonomy for capture, partitioning, rendering and animation.
///
/// Every failure aborts the current dissolve session; nothing in the crate retries.
#[derive(thiserror::Error, Debug)]
pub enum VanishError {
    /// The frame source has not produced a frame yet (zero width or height).
    #[error("source not ready: {0}")]
    SourceNotReady(String),

    /// A configuration value is out of range (e.g. a partition count of zero).
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Malformed buffers or misuse of a stateful API.
    #[error("validation error: {0}")]
    Validation(String),

    /// The animation step could not run or its tail task vanished.
    #[error("animation error: {0}")]
    Animation(String),

    /// Errors while compositing or encoding frames.
    #[error("render error: {0}")]
    Render(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl VanishError {
    /// Build a [`VanishError::SourceNotReady`] value.
    pub fn source_not_ready(msg: impl Into<String>) -> Self {
        Self::SourceNotReady(msg.into())
    }

    /// Build a [`VanishError::InvalidConfiguration`] value.
    pub fn invalid_configuration(msg: impl Into<String>) -> Self {
        Self::InvalidConfiguration(msg.into())
    }

    /// Build a [`VanishError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`VanishError::Animation`] value.
    pub fn animation(msg: impl Into<String>) -> Self {
        Self::Animation(msg.into())
    }

    /// Build a [`VanishError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`VanishError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
