//! Error types for the scratch card pipeline.

use thiserror::Error;

/// Everything that can stop a card from being built or measured.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScratchError {
    /// A required option is missing or has the wrong shape.
    /// Raised before any DOM mutation happens.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// No 2D drawing context. The overlay stays on screen as a styled box.
    #[error("unsupported renderer: {0}")]
    UnsupportedRenderer(String),

    /// The background image could not be loaded.
    #[error("image load failed: {0}")]
    LoadFailed(String),

    /// A pixel read returned a buffer that is not whole RGBA quads.
    #[error("pixel buffer of {0} bytes is not a multiple of 4")]
    MalformedPixels(usize),

    /// The host environment rejected an operation.
    #[error("host error: {0}")]
    Host(String),
}

impl ScratchError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidConfiguration(msg.into())
    }

    pub fn host(msg: impl Into<String>) -> Self {
        Self::Host(msg.into())
    }
}

/// Result type for scratch card operations.
pub type Result<T> = std::result::Result<T, ScratchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_carry_the_reason() {
        let err = ScratchError::invalid("Param [imgSrc] must be given and must be a string.");
        assert_eq!(
            err.to_string(),
            "invalid configuration: Param [imgSrc] must be given and must be a string."
        );
        assert_eq!(
            ScratchError::MalformedPixels(7).to_string(),
            "pixel buffer of 7 bytes is not a multiple of 4"
        );
    }
}
