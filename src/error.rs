//! Error types for AM03127 message encoding

use thiserror::Error;

/// Result type for AM03127 encoding operations
pub type Result<T> = std::result::Result<T, SignError>;

/// Errors raised while turning domain values into protocol bytes
///
/// A sign answering with something other than the expected acknowledgement
/// is not an error; see [`crate::encoding::FrameCodec::is_success`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SignError {
    /// A domain value has no protocol code (page 27, brightness 1.5, ...)
    #[error("Invalid value: {0}")]
    InvalidValue(String),

    /// A message field does not fit its fixed-width template slot
    #[error("Invalid field: {0}")]
    InvalidField(String),
}

impl SignError {
    /// Create a new InvalidValue error
    pub fn invalid_value(msg: impl Into<String>) -> Self {
        SignError::InvalidValue(msg.into())
    }

    /// Create a new InvalidField error
    pub fn invalid_field(msg: impl Into<String>) -> Self {
        SignError::InvalidField(msg.into())
    }
}
