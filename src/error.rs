//! Error handling for Cueline
//!
//! Most failures inside the scheduler are recovered locally (an invalid
//! clip is skipped, a double stop is a no-op). Only failures at the crate
//! boundary (decode, device scheduling, serialization) become errors.

use thiserror::Error;

/// Result type alias for Cueline operations
pub type Result<T> = std::result::Result<T, CuelineError>;

/// Main error type for Cueline operations
#[derive(Error, Debug)]
pub enum CuelineError {
    // Decode Errors
    #[error("File not found: {path}")]
    FileNotFound {
        path: String,
        #[source]
        source: Option<std::io::Error>,
    },

    #[error("Invalid audio file: {reason}")]
    InvalidAudio {
        reason: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Unsupported audio format: {format}")]
    UnsupportedFormat { format: String },

    #[error("Audio contains no samples")]
    EmptyAudio,

    // Scheduling Errors
    #[error("Device rejected schedule request: {reason}")]
    InvalidSchedule { reason: String },

    // I/O Errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // Serialization Errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl CuelineError {
    /// Get the error code for this error type
    pub fn error_code(&self) -> &'static str {
        match self {
            CuelineError::FileNotFound { .. } => "FILE_NOT_FOUND",
            CuelineError::InvalidAudio { .. } => "INVALID_AUDIO",
            CuelineError::UnsupportedFormat { .. } => "UNSUPPORTED_FORMAT",
            CuelineError::EmptyAudio => "EMPTY_AUDIO",
            CuelineError::InvalidSchedule { .. } => "INVALID_SCHEDULE",
            CuelineError::Io(_) => "IO_ERROR",
            CuelineError::Serialization(_) => "SERIALIZATION_ERROR",
        }
    }

    /// Check if this error is recoverable
    ///
    /// Recoverable errors leave the engine in a usable state: the caller can
    /// retry decode, fix the clip, or continue with the rest of the timeline.
    pub fn is_recoverable(&self) -> bool {
        match self {
            CuelineError::FileNotFound { .. } => true,
            CuelineError::InvalidAudio { .. } => true,
            CuelineError::UnsupportedFormat { .. } => true,
            CuelineError::EmptyAudio => true,
            CuelineError::InvalidSchedule { .. } => true,
            _ => false,
        }
    }
}
