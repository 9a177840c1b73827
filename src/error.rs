use std::io;
use thiserror::Error;

/// Result type for audio operations
pub type AudioResult<T> = Result<T, AudioError>;

/// Error types for the denoising pipeline
#[derive(Error, Debug)]
pub enum AudioError {
    /// IO error (file operations, disk access)
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Unreadable or corrupt audio source
    #[error("decode error: {0}")]
    Decode(String),

    /// Filter cutoffs inconsistent with the sample rate
    #[error("invalid filter spec: {0}")]
    InvalidSpec(String),

    /// Zero-length input signal
    #[error("empty signal")]
    EmptySignal,

    /// Output sink unavailable or write failed
    #[error("write error: {0}")]
    Write(String),

    /// Invalid sample rate
    #[error("invalid sample rate: {rate}")]
    InvalidSampleRate {
        /// The invalid sample rate
        rate: u32,
    },

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),
}

impl From<symphonia::core::errors::Error> for AudioError {
    fn from(err: symphonia::core::errors::Error) -> Self {
        AudioError::Decode(err.to_string())
    }
}

impl From<hound::Error> for AudioError {
    fn from(err: hound::Error) -> Self {
        match err {
            hound::Error::IoError(e) => AudioError::Io(e),
            e => AudioError::Write(e.to_string()),
        }
    }
}
