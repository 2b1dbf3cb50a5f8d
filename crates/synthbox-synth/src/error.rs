//! Error types for synthbox-synth.

use synthbox_core::EngineError;
use thiserror::Error;

/// Result type alias for synthbox-synth operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in synthbox-synth.
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error (file operations).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid configuration parameter.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Argument outside the range the synthesizer accepts.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Command needs a SoundFont and none is loaded.
    #[error("No SoundFont loaded")]
    NoSoundFont,

    /// SoundFont loading or playback error.
    #[error("SoundFont error: {0}")]
    SoundFont(String),
}

impl From<Error> for EngineError {
    fn from(e: Error) -> Self {
        match e {
            Error::Io(e) => EngineError::Io(e),
            Error::InvalidConfig(msg) => EngineError::InvalidSettings(msg),
            Error::InvalidArgument(msg) => EngineError::InvalidArgument(msg),
            Error::NoSoundFont => EngineError::NoSoundFont,
            Error::SoundFont(msg) => EngineError::SoundFont(msg),
        }
    }
}
