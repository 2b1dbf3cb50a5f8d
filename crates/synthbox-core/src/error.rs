//! Error types for synthbox-core.

use crate::handle::InstanceHandle;
use thiserror::Error;

/// Errors reported by a synthesis engine or an audio driver.
///
/// These come from the external collaborators behind [`SynthBackend`](crate::SynthBackend)
/// and are forwarded verbatim; the core never retries them.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Invalid settings: {0}")]
    InvalidSettings(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("No SoundFont loaded")]
    NoSoundFont,

    #[error("SoundFont error: {0}")]
    SoundFont(String),

    #[error("Audio device error: {0}")]
    Device(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Error type for synthbox-core operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration, engine or driver construction failed.
    #[error("Failed to allocate synthesizer: {0}")]
    AllocationFailure(#[source] EngineError),

    /// The handle is unknown or was already destroyed.
    #[error("Synthesizer {0} not found")]
    NotFound(InstanceHandle),

    /// Malformed input rejected before reaching the engine.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The engine rejected an otherwise well-formed command.
    #[error("Engine rejected command: {0}")]
    Engine(#[source] EngineError),

    /// A freshly allocated handle was already registered.
    #[error("Duplicate synthesizer handle {0}")]
    DuplicateHandle(InstanceHandle),
}

impl Error {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

/// Result type alias.
pub type Result<T> = core::result::Result<T, Error>;
