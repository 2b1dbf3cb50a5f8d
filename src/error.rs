//! Centralized error type for the synthbox umbrella crate.
//!
//! Wraps all subsystem errors so `?` propagates naturally across crate boundaries.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Core(#[from] synthbox_core::Error),

    #[error("Engine: {0}")]
    Engine(#[from] synthbox_core::EngineError),

    #[cfg(feature = "soundfont")]
    #[error("Synth: {0}")]
    Synth(#[from] synthbox_synth::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
