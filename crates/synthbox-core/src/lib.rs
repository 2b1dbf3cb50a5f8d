//! Handle-based lifecycle core for synthesizer instances.
//!
//! Callers that cannot hold native references (FFI, scripting hosts) address
//! each synthesizer through an opaque integer [`InstanceHandle`]. This crate
//! owns the mapping from handle to the {configuration, engine, driver} triple
//! and guarantees that a handle either resolves to a fully built instance or
//! is rejected.
//!
//! # Primary API
//!
//! - [`SynthSystem`]: registry, lifecycle and command dispatch behind one guard
//! - [`SynthConfig`] / [`SynthConfigBuilder`]: per-instance configuration
//! - [`SynthBackend`], [`SynthEngine`], [`AudioDriver`]: seams to the engine
//!   and audio output that the core drives
//!
//! # Example
//!
//! ```ignore
//! use synthbox_core::{SynthConfig, SynthSystem};
//!
//! let system = SynthSystem::new(backend);
//! let handle = system.create_instance(SynthConfig::default())?;
//! system.load_soundfont(handle, "piano.sf2")?;
//! system.note_on(handle, 0, 60, 100)?;
//! system.destroy_instance(handle);
//! ```
//!
//! # Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `cpal` | Audio device output via CPAL (default) |

pub mod error;
pub use error::{EngineError, Error, Result};

mod config;
pub use config::{
    AudioBackend, SynthConfig, SynthConfigBuilder, DEFAULT_GAIN, DEFAULT_MIDI_CHANNELS,
    DEFAULT_PERIOD_COUNT, DEFAULT_PERIOD_SIZE, DEFAULT_POLYPHONY, DEFAULT_SAMPLE_RATE,
};

mod handle;
pub use handle::InstanceHandle;

mod backend;
pub use backend::{AudioDriver, AudioSource, SoundFontId, SynthBackend, SynthEngine};

mod instance;
mod registry;

mod system;
pub use system::{InstanceInfo, SynthSystem};

mod dispatch;
pub use dispatch::{CC_CHANNEL_VOLUME, PITCH_BEND_CENTER};

mod lifecycle;

pub mod output;

#[cfg(test)]
mod testing;
