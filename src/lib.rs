//! # Synthbox - SoundFont synthesizers behind opaque handles
//!
//! Manages independent synthesizer instances for callers that can only
//! hold integers: scripting hosts, FFI consumers, plugin shells.
//!
//! ## Architecture
//!
//! Synthbox is an umbrella crate that coordinates:
//! - **synthbox-core** - Instance registry, lifecycle, command dispatch, audio drivers
//! - **synthbox-synth** - SoundFont engine (RustySynth) and shared SoundFont cache
//!
//! On top of those it provides [`SynthBridge`], the sentinel-valued boundary
//! surface, and (feature `capi`) an `extern "C"` ABI over it.
//!
//! ## Quick Start
//!
//! ```ignore
//! use synthbox::prelude::*;
//!
//! let system = SynthSystem::new(RustySynthBackend::new());
//! let piano = system.create_instance(SynthConfig::default())?;
//! system.load_soundfont(piano, "piano.sf2")?;
//! system.note_on(piano, 0, 60, 100)?;
//! system.destroy_instance(piano);
//! ```
//!
//! ## Feature Flags
//!
//! - `default` - SoundFont engine with device output
//! - `soundfont` - RustySynth engine
//! - `cpal` - Audio device output
//! - `capi` - C ABI (`synthbox_*` functions)

/// Re-export of synthbox-core for direct access
pub use synthbox_core as core;

pub use synthbox_core::{
    // Configuration
    AudioBackend,
    SynthConfig,
    SynthConfigBuilder,

    // Seams
    AudioDriver,
    AudioSource,
    SoundFontId,
    SynthBackend,
    SynthEngine,

    // Registry
    InstanceHandle,
    InstanceInfo,
    SynthSystem,

    EngineError,
};

// SoundFont engine
#[cfg(feature = "soundfont")]
pub use synthbox_synth as synth;

#[cfg(feature = "soundfont")]
pub use synthbox_synth::{RustySynthBackend, RustySynthEngine, SoundFontCache};

pub mod error;
pub use error::{Error, Result};

pub mod bridge;
pub use bridge::{SynthBridge, ALL_CHANNELS, INVALID_HANDLE, STATUS_FAILED, STATUS_OK};

#[cfg(feature = "capi")]
pub mod capi;

/// Convenience prelude for common imports
pub mod prelude {
    pub use crate::{
        AudioBackend, InstanceHandle, SynthBackend, SynthBridge, SynthConfig, SynthSystem,
    };

    #[cfg(feature = "soundfont")]
    pub use crate::RustySynthBackend;
}
