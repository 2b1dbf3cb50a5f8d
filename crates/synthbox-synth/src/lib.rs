//! SoundFont synthesis engine for synthbox.
//!
//! Implements the [`synthbox_core::SynthBackend`] seam on top of RustySynth:
//!
//! - **[`RustySynthBackend`]** - Creates one engine per instance, sharing parsed SoundFonts
//! - **[`RustySynthEngine`]** - SoundFont stack, MIDI commands and master gain
//! - **[`SoundFontCache`]** - Parsed `.sf2` files keyed by path
//!
//! # Quick Start
//!
//! ```ignore
//! use synthbox_core::{SynthConfig, SynthSystem};
//! use synthbox_synth::RustySynthBackend;
//!
//! let system = SynthSystem::new(RustySynthBackend::new());
//! let handle = system.create_instance(SynthConfig::default())?;
//! system.load_soundfont(handle, "piano.sf2")?;
//! ```
//!
//! # Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `cpal` | Device output for created instances (default) |

pub mod error;
pub use error::{Error, Result};

mod soundfont;

pub use soundfont::{
    version, RustySynthBackend, RustySynthEngine, SoundFontCache, MAX_MIDI_CHANNELS,
    POLYPHONY_RANGE, SAMPLE_RATE_RANGE,
};
