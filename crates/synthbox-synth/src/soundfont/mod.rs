//! SoundFont synthesis via RustySynth.

mod backend;
mod cache;
mod engine;
#[cfg(test)]
pub(crate) mod fixture;

pub use backend::{version, RustySynthBackend};
pub use cache::SoundFontCache;
pub use engine::{RustySynthEngine, MAX_MIDI_CHANNELS, POLYPHONY_RANGE, SAMPLE_RATE_RANGE};
