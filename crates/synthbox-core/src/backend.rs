//! Seams to the external synthesis engine and audio output subsystem.
//!
//! The core never names a concrete engine. A [`SynthBackend`] constructs the
//! engine and driver objects for each instance; everything afterwards goes
//! through the narrow [`SynthEngine`] command interface.

use crate::config::SynthConfig;
use crate::error::EngineError;
use core::fmt;
use std::path::Path;
use std::sync::Arc;

/// Engine-assigned id of a loaded SoundFont.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SoundFontId(u32);

impl SoundFontId {
    pub fn new(id: u32) -> Self {
        Self(id)
    }

    pub fn get(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for SoundFontId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Stereo audio pulled by a driver on its own thread.
///
/// Called from the real-time thread, outside the registry guard. Implementations
/// must not block for long; a contended render should produce silence.
pub trait AudioSource: Send + Sync {
    /// Fill both buffers (same length) with the next block of audio.
    fn render(&self, left: &mut [f32], right: &mut [f32]);
}

/// Control interface of one synthesis engine.
///
/// Range checking of channels, keys and values is the engine's concern.
pub trait SynthEngine: Send {
    fn load_soundfont(&mut self, path: &Path, update_presets: bool)
        -> Result<SoundFontId, EngineError>;

    fn soundfont_count(&self) -> usize;

    fn note_on(&mut self, channel: i32, key: i32, velocity: i32) -> Result<(), EngineError>;

    fn note_off(&mut self, channel: i32, key: i32) -> Result<(), EngineError>;

    fn program_change(&mut self, channel: i32, program: i32) -> Result<(), EngineError>;

    fn control_change(&mut self, channel: i32, controller: i32, value: i32)
        -> Result<(), EngineError>;

    /// 14-bit pitch bend, 8192 is centre.
    fn pitch_bend(&mut self, channel: i32, value: i32) -> Result<(), EngineError>;

    /// Release held notes on one channel, or on all channels for `None`.
    fn all_notes_off(&mut self, channel: Option<i32>) -> Result<(), EngineError>;

    fn set_master_gain(&mut self, gain: f32) -> Result<(), EngineError>;

    fn master_gain(&self) -> f32;

    /// Source the audio driver pulls rendered audio from.
    fn audio_source(&self) -> Arc<dyn AudioSource>;
}

/// A running audio output binding. Dropping it stops output and releases the source.
pub trait AudioDriver: Send {
    fn backend_name(&self) -> &str;

    fn sample_rate(&self) -> u32;

    fn is_running(&self) -> bool {
        true
    }
}

/// Factory for the engine and driver objects of each instance.
pub trait SynthBackend: Send + Sync {
    fn create_engine(&self, config: &SynthConfig) -> Result<Box<dyn SynthEngine>, EngineError>;

    /// Bind an output driver to an engine's audio source.
    ///
    /// Default: the driver selected by `config.audio_backend`.
    fn create_driver(
        &self,
        config: &SynthConfig,
        source: Arc<dyn AudioSource>,
    ) -> Result<Box<dyn AudioDriver>, EngineError> {
        crate::output::open_driver(config, source)
    }

    /// Version string of the linked engine.
    fn version(&self) -> String;
}
