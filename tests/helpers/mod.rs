//! Test helpers and fixtures for synthbox integration tests
//!
//! [`FakeBackend`] stands in for the SoundFont engine and the audio device so
//! lifecycle and dispatch behaviour can be checked without hardware. Every
//! engine and driver gets the id of the engine it was built for, and all
//! activity lands in one shared journal.
//!
//! [`write_soundfont`] provides a real `.sf2` for the RustySynth tests.

#![allow(dead_code, unused_imports)]

use parking_lot::Mutex;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Arc;
use synthbox::{
    AudioBackend, AudioDriver, AudioSource, EngineError, SoundFontId, SynthBackend, SynthConfig,
    SynthEngine, SynthSystem,
};

/// Float tolerance for gain round trips.
pub const GAIN_EPSILON: f32 = 1e-6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    EngineCreated(u32),
    DriverCreated(u32),
    DriverDropped(u32),
    EngineDropped(u32),
    Command(u32, &'static str),
}

type Journal = Arc<Mutex<Vec<Event>>>;

/// Scripted backend recording engine calls and release order.
#[derive(Default)]
pub struct FakeBackend {
    journal: Journal,
    next_engine: AtomicU32,
    fail_engine: AtomicBool,
    fail_driver: AtomicBool,
    panic_on_note: AtomicBool,
}

impl FakeBackend {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn fail_engine(&self, fail: bool) {
        self.fail_engine.store(fail, Ordering::SeqCst);
    }

    pub fn fail_driver(&self, fail: bool) {
        self.fail_driver.store(fail, Ordering::SeqCst);
    }

    /// Make every `note_on` panic inside the engine.
    pub fn panic_on_note(&self, panic: bool) {
        self.panic_on_note.store(panic, Ordering::SeqCst);
    }

    pub fn events(&self) -> Vec<Event> {
        self.journal.lock().clone()
    }

    /// Commands that reached any engine.
    pub fn command_count(&self) -> usize {
        self.journal
            .lock()
            .iter()
            .filter(|e| matches!(e, Event::Command(..)))
            .count()
    }

    /// Engines built minus engines dropped.
    pub fn live_engines(&self) -> usize {
        let events = self.journal.lock();
        let created = events
            .iter()
            .filter(|e| matches!(e, Event::EngineCreated(_)))
            .count();
        let dropped = events
            .iter()
            .filter(|e| matches!(e, Event::EngineDropped(_)))
            .count();
        created - dropped
    }

    pub fn live_drivers(&self) -> usize {
        let events = self.journal.lock();
        let created = events
            .iter()
            .filter(|e| matches!(e, Event::DriverCreated(_)))
            .count();
        let dropped = events
            .iter()
            .filter(|e| matches!(e, Event::DriverDropped(_)))
            .count();
        created - dropped
    }
}

impl SynthBackend for FakeBackend {
    fn create_engine(&self, config: &SynthConfig) -> Result<Box<dyn SynthEngine>, EngineError> {
        if self.fail_engine.load(Ordering::SeqCst) {
            return Err(EngineError::InvalidSettings("engine construction disabled".into()));
        }
        let id = self.next_engine.fetch_add(1, Ordering::SeqCst) + 1;
        self.journal.lock().push(Event::EngineCreated(id));
        Ok(Box::new(FakeEngine {
            id,
            journal: Arc::clone(&self.journal),
            channels: config.midi_channels as i32,
            soundfonts: Vec::new(),
            gain: config.gain,
            panic_on_note: self.panic_on_note.load(Ordering::SeqCst),
        }))
    }

    fn create_driver(
        &self,
        config: &SynthConfig,
        source: Arc<dyn AudioSource>,
    ) -> Result<Box<dyn AudioDriver>, EngineError> {
        if self.fail_driver.load(Ordering::SeqCst) {
            return Err(EngineError::Device("no output device".into()));
        }
        // The fake source renders its engine id, which ties driver to engine
        let mut left = [0.0f32; 1];
        let mut right = [0.0f32; 1];
        source.render(&mut left, &mut right);
        let engine = left[0] as u32;

        self.journal.lock().push(Event::DriverCreated(engine));
        Ok(Box::new(FakeDriver {
            engine,
            journal: Arc::clone(&self.journal),
            sample_rate: config.sample_rate,
        }))
    }

    fn version(&self) -> String {
        "fake 1.0".into()
    }
}

struct FakeSource(u32);

impl AudioSource for FakeSource {
    fn render(&self, left: &mut [f32], right: &mut [f32]) {
        left.fill(self.0 as f32);
        right.fill(self.0 as f32);
    }
}

struct FakeEngine {
    id: u32,
    journal: Journal,
    channels: i32,
    soundfonts: Vec<PathBuf>,
    gain: f32,
    panic_on_note: bool,
}

impl FakeEngine {
    fn record(&self, command: &'static str) {
        self.journal.lock().push(Event::Command(self.id, command));
    }

    fn check(&self, channel: i32, data: &[i32]) -> Result<(), EngineError> {
        if !(0..self.channels).contains(&channel) {
            return Err(EngineError::InvalidArgument(format!("channel {channel}")));
        }
        if data.iter().any(|v| !(0..=127).contains(v)) {
            return Err(EngineError::InvalidArgument(format!("data {data:?}")));
        }
        if self.soundfonts.is_empty() {
            return Err(EngineError::NoSoundFont);
        }
        Ok(())
    }
}

impl SynthEngine for FakeEngine {
    fn load_soundfont(
        &mut self,
        path: &Path,
        _update_presets: bool,
    ) -> Result<SoundFontId, EngineError> {
        self.record("load_soundfont");
        if path.extension().and_then(|e| e.to_str()) != Some("sf2") {
            return Err(EngineError::SoundFont(format!("not a SoundFont: {}", path.display())));
        }
        self.soundfonts.push(path.to_path_buf());
        Ok(SoundFontId::new(self.soundfonts.len() as u32))
    }

    fn soundfont_count(&self) -> usize {
        self.record("soundfont_count");
        self.soundfonts.len()
    }

    fn note_on(&mut self, channel: i32, key: i32, velocity: i32) -> Result<(), EngineError> {
        self.record("note_on");
        if self.panic_on_note {
            panic!("engine {} crashed on note_on", self.id);
        }
        self.check(channel, &[key, velocity])
    }

    fn note_off(&mut self, channel: i32, key: i32) -> Result<(), EngineError> {
        self.record("note_off");
        self.check(channel, &[key])
    }

    fn program_change(&mut self, channel: i32, program: i32) -> Result<(), EngineError> {
        self.record("program_change");
        self.check(channel, &[program])
    }

    fn control_change(
        &mut self,
        channel: i32,
        controller: i32,
        value: i32,
    ) -> Result<(), EngineError> {
        self.record("control_change");
        self.check(channel, &[controller, value])
    }

    fn pitch_bend(&mut self, channel: i32, value: i32) -> Result<(), EngineError> {
        self.record("pitch_bend");
        if !(0..=16383).contains(&value) {
            return Err(EngineError::InvalidArgument(format!("pitch bend {value}")));
        }
        self.check(channel, &[])
    }

    fn all_notes_off(&mut self, _channel: Option<i32>) -> Result<(), EngineError> {
        self.record("all_notes_off");
        Ok(())
    }

    fn set_master_gain(&mut self, gain: f32) -> Result<(), EngineError> {
        self.record("set_master_gain");
        self.gain = gain;
        Ok(())
    }

    fn master_gain(&self) -> f32 {
        self.record("master_gain");
        self.gain
    }

    fn audio_source(&self) -> Arc<dyn AudioSource> {
        Arc::new(FakeSource(self.id))
    }
}

impl Drop for FakeEngine {
    fn drop(&mut self) {
        self.journal.lock().push(Event::EngineDropped(self.id));
    }
}

struct FakeDriver {
    engine: u32,
    journal: Journal,
    sample_rate: u32,
}

impl AudioDriver for FakeDriver {
    fn backend_name(&self) -> &str {
        "fake"
    }

    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }
}

impl Drop for FakeDriver {
    fn drop(&mut self) {
        self.journal.lock().push(Event::DriverDropped(self.engine));
    }
}

/// System over a fresh fake backend.
pub fn fake_system() -> (SynthSystem, Arc<FakeBackend>) {
    let backend = FakeBackend::new();
    let system = SynthSystem::with_backend(backend.clone());
    (system, backend)
}

/// Configuration that never touches audio hardware.
pub fn headless_config() -> SynthConfig {
    SynthConfig::builder()
        .audio_backend(AudioBackend::Null)
        .build()
}

/// Minimal generated `.sf2`, shared with the engine's unit tests.
#[path = "../../crates/synthbox-synth/src/soundfont/fixture.rs"]
mod sf2;

pub use sf2::{rms, write_soundfont, PROGRAM_LOUD, PROGRAM_QUIET};
