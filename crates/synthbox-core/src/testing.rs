//! In-crate test backend that journals engine and driver activity.

use crate::backend::{AudioDriver, AudioSource, SoundFontId, SynthBackend, SynthEngine};
use crate::config::SynthConfig;
use crate::error::EngineError;
use parking_lot::Mutex;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Event {
    EngineCreated,
    DriverCreated,
    DriverDropped,
    EngineDropped,
    Command(&'static str),
}

type Journal = Arc<Mutex<Vec<Event>>>;

#[derive(Default)]
pub(crate) struct TestBackend {
    journal: Journal,
    fail_engine: AtomicBool,
    fail_driver: AtomicBool,
}

impl TestBackend {
    pub(crate) fn fail_engine(&self) {
        self.fail_engine.store(true, Ordering::SeqCst);
    }

    pub(crate) fn fail_driver(&self) {
        self.fail_driver.store(true, Ordering::SeqCst);
    }

    pub(crate) fn heal(&self) {
        self.fail_engine.store(false, Ordering::SeqCst);
        self.fail_driver.store(false, Ordering::SeqCst);
    }

    pub(crate) fn events(&self) -> Vec<Event> {
        self.journal.lock().clone()
    }

    pub(crate) fn journal(&self) -> Journal {
        Arc::clone(&self.journal)
    }
}

impl SynthBackend for TestBackend {
    fn create_engine(&self, config: &SynthConfig) -> Result<Box<dyn SynthEngine>, EngineError> {
        if self.fail_engine.load(Ordering::SeqCst) {
            return Err(EngineError::InvalidSettings("engine disabled".into()));
        }
        self.journal.lock().push(Event::EngineCreated);
        Ok(Box::new(TestEngine {
            journal: Arc::clone(&self.journal),
            soundfonts: 0,
            gain: config.gain,
        }))
    }

    fn create_driver(
        &self,
        config: &SynthConfig,
        _source: Arc<dyn AudioSource>,
    ) -> Result<Box<dyn AudioDriver>, EngineError> {
        if self.fail_driver.load(Ordering::SeqCst) {
            return Err(EngineError::Device("no device".into()));
        }
        self.journal.lock().push(Event::DriverCreated);
        Ok(Box::new(TestDriver {
            journal: Arc::clone(&self.journal),
            sample_rate: config.sample_rate,
        }))
    }

    fn version(&self) -> String {
        "test-engine 1.0".into()
    }
}

struct TestEngine {
    journal: Journal,
    soundfonts: u32,
    gain: f32,
}

impl TestEngine {
    fn record(&self, command: &'static str) {
        self.journal.lock().push(Event::Command(command));
    }

    fn check_channel(&self, channel: i32) -> Result<(), EngineError> {
        if (0..16).contains(&channel) {
            Ok(())
        } else {
            Err(EngineError::InvalidArgument(format!("channel {channel}")))
        }
    }
}

impl SynthEngine for TestEngine {
    fn load_soundfont(&mut self, path: &Path, _update: bool) -> Result<SoundFontId, EngineError> {
        self.record("load_soundfont");
        if path.ends_with("missing.sf2") {
            return Err(EngineError::SoundFont("missing".into()));
        }
        self.soundfonts += 1;
        Ok(SoundFontId::new(self.soundfonts))
    }

    fn soundfont_count(&self) -> usize {
        self.soundfonts as usize
    }

    fn note_on(&mut self, channel: i32, _key: i32, _velocity: i32) -> Result<(), EngineError> {
        self.record("note_on");
        self.check_channel(channel)
    }

    fn note_off(&mut self, channel: i32, _key: i32) -> Result<(), EngineError> {
        self.record("note_off");
        self.check_channel(channel)
    }

    fn program_change(&mut self, channel: i32, _program: i32) -> Result<(), EngineError> {
        self.record("program_change");
        self.check_channel(channel)
    }

    fn control_change(&mut self, channel: i32, _cc: i32, _value: i32) -> Result<(), EngineError> {
        self.record("control_change");
        self.check_channel(channel)
    }

    fn pitch_bend(&mut self, channel: i32, _value: i32) -> Result<(), EngineError> {
        self.record("pitch_bend");
        self.check_channel(channel)
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
        self.gain
    }

    fn audio_source(&self) -> Arc<dyn AudioSource> {
        Arc::new(Silence)
    }
}

impl Drop for TestEngine {
    fn drop(&mut self) {
        self.journal.lock().push(Event::EngineDropped);
    }
}

struct TestDriver {
    journal: Journal,
    sample_rate: u32,
}

impl AudioDriver for TestDriver {
    fn backend_name(&self) -> &str {
        "test"
    }

    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }
}

impl Drop for TestDriver {
    fn drop(&mut self) {
        self.journal.lock().push(Event::DriverDropped);
    }
}

struct Silence;

impl AudioSource for Silence {
    fn render(&self, left: &mut [f32], right: &mut [f32]) {
        left.fill(0.0);
        right.fill(0.0);
    }
}
