//! SoundFont synthesis engine wrapping RustySynth.

use super::cache::SoundFontCache;
use crate::error::{Error, Result};
use parking_lot::Mutex;
use rustysynth::{SoundFont, Synthesizer, SynthesizerSettings};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use synthbox_core::{AudioSource, EngineError, SoundFontId, SynthConfig, SynthEngine};

/// Sample rates RustySynth accepts.
pub const SAMPLE_RATE_RANGE: core::ops::RangeInclusive<u32> = 16_000..=192_000;

/// Voice counts RustySynth accepts.
pub const POLYPHONY_RANGE: core::ops::RangeInclusive<u32> = 8..=256;

/// RustySynth always runs 16 MIDI channels; fewer may be addressable.
pub const MAX_MIDI_CHANNELS: u32 = 16;

const MIDI_DATA_MAX: i32 = 127;
const PITCH_BEND_MAX: i32 = 16383;

const STATUS_CONTROL_CHANGE: i32 = 0xB0;
const STATUS_PROGRAM_CHANGE: i32 = 0xC0;
const STATUS_PITCH_BEND: i32 = 0xE0;

const CC_RESET_ALL_CONTROLLERS: i32 = 121;

/// Volume, pan and expression survive a synthesizer rebuild.
const REPLAYED_CONTROLLERS: [i32; 3] = [7, 10, 11];

/// The synthesizer as seen by the audio thread.
///
/// Empty until the first SoundFont is loaded.
struct SharedSynth {
    synthesizer: Mutex<Option<Synthesizer>>,
}

impl AudioSource for SharedSynth {
    fn render(&self, left: &mut [f32], right: &mut [f32]) {
        // Never wait on the control thread; a contended block is rendered silent
        match self.synthesizer.try_lock().as_deref_mut() {
            Some(Some(synthesizer)) => synthesizer.render(left, right),
            _ => {
                left.fill(0.0);
                right.fill(0.0);
            }
        }
    }
}

struct LoadedSoundFont {
    id: SoundFontId,
    path: PathBuf,
    soundfont: Arc<SoundFont>,
}

/// One SoundFont synthesizer instance.
///
/// SoundFonts form a stack: ids start at 1 and increase with every load.
/// RustySynth plays from a single font, so loading with preset update
/// rebuilds the synthesizer on the newest font and re-applies each
/// channel's program, volume, pan and expression. Other controllers and
/// pitch bend start from their defaults.
pub struct RustySynthEngine {
    shared: Arc<SharedSynth>,
    cache: Arc<SoundFontCache>,
    sample_rate: u32,
    polyphony: u32,
    midi_channels: u32,
    soundfonts: Vec<LoadedSoundFont>,
    next_id: u32,
    programs: Vec<Option<i32>>,
    controllers: Vec<[Option<i32>; REPLAYED_CONTROLLERS.len()]>,
    gain: f32,
}

impl RustySynthEngine {
    /// Create an engine for `config`, rejecting settings RustySynth cannot run.
    pub fn new(config: &SynthConfig, cache: Arc<SoundFontCache>) -> Result<Self> {
        if !SAMPLE_RATE_RANGE.contains(&config.sample_rate) {
            return Err(Error::InvalidConfig(format!(
                "sample_rate {} out of range (16000-192000 Hz)",
                config.sample_rate
            )));
        }
        if !POLYPHONY_RANGE.contains(&config.polyphony) {
            return Err(Error::InvalidConfig(format!(
                "polyphony {} out of range (8-256 voices)",
                config.polyphony
            )));
        }
        if config.midi_channels == 0 || config.midi_channels > MAX_MIDI_CHANNELS {
            return Err(Error::InvalidConfig(format!(
                "midi_channels {} out of range (1-16)",
                config.midi_channels
            )));
        }
        if !config.gain.is_finite() || config.gain < 0.0 {
            return Err(Error::InvalidConfig(format!("gain {} is invalid", config.gain)));
        }

        Ok(Self {
            shared: Arc::new(SharedSynth {
                synthesizer: Mutex::new(None),
            }),
            cache,
            sample_rate: config.sample_rate,
            polyphony: config.polyphony,
            midi_channels: config.midi_channels,
            soundfonts: Vec::new(),
            next_id: 1,
            programs: vec![None; config.midi_channels as usize],
            controllers: vec![[None; REPLAYED_CONTROLLERS.len()]; config.midi_channels as usize],
            gain: config.gain,
        })
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Paths of the loaded SoundFonts, oldest first.
    pub fn soundfont_paths(&self) -> Vec<&Path> {
        self.soundfonts.iter().map(|sf| sf.path.as_path()).collect()
    }

    /// Load a SoundFont onto the stack.
    ///
    /// With `update_presets` the synthesizer switches to the new font. Without
    /// it, the font is only stacked unless nothing is playing yet.
    pub fn load(&mut self, path: &Path, update_presets: bool) -> Result<SoundFontId> {
        let soundfont = self.cache.load(path)?;

        if update_presets || self.soundfonts.is_empty() {
            self.rebuild(&soundfont)?;
        }

        let id = SoundFontId::new(self.next_id);
        self.next_id += 1;
        self.soundfonts.push(LoadedSoundFont {
            id,
            path: path.to_path_buf(),
            soundfont,
        });

        tracing::debug!("SoundFont stack: {:?}", self.soundfont_ids());
        Ok(id)
    }

    fn soundfont_ids(&self) -> Vec<u32> {
        self.soundfonts.iter().map(|sf| sf.id.get()).collect()
    }

    fn rebuild(&mut self, soundfont: &Arc<SoundFont>) -> Result<()> {
        let mut settings = SynthesizerSettings::new(self.sample_rate as i32);
        settings.maximum_polyphony = self.polyphony as usize;

        let mut synthesizer = Synthesizer::new(soundfont, &settings)
            .map_err(|e| Error::SoundFont(format!("Failed to create synthesizer: {e}")))?;
        synthesizer.set_master_volume(self.gain);

        for (channel, program) in self.programs.iter().enumerate() {
            if let Some(program) = *program {
                synthesizer.process_midi_message(
                    channel as i32,
                    STATUS_PROGRAM_CHANGE,
                    program,
                    0,
                );
            }
        }
        for (channel, values) in self.controllers.iter().enumerate() {
            for (controller, value) in REPLAYED_CONTROLLERS.iter().zip(values) {
                if let Some(value) = *value {
                    synthesizer.process_midi_message(
                        channel as i32,
                        STATUS_CONTROL_CHANGE,
                        *controller,
                        value,
                    );
                }
            }
        }

        *self.shared.synthesizer.lock() = Some(synthesizer);
        Ok(())
    }

    fn check_channel(&self, channel: i32) -> Result<()> {
        if channel < 0 || channel as u32 >= self.midi_channels {
            return Err(Error::InvalidArgument(format!(
                "channel {channel} out of range (0-{})",
                self.midi_channels - 1
            )));
        }
        Ok(())
    }

    fn check_data(name: &str, value: i32) -> Result<()> {
        if !(0..=MIDI_DATA_MAX).contains(&value) {
            return Err(Error::InvalidArgument(format!(
                "{name} {value} out of range (0-127)"
            )));
        }
        Ok(())
    }

    /// Run `f` on the live synthesizer, failing if no SoundFont is loaded.
    fn with_synthesizer(&self, f: impl FnOnce(&mut Synthesizer)) -> Result<()> {
        let mut guard = self.shared.synthesizer.lock();
        let synthesizer = guard.as_mut().ok_or(Error::NoSoundFont)?;
        f(synthesizer);
        Ok(())
    }

    /// Note on.
    pub fn note_on(&mut self, channel: i32, key: i32, velocity: i32) -> Result<()> {
        self.check_channel(channel)?;
        Self::check_data("key", key)?;
        Self::check_data("velocity", velocity)?;
        self.with_synthesizer(|s| s.note_on(channel, key, velocity))
    }

    /// Note off
    ///
    /// # Arguments
    /// * `channel` - MIDI channel
    /// * `key` - MIDI note number (0-127)
    pub fn note_off(&mut self, channel: i32, key: i32) -> Result<()> {
        self.check_channel(channel)?;
        Self::check_data("key", key)?;
        self.with_synthesizer(|s| s.note_off(channel, key))
    }

    /// Change MIDI program (preset). Remembered across SoundFont switches.
    pub fn program_change(&mut self, channel: i32, program: i32) -> Result<()> {
        self.check_channel(channel)?;
        Self::check_data("program", program)?;
        self.with_synthesizer(|s| {
            s.process_midi_message(channel, STATUS_PROGRAM_CHANGE, program, 0)
        })?;
        self.programs[channel as usize] = Some(program);
        Ok(())
    }

    /// Control change. Volume, pan and expression are remembered across
    /// SoundFont switches; reset-all-controllers forgets them.
    pub fn control_change(&mut self, channel: i32, controller: i32, value: i32) -> Result<()> {
        self.check_channel(channel)?;
        Self::check_data("controller", controller)?;
        Self::check_data("value", value)?;
        self.with_synthesizer(|s| {
            s.process_midi_message(channel, STATUS_CONTROL_CHANGE, controller, value)
        })?;

        let recorded = &mut self.controllers[channel as usize];
        if controller == CC_RESET_ALL_CONTROLLERS {
            *recorded = [None; REPLAYED_CONTROLLERS.len()];
        } else if let Some(slot) = REPLAYED_CONTROLLERS.iter().position(|c| *c == controller) {
            recorded[slot] = Some(value);
        }
        Ok(())
    }

    pub fn pitch_bend(&mut self, channel: i32, value: i32) -> Result<()> {
        self.check_channel(channel)?;
        if !(0..=PITCH_BEND_MAX).contains(&value) {
            return Err(Error::InvalidArgument(format!(
                "pitch bend {value} out of range (0-16383)"
            )));
        }
        let lsb = value & 0x7F;
        let msb = (value >> 7) & 0x7F;
        self.with_synthesizer(|s| s.process_midi_message(channel, STATUS_PITCH_BEND, lsb, msb))
    }

    pub fn all_notes_off(&mut self, channel: Option<i32>) -> Result<()> {
        if let Some(channel) = channel {
            self.check_channel(channel)?;
        }
        let mut guard = self.shared.synthesizer.lock();
        // Nothing can be sounding before a SoundFont is loaded
        if let Some(synthesizer) = guard.as_mut() {
            match channel {
                Some(channel) => synthesizer.note_off_all_channel(channel, false),
                None => synthesizer.note_off_all(false),
            }
        }
        Ok(())
    }

    pub fn set_gain(&mut self, gain: f32) -> Result<()> {
        if !gain.is_finite() || gain < 0.0 {
            return Err(Error::InvalidArgument(format!("gain {gain} is invalid")));
        }
        self.gain = gain;
        if let Some(synthesizer) = self.shared.synthesizer.lock().as_mut() {
            synthesizer.set_master_volume(gain);
        }
        Ok(())
    }

    pub fn gain(&self) -> f32 {
        self.gain
    }

    pub fn len(&self) -> usize {
        self.soundfonts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.soundfonts.is_empty()
    }
}

impl SynthEngine for RustySynthEngine {
    fn load_soundfont(
        &mut self,
        path: &Path,
        update_presets: bool,
    ) -> std::result::Result<SoundFontId, EngineError> {
        Ok(self.load(path, update_presets)?)
    }

    fn soundfont_count(&self) -> usize {
        self.len()
    }

    fn note_on(
        &mut self,
        channel: i32,
        key: i32,
        velocity: i32,
    ) -> std::result::Result<(), EngineError> {
        Ok(RustySynthEngine::note_on(self, channel, key, velocity)?)
    }

    fn note_off(&mut self, channel: i32, key: i32) -> std::result::Result<(), EngineError> {
        Ok(RustySynthEngine::note_off(self, channel, key)?)
    }

    fn program_change(
        &mut self,
        channel: i32,
        program: i32,
    ) -> std::result::Result<(), EngineError> {
        Ok(RustySynthEngine::program_change(self, channel, program)?)
    }

    fn control_change(
        &mut self,
        channel: i32,
        controller: i32,
        value: i32,
    ) -> std::result::Result<(), EngineError> {
        Ok(RustySynthEngine::control_change(self, channel, controller, value)?)
    }

    fn pitch_bend(&mut self, channel: i32, value: i32) -> std::result::Result<(), EngineError> {
        Ok(RustySynthEngine::pitch_bend(self, channel, value)?)
    }

    fn all_notes_off(&mut self, channel: Option<i32>) -> std::result::Result<(), EngineError> {
        Ok(RustySynthEngine::all_notes_off(self, channel)?)
    }

    fn set_master_gain(&mut self, gain: f32) -> std::result::Result<(), EngineError> {
        Ok(self.set_gain(gain)?)
    }

    fn master_gain(&self) -> f32 {
        self.gain
    }

    fn audio_source(&self) -> Arc<dyn AudioSource> {
        self.shared.clone()
    }
}

impl Drop for RustySynthEngine {
    fn drop(&mut self) {
        self.shared.synthesizer.lock().take();
        self.soundfonts.clear();
        self.cache.purge_unused();
    }
}
