//! Per-instance commands forwarded to the engine.
//!
//! Every command acquires the guard, resolves the handle, forwards one call
//! and releases the guard before returning. Arguments are passed through
//! verbatim; range checking belongs to the engine.

use crate::backend::SoundFontId;
use crate::error::{Error, Result};
use crate::handle::InstanceHandle;
use crate::system::SynthSystem;
use std::path::Path;

/// MIDI controller number for channel volume.
pub const CC_CHANNEL_VOLUME: i32 = 7;

/// Centre position of the 14-bit pitch wheel.
pub const PITCH_BEND_CENTER: i32 = 8192;

impl SynthSystem {
    /// Load a SoundFont with preset update enabled.
    pub fn load_soundfont(
        &self,
        handle: InstanceHandle,
        path: impl AsRef<Path>,
    ) -> Result<SoundFontId> {
        let path = path.as_ref();
        if path.as_os_str().is_empty() {
            return Err(Error::InvalidArgument("empty SoundFont path".into()));
        }

        let id = self.with_engine(handle, "load_soundfont", |engine| {
            engine.load_soundfont(path, true)
        })?;
        tracing::info!(
            "Loaded SoundFont {} into synthesizer {handle} (ID: {id})",
            path.display()
        );
        Ok(id)
    }

    pub fn note_on(
        &self,
        handle: InstanceHandle,
        channel: i32,
        key: i32,
        velocity: i32,
    ) -> Result<()> {
        self.with_engine(handle, "note_on", |engine| {
            engine.note_on(channel, key, velocity)
        })
    }

    pub fn note_off(&self, handle: InstanceHandle, channel: i32, key: i32) -> Result<()> {
        self.with_engine(handle, "note_off", |engine| engine.note_off(channel, key))
    }

    pub fn program_change(
        &self,
        handle: InstanceHandle,
        channel: i32,
        program: i32,
    ) -> Result<()> {
        self.with_engine(handle, "program_change", |engine| {
            engine.program_change(channel, program)
        })
    }

    pub fn control_change(
        &self,
        handle: InstanceHandle,
        channel: i32,
        controller: i32,
        value: i32,
    ) -> Result<()> {
        self.with_engine(handle, "control_change", |engine| {
            engine.control_change(channel, controller, value)
        })
    }

    /// Channel volume (CC 7).
    pub fn set_channel_volume(
        &self,
        handle: InstanceHandle,
        channel: i32,
        volume: i32,
    ) -> Result<()> {
        self.control_change(handle, channel, CC_CHANNEL_VOLUME, volume)
    }

    pub fn pitch_bend(&self, handle: InstanceHandle, channel: i32, value: i32) -> Result<()> {
        self.with_engine(handle, "pitch_bend", |engine| engine.pitch_bend(channel, value))
    }

    /// Release held notes on `channel`, or on every channel for `None`.
    pub fn all_notes_off(&self, handle: InstanceHandle, channel: Option<i32>) -> Result<()> {
        self.with_engine(handle, "all_notes_off", |engine| engine.all_notes_off(channel))
    }

    pub fn set_master_gain(&self, handle: InstanceHandle, gain: f32) -> Result<()> {
        self.with_engine(handle, "set_master_gain", |engine| engine.set_master_gain(gain))
    }

    pub fn master_gain(&self, handle: InstanceHandle) -> Result<f32> {
        self.with_engine(handle, "master_gain", |engine| Ok(engine.master_gain()))
    }

    /// Number of loaded SoundFonts; 0 for unknown handles.
    pub fn soundfont_count(&self, handle: InstanceHandle) -> usize {
        self.with_engine(handle, "soundfont_count", |engine| Ok(engine.soundfont_count()))
            .unwrap_or(0)
    }
}
