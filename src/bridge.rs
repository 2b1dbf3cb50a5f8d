//! Boundary surface with raw sentinel values.
//!
//! Callers across a language boundary see handles as `i64` and results as
//! status codes. Nothing here returns `Result` or unwinds: every internal
//! failure, including a panic, collapses into the documented failure value.

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use synthbox_core::{InstanceHandle, SynthBackend, SynthConfig, SynthSystem};

/// Call succeeded.
pub const STATUS_OK: i32 = 0;

/// Call failed; unknown handles report this too.
pub const STATUS_FAILED: i32 = -1;

/// Returned by [`SynthBridge::create_synth`] when no instance was created.
pub const INVALID_HANDLE: i64 = -1;

/// Passed as channel to [`SynthBridge::all_notes_off`] to address every channel.
pub const ALL_CHANNELS: i32 = -1;

/// Handle-oriented facade over a [`SynthSystem`].
///
/// Every new synthesizer is created from the bridge's default configuration.
pub struct SynthBridge {
    system: SynthSystem,
    config: SynthConfig,
}

impl SynthBridge {
    pub fn new(system: SynthSystem, config: SynthConfig) -> Self {
        Self { system, config }
    }

    pub fn with_backend(backend: Arc<dyn SynthBackend>, config: SynthConfig) -> Self {
        Self::new(SynthSystem::with_backend(backend), config)
    }

    pub fn system(&self) -> &SynthSystem {
        &self.system
    }

    pub fn config(&self) -> &SynthConfig {
        &self.config
    }

    /// Create a synthesizer. Returns its handle, or [`INVALID_HANDLE`].
    pub fn create_synth(&self) -> i64 {
        guarded("create_synth", INVALID_HANDLE, || {
            self.system
                .create_instance(self.config.clone())
                .map_or(INVALID_HANDLE, |handle| handle.as_raw())
        })
    }

    /// Destroy a synthesizer. Unknown handles are ignored.
    pub fn destroy_synth(&self, handle: i64) {
        guarded("destroy_synth", (), || {
            if let Some(handle) = InstanceHandle::from_raw(handle) {
                self.system.destroy_instance(handle);
            }
        })
    }

    /// Load a SoundFont. Returns its id, or `-1`.
    pub fn load_soundfont(&self, handle: i64, path: Option<&str>) -> i32 {
        guarded("load_soundfont", STATUS_FAILED, || {
            let Some(path) = path.filter(|p| !p.is_empty()) else {
                tracing::warn!("load_soundfont: missing SoundFont path");
                return STATUS_FAILED;
            };
            let Some(handle) = resolve(handle) else {
                return STATUS_FAILED;
            };
            self.system
                .load_soundfont(handle, path)
                .ok()
                .and_then(|id| i32::try_from(id.get()).ok())
                .unwrap_or(STATUS_FAILED)
        })
    }

    pub fn note_on(&self, handle: i64, channel: i32, key: i32, velocity: i32) -> i32 {
        self.command("note_on", handle, |system, h| {
            system.note_on(h, channel, key, velocity)
        })
    }

    pub fn note_off(&self, handle: i64, channel: i32, key: i32) -> i32 {
        self.command("note_off", handle, |system, h| system.note_off(h, channel, key))
    }

    pub fn program_change(&self, handle: i64, channel: i32, program: i32) -> i32 {
        self.command("program_change", handle, |system, h| {
            system.program_change(h, channel, program)
        })
    }

    pub fn control_change(&self, handle: i64, channel: i32, controller: i32, value: i32) -> i32 {
        self.command("control_change", handle, |system, h| {
            system.control_change(h, channel, controller, value)
        })
    }

    pub fn set_channel_volume(&self, handle: i64, channel: i32, volume: i32) -> i32 {
        self.command("set_channel_volume", handle, |system, h| {
            system.set_channel_volume(h, channel, volume)
        })
    }

    pub fn pitch_bend(&self, handle: i64, channel: i32, value: i32) -> i32 {
        self.command("pitch_bend", handle, |system, h| {
            system.pitch_bend(h, channel, value)
        })
    }

    /// Release held notes on `channel`, or everywhere for [`ALL_CHANNELS`].
    pub fn all_notes_off(&self, handle: i64, channel: i32) -> i32 {
        let channel = (channel != ALL_CHANNELS).then_some(channel);
        self.command("all_notes_off", handle, |system, h| {
            system.all_notes_off(h, channel)
        })
    }

    pub fn set_master_gain(&self, handle: i64, gain: f32) -> i32 {
        self.command("set_master_gain", handle, |system, h| {
            system.set_master_gain(h, gain)
        })
    }

    /// Master gain, or `0.0` for unknown handles.
    pub fn get_master_gain(&self, handle: i64) -> f32 {
        guarded("get_master_gain", 0.0, || {
            resolve(handle)
                .and_then(|h| self.system.master_gain(h).ok())
                .unwrap_or(0.0)
        })
    }

    /// Number of loaded SoundFonts, or `0` for unknown handles.
    pub fn get_soundfont_count(&self, handle: i64) -> i32 {
        guarded("get_soundfont_count", 0, || {
            resolve(handle).map_or(0, |h| {
                i32::try_from(self.system.soundfont_count(h)).unwrap_or(i32::MAX)
            })
        })
    }

    pub fn get_version(&self) -> String {
        guarded("get_version", String::new(), || self.system.version())
    }

    /// Destroy every synthesizer. Returns how many were destroyed.
    pub fn shutdown(&self) -> usize {
        guarded("shutdown", 0, || self.system.shutdown())
    }

    fn command(
        &self,
        op: &'static str,
        handle: i64,
        f: impl FnOnce(&SynthSystem, InstanceHandle) -> synthbox_core::Result<()>,
    ) -> i32 {
        guarded(op, STATUS_FAILED, || match resolve(handle) {
            Some(h) => status(f(&self.system, h)),
            None => STATUS_FAILED,
        })
    }
}

#[cfg(feature = "soundfont")]
impl Default for SynthBridge {
    /// Bridge over the RustySynth engine with the default configuration.
    fn default() -> Self {
        Self::new(
            SynthSystem::new(synthbox_synth::RustySynthBackend::new()),
            SynthConfig::default(),
        )
    }
}

fn resolve(raw: i64) -> Option<InstanceHandle> {
    let handle = InstanceHandle::from_raw(raw);
    if handle.is_none() {
        tracing::debug!("Rejected invalid synthesizer handle {raw}");
    }
    handle
}

fn status(result: synthbox_core::Result<()>) -> i32 {
    match result {
        Ok(()) => STATUS_OK,
        Err(_) => STATUS_FAILED,
    }
}

/// Run `f`, converting a panic into `fallback`.
pub(crate) fn guarded<R>(op: &str, fallback: R, f: impl FnOnce() -> R) -> R {
    match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(value) => value,
        Err(payload) => {
            let message = payload
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".into());
            tracing::error!("{op} panicked: {message}");
            fallback
        }
    }
}
