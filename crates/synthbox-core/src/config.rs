//! Synthesizer instance configuration.

use core::time::Duration;
use serde::{Deserialize, Serialize};

pub const DEFAULT_SAMPLE_RATE: u32 = 44100;
pub const DEFAULT_POLYPHONY: u32 = 256;
pub const DEFAULT_MIDI_CHANNELS: u32 = 16;
pub const DEFAULT_GAIN: f32 = 0.8;
pub const DEFAULT_PERIOD_COUNT: u32 = 2;
pub const DEFAULT_PERIOD_SIZE: u32 = 512;

/// Audio output path an instance's driver is bound to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AudioBackend {
    /// Default output device of the platform's default host.
    #[default]
    Default,
    /// Default output device of a named host (e.g. `"ALSA"`, `"JACK"`, `"CoreAudio"`).
    Host(String),
    /// Headless driver: pulls audio at real-time pace and discards it.
    Null,
}

/// Configuration for one synthesizer instance.
///
/// `SynthConfig::default()` is the standard configuration every boundary-created
/// instance receives. Values are not validated here; the engine and driver
/// reject settings they cannot honour when the instance is created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SynthConfig {
    pub audio_backend: AudioBackend,
    /// Maximum simultaneous voices.
    pub polyphony: u32,
    /// Number of addressable MIDI channels.
    pub midi_channels: u32,
    /// Linear output scaling factor.
    pub gain: f32,
    /// Driver buffering depth (2 = double buffering).
    pub period_count: u32,
    /// Frames per buffer period.
    pub period_size: u32,
    pub sample_rate: u32,
}

impl Default for SynthConfig {
    fn default() -> Self {
        Self {
            audio_backend: AudioBackend::Default,
            polyphony: DEFAULT_POLYPHONY,
            midi_channels: DEFAULT_MIDI_CHANNELS,
            gain: DEFAULT_GAIN,
            period_count: DEFAULT_PERIOD_COUNT,
            period_size: DEFAULT_PERIOD_SIZE,
            sample_rate: DEFAULT_SAMPLE_RATE,
        }
    }
}

impl SynthConfig {
    pub fn builder() -> SynthConfigBuilder {
        SynthConfigBuilder::default()
    }

    /// Wall-clock length of one buffer period.
    pub fn period_duration(&self) -> Duration {
        if self.sample_rate == 0 {
            return Duration::ZERO;
        }
        Duration::from_secs_f64(f64::from(self.period_size) / f64::from(self.sample_rate))
    }

    /// Output latency implied by the buffering depth.
    pub fn latency(&self) -> Duration {
        self.period_duration() * self.period_count
    }
}

/// Fluent builder for [`SynthConfig`].
///
/// # Example
/// ```ignore
/// let config = SynthConfig::builder()
///     .audio_backend(AudioBackend::Null)
///     .polyphony(64)
///     .gain(0.5)
///     .build();
/// ```
#[derive(Debug, Clone, Default)]
pub struct SynthConfigBuilder {
    config: SynthConfig,
}

impl SynthConfigBuilder {
    pub fn audio_backend(mut self, backend: AudioBackend) -> Self {
        self.config.audio_backend = backend;
        self
    }

    /// Default: 256
    pub fn polyphony(mut self, voices: u32) -> Self {
        self.config.polyphony = voices;
        self
    }

    /// Default: 16
    pub fn midi_channels(mut self, channels: u32) -> Self {
        self.config.midi_channels = channels;
        self
    }

    /// Default: 0.8
    pub fn gain(mut self, gain: f32) -> Self {
        self.config.gain = gain;
        self
    }

    /// Default: 2
    pub fn period_count(mut self, count: u32) -> Self {
        self.config.period_count = count;
        self
    }

    /// Default: 512
    pub fn period_size(mut self, frames: u32) -> Self {
        self.config.period_size = frames;
        self
    }

    /// Default: 44100
    pub fn sample_rate(mut self, sample_rate: u32) -> Self {
        self.config.sample_rate = sample_rate;
        self
    }

    pub fn build(self) -> SynthConfig {
        self.config
    }
}
