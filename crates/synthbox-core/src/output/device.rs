//! CPAL device output driver.

use crate::backend::{AudioDriver, AudioSource};
use crate::config::SynthConfig;
use crate::error::EngineError;
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use std::sync::Arc;

/// Wrapper to hold `cpal::Stream` in a `Send` context.
///
/// # Safety
/// `cpal::Stream` is `!Send` due to platform internals. The stream is only
/// touched when the driver is built and dropped, and the driver itself is only
/// reachable through the registry mutex in `SynthSystem`.
struct StreamHandle(#[allow(dead_code)] cpal::Stream);

unsafe impl Send for StreamHandle {}

/// Output stream on a platform audio device, pulling from one engine.
pub struct CpalDriver {
    _stream: StreamHandle,
    backend_name: String,
    device_name: String,
    sample_rate: u32,
}

impl CpalDriver {
    /// Open the default output device of `host` (or of the default host).
    ///
    /// The stream runs at the configured sample rate, on whichever supported
    /// configuration covers it. A fixed buffer of `period_size` frames is
    /// requested only where the device accepts that size.
    pub fn open(
        config: &SynthConfig,
        host: Option<&str>,
        source: Arc<dyn AudioSource>,
    ) -> Result<Self, EngineError> {
        let host = get_host(host)?;
        let device = host
            .default_output_device()
            .ok_or_else(|| EngineError::Device("No output device available".into()))?;
        let device_name = device.name().unwrap_or_else(|_| "unknown".into());
        let preferred_format = device
            .default_output_config()
            .map(|c| c.sample_format())
            .unwrap_or(cpal::SampleFormat::F32);

        let ranges = device.supported_output_configs().map_err(device_error)?;
        let supported = select_config(ranges, preferred_format, config.sample_rate)
            .ok_or_else(|| {
                EngineError::Device(format!(
                    "'{device_name}' has no output configuration at {} Hz",
                    config.sample_rate
                ))
            })?;

        let stream_config = cpal::StreamConfig {
            channels: supported.channels(),
            sample_rate: supported.sample_rate(),
            buffer_size: buffer_size(supported.buffer_size(), config.period_size),
        };

        let stream = match supported.sample_format() {
            cpal::SampleFormat::F32 => build_stream::<f32>(&device, &stream_config, source)?,
            cpal::SampleFormat::I16 => build_stream::<i16>(&device, &stream_config, source)?,
            cpal::SampleFormat::U16 => build_stream::<u16>(&device, &stream_config, source)?,
            format => {
                return Err(EngineError::Device(format!(
                    "Unsupported sample format: {format:?}"
                )));
            }
        };

        stream.play().map_err(device_error)?;
        tracing::debug!(
            "Opened {} output on '{device_name}' ({} Hz, {} frames x {} periods)",
            host.id().name(),
            config.sample_rate,
            config.period_size,
            config.period_count
        );

        Ok(Self {
            _stream: StreamHandle(stream),
            backend_name: host.id().name().to_string(),
            device_name,
            sample_rate: config.sample_rate,
        })
    }

    pub fn device_name(&self) -> &str {
        &self.device_name
    }
}

impl AudioDriver for CpalDriver {
    fn backend_name(&self) -> &str {
        &self.backend_name
    }

    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }
}

/// Names of the audio hosts compiled into this build.
pub fn list_hosts() -> Vec<&'static str> {
    cpal::available_hosts()
        .into_iter()
        .map(|id| id.name())
        .collect()
}

fn get_host(name: Option<&str>) -> Result<cpal::Host, EngineError> {
    let Some(name) = name else {
        return Ok(cpal::default_host());
    };

    let id = cpal::available_hosts()
        .into_iter()
        .find(|id| id.name().eq_ignore_ascii_case(name))
        .ok_or_else(|| {
            EngineError::Device(format!(
                "Unknown audio host '{name}' (available: {})",
                list_hosts().join(", ")
            ))
        })?;

    cpal::host_from_id(id).map_err(device_error)
}

const WRITABLE_FORMATS: [cpal::SampleFormat; 3] = [
    cpal::SampleFormat::F32,
    cpal::SampleFormat::I16,
    cpal::SampleFormat::U16,
];

/// Pick the supported configuration to open at `sample_rate`.
///
/// Only ranges covering the rate in a format we can write qualify. Among
/// those, the device's preferred format wins, then stereo, then more channels.
fn select_config(
    ranges: impl IntoIterator<Item = cpal::SupportedStreamConfigRange>,
    preferred: cpal::SampleFormat,
    sample_rate: u32,
) -> Option<cpal::SupportedStreamConfig> {
    ranges
        .into_iter()
        .filter(|range| {
            range.min_sample_rate().0 <= sample_rate
                && sample_rate <= range.max_sample_rate().0
                && WRITABLE_FORMATS.contains(&range.sample_format())
        })
        .max_by_key(|range| {
            (
                range.sample_format() == preferred,
                range.channels() == 2,
                range.channels(),
            )
        })
        .map(|range| range.with_sample_rate(cpal::SampleRate(sample_rate)))
}

/// `Fixed(period_size)` when the device reports a range containing it, else
/// the host default.
fn buffer_size(supported: &cpal::SupportedBufferSize, period_size: u32) -> cpal::BufferSize {
    match supported {
        cpal::SupportedBufferSize::Range { min, max } if (*min..=*max).contains(&period_size) => {
            cpal::BufferSize::Fixed(period_size)
        }
        _ => cpal::BufferSize::Default,
    }
}

fn device_error(e: impl std::fmt::Display) -> EngineError {
    EngineError::Device(e.to_string())
}

fn build_stream<T>(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    source: Arc<dyn AudioSource>,
) -> Result<cpal::Stream, EngineError>
where
    T: cpal::SizedSample + cpal::FromSample<f32>,
{
    let channels = config.channels as usize;

    // Pre-allocated buffers (grow on first callback, then stable)
    let mut left = Vec::<f32>::new();
    let mut right = Vec::<f32>::new();

    device
        .build_output_stream(
            config,
            move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
                let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                    let frames = data.len() / channels;
                    render(source.as_ref(), frames, &mut left, &mut right);
                    write_output(data, channels, &left[..frames], &right[..frames]);
                }));

                if result.is_err() {
                    output_silence(data);
                }
            },
            |err| tracing::warn!("Audio stream error: {err}"),
            None,
        )
        .map_err(device_error)
}

#[inline]
fn render(source: &dyn AudioSource, frames: usize, left: &mut Vec<f32>, right: &mut Vec<f32>) {
    if left.len() < frames {
        left.resize(frames, 0.0);
        right.resize(frames, 0.0);
    }
    source.render(&mut left[..frames], &mut right[..frames]);
}

/// Interleave stereo into the device buffer. Mono devices get the average,
/// channels beyond the second are silent.
#[inline]
fn write_output<T: cpal::SizedSample + cpal::FromSample<f32>>(
    data: &mut [T],
    channels: usize,
    left: &[f32],
    right: &[f32],
) {
    for (i, sample) in data.iter_mut().enumerate() {
        let frame = i / channels;
        let value = match (channels, i % channels) {
            (1, _) => (left[frame] + right[frame]) * 0.5,
            (_, 0) => left[frame],
            (_, 1) => right[frame],
            _ => 0.0,
        };
        *sample = T::from_sample(value);
    }
}

/// Output silence (panic recovery).
#[inline]
fn output_silence<T: cpal::SizedSample + cpal::FromSample<f32>>(data: &mut [T]) {
    for sample in data.iter_mut() {
        *sample = T::from_sample(0.0);
    }
}
