//! Headless output driver.

use crate::backend::{AudioDriver, AudioSource};
use crate::config::SynthConfig;
use crate::error::EngineError;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

/// Pulls one period at a time from the source at real-time pace and discards it.
///
/// Behaves like a device driver (separate thread, fixed period size) without
/// touching audio hardware.
pub struct NullDriver {
    shutdown: Arc<AtomicBool>,
    frames_rendered: Arc<AtomicU64>,
    thread_handle: Option<JoinHandle<()>>,
    sample_rate: u32,
}

impl NullDriver {
    pub fn start(config: &SynthConfig, source: Arc<dyn AudioSource>) -> Result<Self, EngineError> {
        if config.period_size == 0 {
            return Err(EngineError::InvalidSettings(
                "period size must be at least one frame".into(),
            ));
        }

        let shutdown = Arc::new(AtomicBool::new(false));
        let frames_rendered = Arc::new(AtomicU64::new(0));
        let period = config.period_duration();
        let frames = config.period_size as usize;

        let thread_handle = {
            let shutdown = Arc::clone(&shutdown);
            let frames_rendered = Arc::clone(&frames_rendered);
            thread::Builder::new()
                .name("synthbox-null-driver".into())
                .spawn(move || {
                    let mut left = vec![0.0f32; frames];
                    let mut right = vec![0.0f32; frames];
                    while !shutdown.load(Ordering::Acquire) {
                        source.render(&mut left, &mut right);
                        frames_rendered.fetch_add(frames as u64, Ordering::Relaxed);
                        thread::sleep(period);
                    }
                })?
        };

        Ok(Self {
            shutdown,
            frames_rendered,
            thread_handle: Some(thread_handle),
            sample_rate: config.sample_rate,
        })
    }

    /// Total frames pulled from the source so far.
    pub fn frames_rendered(&self) -> u64 {
        self.frames_rendered.load(Ordering::Relaxed)
    }
}

impl AudioDriver for NullDriver {
    fn backend_name(&self) -> &str {
        "null"
    }

    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn is_running(&self) -> bool {
        self.thread_handle
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }
}

impl Drop for NullDriver {
    fn drop(&mut self) {
        self.shutdown.store(true, Ordering::Release);
        if let Some(handle) = self.thread_handle.take() {
            let _ = handle.join();
        }
    }
}
