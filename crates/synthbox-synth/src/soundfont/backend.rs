//! RustySynth backend for the synthbox core.

use super::cache::SoundFontCache;
use super::engine::RustySynthEngine;
use std::sync::Arc;
use synthbox_core::{EngineError, SynthBackend, SynthConfig, SynthEngine};

/// Version string reported for the linked engine.
pub fn version() -> String {
    format!("synthbox-synth {} (rustysynth)", env!("CARGO_PKG_VERSION"))
}

/// Builds a [`RustySynthEngine`] per instance; all engines share one
/// SoundFont cache.
#[derive(Clone, Default)]
pub struct RustySynthBackend {
    cache: Arc<SoundFontCache>,
}

impl RustySynthBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Backend drawing on an existing cache.
    pub fn with_cache(cache: Arc<SoundFontCache>) -> Self {
        Self { cache }
    }

    pub fn cache(&self) -> &Arc<SoundFontCache> {
        &self.cache
    }
}

impl SynthBackend for RustySynthBackend {
    fn create_engine(&self, config: &SynthConfig) -> Result<Box<dyn SynthEngine>, EngineError> {
        let engine = RustySynthEngine::new(config, Arc::clone(&self.cache))?;
        tracing::debug!(
            "RustySynth engine ready ({} Hz, {} voices, {} channels)",
            config.sample_rate,
            config.polyphony,
            config.midi_channels
        );
        Ok(Box::new(engine))
    }

    fn version(&self) -> String {
        version()
    }
}
