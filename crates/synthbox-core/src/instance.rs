//! The owned {configuration, engine, driver} aggregate.

use crate::backend::{AudioDriver, SynthBackend, SynthEngine};
use crate::config::SynthConfig;
use crate::error::EngineError;

/// One synthesizer instance.
///
/// Fields drop in declaration order: driver, then engine, then configuration.
/// The driver holds the engine's audio source, and the engine was built from
/// the configuration, so this is the only safe teardown order.
pub(crate) struct Instance {
    driver: Box<dyn AudioDriver>,
    engine: Box<dyn SynthEngine>,
    config: SynthConfig,
}

impl Instance {
    /// Build configuration → engine → driver.
    ///
    /// A failure at any step drops whatever was already built, newest first.
    pub(crate) fn build(
        config: SynthConfig,
        backend: &dyn SynthBackend,
    ) -> Result<Self, EngineError> {
        let engine = backend.create_engine(&config)?;
        let driver = backend.create_driver(&config, engine.audio_source())?;

        Ok(Self {
            driver,
            engine,
            config,
        })
    }

    pub(crate) fn engine(&self) -> &dyn SynthEngine {
        self.engine.as_ref()
    }

    pub(crate) fn engine_mut(&mut self) -> &mut dyn SynthEngine {
        self.engine.as_mut()
    }

    pub(crate) fn driver(&self) -> &dyn AudioDriver {
        self.driver.as_ref()
    }

    pub(crate) fn config(&self) -> &SynthConfig {
        &self.config
    }
}
