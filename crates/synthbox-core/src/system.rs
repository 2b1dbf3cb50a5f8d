//! Synthbox system - instance registry behind a single guard.

use crate::backend::{SynthBackend, SynthEngine};
use crate::error::{EngineError, Error, Result};
use crate::handle::InstanceHandle;
use crate::instance::Instance;
use crate::registry::InstanceRegistry;
use parking_lot::Mutex;
use std::sync::Arc;

/// Snapshot of one live instance.
#[derive(Debug, Clone, PartialEq)]
pub struct InstanceInfo {
    pub handle: InstanceHandle,
    pub backend: String,
    pub sample_rate: u32,
    pub polyphony: u32,
    pub soundfonts: usize,
    pub master_gain: f32,
}

/// Owner of every synthesizer instance.
///
/// Construct one per process (or per test) and pass it by reference. All
/// registry reads and writes, and every forwarded engine command, happen
/// inside one mutex, so a command that loses a race against
/// [`destroy_instance`](Self::destroy_instance) observes `NotFound` instead of
/// a half-released engine.
///
/// Dropping the system destroys all remaining instances.
pub struct SynthSystem {
    backend: Arc<dyn SynthBackend>,
    pub(crate) registry: Mutex<InstanceRegistry>,
}

impl SynthSystem {
    pub fn new(backend: impl SynthBackend + 'static) -> Self {
        Self::with_backend(Arc::new(backend))
    }

    pub fn with_backend(backend: Arc<dyn SynthBackend>) -> Self {
        Self {
            backend,
            registry: Mutex::new(InstanceRegistry::default()),
        }
    }

    /// Continue handle numbering at `first` or above.
    ///
    /// Lets a process that replaces its system (shutdown, then init again)
    /// keep handles unique across both lifetimes; pass the old system's
    /// [`next_handle`](Self::next_handle).
    pub fn starting_at(self, first: u64) -> Self {
        self.registry.lock().raise_floor(first);
        self
    }

    /// The handle value the next successful creation will receive.
    pub fn next_handle(&self) -> u64 {
        self.registry.lock().next_handle()
    }

    pub fn backend(&self) -> &dyn SynthBackend {
        self.backend.as_ref()
    }

    /// Version string of the linked engine. Handle-independent.
    pub fn version(&self) -> String {
        self.backend.version()
    }

    pub fn instance_count(&self) -> usize {
        self.registry.lock().len()
    }

    /// Live handles, ascending.
    pub fn handles(&self) -> Vec<InstanceHandle> {
        self.registry.lock().handles()
    }

    pub fn contains(&self, handle: InstanceHandle) -> bool {
        self.registry.lock().contains(handle)
    }

    pub fn instance_info(&self, handle: InstanceHandle) -> Result<InstanceInfo> {
        self.inspect(handle, |instance| InstanceInfo {
            handle,
            backend: instance.driver().backend_name().to_string(),
            sample_rate: instance.driver().sample_rate(),
            polyphony: instance.config().polyphony,
            soundfonts: instance.engine().soundfont_count(),
            master_gain: instance.engine().master_gain(),
        })
    }

    pub(crate) fn build_instance(
        &self,
        config: crate::SynthConfig,
    ) -> core::result::Result<Instance, EngineError> {
        Instance::build(config, self.backend.as_ref())
    }

    /// Run a command against one engine while holding the guard.
    pub(crate) fn with_engine<R>(
        &self,
        handle: InstanceHandle,
        command: &'static str,
        f: impl FnOnce(&mut dyn SynthEngine) -> core::result::Result<R, EngineError>,
    ) -> Result<R> {
        let mut registry = self.registry.lock();
        let Some(instance) = registry.lookup(handle) else {
            tracing::debug!("{command}: synthesizer {handle} not found");
            return Err(Error::NotFound(handle));
        };

        f(instance.engine_mut()).map_err(|e| {
            tracing::warn!("{command} rejected by synthesizer {handle}: {e}");
            Error::Engine(e)
        })
    }

    /// Read-only access to one instance while holding the guard.
    pub(crate) fn inspect<R>(
        &self,
        handle: InstanceHandle,
        f: impl FnOnce(&Instance) -> R,
    ) -> Result<R> {
        let mut registry = self.registry.lock();
        registry
            .lookup(handle)
            .map(|instance| f(instance))
            .ok_or(Error::NotFound(handle))
    }
}

impl Drop for SynthSystem {
    fn drop(&mut self) {
        self.shutdown();
    }
}
