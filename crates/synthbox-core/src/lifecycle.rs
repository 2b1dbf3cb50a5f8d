//! Instance creation and teardown.

use crate::config::SynthConfig;
use crate::error::{Error, Result};
use crate::handle::InstanceHandle;
use crate::system::SynthSystem;

impl SynthSystem {
    /// Build a new instance and register it.
    ///
    /// Engine and driver are constructed outside the guard; only fully built
    /// instances are inserted, together with their freshly allocated handle,
    /// in one critical section. Construction failures release everything
    /// already built before returning [`Error::AllocationFailure`].
    pub fn create_instance(&self, config: SynthConfig) -> Result<InstanceHandle> {
        let instance = self.build_instance(config).map_err(|e| {
            tracing::error!("Failed to create synthesizer: {e}");
            Error::AllocationFailure(e)
        })?;

        let mut registry = self.registry.lock();
        let handle = registry.allocate_handle();
        if let Err(e) = registry.insert(handle, instance) {
            // Monotonic allocation makes this unreachable unless the registry is corrupted.
            tracing::error!("Registry invariant violated: {e}");
            return Err(e);
        }
        drop(registry);

        tracing::info!("Created synthesizer with ID: {handle}");
        Ok(handle)
    }

    /// [`create_instance`](Self::create_instance) with [`SynthConfig::default`].
    pub fn create_default(&self) -> Result<InstanceHandle> {
        self.create_instance(SynthConfig::default())
    }

    /// Destroy an instance. Idempotent: unknown handles are a no-op.
    ///
    /// The instance leaves the registry first, so no command can reach it once
    /// teardown begins. Driver, engine and configuration are then released in
    /// that order, outside the guard. Returns whether an instance was destroyed.
    pub fn destroy_instance(&self, handle: InstanceHandle) -> bool {
        let removed = self.registry.lock().remove(handle);

        match removed {
            Some(instance) => {
                drop(instance);
                tracing::info!("Destroyed synthesizer with ID: {handle}");
                true
            }
            None => {
                tracing::debug!("destroy: synthesizer {handle} already gone");
                false
            }
        }
    }

    /// Destroy every live instance, oldest first. Returns how many were destroyed.
    pub fn shutdown(&self) -> usize {
        let drained = self.registry.lock().drain();
        let count = drained.len();

        for (handle, instance) in drained {
            drop(instance);
            tracing::info!("Destroyed synthesizer with ID: {handle}");
        }

        count
    }
}
