//! Handle → instance mapping.
//!
//! Every method takes `&mut self`; the registry only lives inside the
//! [`SynthSystem`](crate::SynthSystem) mutex, so holding the guard is enforced
//! by the borrow checker rather than by convention.

use crate::error::{Error, Result};
use crate::handle::InstanceHandle;
use crate::instance::Instance;
use std::collections::HashMap;

pub(crate) struct InstanceRegistry {
    next_handle: u64,
    instances: HashMap<InstanceHandle, Instance>,
}

impl Default for InstanceRegistry {
    fn default() -> Self {
        Self::starting_at(1)
    }
}

impl InstanceRegistry {
    /// Registry whose first handle is `first` (at least 1).
    pub(crate) fn starting_at(first: u64) -> Self {
        Self {
            next_handle: first.max(1),
            instances: HashMap::new(),
        }
    }

    /// Raise the counter so the next handle is at least `floor`. Never lowers it.
    pub(crate) fn raise_floor(&mut self, floor: u64) {
        self.next_handle = self.next_handle.max(floor);
    }

    /// The handle value the next allocation will use.
    pub(crate) fn next_handle(&self) -> u64 {
        self.next_handle
    }

    /// Fresh handle, strictly greater than every handle handed out before.
    pub(crate) fn allocate_handle(&mut self) -> InstanceHandle {
        let id = self.next_handle;
        self.next_handle += 1;
        // The counter starts at 1 and only grows.
        InstanceHandle::new(id).unwrap_or_else(|| unreachable!("handle counter wrapped"))
    }

    pub(crate) fn insert(&mut self, handle: InstanceHandle, instance: Instance) -> Result<()> {
        if self.instances.contains_key(&handle) {
            return Err(Error::DuplicateHandle(handle));
        }
        self.instances.insert(handle, instance);
        Ok(())
    }

    pub(crate) fn lookup(&mut self, handle: InstanceHandle) -> Option<&mut Instance> {
        self.instances.get_mut(&handle)
    }

    pub(crate) fn contains(&self, handle: InstanceHandle) -> bool {
        self.instances.contains_key(&handle)
    }

    /// Take ownership of an instance for teardown.
    pub(crate) fn remove(&mut self, handle: InstanceHandle) -> Option<Instance> {
        self.instances.remove(&handle)
    }

    /// Remove every instance, oldest handle first.
    pub(crate) fn drain(&mut self) -> Vec<(InstanceHandle, Instance)> {
        let mut drained: Vec<_> = self.instances.drain().collect();
        drained.sort_by_key(|(handle, _)| *handle);
        drained
    }

    pub(crate) fn len(&self) -> usize {
        self.instances.len()
    }

    pub(crate) fn handles(&self) -> Vec<InstanceHandle> {
        let mut handles: Vec<_> = self.instances.keys().copied().collect();
        handles.sort();
        handles
    }
}
