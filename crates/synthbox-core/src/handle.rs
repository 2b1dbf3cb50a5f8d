//! Opaque instance handles.

use core::fmt;
use core::num::NonZeroU64;

/// Process-unique handle to a live synthesizer instance.
///
/// Handles are strictly positive and never reused while the owning
/// [`SynthSystem`](crate::SynthSystem) is alive.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InstanceHandle(NonZeroU64);

impl InstanceHandle {
    pub(crate) fn new(id: u64) -> Option<Self> {
        NonZeroU64::new(id).map(Self)
    }

    /// Parse a handle received from a caller. Zero and negative values are never valid.
    pub fn from_raw(raw: i64) -> Option<Self> {
        u64::try_from(raw).ok().and_then(Self::new)
    }

    /// The handle as the signed integer handed across the boundary.
    pub fn as_raw(&self) -> i64 {
        i64::try_from(self.0.get()).unwrap_or(i64::MAX)
    }

    pub fn get(&self) -> u64 {
        self.0.get()
    }
}

impl fmt::Display for InstanceHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
