//! Audio output drivers.
//!
//! - [`NullDriver`]: headless, always available
//! - `CpalDriver`: platform audio devices (feature `cpal`)

mod null;
pub use null::NullDriver;

#[cfg(feature = "cpal")]
mod device;
#[cfg(feature = "cpal")]
pub use device::{list_hosts, CpalDriver};

use crate::backend::{AudioDriver, AudioSource};
use crate::config::{AudioBackend, SynthConfig};
use crate::error::EngineError;
use std::sync::Arc;

/// Open the driver selected by `config.audio_backend`, pulling from `source`.
pub fn open_driver(
    config: &SynthConfig,
    source: Arc<dyn AudioSource>,
) -> Result<Box<dyn AudioDriver>, EngineError> {
    match &config.audio_backend {
        AudioBackend::Null => Ok(Box::new(NullDriver::start(config, source)?)),

        #[cfg(feature = "cpal")]
        AudioBackend::Default => Ok(Box::new(CpalDriver::open(config, None, source)?)),

        #[cfg(feature = "cpal")]
        AudioBackend::Host(name) => Ok(Box::new(CpalDriver::open(config, Some(name), source)?)),

        #[cfg(not(feature = "cpal"))]
        backend => Err(EngineError::Device(format!(
            "{backend:?} output requires the `cpal` feature"
        ))),
    }
}
