//! Process-wide validator factory for host integration
//!
//! A host application that already owns a validator (with its own rules or
//! translations) registers it once at startup. Entities without an injected
//! factory then pick it up instead of building the default one.

use super::factory::ValidatorFactory;
use crate::core::error::ConfigError;
use std::sync::{Arc, OnceLock};

static GLOBAL_FACTORY: OnceLock<Arc<dyn ValidatorFactory>> = OnceLock::new();

/// Access to the process-wide validator factory slot
///
/// The slot is written at most once; afterwards it is only read, so any
/// number of entities may resolve it concurrently.
pub struct ValidatorRegistry;

impl ValidatorRegistry {
    /// Register the process-wide factory
    ///
    /// Fails with [`ConfigError::RegistryAlreadySet`] if one is already set;
    /// the existing factory stays in place.
    pub fn register(factory: Arc<dyn ValidatorFactory>) -> Result<(), ConfigError> {
        GLOBAL_FACTORY
            .set(factory)
            .map_err(|_| ConfigError::RegistryAlreadySet)?;
        tracing::debug!("global validator factory registered");
        Ok(())
    }

    /// The registered factory, if any
    pub fn global() -> Option<Arc<dyn ValidatorFactory>> {
        GLOBAL_FACTORY.get().cloned()
    }

    pub fn is_registered() -> bool {
        GLOBAL_FACTORY.get().is_some()
    }
}
