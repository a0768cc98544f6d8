//! Process-wide configuration context with single-assignment semantics.
//!
//! Dependency injection is the preferred shape: construct a
//! [`ConfigStore`] and pass it to whatever needs it. When a process-wide
//! handle is genuinely required, this module offers one that is assigned
//! exactly once — a second [`init`] fails instead of silently replacing
//! the earlier store.
//!
//! The handle is read-only (`&'static`), so `reload` is deliberately
//! unavailable through it; hosts that reload own their store directly.

use std::sync::OnceLock;

use crate::resources::ResourceLoader;
use crate::store::{ConfigError, ConfigStore};

/// The store type held by the global context. Boxing the loader lets any
/// [`ResourceLoader`] implementation back the context.
pub type SharedStore = ConfigStore<Box<dyn ResourceLoader + Send + Sync>>;

static CONTEXT: OnceLock<SharedStore> = OnceLock::new();

/// Installs the process-wide store. First call wins.
///
/// # Errors
/// [`ConfigError::AlreadyInitialized`] if a store was installed before;
/// the existing store is kept and the rejected one is dropped.
pub fn init(store: SharedStore) -> Result<(), ConfigError> {
    CONTEXT.set(store).map_err(|_| ConfigError::AlreadyInitialized)
}

/// Returns the process-wide store.
///
/// # Errors
/// [`ConfigError::NotInitialized`] if [`init`] has not been called.
pub fn get() -> Result<&'static SharedStore, ConfigError> {
    CONTEXT.get().ok_or(ConfigError::NotInitialized)
}

/// Whether a process-wide store has been installed.
pub fn is_initialized() -> bool {
    CONTEXT.get().is_some()
}
