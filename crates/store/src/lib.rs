//! Comment-preserving configuration store backed by a bundled default.
//!
//! On first run the bundled default configuration is copied to a target
//! path on disk; afterwards the on-disk file is the source of truth and is
//! never overwritten by the bundle again. The file is parsed into a
//! [`Document`] that keeps comments and key order, and an optional
//! [`EnvSnapshot`] captures overrides from a `.env` file. The store
//! supports [`reload`](ConfigStore::reload) and
//! [`save`](ConfigStore::save).
//!
//! ```no_run
//! use config_store::{ConfigStore, EmbeddedResources};
//!
//! static RESOURCES: EmbeddedResources =
//!     EmbeddedResources::new(&[("config.yaml", include_bytes!("../tests/data/config.yaml"))]);
//!
//! # fn main() -> Result<(), config_store::ConfigError> {
//! let store = ConfigStore::open(RESOURCES, "config.yaml", "app/config.yaml", false)?;
//! let port = store.document().get_i64("server.port");
//! # Ok(())
//! # }
//! ```

pub mod document;
pub mod env;
pub mod global;
pub mod resources;
mod store;

pub use document::{Document, DocumentError};
pub use env::EnvSnapshot;
pub use resources::{DirResources, EmbeddedResources, ResourceLoader};
pub use store::{ConfigError, ConfigStore};
