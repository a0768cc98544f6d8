//! Environment snapshots from `.env` files.
//!
//! The snapshot is captured once per load and never touches the process
//! environment, so concurrent tests and host code see no global side
//! effects from this crate.

use std::collections::HashMap;
use std::path::Path;

use crate::store::ConfigError;

/// Immutable name/value mapping captured from a `.env` file.
#[derive(Debug, Clone, Default)]
pub struct EnvSnapshot {
    vars: HashMap<String, String>,
}

impl EnvSnapshot {
    /// Captures `.env` from the process working directory.
    ///
    /// An absent file yields an empty snapshot; a malformed file is an
    /// error.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_path(Path::new(".env"))
    }

    /// Captures a dotenv-format file at an explicit path, primarily for
    /// tests and hosts that do not run from their configuration directory.
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let mut vars = HashMap::new();
        match dotenvy::from_path_iter(path) {
            Ok(entries) => {
                for entry in entries {
                    let (name, value) = entry?;
                    vars.insert(name, value);
                }
            }
            Err(e) if e.not_found() => {}
            Err(e) => return Err(ConfigError::Env(e)),
        }
        Ok(Self { vars })
    }

    /// Looks up a variable by name.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.vars.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    /// Iterates over all captured variables in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.vars.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}
