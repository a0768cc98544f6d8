//! Configuration store: first-run materialization, load, reload, save.
//!
//! Responsibilities:
//! - Ensure the live configuration file exists, copying the bundled
//!   default on first run.
//! - Parse the file into a comment-preserving [`Document`] and optionally
//!   capture a dotenv [`EnvSnapshot`].
//! - Write the document back to disk on `save`.
//!
//! Invariants / Assumptions:
//! - An existing output file is never overwritten during materialization;
//!   user edits are never clobbered.
//! - `reload` replaces in-memory state all-or-nothing: on failure the
//!   previous document and snapshot stay untouched.
//! - Not thread-safe: `reload` swaps the document non-atomically, so
//!   concurrent reload/save/accessor calls from multiple threads are
//!   undefined. Hosts that share a store across threads must add their own
//!   synchronization.

use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::document::{Document, DocumentError};
use crate::env::EnvSnapshot;
use crate::resources::ResourceLoader;

/// Errors that can occur while loading or saving configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The bundled default is missing: a packaging error, the default must
    /// ship alongside the code.
    #[error("resource '{path}' is not bundled with the application")]
    ResourceNotFound { path: String },

    #[error("failed to create configuration file at {path}")]
    Create {
        path: PathBuf,
        source: io::Error,
    },

    #[error("failed to parse configuration at {path}")]
    Parse {
        path: PathBuf,
        source: DocumentError,
    },

    #[error("failed to load .env file: {0}")]
    Env(#[from] dotenvy::Error),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("global configuration context has not been initialized")]
    NotInitialized,

    #[error("global configuration context is already initialized")]
    AlreadyInitialized,
}

/// A live configuration file backed by a bundled default.
///
/// Construction materializes the file on disk if needed, parses it, and
/// optionally captures a `.env` snapshot. The store owns its resource
/// loader; pass the store itself to whatever needs configuration rather
/// than reaching for process-wide state (see [`crate::global`] when a
/// process-wide handle is genuinely required).
pub struct ConfigStore<R: ResourceLoader> {
    resources: R,
    resource_path: String,
    output_path: PathBuf,
    env_file: Option<PathBuf>,
    document: Document,
    env: Option<EnvSnapshot>,
}

impl<R: ResourceLoader> ConfigStore<R> {
    /// Opens the store: materializes `output_path` from the bundled
    /// resource on first run, parses it, and captures `.env` from the
    /// working directory when `with_env` is set.
    ///
    /// # Errors
    /// [`ConfigError::ResourceNotFound`] if the bundle lacks
    /// `resource_path` (no file is created in that case), or an I/O /
    /// parse error from materialization and loading.
    pub fn open(
        resources: R,
        resource_path: impl Into<String>,
        output_path: impl Into<PathBuf>,
        with_env: bool,
    ) -> Result<Self, ConfigError> {
        Self::open_inner(resources, resource_path.into(), output_path.into(), with_env, None)
    }

    /// Like [`ConfigStore::open`] with `with_env` enabled, but capturing
    /// the snapshot from an explicit dotenv path instead of the working
    /// directory. Primarily for tests and hosts that do not run from their
    /// configuration directory.
    pub fn open_with_env_file(
        resources: R,
        resource_path: impl Into<String>,
        output_path: impl Into<PathBuf>,
        env_file: impl Into<PathBuf>,
    ) -> Result<Self, ConfigError> {
        Self::open_inner(
            resources,
            resource_path.into(),
            output_path.into(),
            true,
            Some(env_file.into()),
        )
    }

    fn open_inner(
        resources: R,
        resource_path: String,
        output_path: PathBuf,
        with_env: bool,
        env_file: Option<PathBuf>,
    ) -> Result<Self, ConfigError> {
        let (document, env) = load(
            &resources,
            &resource_path,
            &output_path,
            with_env,
            env_file.as_deref(),
        )?;
        Ok(Self {
            resources,
            resource_path,
            output_path,
            env_file,
            document,
            env,
        })
    }

    /// Re-reads the configuration file and, when a snapshot was captured
    /// at construction, the `.env` file. Fully replaces in-memory state;
    /// on failure the previous state is left untouched.
    pub fn reload(&mut self) -> Result<(), ConfigError> {
        let with_env = self.env.is_some();
        let (document, env) = load(
            &self.resources,
            &self.resource_path,
            &self.output_path,
            with_env,
            self.env_file.as_deref(),
        )?;
        self.document = document;
        self.env = env;
        Ok(())
    }

    /// Serializes the current document to the output path, overwriting it.
    ///
    /// A never-mutated document saves byte-identically to what was loaded.
    pub fn save(&self) -> Result<(), ConfigError> {
        let text = self
            .document
            .to_yaml()
            .map_err(|source| ConfigError::Parse {
                path: self.output_path.clone(),
                source,
            })?;
        std::fs::write(&self.output_path, text)?;
        tracing::debug!(path = %self.output_path.display(), "configuration saved");
        Ok(())
    }

    /// Deserializes a bundled resource straight into a typed value,
    /// bypassing the comment-preserving document model.
    ///
    /// This is the entry point for one-shot auxiliary data files shipped
    /// next to the main configuration; the live config stays behind
    /// [`ConfigStore::document`].
    pub fn load_resource<T: DeserializeOwned>(
        &self,
        resource_path: &str,
    ) -> Result<T, ConfigError> {
        let stream = self
            .resources
            .open(resource_path)?
            .ok_or_else(|| ConfigError::ResourceNotFound {
                path: resource_path.to_string(),
            })?;
        serde_yaml::from_reader(stream).map_err(|e| ConfigError::Parse {
            path: PathBuf::from(resource_path),
            source: DocumentError::Yaml(e),
        })
    }

    /// The live, comment-preserving document.
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Mutable access to the live document, for `set`-then-[`save`] flows.
    ///
    /// [`save`]: ConfigStore::save
    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    /// The environment snapshot, if one was requested at construction.
    pub fn env(&self) -> Option<&EnvSnapshot> {
        self.env.as_ref()
    }

    /// Path of the bundled default inside the resource bundle.
    pub fn resource_path(&self) -> &str {
        &self.resource_path
    }

    /// Path of the live configuration file on disk.
    pub fn output_path(&self) -> &Path {
        &self.output_path
    }
}

fn load<R: ResourceLoader>(
    resources: &R,
    resource_path: &str,
    output_path: &Path,
    with_env: bool,
    env_file: Option<&Path>,
) -> Result<(Document, Option<EnvSnapshot>), ConfigError> {
    materialize(resources, resource_path, output_path)?;

    let text = std::fs::read_to_string(output_path)?;
    let document = Document::parse(&text).map_err(|source| ConfigError::Parse {
        path: output_path.to_path_buf(),
        source,
    })?;

    let env = if with_env {
        Some(match env_file {
            Some(path) => EnvSnapshot::from_path(path)?,
            None => EnvSnapshot::load()?,
        })
    } else {
        None
    };

    Ok((document, env))
}

/// Copies the bundled default to `output_path` unless the file already
/// exists. The copy is line-by-line, normalizing line endings to `\n`.
///
/// The resource is opened before the output file is created, so a missing
/// resource leaves nothing behind at `output_path`.
fn materialize<R: ResourceLoader>(
    resources: &R,
    resource_path: &str,
    output_path: &Path,
) -> Result<(), ConfigError> {
    if output_path.exists() {
        return Ok(());
    }

    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|source| ConfigError::Create {
                path: output_path.to_path_buf(),
                source,
            })?;
        }
    }

    let stream = resources
        .open(resource_path)?
        .ok_or_else(|| ConfigError::ResourceNotFound {
            path: resource_path.to_string(),
        })?;
    let reader = BufReader::new(stream);

    let file = File::create(output_path).map_err(|source| ConfigError::Create {
        path: output_path.to_path_buf(),
        source,
    })?;
    let mut writer = BufWriter::new(file);

    let mut lines = 0usize;
    for line in reader.lines() {
        let line = line?;
        tracing::trace!(line = %line, "copying default configuration line");
        writeln!(writer, "{line}")?;
        lines += 1;
    }
    writer.flush()?;

    tracing::debug!(
        path = %output_path.display(),
        lines,
        "materialized configuration from bundled default"
    );
    Ok(())
}
