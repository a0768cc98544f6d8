//! Access to resources bundled with the application.
//!
//! Responsibilities:
//! - Define the `ResourceLoader` seam through which bundled defaults are read.
//! - Provide the two stock loaders: `EmbeddedResources` for compile-time
//!   bundles and `DirResources` for directory-backed bundles.
//!
//! Does NOT handle:
//! - Parsing resource contents (see `document.rs` and `store.rs`).
//!
//! Invariants / Assumptions:
//! - `Ok(None)` is the not-found signal; `Err` means the bundle itself
//!   failed (permissions, broken archive, ...).
//! - The store never touches the bundled default outside this trait, so a
//!   bundle packed inside the binary or an archive needs no filesystem
//!   presence.

use std::fs::File;
use std::io::{self, Read};
use std::path::PathBuf;

/// Read access to resources shipped alongside the application.
pub trait ResourceLoader {
    /// Opens the named resource as a byte stream.
    ///
    /// Returns `Ok(None)` when the bundle holds no such resource.
    fn open(&self, path: &str) -> io::Result<Option<Box<dyn Read + '_>>>;
}

impl<T: ResourceLoader + ?Sized> ResourceLoader for &T {
    fn open(&self, path: &str) -> io::Result<Option<Box<dyn Read + '_>>> {
        (**self).open(path)
    }
}

impl<T: ResourceLoader + ?Sized> ResourceLoader for Box<T> {
    fn open(&self, path: &str) -> io::Result<Option<Box<dyn Read + '_>>> {
        (**self).open(path)
    }
}

/// Resources compiled into the binary, typically via `include_bytes!`.
///
/// ```
/// use config_store::EmbeddedResources;
///
/// static RESOURCES: EmbeddedResources =
///     EmbeddedResources::new(&[("config.yaml", b"port: 8080\n")]);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct EmbeddedResources {
    entries: &'static [(&'static str, &'static [u8])],
}

impl EmbeddedResources {
    /// Creates a bundle from a static table of `(name, bytes)` entries.
    pub const fn new(entries: &'static [(&'static str, &'static [u8])]) -> Self {
        Self { entries }
    }
}

impl ResourceLoader for EmbeddedResources {
    fn open(&self, path: &str) -> io::Result<Option<Box<dyn Read + '_>>> {
        Ok(self
            .entries
            .iter()
            .find(|(name, _)| *name == path)
            .map(|(_, bytes)| Box::new(*bytes) as Box<dyn Read>))
    }
}

/// Resources resolved relative to a directory on disk.
///
/// Useful for development layouts where defaults ship next to the binary
/// rather than inside it.
#[derive(Debug, Clone)]
pub struct DirResources {
    root: PathBuf,
}

impl DirResources {
    /// Creates a bundle rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl ResourceLoader for DirResources {
    fn open(&self, path: &str) -> io::Result<Option<Box<dyn Read + '_>>> {
        match File::open(self.root.join(path)) {
            Ok(file) => Ok(Some(Box::new(file))),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    static EMBEDDED: EmbeddedResources =
        EmbeddedResources::new(&[("config.yaml", b"port: 8080\n"), ("empty.yaml", b"")]);

    fn read_all(mut stream: Box<dyn Read + '_>) -> Vec<u8> {
        let mut buf = Vec::new();
        stream.read_to_end(&mut buf).unwrap();
        buf
    }

    #[test]
    fn embedded_open_returns_bytes() {
        let stream = EMBEDDED.open("config.yaml").unwrap().unwrap();
        assert_eq!(read_all(stream), b"port: 8080\n");
    }

    #[test]
    fn embedded_missing_resource_is_none() {
        assert!(EMBEDDED.open("nope.yaml").unwrap().is_none());
    }

    #[test]
    fn dir_resources_reads_file() {
        let dir = tempfile::TempDir::new().unwrap();
        std::fs::write(dir.path().join("default.yaml"), "host: localhost\n").unwrap();

        let resources = DirResources::new(dir.path());
        let stream = resources.open("default.yaml").unwrap().unwrap();
        assert_eq!(read_all(stream), b"host: localhost\n");
    }

    #[test]
    fn dir_resources_missing_file_is_none() {
        let dir = tempfile::TempDir::new().unwrap();
        let resources = DirResources::new(dir.path());
        assert!(resources.open("absent.yaml").unwrap().is_none());
    }

    #[test]
    fn boxed_trait_object_delegates() {
        let boxed: Box<dyn ResourceLoader + Send + Sync> = Box::new(EMBEDDED);
        assert!(boxed.open("config.yaml").unwrap().is_some());
        assert!(boxed.open("nope.yaml").unwrap().is_none());
    }
}
