//! Environment snapshot sources
//!
//! The engine never reads ambient global state directly; it is handed a
//! read-only snapshot by a source. Sources cover the live process table,
//! `.env` files (parsing delegated to `dotenvy`), a static map for tests,
//! and a layered merge where later sources win on key collision.

use indexmap::IndexMap;
use std::path::{Path, PathBuf};

use crate::error::{Result, ValidationError};

/// A read-only provider of environment snapshots
///
/// Every call returns a fresh snapshot; repeated calls may differ only if
/// the underlying source changed between them.
pub trait EnvSource {
    /// Take a snapshot of the source's current key/value pairs
    fn snapshot(&self) -> Result<IndexMap<String, String>>;
}

/// The live process environment table
#[derive(Debug, Default)]
pub struct ProcessEnvSource;

impl ProcessEnvSource {
    /// Create a new process environment source
    pub fn new() -> Self {
        Self
    }
}

impl EnvSource for ProcessEnvSource {
    fn snapshot(&self) -> Result<IndexMap<String, String>> {
        Ok(std::env::vars().collect())
    }
}

/// A `.env` file source
///
/// File parsing is delegated to `dotenvy`; this source only maps its
/// entries into a snapshot and its failures into crate errors.
#[derive(Debug)]
pub struct DotenvSource {
    path: PathBuf,
}

impl DotenvSource {
    /// Create a source for the given `.env` file
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl EnvSource for DotenvSource {
    fn snapshot(&self) -> Result<IndexMap<String, String>> {
        let iter = dotenvy::from_path_iter(&self.path).map_err(|e| {
            ValidationError::file_error(format!(
                "failed to read env file '{}': {}",
                self.path.display(),
                e
            ))
        })?;

        let mut map = IndexMap::new();
        for item in iter {
            let (key, value) = item.map_err(|e| {
                ValidationError::parse_error(format!(
                    "failed to parse env file '{}': {}",
                    self.path.display(),
                    e
                ))
            })?;
            map.insert(key, value);
        }
        Ok(map)
    }
}

/// A fixed in-memory snapshot
#[derive(Debug, Default)]
pub struct StaticSource {
    entries: IndexMap<String, String>,
}

impl StaticSource {
    /// Create a source over the given entries
    pub fn new(entries: IndexMap<String, String>) -> Self {
        Self { entries }
    }

    /// Add an entry
    pub fn with_entry(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.entries.insert(key.into(), value.into());
        self
    }
}

impl EnvSource for StaticSource {
    fn snapshot(&self) -> Result<IndexMap<String, String>> {
        Ok(self.entries.clone())
    }
}

/// Precedence-ordered merge of several sources
///
/// Snapshots are merged in layer order; a later layer's value wins on key
/// collision while the key keeps its first-seen position. Keys never
/// repeat in the merged view.
pub struct LayeredSource {
    layers: Vec<Box<dyn EnvSource>>,
}

impl LayeredSource {
    /// Create an empty layered source
    pub fn new() -> Self {
        Self { layers: Vec::new() }
    }

    /// Append a layer; later layers take precedence
    pub fn with_layer(mut self, layer: Box<dyn EnvSource>) -> Self {
        self.layers.push(layer);
        self
    }
}

impl Default for LayeredSource {
    fn default() -> Self {
        Self::new()
    }
}

impl EnvSource for LayeredSource {
    fn snapshot(&self) -> Result<IndexMap<String, String>> {
        let mut merged = IndexMap::new();
        for layer in &self.layers {
            for (key, value) in layer.snapshot()? {
                merged.insert(key, value);
            }
        }
        Ok(merged)
    }
}
