/// Purpose registry: maps a purpose name to its shader source file.
///
/// The registry is fixed once handed to the ShaderManager. Purpose names are
/// also the record keys in the disk cache, so they are unique.

use std::path::{Path, PathBuf};
use rustc_hash::FxHashMap;
use crate::error::Result;
use crate::shader_bail;

const LOG_SOURCE: &str = "galaxy3d::PurposeRegistry";

/// Name to source path table
#[derive(Debug, Clone, Default)]
pub struct PurposeRegistry {
    sources: FxHashMap<String, PathBuf>,
}

impl PurposeRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            sources: FxHashMap::default(),
        }
    }

    /// Registry with the purposes shipped with the engine test module
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        registry.sources.insert(
            "VertexShader".to_string(),
            PathBuf::from("Modules/D3D11Shaders/Test/TestVertexShader.fx"),
        );
        registry.sources.insert(
            "PixelShader".to_string(),
            PathBuf::from("Modules/D3D11Shaders/Test/TestPixelShader.fx"),
        );
        registry
    }

    /// Build a registry from (purpose, source path) pairs
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if a purpose appears twice.
    pub fn from_entries<I, S, P>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, P)>,
        S: Into<String>,
        P: Into<PathBuf>,
    {
        let mut registry = Self::new();
        for (purpose, source_path) in entries {
            registry.register(purpose, source_path)?;
        }
        Ok(registry)
    }

    /// Register a purpose
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if the purpose is already registered.
    pub fn register(&mut self, purpose: impl Into<String>, source_path: impl Into<PathBuf>) -> Result<()> {
        let purpose = purpose.into();
        if self.sources.contains_key(&purpose) {
            shader_bail!(LOG_SOURCE, InvalidConfig,
                "Purpose '{}' is already registered", purpose);
        }

        self.sources.insert(purpose, source_path.into());
        Ok(())
    }

    /// Source file of a purpose
    ///
    /// # Errors
    ///
    /// Returns `PurposeNotRegistered` if the purpose is unknown.
    pub fn source_path(&self, purpose: &str) -> Result<&Path> {
        match self.sources.get(purpose) {
            Some(path) => Ok(path.as_path()),
            None => shader_bail!(LOG_SOURCE, PurposeNotRegistered, "{}", purpose),
        }
    }

    pub fn contains(&self, purpose: &str) -> bool {
        self.sources.contains_key(purpose)
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// Registered purpose names, sorted
    pub fn purposes(&self) -> Vec<&str> {
        let mut purposes: Vec<&str> = self.sources.keys().map(String::as_str).collect();
        purposes.sort_unstable();
        purposes
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
