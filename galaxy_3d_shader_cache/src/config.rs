/// Shader cache configuration
///
/// Created programmatically (Default + `with_*` builders) or from environment
/// variables, then handed to the ShaderManager which never changes it.

use std::path::{Path, PathBuf};
use crate::disk_cache::BuildVariant;
use crate::error::Result;
use crate::shader::ShaderProfiles;
use crate::shader_bail;

const LOG_SOURCE: &str = "galaxy3d::ShaderCacheConfig";

/// Directory name of the cache root under the platform cache directory
pub const CACHE_DIR_NAME: &str = "Galaxy3D_ShadersCache";

/// Default file receiving the diagnostic of the last failed compilation
pub const DEFAULT_ERROR_LOG: &str = "shader-error.txt";

pub const ENV_CACHE_DIR: &str = "GALAXY3D_SHADER_CACHE_DIR";
pub const ENV_KEEP_BYTECODE: &str = "GALAXY3D_SHADER_KEEP_BYTECODE";
pub const ENV_BUILD_VARIANT: &str = "GALAXY3D_SHADER_BUILD_VARIANT";

/// Shader cache configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderCacheConfig {
    /// Directory holding the disk cache files (created if absent)
    pub cache_root: PathBuf,

    /// Selects the cache file suffix and the debug compile flag
    pub build_variant: BuildVariant,

    /// Retain bytecode for every stage, not only the vertex stage
    pub keep_all_bytecode: bool,

    /// Target profile per stage kind
    pub profiles: ShaderProfiles,

    /// File overwritten with the diagnostic of a failed compilation (None = disabled)
    pub error_log_path: Option<PathBuf>,
}

impl Default for ShaderCacheConfig {
    fn default() -> Self {
        Self {
            cache_root: Self::default_cache_root(),
            build_variant: BuildVariant::current(),
            keep_all_bytecode: false,
            profiles: ShaderProfiles::default(),
            error_log_path: Some(PathBuf::from(DEFAULT_ERROR_LOG)),
        }
    }
}

impl ShaderCacheConfig {
    /// Default cache root for the current platform
    ///
    /// - Linux: ~/.cache/Galaxy3D_ShadersCache
    /// - macOS: ~/Library/Caches/Galaxy3D_ShadersCache
    /// - Windows: %LOCALAPPDATA%\Galaxy3D_ShadersCache
    ///
    /// Falls back to the temporary directory when no cache directory exists.
    pub fn default_cache_root() -> PathBuf {
        dirs::cache_dir()
            .unwrap_or_else(std::env::temp_dir)
            .join(CACHE_DIR_NAME)
    }

    pub fn with_cache_root<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.cache_root = path.as_ref().to_path_buf();
        self
    }

    pub fn with_build_variant(mut self, variant: BuildVariant) -> Self {
        self.build_variant = variant;
        self
    }

    pub fn with_keep_all_bytecode(mut self, keep: bool) -> Self {
        self.keep_all_bytecode = keep;
        self
    }

    pub fn with_profiles(mut self, profiles: ShaderProfiles) -> Self {
        self.profiles = profiles;
        self
    }

    /// Set (or disable with None) the compile error artifact
    pub fn with_error_log_path(mut self, path: Option<PathBuf>) -> Self {
        self.error_log_path = path;
        self
    }

    /// Load configuration from environment variables
    ///
    /// - `GALAXY3D_SHADER_CACHE_DIR`: cache root
    /// - `GALAXY3D_SHADER_KEEP_BYTECODE`: `1`/`true`/`yes` or `0`/`false`/`no`
    /// - `GALAXY3D_SHADER_BUILD_VARIANT`: `debug` or `release`
    ///
    /// Unset variables keep their default.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if a variable holds an unrecognized value.
    pub fn from_env() -> Result<Self> {
        Self::from_vars(|name| std::env::var(name).ok())
    }

    /// Same as [`from_env`](Self::from_env) with a custom variable source
    pub fn from_vars<F>(var: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(dir) = var(ENV_CACHE_DIR) {
            if dir.trim().is_empty() {
                shader_bail!(LOG_SOURCE, InvalidConfig, "{} is empty", ENV_CACHE_DIR);
            }
            config.cache_root = PathBuf::from(dir);
        }

        if let Some(value) = var(ENV_KEEP_BYTECODE) {
            config.keep_all_bytecode = match value.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" => true,
                "0" | "false" | "no" => false,
                _ => shader_bail!(LOG_SOURCE, InvalidConfig,
                    "{} must be a boolean, got '{}'", ENV_KEEP_BYTECODE, value),
            };
        }

        if let Some(value) = var(ENV_BUILD_VARIANT) {
            config.build_variant = match value.trim().to_ascii_lowercase().as_str() {
                "debug" => BuildVariant::Debug,
                "release" => BuildVariant::Release,
                _ => shader_bail!(LOG_SOURCE, InvalidConfig,
                    "{} must be 'debug' or 'release', got '{}'", ENV_BUILD_VARIANT, value),
            };
        }

        Ok(config)
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
