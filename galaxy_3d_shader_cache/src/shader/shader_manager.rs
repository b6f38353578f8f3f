/// Shader manager: the public face of the two-tier shader cache.
///
/// Resolves a purpose to a device stage object through the chain
/// memory cache -> disk cache -> compiler, then the device. Successful
/// resolutions stay in memory until teardown; failures are never cached,
/// the next call for the same purpose runs the whole chain again.

use std::fs;
use std::path::Path;
use std::sync::{Arc, Mutex};
use crate::config::ShaderCacheConfig;
use crate::disk_cache::{BuildVariant, CacheEntry, DiskCacheStore, ShaderDiskCache};
use crate::error::{Error, Result};
use crate::{shader_bail, shader_debug, shader_err, shader_error, shader_info, shader_trace, shader_warn};
use super::compiler::{CompileDiagnostic, CompileRequest, ShaderCompiler};
use super::device::{ShaderDevice, StageObject};
use super::memory_cache::{MemoryCache, MemoryRecord};
use super::registry::PurposeRegistry;
use super::stage::{ShaderDefine, StageKind};

const LOG_SOURCE: &str = "galaxy3d::ShaderManager";

/// Counters describing how requests were served
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShaderManagerStats {
    /// Requests answered from the memory cache
    pub memory_hits: u64,
    /// Requests whose bytecode came from the disk cache
    pub disk_hits: u64,
    /// Successful compilations
    pub compiles: u64,
    /// Failed compilations
    pub compile_failures: u64,
    /// Stage objects the device refused to create
    pub device_failures: u64,
}

/// Two-tier shader cache in front of a compiler and a device
///
/// Holds the device as a shared trait object and owns the compiler and the
/// disk cache. Calls take `&mut self`, so at most one resolution (and thus
/// one compilation) per purpose can be in flight.
pub struct ShaderManager {
    config: ShaderCacheConfig,
    registry: PurposeRegistry,
    device: Arc<Mutex<dyn ShaderDevice>>,
    compiler: Box<dyn ShaderCompiler>,
    disk_cache: Box<dyn ShaderDiskCache>,
    memory: MemoryCache,
    stats: ShaderManagerStats,
}

impl ShaderManager {
    /// Create a manager backed by a [`DiskCacheStore`] at `config.cache_root`
    pub fn new(
        config: ShaderCacheConfig,
        registry: PurposeRegistry,
        device: Arc<Mutex<dyn ShaderDevice>>,
        compiler: Box<dyn ShaderCompiler>,
    ) -> Self {
        let disk_cache = DiskCacheStore::new(&config.cache_root, config.build_variant);
        Self::with_disk_cache(config, registry, device, compiler, Box::new(disk_cache))
    }

    /// Create a manager with a caller-supplied disk cache
    pub fn with_disk_cache(
        config: ShaderCacheConfig,
        registry: PurposeRegistry,
        device: Arc<Mutex<dyn ShaderDevice>>,
        compiler: Box<dyn ShaderCompiler>,
        disk_cache: Box<dyn ShaderDiskCache>,
    ) -> Self {
        shader_debug!(LOG_SOURCE, "Shader manager created ({} purposes, {:?}, cache root '{}')",
            registry.len(), config.build_variant, config.cache_root.display());

        Self {
            config,
            registry,
            device,
            compiler,
            disk_cache,
            memory: MemoryCache::new(),
            stats: ShaderManagerStats::default(),
        }
    }

    /// Resolve `purpose` to a stage object of kind `kind`
    ///
    /// # Arguments
    ///
    /// * `purpose` - Registered purpose name (also the disk cache key)
    /// * `entry_point` - Entry point function in the source file
    /// * `kind` - Stage kind; selects the compile profile and the device call
    /// * `defines` - Optional preprocessor definitions
    ///
    /// # Errors
    ///
    /// - `PurposeNotRegistered` if the registry has no source for `purpose`
    /// - `StageMismatch` if `purpose` is already cached as another stage kind
    /// - `CompileError` if the compiler rejects the source
    /// - `DeviceCreateError` if the device rejects the bytecode
    pub fn get_shader(
        &mut self,
        purpose: &str,
        entry_point: &str,
        kind: StageKind,
        defines: Option<&[ShaderDefine]>,
    ) -> Result<StageObject> {
        let source_path = self.registry.source_path(purpose)?.to_path_buf();

        if let Some(record) = self.memory.get(purpose) {
            let cached_kind = record.object.kind();
            if cached_kind != kind {
                shader_bail!(LOG_SOURCE, StageMismatch,
                    "'{}' is cached as a {} shader, requested as {}", purpose, cached_kind, kind);
            }

            self.stats.memory_hits += 1;
            shader_trace!(LOG_SOURCE, "Memory hit for '{}'", purpose);
            return Ok(record.object.clone());
        }

        let bytecode = match self.disk_cache.search(purpose, &source_path) {
            Some(bytecode) => {
                self.stats.disk_hits += 1;
                bytecode
            }
            None => {
                let bytecode = self.compile(purpose, &source_path, entry_point, kind,
                    defines.unwrap_or(&[]))?;
                let entry = CacheEntry::new(purpose, bytecode);
                self.disk_cache.add(&entry, &source_path);
                entry.bytecode
            }
        };

        let object = self.create_stage_object(purpose, kind, &bytecode)?;

        let retained = (kind == StageKind::Vertex || self.config.keep_all_bytecode)
            .then_some(bytecode);
        self.memory.insert(MemoryRecord {
            purpose: purpose.to_string(),
            object: object.clone(),
            bytecode: retained,
        });

        shader_debug!(LOG_SOURCE, "'{}' cached in memory as {} shader", purpose, kind);
        Ok(object)
    }

    /// Bytecode a cached stage object was created from
    ///
    /// `None` if the object is not cached or its bytecode was not retained.
    pub fn get_shader_bytecode(&self, object: &StageObject) -> Option<&[u8]> {
        self.memory
            .find_by_object(object)
            .and_then(|record| record.bytecode.as_deref())
    }

    pub fn config(&self) -> &ShaderCacheConfig {
        &self.config
    }

    pub fn registry(&self) -> &PurposeRegistry {
        &self.registry
    }

    pub fn stats(&self) -> ShaderManagerStats {
        self.stats.clone()
    }

    /// Number of purposes resolved and held in memory
    pub fn cached_count(&self) -> usize {
        self.memory.len()
    }

    /// Whether `purpose` is held in memory
    pub fn is_cached(&self, purpose: &str) -> bool {
        self.memory.get(purpose).is_some()
    }

    /// Release every cached stage object
    ///
    /// Handles still held by callers keep their object alive; the manager
    /// drops its own reference exactly once. Also run on drop.
    pub fn shutdown(&mut self) {
        let released = self.memory.clear();
        if released > 0 {
            shader_debug!(LOG_SOURCE, "Released {} cached shader objects", released);
        }
    }

    fn compile(
        &mut self,
        purpose: &str,
        source_path: &Path,
        entry_point: &str,
        kind: StageKind,
        defines: &[ShaderDefine],
    ) -> Result<Vec<u8>> {
        let request = CompileRequest {
            source_path,
            entry_point,
            profile: self.config.profiles.profile(kind),
            defines,
            debug: self.config.build_variant == BuildVariant::Debug,
        };

        match self.compiler.compile(&request) {
            Ok(bytecode) => {
                self.stats.compiles += 1;
                shader_info!(LOG_SOURCE, "Compiled '{}' ({} {}, {} bytes)",
                    purpose, entry_point, request.profile, bytecode.len());
                Ok(bytecode)
            }
            Err(diagnostic) => {
                self.stats.compile_failures += 1;
                self.write_error_log(&diagnostic);
                Err(shader_err!(LOG_SOURCE, CompileError,
                    "'{}' from '{}': {}", purpose, source_path.display(), diagnostic))
            }
        }
    }

    fn create_stage_object(&mut self, purpose: &str, kind: StageKind, bytecode: &[u8]) -> Result<StageObject> {
        let created = match self.device.lock() {
            Ok(mut device) => device.create_stage_object(kind, bytecode),
            Err(_) => Err(Error::DeviceCreateError("device lock poisoned".to_string())),
        };

        created.map_err(|e| {
            self.stats.device_failures += 1;
            shader_error!(LOG_SOURCE, "Device rejected {} shader '{}': {}", kind, purpose, e);
            match e {
                Error::DeviceCreateError(_) => e,
                other => Error::DeviceCreateError(other.to_string()),
            }
        })
    }

    /// Overwrite the error artifact with the latest diagnostic
    fn write_error_log(&self, diagnostic: &CompileDiagnostic) {
        let Some(path) = &self.config.error_log_path else {
            return;
        };

        if let Err(e) = fs::write(path, diagnostic.to_string()) {
            shader_warn!(LOG_SOURCE, "Cannot write shader error log '{}': {}", path.display(), e);
        }
    }
}

impl Drop for ShaderManager {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
#[path = "shader_manager_tests.rs"]
mod tests;
