/// Persistent on-disk store of compiled shader bytecode.
///
/// One cache file per shader source file, named after the source's base name
/// plus a build-variant suffix. A cache file is valid as a whole while the
/// source file is not newer than it: editing a source invalidates every
/// purpose compiled from it. I/O failures never propagate, they are logged
/// and reported as misses (or failed writes).

use std::fs::{self, File, OpenOptions};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use crate::{shader_debug, shader_info, shader_warn};
use super::cache_entry::{self, CacheEntry, RecordScan};

const LOG_SOURCE: &str = "galaxy3d::ShaderDiskCache";

/// Build flavor of the cached bytecode
///
/// Debug and release builds compile shaders with different flags, so they
/// keep separate cache files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuildVariant {
    /// Shaders compiled with debug information
    Debug,
    /// Optimized shaders
    Release,
}

impl BuildVariant {
    /// Variant matching how this crate was built
    pub fn current() -> Self {
        if cfg!(debug_assertions) {
            BuildVariant::Debug
        } else {
            BuildVariant::Release
        }
    }

    /// File name suffix appended to the source base name
    pub fn suffix(self) -> &'static str {
        match self {
            BuildVariant::Debug => ".debug.cache",
            BuildVariant::Release => ".cache",
        }
    }
}

impl Default for BuildVariant {
    fn default() -> Self {
        Self::current()
    }
}

/// Outcome of a disk cache lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheLookup {
    /// Bytecode found in an up-to-date cache file
    Hit(Vec<u8>),
    /// No cache file exists for the source
    NoCacheFile,
    /// The source is newer than the cache file; every entry is ignored
    Stale,
    /// The cache file is valid but has no record for the key
    NotFound,
    /// A damaged record ended the scan before the key was found
    Corrupt,
    /// The cache file could not be read
    Unreadable,
}

impl CacheLookup {
    /// Whether the lookup produced bytecode
    pub fn is_hit(&self) -> bool {
        matches!(self, CacheLookup::Hit(_))
    }

    /// Bytecode on a hit, `None` for every kind of miss
    pub fn into_bytecode(self) -> Option<Vec<u8>> {
        match self {
            CacheLookup::Hit(bytecode) => Some(bytecode),
            _ => None,
        }
    }
}

/// Outcome of adding an entry to the disk cache
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheWrite {
    /// New cache file created holding only this entry
    Created,
    /// Stale or damaged cache file replaced by one holding only this entry
    Rewritten,
    /// Entry appended to an existing, valid cache file
    Appended,
    /// A record with this key already exists; nothing written
    AlreadyPresent,
    /// An I/O error prevented the write
    Failed,
}

/// Statistics for monitoring disk cache behavior
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiskCacheStats {
    /// Lookups that returned bytecode
    pub hits: u64,
    /// Lookups that returned nothing (stale lookups included)
    pub misses: u64,
    /// Lookups rejected because the source was newer than the cache file
    pub stale: u64,
    /// Records written (created, rewritten or appended)
    pub writes: u64,
    /// Cache files discarded and rewritten
    pub rewrites: u64,
}

impl DiskCacheStats {
    /// Number of lookups performed
    pub fn lookups(&self) -> u64 {
        self.hits + self.misses
    }

    /// Cache hit rate (0.0 to 1.0)
    pub fn hit_rate(&self) -> f64 {
        let total = self.lookups();
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// Disk tier of the shader cache, as seen by the ShaderManager
///
/// Implemented by [`DiskCacheStore`]; tests substitute instrumented versions.
pub trait ShaderDiskCache: Send {
    /// Bytecode stored for `purpose` under `source_path`, if valid
    fn search(&mut self, purpose: &str, source_path: &Path) -> Option<Vec<u8>>;

    /// Persist `entry` in the cache file of `source_path`
    fn add(&mut self, entry: &CacheEntry, source_path: &Path) -> CacheWrite;
}

/// File-backed shader disk cache
pub struct DiskCacheStore {
    cache_root: PathBuf,
    variant: BuildVariant,
    stats: DiskCacheStats,
}

impl DiskCacheStore {
    /// Create a store rooted at `cache_root`, creating the directory if absent
    ///
    /// A directory that cannot be created is logged; the store still works,
    /// every operation on it simply misses.
    pub fn new<P: AsRef<Path>>(cache_root: P, variant: BuildVariant) -> Self {
        let cache_root = cache_root.as_ref().to_path_buf();

        if let Err(e) = fs::create_dir_all(&cache_root) {
            shader_warn!(LOG_SOURCE, "Cannot create cache root '{}': {}", cache_root.display(), e);
        }

        Self {
            cache_root,
            variant,
            stats: DiskCacheStats::default(),
        }
    }

    /// Directory holding the cache files
    pub fn cache_root(&self) -> &Path {
        &self.cache_root
    }

    /// Build variant selecting the cache file suffix
    pub fn build_variant(&self) -> BuildVariant {
        self.variant
    }

    /// Current statistics
    pub fn stats(&self) -> DiskCacheStats {
        self.stats.clone()
    }

    /// Cache file backing `source_path`: `<root>/<base name><suffix>`
    ///
    /// Both `/` and `\` are treated as separators so registry paths written
    /// for either platform resolve to the same cache file.
    pub fn cache_file_path(&self, source_path: &Path) -> PathBuf {
        let source = source_path.to_string_lossy();
        let base_name = source.rsplit(['/', '\\']).next().unwrap_or(&*source);
        self.cache_root.join(format!("{}{}", base_name, self.variant.suffix()))
    }

    /// Look up `purpose`, reporting why a miss happened
    pub fn lookup(&mut self, purpose: &str, source_path: &Path) -> CacheLookup {
        let cache_path = self.cache_file_path(source_path);

        let result = match Self::try_lookup(purpose, source_path, &cache_path) {
            Ok(result) => result,
            Err(e) => {
                shader_warn!(LOG_SOURCE, "Cannot read cache file '{}': {}", cache_path.display(), e);
                CacheLookup::Unreadable
            }
        };

        match &result {
            CacheLookup::Hit(bytecode) => {
                self.stats.hits += 1;
                shader_debug!(LOG_SOURCE, "Hit for '{}' in '{}' ({} bytes)",
                    purpose, cache_path.display(), bytecode.len());
            }
            CacheLookup::Stale => {
                self.stats.misses += 1;
                self.stats.stale += 1;
                shader_debug!(LOG_SOURCE, "'{}' is newer than '{}', ignoring cached entries",
                    source_path.display(), cache_path.display());
            }
            CacheLookup::Corrupt => {
                self.stats.misses += 1;
                shader_warn!(LOG_SOURCE, "Damaged record in '{}' while looking up '{}'",
                    cache_path.display(), purpose);
            }
            other => {
                self.stats.misses += 1;
                shader_debug!(LOG_SOURCE, "Miss for '{}' ({:?})", purpose, other);
            }
        }

        result
    }

    /// Keys of every complete record in the cache file of `source_path`
    ///
    /// Staleness is not considered. Missing or unreadable files yield no keys.
    pub fn keys(&self, source_path: &Path) -> Vec<String> {
        let cache_path = self.cache_file_path(source_path);
        let read = || -> io::Result<Vec<String>> {
            let file = File::open(&cache_path)?;
            let file_len = file.metadata()?.len();
            cache_entry::scan_keys(&mut BufReader::new(file), file_len)
        };
        read().unwrap_or_default()
    }

    fn try_lookup(purpose: &str, source_path: &Path, cache_path: &Path) -> io::Result<CacheLookup> {
        let metadata = match fs::metadata(cache_path) {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(CacheLookup::NoCacheFile),
            Err(e) => return Err(e),
        };

        if source_is_newer(source_path, &metadata) {
            return Ok(CacheLookup::Stale);
        }

        let mut reader = BufReader::new(File::open(cache_path)?);
        match cache_entry::scan_for_key(&mut reader, purpose, metadata.len())? {
            RecordScan::Found { offset } => {
                let entry = cache_entry::read_record_at(&mut reader, offset)?;
                Ok(CacheLookup::Hit(entry.bytecode))
            }
            RecordScan::NotFound => Ok(CacheLookup::NotFound),
            RecordScan::Truncated { .. } => Ok(CacheLookup::Corrupt),
        }
    }

    fn try_add(entry: &CacheEntry, source_path: &Path, cache_path: &Path) -> io::Result<CacheWrite> {
        let metadata = match fs::metadata(cache_path) {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                write_fresh(cache_path, entry)?;
                return Ok(CacheWrite::Created);
            }
            Err(e) => return Err(e),
        };

        if source_is_newer(source_path, &metadata) {
            shader_info!(LOG_SOURCE, "Rewriting stale cache file '{}'", cache_path.display());
            write_fresh(cache_path, entry)?;
            return Ok(CacheWrite::Rewritten);
        }

        let file = OpenOptions::new().read(true).append(true).open(cache_path)?;
        let scan = cache_entry::scan_for_key(&mut BufReader::new(&file), &entry.key, metadata.len())?;

        match scan {
            // First write wins, even if the bytecode differs
            RecordScan::Found { .. } => Ok(CacheWrite::AlreadyPresent),
            RecordScan::NotFound => {
                let mut writer = BufWriter::new(&file);
                entry.write_to(&mut writer)?;
                writer.flush()?;
                Ok(CacheWrite::Appended)
            }
            RecordScan::Truncated { offset } => {
                shader_warn!(LOG_SOURCE, "Damaged record at offset {} in '{}', rewriting file",
                    offset, cache_path.display());
                drop(file);
                write_fresh(cache_path, entry)?;
                Ok(CacheWrite::Rewritten)
            }
        }
    }
}

impl ShaderDiskCache for DiskCacheStore {
    fn search(&mut self, purpose: &str, source_path: &Path) -> Option<Vec<u8>> {
        self.lookup(purpose, source_path).into_bytecode()
    }

    fn add(&mut self, entry: &CacheEntry, source_path: &Path) -> CacheWrite {
        let cache_path = self.cache_file_path(source_path);

        let outcome = match Self::try_add(entry, source_path, &cache_path) {
            Ok(outcome) => outcome,
            Err(e) => {
                shader_warn!(LOG_SOURCE, "Cannot write '{}' to '{}': {}",
                    entry.key, cache_path.display(), e);
                CacheWrite::Failed
            }
        };

        match outcome {
            CacheWrite::Created | CacheWrite::Appended => self.stats.writes += 1,
            CacheWrite::Rewritten => {
                self.stats.writes += 1;
                self.stats.rewrites += 1;
            }
            CacheWrite::AlreadyPresent | CacheWrite::Failed => {}
        }
        shader_debug!(LOG_SOURCE, "Add '{}' to '{}': {:?}", entry.key, cache_path.display(), outcome);

        outcome
    }
}

/// Whether the source was modified after the cache file was last written
///
/// A source whose modification time cannot be read counts as newer.
fn source_is_newer(source_path: &Path, cache_metadata: &fs::Metadata) -> bool {
    let source_modified = fs::metadata(source_path).and_then(|m| m.modified());
    let cache_modified = cache_metadata.modified();

    match (source_modified, cache_modified) {
        (Ok(source), Ok(cache)) => source > cache,
        _ => true,
    }
}

/// Create or truncate the cache file and write a single entry
fn write_fresh(cache_path: &Path, entry: &CacheEntry) -> io::Result<()> {
    let mut writer = BufWriter::new(File::create(cache_path)?);
    entry.write_to(&mut writer)?;
    writer.flush()
}

#[cfg(test)]
#[path = "disk_cache_store_tests.rs"]
mod tests;
