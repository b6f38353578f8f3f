//! Disk tier of the shader cache
//!
//! Persists compiled bytecode per shader source file under a cache root.

mod cache_entry;
mod disk_cache_store;

pub use cache_entry::{CacheEntry, RECORD_HEADER_SIZE};
pub use disk_cache_store::{
    BuildVariant, CacheLookup, CacheWrite,
    DiskCacheStats, DiskCacheStore, ShaderDiskCache,
};
