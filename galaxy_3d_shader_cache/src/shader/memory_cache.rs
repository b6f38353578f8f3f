/// In-memory tier of the shader cache.
///
/// Records live in a SlotMap; a purpose index maps each purpose name to its
/// slot. Records are only added, never replaced, until the cache is cleared.

use rustc_hash::FxHashMap;
use slotmap::{new_key_type, SlotMap};
use super::device::StageObject;

// ===== SLOT MAP KEY =====

new_key_type! {
    /// Stable key for a record in the memory cache
    pub struct ShaderKey;
}

/// A created stage object and, optionally, the bytecode it was built from
#[derive(Debug, Clone)]
pub struct MemoryRecord {
    pub purpose: String,
    pub object: StageObject,
    /// Retained bytecode (always for vertex stages, on request for others)
    pub bytecode: Option<Vec<u8>>,
}

/// Purpose-indexed store of stage objects
#[derive(Default)]
pub struct MemoryCache {
    records: SlotMap<ShaderKey, MemoryRecord>,
    by_purpose: FxHashMap<String, ShaderKey>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self {
            records: SlotMap::with_key(),
            by_purpose: FxHashMap::default(),
        }
    }

    /// Record cached for a purpose
    pub fn get(&self, purpose: &str) -> Option<&MemoryRecord> {
        self.by_purpose
            .get(purpose)
            .and_then(|&key| self.records.get(key))
    }

    /// Insert a record, keyed by its purpose
    ///
    /// If the purpose is already cached the existing record is kept and its
    /// key returned; the new record is dropped.
    pub fn insert(&mut self, record: MemoryRecord) -> ShaderKey {
        if let Some(&key) = self.by_purpose.get(&record.purpose) {
            return key;
        }

        let purpose = record.purpose.clone();
        let key = self.records.insert(record);
        self.by_purpose.insert(purpose, key);
        key
    }

    /// Record holding this exact stage object
    ///
    /// Linear scan comparing object identity; the cache holds a handful of
    /// entries so no reverse index is kept.
    pub fn find_by_object(&self, object: &StageObject) -> Option<&MemoryRecord> {
        self.records
            .values()
            .find(|record| record.object.same_object(object))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Cached purpose names, sorted
    pub fn purposes(&self) -> Vec<&str> {
        let mut purposes: Vec<&str> = self.by_purpose.keys().map(String::as_str).collect();
        purposes.sort_unstable();
        purposes
    }

    /// Drop every record, releasing the cache's reference to each object
    ///
    /// Returns the number of records removed.
    pub fn clear(&mut self) -> usize {
        let count = self.records.len();
        self.by_purpose.clear();
        self.records.clear();
        count
    }
}

#[cfg(test)]
#[path = "memory_cache_tests.rs"]
mod tests;
