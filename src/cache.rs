// 🗄️ Cache Store - persisted key → JSON value mapping
// One store per category (lookup, contributor, industry); stores never share state.
//
// Lifecycle:
// - load at process start (missing or malformed file → empty store)
// - mutate in memory as lookups happen
// - persist the whole store after every new entry (temp file + rename)

use log::{debug, info, warn};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::LedgerError;

// ============================================================================
// CACHE CATEGORY
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheCategory {
    /// Address lookup responses, keyed by address hash
    Lookup,

    /// Top contributors, keyed by candidate id
    Contributor,

    /// Top industries, keyed by candidate id
    Industry,
}

impl CacheCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            CacheCategory::Lookup => "lookup",
            CacheCategory::Contributor => "contributor",
            CacheCategory::Industry => "industry",
        }
    }

    /// File name of the persisted store
    pub fn file_name(&self) -> &'static str {
        match self {
            CacheCategory::Lookup => "final_cache.json",
            CacheCategory::Contributor => "contributor_cache.json",
            CacheCategory::Industry => "industry_cache.json",
        }
    }
}

// ============================================================================
// STORE CONTRACT
// ============================================================================

/// get / put / flush over a key → value mapping
///
/// `get` is a pure memory lookup and never triggers network I/O. Absence is
/// a normal outcome. Single writer only.
pub trait CacheStore {
    fn category(&self) -> CacheCategory;

    fn get(&self, key: &str) -> Option<&Value>;

    /// Insert (or replace) an entry and persist the whole store.
    ///
    /// If persisting fails the entry is rolled back, so memory never holds
    /// an entry the snapshot on disk is missing.
    fn put(&mut self, key: &str, value: Value) -> Result<(), LedgerError>;

    /// Persist the current mapping and return the snapshot that was written
    fn flush(&self) -> Result<Value, LedgerError>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }
}

/// Typed read. A cached value that no longer deserializes counts as a miss.
pub fn get_typed<T: DeserializeOwned>(store: &dyn CacheStore, key: &str) -> Option<T> {
    let value = store.get(key)?;
    match serde_json::from_value(value.clone()) {
        Ok(typed) => Some(typed),
        Err(e) => {
            warn!(
                "Ignoring unreadable {} cache entry '{}': {}",
                store.category().as_str(),
                key,
                e
            );
            None
        }
    }
}

/// Cache key for an address lookup
///
/// SHA-256 of the normalized address (trimmed, whitespace collapsed,
/// lowercased), so "1 Main St" and "  1 MAIN   st " share a key and the raw
/// address is never written to disk.
pub fn address_key(address: &str) -> String {
    let normalized = address
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();

    let mut hasher = Sha256::new();
    hasher.update(normalized.as_bytes());
    format!("{:x}", hasher.finalize())
}

fn snapshot(entries: &BTreeMap<String, Value>) -> Value {
    Value::Object(entries.clone().into_iter().collect::<Map<String, Value>>())
}

// ============================================================================
// JSON FILE STORE
// ============================================================================

/// How a file-backed store came to be
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOrigin {
    /// File parsed, with this many entries
    Loaded(usize),

    /// No file yet - first run
    Missing,

    /// File existed but could not be read as a JSON object
    Malformed,
}

pub struct JsonFileCache {
    category: CacheCategory,
    path: PathBuf,
    entries: BTreeMap<String, Value>,
    origin: LoadOrigin,
}

impl JsonFileCache {
    /// Load a store from disk. Never fails: a missing or malformed file
    /// yields an empty store.
    pub fn load(category: CacheCategory, path: &Path) -> Self {
        let (entries, origin) = match fs::read_to_string(path) {
            Ok(raw) => match serde_json::from_str::<BTreeMap<String, Value>>(&raw) {
                Ok(entries) => {
                    info!(
                        "Loaded {} cache with {} entries from {}",
                        category.as_str(),
                        entries.len(),
                        path.display()
                    );
                    let n = entries.len();
                    (entries, LoadOrigin::Loaded(n))
                }
                Err(e) => {
                    warn!(
                        "Could not load {} cache from {}: {}. Starting empty.",
                        category.as_str(),
                        path.display(),
                        e
                    );
                    (BTreeMap::new(), LoadOrigin::Malformed)
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!(
                    "No {} cache at {}, starting empty",
                    category.as_str(),
                    path.display()
                );
                (BTreeMap::new(), LoadOrigin::Missing)
            }
            Err(e) => {
                warn!(
                    "Could not read {} cache from {}: {}. Starting empty.",
                    category.as_str(),
                    path.display(),
                    e
                );
                (BTreeMap::new(), LoadOrigin::Malformed)
            }
        };

        JsonFileCache {
            category,
            path: path.to_path_buf(),
            entries,
            origin,
        }
    }

    pub fn origin(&self) -> &LoadOrigin {
        &self.origin
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist_error(&self, source: std::io::Error) -> LedgerError {
        LedgerError::CachePersist {
            category: self.category.as_str().to_string(),
            path: self.path.display().to_string(),
            source,
        }
    }

    fn write_snapshot(&self, snapshot: &Value) -> Result<(), LedgerError> {
        let encoded = serde_json::to_string_pretty(snapshot).map_err(|source| {
            LedgerError::CacheEncode {
                category: self.category.as_str().to_string(),
                source,
            }
        })?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| self.persist_error(e))?;
            }
        }

        // Write beside the target, then swap in one rename
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        fs::write(&tmp, encoded).map_err(|e| self.persist_error(e))?;
        fs::rename(&tmp, &self.path).map_err(|e| {
            let _ = fs::remove_file(&tmp);
            self.persist_error(e)
        })?;

        debug!(
            "Wrote {} cache ({} entries) to {}",
            self.category.as_str(),
            self.entries.len(),
            self.path.display()
        );
        Ok(())
    }
}

impl CacheStore for JsonFileCache {
    fn category(&self) -> CacheCategory {
        self.category
    }

    fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    fn put(&mut self, key: &str, value: Value) -> Result<(), LedgerError> {
        let previous = self.entries.insert(key.to_string(), value);

        if let Err(e) = self.flush() {
            match previous {
                Some(old) => {
                    self.entries.insert(key.to_string(), old);
                }
                None => {
                    self.entries.remove(key);
                }
            }
            return Err(e);
        }

        Ok(())
    }

    fn flush(&self) -> Result<Value, LedgerError> {
        let snapshot = snapshot(&self.entries);
        self.write_snapshot(&snapshot)?;
        Ok(snapshot)
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}

// ============================================================================
// IN-MEMORY STORE
// ============================================================================

/// Store with no backing file (dry runs, tests)
pub struct MemoryCache {
    category: CacheCategory,
    entries: BTreeMap<String, Value>,
}

impl MemoryCache {
    pub fn new(category: CacheCategory) -> Self {
        MemoryCache {
            category,
            entries: BTreeMap::new(),
        }
    }
}

impl CacheStore for MemoryCache {
    fn category(&self) -> CacheCategory {
        self.category
    }

    fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    fn put(&mut self, key: &str, value: Value) -> Result<(), LedgerError> {
        self.entries.insert(key.to_string(), value);
        Ok(())
    }

    fn flush(&self) -> Result<Value, LedgerError> {
        Ok(snapshot(&self.entries))
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}

// ============================================================================
// TESTS
// ============================================================================
