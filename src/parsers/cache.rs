use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::collections::hash_map::DefaultHasher;
use std::fs;
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};
use tracing::warn;

use super::FileSyntax;
use crate::config::CacheMode;
use crate::error::{AnalysisError, Result};

const DEFAULT_MAX_MEMORY_ENTRIES: usize = 4096;
/// Bumped whenever `FileSyntax` or the extraction rules change.
const CACHE_FORMAT_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachedFileEntry {
    pub version: u32,
    pub content_hash: u64,
    pub syntax: FileSyntax,
}

/// Thread-safe cache of per-file syntax facts, validated by content hash.
///
/// Only syntax is cached. Import resolution depends on the rest of the
/// workspace and is redone on every build.
pub struct SyntaxCache {
    memory_cache: DashMap<PathBuf, CachedFileEntry>,
    cache_dir: Option<PathBuf>,
    max_memory_entries: usize,
}

impl SyntaxCache {
    /// Memory cache backed by `cache_dir` on disk. If the directory cannot be
    /// created the cache keeps working in memory only.
    pub fn new(cache_dir: PathBuf) -> Self {
        let cache_dir = match fs::create_dir_all(&cache_dir) {
            Ok(()) => Some(cache_dir),
            Err(err) => {
                warn!(
                    dir = %cache_dir.display(),
                    error = %err,
                    "disk cache unavailable, falling back to memory"
                );
                None
            }
        };

        Self {
            memory_cache: DashMap::with_capacity(DEFAULT_MAX_MEMORY_ENTRIES),
            cache_dir,
            max_memory_entries: DEFAULT_MAX_MEMORY_ENTRIES,
        }
    }

    pub fn in_memory_only() -> Self {
        Self {
            memory_cache: DashMap::with_capacity(DEFAULT_MAX_MEMORY_ENTRIES),
            cache_dir: None,
            max_memory_entries: DEFAULT_MAX_MEMORY_ENTRIES,
        }
    }

    pub fn from_mode(mode: &CacheMode) -> Option<Self> {
        match mode {
            CacheMode::Off => None,
            CacheMode::Memory => Some(Self::in_memory_only()),
            CacheMode::Disk { dir } => Some(Self::new(dir.clone())),
        }
    }

    pub fn content_hash(content: &str) -> u64 {
        let mut hasher = DefaultHasher::new();
        content.hash(&mut hasher);
        hasher.finish()
    }

    /// Cached syntax for `file_path` if it was extracted from content with
    /// the same hash.
    pub fn get(&self, file_path: &Path, content_hash: u64) -> Option<FileSyntax> {
        if let Some(entry) = self.memory_cache.get(file_path) {
            return Self::is_current(&entry, content_hash).then(|| entry.syntax.clone());
        }

        let cache_path = self.cache_path(file_path)?;
        let entry = self.load_from_disk(&cache_path).ok()?;
        if !Self::is_current(&entry, content_hash) {
            return None;
        }
        let syntax = entry.syntax.clone();
        if self.memory_cache.len() < self.max_memory_entries {
            self.memory_cache.insert(file_path.to_path_buf(), entry);
        }
        Some(syntax)
    }

    pub fn store(&self, file_path: &Path, content_hash: u64, syntax: &FileSyntax) -> Result<()> {
        let entry = CachedFileEntry {
            version: CACHE_FORMAT_VERSION,
            content_hash,
            syntax: syntax.clone(),
        };

        if self.memory_cache.len() >= self.max_memory_entries
            && !self.memory_cache.contains_key(file_path)
        {
            if let Some(evicted) = self.memory_cache.iter().next() {
                let key = evicted.key().clone();
                drop(evicted);
                self.memory_cache.remove(&key);
            }
        }

        if let Some(cache_path) = self.cache_path(file_path) {
            self.store_to_disk(&cache_path, &entry)?;
        }
        self.memory_cache.insert(file_path.to_path_buf(), entry);
        Ok(())
    }

    pub fn clear(&self) -> Result<()> {
        self.memory_cache.clear();
        if let Some(cache_dir) = &self.cache_dir {
            if cache_dir.exists() {
                fs::remove_dir_all(cache_dir).map_err(|err| AnalysisError::io(cache_dir, err))?;
                fs::create_dir_all(cache_dir).map_err(|err| AnalysisError::io(cache_dir, err))?;
            }
        }
        Ok(())
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            memory_entries: self.memory_cache.len(),
            disk_entries: self.disk_entry_count(),
        }
    }

    fn is_current(entry: &CachedFileEntry, content_hash: u64) -> bool {
        entry.version == CACHE_FORMAT_VERSION && entry.content_hash == content_hash
    }

    fn cache_path(&self, file_path: &Path) -> Option<PathBuf> {
        let cache_dir = self.cache_dir.as_ref()?;

        let mut hasher = DefaultHasher::new();
        file_path.hash(&mut hasher);
        let hash = hasher.finish();

        Some(cache_dir.join(format!("syntax_{:x}.bincode", hash)))
    }

    fn load_from_disk(&self, cache_path: &Path) -> Result<CachedFileEntry> {
        let data = fs::read(cache_path).map_err(|err| AnalysisError::io(cache_path, err))?;
        Ok(bincode::deserialize(&data)?)
    }

    fn store_to_disk(&self, cache_path: &Path, entry: &CachedFileEntry) -> Result<()> {
        let data = bincode::serialize(entry)?;
        fs::write(cache_path, data).map_err(|err| AnalysisError::io(cache_path, err))
    }

    fn disk_entry_count(&self) -> usize {
        self.cache_dir
            .as_ref()
            .and_then(|dir| fs::read_dir(dir).ok())
            .map(|entries| entries.filter_map(|e| e.ok()).count())
            .unwrap_or(0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    pub memory_entries: usize,
    pub disk_entries: usize,
}
