// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Memoized `exists`/`mtime` lookups. Bounded to the lifetime of a single
//! pipeline command invocation: entries never expire on their own, but
//! every write path in this crate (ping write, annotation write, atomic
//! publish) calls [`FsCache::invalidate`] on the path it just touched.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

#[derive(Debug, Clone, Copy)]
struct CacheEntry {
    exists: bool,
    mtime: Option<SystemTime>,
}

/// Process-local stat cache. Cheap to clone (shares the underlying map).
#[derive(Debug, Default)]
pub struct FsCache {
    entries: Mutex<HashMap<PathBuf, CacheEntry>>,
}

impl FsCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn entry_for(&self, path: &Path) -> CacheEntry {
        if let Some(entry) = self.entries.lock().get(path) {
            return *entry;
        }
        let metadata = std::fs::metadata(path);
        let entry = match metadata {
            Ok(meta) => CacheEntry {
                exists: true,
                mtime: meta.modified().ok(),
            },
            Err(_) => CacheEntry {
                exists: false,
                mtime: None,
            },
        };
        self.entries.lock().insert(path.to_path_buf(), entry);
        entry
    }

    /// Whether `path` exists, memoized for this invocation.
    pub fn exists(&self, path: &Path) -> bool {
        self.entry_for(path).exists
    }

    /// Modification time of `path`, or `None` if it doesn't exist or the
    /// platform can't report one.
    pub fn mtime(&self, path: &Path) -> Option<SystemTime> {
        self.entry_for(path).mtime
    }

    /// Evict the cached entry for `path`. Call after any write the engine
    /// performs to that path.
    pub fn invalidate(&self, path: &Path) {
        self.entries.lock().remove(path);
    }

    /// Number of distinct paths currently cached (for tests/diagnostics).
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
#[path = "fscache_tests.rs"]
mod tests;
