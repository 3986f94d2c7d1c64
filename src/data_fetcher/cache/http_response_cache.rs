use lru::LruCache;
use sha2::{Digest, Sha256};
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::sync::RwLock;
use tracing::{debug, info, instrument, warn};

use super::types::CachedHttpResponse;
use crate::constants::MEMORY_CACHE_CAPACITY;
use crate::error::AppError;

/// Two-level response cache keyed by request URL.
///
/// An LRU map sits in front of one JSON file per URL under `dir`. The
/// directory is always supplied by the caller so tests and runs can be
/// isolated from each other.
#[derive(Debug)]
pub struct ResponseCache {
    dir: PathBuf,
    memory: RwLock<LruCache<String, CachedHttpResponse>>,
}

impl ResponseCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self::with_capacity(dir, MEMORY_CACHE_CAPACITY)
    }

    pub fn with_capacity(dir: impl Into<PathBuf>, capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            dir: dir.into(),
            memory: RwLock::new(LruCache::new(capacity)),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File an entry for `url` is stored in
    pub fn entry_path(&self, url: &str) -> PathBuf {
        let digest = Sha256::digest(url.as_bytes());
        self.dir.join(format!("{digest:x}.json"))
    }

    /// Retrieves a cached response body if present and not expired.
    /// Unreadable or corrupt disk entries count as misses.
    #[instrument(skip(self))]
    pub async fn get(&self, url: &str) -> Option<String> {
        {
            let mut memory = self.memory.write().await;
            if let Some(entry) = memory.get(url) {
                if !entry.is_expired() {
                    debug!("Memory cache hit: url={}", url);
                    return Some(entry.data.clone());
                }
                debug!("Removing expired memory cache entry: url={}", url);
                memory.pop(url);
            }
        }

        let path = self.entry_path(url);
        let content = match fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) => {
                debug!("Cache miss for url={} ({})", url, e.kind());
                return None;
            }
        };

        let entry: CachedHttpResponse = match serde_json::from_str(&content) {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Ignoring corrupt cache entry {}: {}", path.display(), e);
                return None;
            }
        };

        if entry.url != url {
            warn!(
                "Cache entry {} belongs to a different URL, ignoring",
                path.display()
            );
            return None;
        }

        if entry.is_expired() {
            debug!("Removing expired disk cache entry: url={}", url);
            if let Err(e) = fs::remove_file(&path).await {
                warn!("Failed to remove expired cache entry {}: {}", path.display(), e);
            }
            return None;
        }

        debug!("Disk cache hit: url={}, data_size={}", url, entry.data.len());
        let data = entry.data.clone();
        self.memory.write().await.put(url.to_string(), entry);
        Some(data)
    }

    /// Stores a response body. Disk failures are logged and otherwise ignored;
    /// the memory layer still holds the entry.
    #[instrument(skip(self, data), fields(data_size = data.len()))]
    pub async fn put(&self, url: String, data: String, ttl_seconds: Option<u64>) {
        let entry = CachedHttpResponse::new(url.clone(), data, ttl_seconds);

        match serde_json::to_string(&entry) {
            Ok(serialized) => {
                if let Err(e) = self.write_entry(&url, serialized).await {
                    warn!("Failed to persist cache entry for {}: {}", url, e);
                }
            }
            Err(e) => warn!("Failed to serialize cache entry for {}: {}", url, e),
        }

        self.memory.write().await.put(url.clone(), entry);
        debug!("Cached HTTP response: url={}, ttl={:?}", url, ttl_seconds);
    }

    async fn write_entry(&self, url: &str, serialized: String) -> Result<(), AppError> {
        fs::create_dir_all(&self.dir).await?;
        fs::write(self.entry_path(url), serialized).await?;
        Ok(())
    }

    /// Removes every entry from memory and disk
    pub async fn clear(&self) -> Result<(), AppError> {
        self.memory.write().await.clear();

        if !self.dir.exists() {
            return Ok(());
        }

        let mut removed = 0usize;
        let mut entries = fs::read_dir(&self.dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                fs::remove_file(&path).await?;
                removed += 1;
            }
        }

        info!("Cleared {} cache entries from {}", removed, self.dir.display());
        Ok(())
    }

    /// Number of entries currently held in memory
    pub async fn memory_len(&self) -> usize {
        self.memory.read().await.len()
    }
}
