//! 分层缓存存储
//!
//! 本地 LRU 层位于持久化存储之前：读穿透，写直达。

use std::num::NonZeroUsize;
use std::sync::Arc;

use async_trait::async_trait;
use lru::LruCache;
use tokio::sync::Mutex;

use super::cache::{CacheEntry, CacheStore};
use crate::translation::core::fingerprint::CacheKey;
use crate::translation::error::TranslationResult;

/// 本地LRU + 持久化存储
pub struct LayeredCacheStore {
    local: Mutex<LruCache<CacheKey, CacheEntry>>,
    inner: Arc<dyn CacheStore>,
}

impl LayeredCacheStore {
    /// 创建分层存储，容量为 0 时使用 1
    pub fn new(inner: Arc<dyn CacheStore>, capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            local: Mutex::new(LruCache::new(capacity)),
            inner,
        }
    }

    pub async fn local_len(&self) -> usize {
        self.local.lock().await.len()
    }
}

#[async_trait]
impl CacheStore for LayeredCacheStore {
    fn name(&self) -> &'static str {
        "layered"
    }

    async fn get(&self, key: &CacheKey) -> TranslationResult<Option<CacheEntry>> {
        {
            let mut local = self.local.lock().await;
            match local.get(key).cloned() {
                Some(entry) if !entry.is_expired() => return Ok(Some(entry)),
                Some(_) => {
                    local.pop(key);
                }
                None => {}
            }
        }

        let entry = self.inner.get(key).await?;
        if let Some(entry) = &entry {
            if !entry.is_expired() {
                self.local.lock().await.put(key.clone(), entry.clone());
            }
        }
        Ok(entry)
    }

    async fn put(&self, entry: CacheEntry) -> TranslationResult<()> {
        self.inner.put(entry.clone()).await?;
        self.local.lock().await.put(entry.key.clone(), entry);
        Ok(())
    }

    async fn health_check(&self) -> TranslationResult<()> {
        self.inner.health_check().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::translation::core::fingerprint::Fingerprint;
    use crate::translation::storage::memory::MemoryCacheStore;
    use std::time::Duration;

    fn entry(text: &str) -> CacheEntry {
        CacheEntry::new(
            Fingerprint::generate("en", "es", text),
            "en",
            "es",
            text,
            format!("es:{}", text),
            Duration::from_secs(60),
        )
    }

    #[tokio::test]
    async fn test_write_through_and_read_through() {
        let inner = Arc::new(MemoryCacheStore::new());
        let layered = LayeredCacheStore::new(inner.clone(), 2);

        let a = entry("A.");
        layered.put(a.clone()).await.unwrap();
        assert_eq!(inner.len(), 1);
        assert_eq!(layered.local_len().await, 1);

        // 仅存在于持久层的条目在读取后进入本地层
        let b = entry("B.");
        inner.put(b.clone()).await.unwrap();
        assert_eq!(layered.get(&b.key).await.unwrap(), Some(b));
        assert_eq!(layered.local_len().await, 2);
    }

    #[tokio::test]
    async fn test_local_capacity_is_bounded() {
        let inner = Arc::new(MemoryCacheStore::new());
        let layered = LayeredCacheStore::new(inner.clone(), 1);

        let a = entry("A.");
        let b = entry("B.");
        layered.put(a.clone()).await.unwrap();
        layered.put(b).await.unwrap();
        assert_eq!(layered.local_len().await, 1);

        // 被淘汰的条目仍可从持久层读取
        assert_eq!(layered.get(&a.key).await.unwrap(), Some(a));
    }
}
