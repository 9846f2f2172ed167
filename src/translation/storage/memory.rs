//! 进程内缓存存储
//!
//! 基于 `DashMap`，读取时惰性清除过期条目。适用于单实例部署和测试。
//! 过期判断由上层的 `TranslationCache` 完成。

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;

use super::cache::{CacheEntry, CacheStore};
use crate::translation::core::fingerprint::CacheKey;
use crate::translation::error::TranslationResult;

/// 内存缓存存储
#[derive(Debug, Default)]
pub struct MemoryCacheStore {
    entries: DashMap<CacheKey, CacheEntry>,
}

impl MemoryCacheStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 直接写入条目，不经过 TTL 计算
    pub fn insert_raw(&self, entry: CacheEntry) {
        self.entries.insert(entry.key.clone(), entry);
    }

    /// 读取条目，不做过期判断
    pub fn peek(&self, key: &CacheKey) -> Option<CacheEntry> {
        self.entries.get(key).map(|entry| entry.value().clone())
    }

    /// 清除所有过期条目，返回清除数量
    pub fn purge_expired(&self) -> usize {
        let now = Utc::now();
        let before = self.entries.len();
        self.entries.retain(|_, entry| !entry.is_expired_at(now));
        before.saturating_sub(self.entries.len())
    }
}

#[async_trait]
impl CacheStore for MemoryCacheStore {
    fn name(&self) -> &'static str {
        "memory"
    }

    /// 过期条目原样返回并同时从表中移除，由 `TranslationCache` 判定为未命中
    async fn get(&self, key: &CacheKey) -> TranslationResult<Option<CacheEntry>> {
        if let Some((_, stale)) = self.entries.remove_if(key, |_, entry| entry.is_expired()) {
            return Ok(Some(stale));
        }
        Ok(self.entries.get(key).map(|entry| entry.value().clone()))
    }

    async fn put(&self, entry: CacheEntry) -> TranslationResult<()> {
        self.entries.insert(entry.key.clone(), entry);
        Ok(())
    }
}
