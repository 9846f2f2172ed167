//! 翻译缓存模块
//!
//! 定义缓存条目、可注入的存储接口 [`CacheStore`]，以及带超时和 TTL 的
//! 缓存适配器 [`TranslationCache`]。

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::translation::core::fingerprint::CacheKey;
use crate::translation::error::{TranslationError, TranslationResult};

// ============================================================================
// 核心类型
// ============================================================================

/// 缓存条目
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub key: CacheKey,
    pub source_lang: String,
    pub target_lang: String,
    pub source_text: String,
    pub translated_text: String,
    pub expires_at: DateTime<Utc>,
}

impl CacheEntry {
    /// 创建条目，过期时间为当前时间加 `ttl`
    pub fn new(
        key: CacheKey,
        source_lang: impl Into<String>,
        target_lang: impl Into<String>,
        source_text: impl Into<String>,
        translated_text: impl Into<String>,
        ttl: Duration,
    ) -> Self {
        let ttl = chrono::Duration::from_std(ttl).unwrap_or_else(|_| chrono::Duration::days(1));
        Self {
            key,
            source_lang: source_lang.into(),
            target_lang: target_lang.into(),
            source_text: source_text.into(),
            translated_text: translated_text.into(),
            expires_at: Utc::now() + ttl,
        }
    }

    /// 检查是否过期
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}

/// 持久化键值存储接口
///
/// 未命中返回 `Ok(None)`，只有真正的存储故障才返回错误。
/// 已过期但尚未清除的条目按原样返回，过期判断在 `TranslationCache::lookup` 中进行。
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// 存储名称，用于日志和健康检查
    fn name(&self) -> &'static str;

    async fn get(&self, key: &CacheKey) -> TranslationResult<Option<CacheEntry>>;

    /// 同一个键重复写入时后写覆盖
    async fn put(&self, entry: CacheEntry) -> TranslationResult<()>;

    async fn health_check(&self) -> TranslationResult<()> {
        Ok(())
    }
}

/// 缓存统计信息
#[derive(Debug, Default)]
pub struct CacheStats {
    pub lookups: AtomicU64,
    pub hits: AtomicU64,
    pub misses: AtomicU64,
    pub expired: AtomicU64,
    pub inserts: AtomicU64,
    pub errors: AtomicU64,
}

/// 缓存统计快照
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CacheStatsSnapshot {
    pub lookups: u64,
    pub hits: u64,
    pub misses: u64,
    pub expired: u64,
    pub inserts: u64,
    pub errors: u64,
}

impl CacheStats {
    pub fn snapshot(&self) -> CacheStatsSnapshot {
        CacheStatsSnapshot {
            lookups: self.lookups.load(Ordering::Relaxed),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            expired: self.expired.load(Ordering::Relaxed),
            inserts: self.inserts.load(Ordering::Relaxed),
            errors: self.errors.load(Ordering::Relaxed),
        }
    }
}

impl CacheStatsSnapshot {
    /// 命中率
    pub fn hit_rate(&self) -> f64 {
        if self.lookups == 0 {
            0.0
        } else {
            self.hits as f64 / self.lookups as f64
        }
    }
}

// ============================================================================
// 缓存适配器
// ============================================================================

/// 翻译缓存
///
/// 在 [`CacheStore`] 之上统一施加调用超时和条目 TTL。
pub struct TranslationCache {
    store: Arc<dyn CacheStore>,
    ttl: Duration,
    timeout: Duration,
    stats: CacheStats,
}

impl TranslationCache {
    pub fn new(store: Arc<dyn CacheStore>, ttl: Duration, timeout: Duration) -> Self {
        Self {
            store,
            ttl,
            timeout,
            stats: CacheStats::default(),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn store(&self) -> &Arc<dyn CacheStore> {
        &self.store
    }

    pub fn stats(&self) -> &CacheStats {
        &self.stats
    }

    /// 查询缓存
    ///
    /// 已过期但尚未被存储清除的条目视为不存在。
    pub async fn lookup(&self, key: &CacheKey) -> TranslationResult<Option<CacheEntry>> {
        self.stats.lookups.fetch_add(1, Ordering::Relaxed);

        let result = match tokio::time::timeout(self.timeout, self.store.get(key)).await {
            Ok(result) => result,
            Err(_) => Err(TranslationError::CacheError(format!(
                "{} 查询超时 ({:?})",
                self.store.name(),
                self.timeout
            ))),
        };

        match result {
            Ok(Some(entry)) if entry.is_expired() => {
                self.stats.expired.fetch_add(1, Ordering::Relaxed);
                self.stats.misses.fetch_add(1, Ordering::Relaxed);
                tracing::debug!("缓存条目已过期: {}", key);
                Ok(None)
            }
            Ok(Some(entry)) => {
                self.stats.hits.fetch_add(1, Ordering::Relaxed);
                Ok(Some(entry))
            }
            Ok(None) => {
                self.stats.misses.fetch_add(1, Ordering::Relaxed);
                Ok(None)
            }
            Err(e) => {
                self.stats.errors.fetch_add(1, Ordering::Relaxed);
                Err(e)
            }
        }
    }

    /// 写入缓存，返回写入的条目
    pub async fn insert(
        &self,
        key: CacheKey,
        source_lang: &str,
        target_lang: &str,
        source_text: &str,
        translated_text: &str,
    ) -> TranslationResult<CacheEntry> {
        let entry = CacheEntry::new(
            key,
            source_lang,
            target_lang,
            source_text,
            translated_text,
            self.ttl,
        );

        let result = match tokio::time::timeout(self.timeout, self.store.put(entry.clone())).await
        {
            Ok(result) => result,
            Err(_) => Err(TranslationError::CacheError(format!(
                "{} 写入超时 ({:?})",
                self.store.name(),
                self.timeout
            ))),
        };

        match result {
            Ok(()) => {
                self.stats.inserts.fetch_add(1, Ordering::Relaxed);
                Ok(entry)
            }
            Err(e) => {
                self.stats.errors.fetch_add(1, Ordering::Relaxed);
                Err(e)
            }
        }
    }

    pub async fn health_check(&self) -> TranslationResult<()> {
        tokio::time::timeout(self.timeout, self.store.health_check())
            .await
            .map_err(|_| {
                TranslationError::CacheError(format!("{} 健康检查超时", self.store.name()))
            })?
    }
}
