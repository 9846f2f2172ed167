//! 存储模块
//!
//! 提供缓存接口和具体的存储实现。

pub mod cache;
pub mod layered;
pub mod memory;
#[cfg(feature = "mongodb")]
pub mod mongo;

pub use cache::{CacheEntry, CacheStats, CacheStatsSnapshot, CacheStore, TranslationCache};
pub use layered::LayeredCacheStore;
pub use memory::MemoryCacheStore;
#[cfg(feature = "mongodb")]
pub use mongo::{CacheDocument, MongoCacheStore};

use std::sync::Arc;

use crate::translation::config::{StoreKind, TranslationConfig};
use crate::translation::error::TranslationResult;

/// 按配置创建缓存存储
///
/// `local_cache_size > 0` 时在持久化存储前加一层本地LRU。
pub async fn create_store(config: &TranslationConfig) -> TranslationResult<Arc<dyn CacheStore>> {
    let durable: Arc<dyn CacheStore> = match config.store {
        StoreKind::Memory => {
            tracing::info!("使用内存缓存存储");
            Arc::new(MemoryCacheStore::new())
        }
        #[cfg(feature = "mongodb")]
        StoreKind::Mongodb => Arc::new(
            MongoCacheStore::connect(
                &config.mongodb_url,
                &config.mongodb_database,
                &config.cache_table_name,
            )
            .await?,
        ),
        #[cfg(not(feature = "mongodb"))]
        StoreKind::Mongodb => {
            return Err(crate::translation::error::TranslationError::ConfigError(
                "未启用 mongodb 特性，无法使用 MongoDB 缓存存储".to_string(),
            ))
        }
    };

    if config.local_cache_size > 0 {
        tracing::info!("启用本地LRU缓存层，容量: {}", config.local_cache_size);
        Ok(Arc::new(LayeredCacheStore::new(durable, config.local_cache_size)))
    } else {
        Ok(durable)
    }
}
