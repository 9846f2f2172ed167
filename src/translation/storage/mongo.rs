//! MongoDB 缓存存储
//!
//! 每个键对应一个文档，`hash` 上建唯一索引，`purge_date` 上建 TTL 索引
//! （`expireAfterSeconds = 0`），过期清除交给 MongoDB 完成。

use std::time::Duration;

use async_trait::async_trait;
use bson::DateTime as BsonDateTime;
use mongodb::bson::doc;
use mongodb::options::IndexOptions;
use mongodb::{Client, Collection, Database, IndexModel};
use serde::{Deserialize, Serialize};

use super::cache::{CacheEntry, CacheStore};
use crate::translation::core::fingerprint::CacheKey;
use crate::translation::error::{TranslationError, TranslationResult};

/// 持久化文档格式
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheDocument {
    pub hash: String,
    pub src_locale: String,
    pub target_locale: String,
    pub src_text: String,
    pub translated_text: String,
    pub purge_date: BsonDateTime,
}

impl From<&CacheEntry> for CacheDocument {
    fn from(entry: &CacheEntry) -> Self {
        Self {
            hash: entry.key.to_string(),
            src_locale: entry.source_lang.clone(),
            target_locale: entry.target_lang.clone(),
            src_text: entry.source_text.clone(),
            translated_text: entry.translated_text.clone(),
            purge_date: BsonDateTime::from_chrono(entry.expires_at),
        }
    }
}

impl TryFrom<CacheDocument> for CacheEntry {
    type Error = TranslationError;

    fn try_from(document: CacheDocument) -> Result<Self, Self::Error> {
        let key = CacheKey::from_hex(&document.hash).ok_or_else(|| {
            TranslationError::CacheError(format!("无效的缓存键: {}", document.hash))
        })?;

        Ok(CacheEntry {
            key,
            source_lang: document.src_locale,
            target_lang: document.target_locale,
            source_text: document.src_text,
            translated_text: document.translated_text,
            expires_at: document.purge_date.to_chrono(),
        })
    }
}

/// MongoDB 缓存存储
pub struct MongoCacheStore {
    database: Database,
    collection: Collection<CacheDocument>,
}

impl MongoCacheStore {
    /// 连接数据库并确保索引存在
    pub async fn connect(url: &str, database: &str, table_name: &str) -> TranslationResult<Self> {
        let client = Client::with_uri_str(url).await?;
        let store = Self::from_database(client.database(database), table_name);
        store.ensure_indexes().await?;

        tracing::info!("MongoDB 缓存已就绪: {}/{}", database, table_name);
        Ok(store)
    }

    pub fn from_database(database: Database, table_name: &str) -> Self {
        let collection = database.collection::<CacheDocument>(table_name);
        Self {
            database,
            collection,
        }
    }

    pub fn collection_name(&self) -> &str {
        self.collection.name()
    }

    /// 创建唯一索引和 TTL 索引
    pub async fn ensure_indexes(&self) -> TranslationResult<()> {
        let indexes = vec![
            IndexModel::builder()
                .keys(doc! { "hash": 1 })
                .options(
                    IndexOptions::builder()
                        .unique(true)
                        .name("hash_unique".to_string())
                        .build(),
                )
                .build(),
            IndexModel::builder()
                .keys(doc! { "purge_date": 1 })
                .options(
                    IndexOptions::builder()
                        .expire_after(Duration::from_secs(0))
                        .name("purge_date_ttl".to_string())
                        .build(),
                )
                .build(),
        ];

        self.collection
            .create_indexes(indexes)
            .await
            .map_err(|e| TranslationError::CacheError(format!("创建缓存索引失败: {}", e)))?;

        Ok(())
    }
}

#[async_trait]
impl CacheStore for MongoCacheStore {
    fn name(&self) -> &'static str {
        "mongodb"
    }

    async fn get(&self, key: &CacheKey) -> TranslationResult<Option<CacheEntry>> {
        let document = self
            .collection
            .find_one(doc! { "hash": key.as_str() })
            .await?;

        document.map(CacheEntry::try_from).transpose()
    }

    async fn put(&self, entry: CacheEntry) -> TranslationResult<()> {
        let document = CacheDocument::from(&entry);
        self.collection
            .replace_one(doc! { "hash": entry.key.as_str() }, document)
            .upsert(true)
            .await?;
        Ok(())
    }

    async fn health_check(&self) -> TranslationResult<()> {
        self.database.run_command(doc! { "ping": 1 }).await?;
        Ok(())
    }
}
