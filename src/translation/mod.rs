//! 翻译缓存模块
//!
//! 在限流、按次计费的外部翻译服务前提供内容寻址的缓存层：
//! - **core**: 缓存键、分句器和编排服务
//! - **client**: 翻译后端接口、HTTP 实现和重试策略
//! - **storage**: 缓存接口和存储实现
//! - **config**: 配置管理
//! - **error**: 错误处理
//!
//! # 基本用法
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use caching_translate::translation::{
//!     HttpTranslationBackend, MemoryCacheStore, TranslationConfig, TranslationRequest,
//!     TranslationService,
//! };
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = TranslationConfig::default();
//! let backend = Arc::new(HttpTranslationBackend::from_config(&config)?);
//! let service = TranslationService::new(config, Arc::new(MemoryCacheStore::new()), backend)?;
//!
//! let outcome = service
//!     .translate(&TranslationRequest::new("en", "es", "Hello. World."))
//!     .await?;
//! println!("{}", outcome.translated_text);
//! # Ok(())
//! # }
//! ```

// ============================================================================
// 子模块声明
// ============================================================================

/// 翻译后端模块 - 外部翻译能力及其重试封装
pub mod client;

/// 配置管理模块 - 缓存、后端和分句相关的所有配置
pub mod config;

/// 核心模块 - 缓存键、分句和编排服务
pub mod core;

/// 错误处理模块 - 统一的错误类型和处理机制
pub mod error;

/// 存储管理模块 - 缓存接口和存储实现
pub mod storage;

// ============================================================================
// 核心API导出
// ============================================================================

pub use core::{
    CacheKey, Fingerprint, HealthLevel, HealthStatus, Segment, Segmenter, ServiceStats,
    ServiceStatsSnapshot, TranslationOutcome, TranslationRequest, TranslationService,
};

pub use config::{constants, ConfigManager, StoreKind, TranslationConfig};

pub use error::{ErrorCategory, ErrorSeverity, TranslationError, TranslationResult};

pub use client::{HttpTranslationBackend, RetryPolicy, TranslationBackend, TranslationClient};

#[cfg(feature = "mongodb")]
pub use storage::MongoCacheStore;
pub use storage::{
    create_store, CacheEntry, CacheStore, LayeredCacheStore, MemoryCacheStore, TranslationCache,
};

// ============================================================================
// 便利函数
// ============================================================================

/// 检查配置文件是否存在
pub fn config_file_exists() -> bool {
    config::config_file_exists()
}

/// 加载配置，失败时使用默认配置
pub fn load_translation_config() -> TranslationConfig {
    config::load_translation_config()
}

/// 按配置构造存储和 HTTP 后端，创建完整的翻译服务
pub async fn create_service(config: TranslationConfig) -> TranslationResult<TranslationService> {
    let store = create_store(&config).await?;
    let backend = std::sync::Arc::new(HttpTranslationBackend::from_config(&config)?);
    TranslationService::new(config, store, backend)
}

/// 生成示例配置文件
pub fn generate_example_config(path: &str) -> TranslationResult<()> {
    ConfigManager::generate_example_config(path)?;
    tracing::info!("已生成示例配置文件: {}", path);
    Ok(())
}

// ============================================================================
// 模块信息和元数据
// ============================================================================

/// 模块版本信息
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const MODULE_NAME: &str = "translation";

/// 模块信息
#[derive(Debug, Clone)]
pub struct ModuleInfo {
    pub name: String,
    pub version: String,
    pub features: Vec<String>,
}

/// 获取模块信息
pub fn get_module_info() -> ModuleInfo {
    ModuleInfo {
        name: MODULE_NAME.to_string(),
        version: VERSION.to_string(),
        features: get_enabled_features(),
    }
}

/// 获取启用的功能
fn get_enabled_features() -> Vec<String> {
    let mut features = vec![
        "memory_store".to_string(),
        "layered_store".to_string(),
        "http_backend".to_string(),
    ];

    #[cfg(feature = "mongodb")]
    features.push("mongodb_store".to_string());

    #[cfg(feature = "web")]
    features.push("web_server".to_string());

    features
}

/// 运行翻译模块自检
pub async fn self_check(config: &TranslationConfig) -> TranslationResult<()> {
    tracing::info!("开始翻译模块自检...");

    config.validate()?;
    tracing::debug!("✓ 配置有效");

    let delimiter = config.segment_delimiter;
    let sample = format!("a{delimiter}b{delimiter}");
    let segments = Segmenter::new(delimiter).segment(&sample);
    if segments.len() != 2 {
        return Err(TranslationError::InternalError("分句器异常".to_string()));
    }
    tracing::debug!("✓ 分句器正常");

    let key = Fingerprint::generate("en", "es", "a.");
    if key != Fingerprint::generate("en", "es", "a.") {
        return Err(TranslationError::InternalError("缓存键不稳定".to_string()));
    }
    tracing::debug!("✓ 缓存键生成正常");

    tracing::info!("翻译模块自检完成，所有组件正常");
    Ok(())
}

/// 模块初始化
pub fn init() {
    tracing::info!("翻译模块 v{} 已加载", VERSION);
    tracing::info!("启用的功能: {:?}", get_enabled_features());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_self_check_with_defaults() {
        self_check(&TranslationConfig::default()).await.unwrap();
    }

    #[tokio::test]
    async fn test_self_check_with_custom_delimiter() {
        let config = TranslationConfig {
            segment_delimiter: '。',
            ..TranslationConfig::default()
        };
        self_check(&config).await.unwrap();
    }

    #[test]
    fn test_module_info() {
        let info = get_module_info();
        assert_eq!(info.name, "translation");
        assert!(info.features.contains(&"memory_store".to_string()));
    }
}
