//! 翻译配置管理模块
//!
//! 提供简化的配置管理，支持环境变量、配置文件和默认值

pub mod manager;

// 重新导出主要类型
pub use manager::{ConfigManager, StoreKind, TranslationConfig};

/// 配置常量
pub mod constants {
    use std::time::Duration;

    // 分句
    pub const DEFAULT_SEGMENT_DELIMITER: char = '.';
    pub const DEFAULT_MAX_CONCURRENT_SEGMENTS: usize = 1;

    // 缓存设置
    /// 缓存条目存活时间：插入后 1 天
    pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(86_400);
    pub const DEFAULT_STORE_TIMEOUT: Duration = Duration::from_secs(5);
    pub const DEFAULT_TABLE_NAME: &str = crate::env::cache::DEFAULT_TABLE_NAME;
    pub const DEFAULT_MONGODB_URL: &str = "mongodb://localhost:27017";
    pub const DEFAULT_MONGODB_DATABASE: &str = "caching_translate";

    // 默认API设置
    pub const DEFAULT_API_URL: &str = "http://localhost:1188/translate";
    pub const DEFAULT_MAX_ATTEMPTS: usize = 10;
    pub const DEFAULT_RETRY_BASE_DELAY: Duration = Duration::from_secs(1);
    pub const DEFAULT_RETRY_MAX_DELAY: Duration = Duration::from_secs(20);
    pub const DEFAULT_TRANSLATE_TIMEOUT: Duration = Duration::from_secs(30);
    pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

    // 配置文件搜索路径
    pub const CONFIG_PATHS: &[&str] = &[
        "caching-translate.toml",
        "config.toml",
        ".caching-translate.toml",
        "~/.config/caching-translate/config.toml",
        "/etc/caching-translate/config.toml",
    ];
}

/// 便利函数
pub fn config_file_exists() -> bool {
    constants::CONFIG_PATHS
        .iter()
        .any(|path| std::path::Path::new(shellexpand::tilde(path).as_ref()).exists())
}

/// 加载配置，失败时回退到默认配置
pub fn load_translation_config() -> TranslationConfig {
    match ConfigManager::new() {
        Ok(manager) => manager.into_config(),
        Err(e) => {
            tracing::warn!("配置加载失败，使用默认配置: {}", e);
            TranslationConfig::default()
        }
    }
}
