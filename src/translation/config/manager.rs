//! 简化的配置管理器
//!
//! 提供统一的配置接口，支持文件配置、环境变量和默认值

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::constants;
use crate::translation::error::{TranslationError, TranslationResult};

/// 缓存存储后端
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreKind {
    /// MongoDB 集合，依赖 TTL 索引自动过期
    Mongodb,
    /// 进程内存储，重启后丢失
    Memory,
}

impl std::str::FromStr for StoreKind {
    type Err = TranslationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "mongodb" | "mongo" => Ok(StoreKind::Mongodb),
            "memory" | "mem" => Ok(StoreKind::Memory),
            other => Err(TranslationError::ConfigError(format!(
                "未知的缓存存储类型: {}",
                other
            ))),
        }
    }
}

/// 翻译缓存服务配置
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TranslationConfig {
    // 分句配置
    pub segment_delimiter: char,
    pub max_concurrent_segments: usize,

    // 缓存配置
    pub store: StoreKind,
    pub cache_table_name: String,
    pub cache_ttl_secs: u64,
    pub store_timeout_ms: u64,
    pub local_cache_size: usize,
    pub mongodb_url: String,
    pub mongodb_database: String,

    // 后端配置
    pub api_url: String,
    pub api_key: Option<String>,
    pub max_attempts: usize,
    pub retry_base_delay_ms: u64,
    pub retry_max_delay_ms: u64,
    pub translate_timeout_secs: u64,
    pub request_timeout_secs: u64,

    // 语言校验
    pub validate_target_language: bool,
    pub supported_target_languages: Vec<String>,
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            segment_delimiter: constants::DEFAULT_SEGMENT_DELIMITER,
            max_concurrent_segments: constants::DEFAULT_MAX_CONCURRENT_SEGMENTS,

            store: StoreKind::Mongodb,
            cache_table_name: constants::DEFAULT_TABLE_NAME.to_string(),
            cache_ttl_secs: constants::DEFAULT_CACHE_TTL.as_secs(),
            store_timeout_ms: constants::DEFAULT_STORE_TIMEOUT.as_millis() as u64,
            local_cache_size: 0,
            mongodb_url: constants::DEFAULT_MONGODB_URL.to_string(),
            mongodb_database: constants::DEFAULT_MONGODB_DATABASE.to_string(),

            api_url: constants::DEFAULT_API_URL.to_string(),
            api_key: None,
            max_attempts: constants::DEFAULT_MAX_ATTEMPTS,
            retry_base_delay_ms: constants::DEFAULT_RETRY_BASE_DELAY.as_millis() as u64,
            retry_max_delay_ms: constants::DEFAULT_RETRY_MAX_DELAY.as_millis() as u64,
            translate_timeout_secs: constants::DEFAULT_TRANSLATE_TIMEOUT.as_secs(),
            request_timeout_secs: constants::DEFAULT_REQUEST_TIMEOUT.as_secs(),

            validate_target_language: false,
            supported_target_languages: Vec::new(),
        }
    }
}

impl TranslationConfig {
    /// 验证配置
    pub fn validate(&self) -> TranslationResult<()> {
        if self.segment_delimiter.is_whitespace() {
            return Err(TranslationError::ConfigError(
                "分句分隔符不能是空白字符".to_string(),
            ));
        }

        if self.max_concurrent_segments == 0 {
            return Err(TranslationError::ConfigError("分句并发度不能为0".to_string()));
        }

        if self.cache_table_name.trim().is_empty() {
            return Err(TranslationError::ConfigError("缓存表名不能为空".to_string()));
        }

        if self.cache_ttl_secs == 0 {
            return Err(TranslationError::ConfigError("缓存TTL必须大于0".to_string()));
        }

        if self.max_attempts == 0 {
            return Err(TranslationError::ConfigError("最大尝试次数不能为0".to_string()));
        }

        if self.retry_base_delay_ms > self.retry_max_delay_ms {
            return Err(TranslationError::ConfigError(
                "重试基础延迟不能大于最大延迟".to_string(),
            ));
        }

        if !(self.api_url.starts_with("http://") || self.api_url.starts_with("https://")) {
            return Err(TranslationError::ConfigError(format!(
                "API URL必须以 http:// 或 https:// 开头: {}",
                self.api_url
            )));
        }

        if self.validate_target_language && self.supported_target_languages.is_empty() {
            return Err(TranslationError::ConfigError(
                "启用目标语言校验时必须配置支持的语言列表".to_string(),
            ));
        }

        Ok(())
    }

    /// 应用环境变量覆盖（使用类型安全环境变量系统）
    pub fn apply_env_overrides(&mut self) {
        use crate::env::{cache, mongodb, translation, EnvVar};

        if std::env::var(cache::TableName::NAME).is_ok() {
            if let Ok(table_name) = cache::TableName::get() {
                self.cache_table_name = table_name;
            }
        }

        if std::env::var(cache::Ttl::NAME).is_ok() {
            match cache::Ttl::get() {
                Ok(ttl) => self.cache_ttl_secs = ttl.as_secs(),
                Err(e) => tracing::warn!("忽略无效的TTL配置: {}", e),
            }
        }

        if std::env::var(cache::Store::NAME).is_ok() {
            match cache::Store::get().map(|s| s.parse::<StoreKind>()) {
                Ok(Ok(store)) => self.store = store,
                Ok(Err(e)) => tracing::warn!("忽略无效的存储配置: {}", e),
                Err(e) => tracing::warn!("忽略无效的存储配置: {}", e),
            }
        }

        if std::env::var(cache::LocalCacheSize::NAME).is_ok() {
            if let Ok(size) = cache::LocalCacheSize::get() {
                self.local_cache_size = size;
            }
        }

        if std::env::var(mongodb::ConnectionString::NAME).is_ok() {
            if let Ok(url) = mongodb::ConnectionString::get() {
                self.mongodb_url = url;
            }
        }

        if std::env::var(mongodb::DatabaseName::NAME).is_ok() {
            if let Ok(database) = mongodb::DatabaseName::get() {
                self.mongodb_database = database;
            }
        }

        if std::env::var(translation::ApiUrl::NAME).is_ok() {
            if let Ok(api_url) = translation::ApiUrl::get() {
                self.api_url = api_url;
                tracing::info!("环境变量覆盖 API URL: {}", self.api_url);
            }
        }

        if let Ok(api_key) = translation::ApiKey::get() {
            self.api_key = Some(api_key);
        }

        if std::env::var(translation::MaxAttempts::NAME).is_ok() {
            if let Ok(attempts) = translation::MaxAttempts::get() {
                self.max_attempts = attempts;
            }
        }

        if std::env::var(translation::RequestTimeout::NAME).is_ok() {
            if let Ok(timeout) = translation::RequestTimeout::get() {
                self.request_timeout_secs = timeout.as_secs();
            }
        }

        if std::env::var(translation::MaxConcurrentSegments::NAME).is_ok() {
            if let Ok(concurrency) = translation::MaxConcurrentSegments::get() {
                self.max_concurrent_segments = concurrency;
            }
        }
    }

    /// 转换为Duration类型
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    pub fn store_timeout(&self) -> Duration {
        Duration::from_millis(self.store_timeout_ms)
    }

    pub fn translate_timeout(&self) -> Duration {
        Duration::from_secs(self.translate_timeout_secs)
    }

    /// 0 表示不设请求截止时间
    pub fn request_timeout(&self) -> Option<Duration> {
        if self.request_timeout_secs == 0 {
            None
        } else {
            Some(Duration::from_secs(self.request_timeout_secs))
        }
    }

    pub fn retry_base_delay(&self) -> Duration {
        Duration::from_millis(self.retry_base_delay_ms)
    }

    pub fn retry_max_delay(&self) -> Duration {
        Duration::from_millis(self.retry_max_delay_ms)
    }
}

/// 简化的配置管理器
pub struct ConfigManager {
    config: TranslationConfig,
}

impl ConfigManager {
    /// 创建新的配置管理器
    pub fn new() -> TranslationResult<Self> {
        let mut config = Self::load_config()?;
        config.apply_env_overrides();
        config.validate()?;

        Ok(Self { config })
    }

    /// 从指定文件创建配置管理器
    pub fn from_file(path: &str) -> TranslationResult<Self> {
        Self::load_dotenv();

        let expanded_path = shellexpand::tilde(path);
        let mut config = Self::load_from_file(&expanded_path)?;
        config.apply_env_overrides();
        config.validate()?;

        Ok(Self { config })
    }

    /// 获取配置
    pub fn get_config(&self) -> &TranslationConfig {
        &self.config
    }

    /// 取出配置
    pub fn into_config(self) -> TranslationConfig {
        self.config
    }

    /// 从文件加载配置
    fn load_config() -> TranslationResult<TranslationConfig> {
        // 首先尝试加载 .env 文件
        Self::load_dotenv();

        // 查找配置文件
        for path in constants::CONFIG_PATHS {
            let expanded_path = shellexpand::tilde(path);
            if Path::new(expanded_path.as_ref()).exists() {
                tracing::info!("加载配置文件: {}", expanded_path);
                return Self::load_from_file(&expanded_path);
            }
        }

        tracing::info!("未找到配置文件，使用默认配置");
        Ok(TranslationConfig::default())
    }

    /// 从指定文件加载配置
    pub fn load_from_file(path: &str) -> TranslationResult<TranslationConfig> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| TranslationError::ConfigError(format!("读取配置文件失败: {}", e)))?;

        // 尝试TOML格式
        if path.ends_with(".toml") {
            toml::from_str(&content)
                .map_err(|e| TranslationError::ConfigError(format!("解析TOML配置失败: {}", e)))
        } else {
            // 尝试JSON格式
            serde_json::from_str(&content)
                .map_err(|e| TranslationError::ConfigError(format!("解析JSON配置失败: {}", e)))
        }
    }

    /// 加载 .env 文件
    fn load_dotenv() {
        let env_files = [".env.local", ".env.development", ".env.production", ".env"];

        for env_file in &env_files {
            if Path::new(env_file).exists() && dotenv::from_filename(env_file).is_ok() {
                tracing::info!("已加载环境变量文件: {}", env_file);
                break;
            }
        }
    }

    /// 生成示例配置文件
    pub fn generate_example_config(path: &str) -> TranslationResult<()> {
        let config = TranslationConfig::default();
        let content = toml::to_string_pretty(&config)
            .map_err(|e| TranslationError::ConfigError(format!("序列化配置失败: {}", e)))?;

        std::fs::write(path, content)
            .map_err(|e| TranslationError::ConfigError(format!("写入配置文件失败: {}", e)))?;

        Ok(())
    }
}
