//! 翻译模块统一错误处理
//!
//! 提供结构化错误类型和错误处理机制。缓存层错误在编排器内部被吸收，
//! 只有翻译后端的致命错误（以及请求截止时间）会穿过组件边界返回给调用方。

use std::fmt;
use std::time::Duration;

use thiserror::Error;

/// 翻译错误类型
#[derive(Error, Debug, Clone)]
pub enum TranslationError {
    /// 配置错误
    #[error("配置错误: {0}")]
    ConfigError(String),

    /// 输入验证错误
    #[error("输入无效: {0}")]
    InvalidInput(String),

    /// 网络错误
    #[error("网络错误: {0}")]
    NetworkError(String),

    /// 后端限流
    #[error("请求速率过快，已达到限制 [{code}]: {message}")]
    RateLimitExceeded { code: String, message: String },

    /// 后端暂时不可用（可重试）
    #[error("翻译服务暂时不可用 [{code}]: {message}")]
    ServiceUnavailable { code: String, message: String },

    /// 后端返回的不可重试错误
    #[error("翻译服务错误 [{code}]: {message}")]
    BackendError { code: String, message: String },

    /// 不支持的语言对
    #[error("不支持的语言对: {source_lang} -> {target_lang}")]
    UnsupportedLanguagePair {
        source_lang: String,
        target_lang: String,
    },

    /// 单次调用超时
    #[error("操作超时: {0}")]
    TimeoutError(String),

    /// 整个请求超过截止时间
    #[error("请求超过截止时间 ({0:?})")]
    DeadlineExceeded(Duration),

    /// 重试次数耗尽
    #[error("翻译失败，已尝试 {attempts} 次: {last}")]
    RetriesExhausted {
        attempts: usize,
        last: Box<TranslationError>,
    },

    /// 缓存错误
    #[error("缓存错误: {0}")]
    CacheError(String),

    /// 序列化错误
    #[error("序列化错误: {0}")]
    SerializationError(String),

    /// 内部错误
    #[error("内部错误: {0}")]
    InternalError(String),
}

impl TranslationError {
    /// 检查错误是否可重试
    pub fn is_retryable(&self) -> bool {
        match self {
            TranslationError::NetworkError(_) => true,
            TranslationError::RateLimitExceeded { .. } => true,
            TranslationError::ServiceUnavailable { .. } => true,
            TranslationError::TimeoutError(_) => true,
            TranslationError::CacheError(_) => true,
            TranslationError::ConfigError(_) => false,
            TranslationError::InvalidInput(_) => false,
            TranslationError::BackendError { .. } => false,
            TranslationError::UnsupportedLanguagePair { .. } => false,
            TranslationError::DeadlineExceeded(_) => false,
            TranslationError::RetriesExhausted { .. } => false,
            TranslationError::SerializationError(_) => false,
            TranslationError::InternalError(_) => false,
        }
    }

    /// 机器可读的错误码，作为 `error_text` 返回给调用方
    pub fn error_code(&self) -> String {
        match self {
            TranslationError::ConfigError(_) => "ConfigurationError".to_string(),
            TranslationError::InvalidInput(_) => "InvalidRequestException".to_string(),
            TranslationError::NetworkError(_) => "NetworkError".to_string(),
            TranslationError::RateLimitExceeded { code, .. }
            | TranslationError::ServiceUnavailable { code, .. }
            | TranslationError::BackendError { code, .. } => code.clone(),
            TranslationError::UnsupportedLanguagePair { .. } => {
                "UnsupportedLanguagePairException".to_string()
            }
            TranslationError::TimeoutError(_) => "TimeoutError".to_string(),
            TranslationError::DeadlineExceeded(_) => "RequestTimeout".to_string(),
            TranslationError::RetriesExhausted { last, .. } => last.error_code(),
            TranslationError::CacheError(_) => "CacheError".to_string(),
            TranslationError::SerializationError(_) => "SerializationError".to_string(),
            TranslationError::InternalError(_) => "InternalServerException".to_string(),
        }
    }

    /// 对应的 HTTP 状态码
    pub fn status_code(&self) -> u16 {
        match self {
            TranslationError::InvalidInput(_) => 400,
            TranslationError::DeadlineExceeded(_) => 504,
            _ => 500,
        }
    }

    /// 获取错误的严重程度
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            TranslationError::ConfigError(_) => ErrorSeverity::Critical,
            TranslationError::InvalidInput(_) => ErrorSeverity::Info,
            TranslationError::NetworkError(_) => ErrorSeverity::Warning,
            TranslationError::RateLimitExceeded { .. } => ErrorSeverity::Warning,
            TranslationError::ServiceUnavailable { .. } => ErrorSeverity::Warning,
            TranslationError::BackendError { .. } => ErrorSeverity::Error,
            TranslationError::UnsupportedLanguagePair { .. } => ErrorSeverity::Info,
            TranslationError::TimeoutError(_) => ErrorSeverity::Warning,
            TranslationError::DeadlineExceeded(_) => ErrorSeverity::Error,
            TranslationError::RetriesExhausted { .. } => ErrorSeverity::Error,
            TranslationError::CacheError(_) => ErrorSeverity::Warning,
            TranslationError::SerializationError(_) => ErrorSeverity::Error,
            TranslationError::InternalError(_) => ErrorSeverity::Critical,
        }
    }

    /// 获取错误类别
    pub fn category(&self) -> ErrorCategory {
        match self {
            TranslationError::ConfigError(_) => ErrorCategory::Configuration,
            TranslationError::InvalidInput(_) => ErrorCategory::Input,
            TranslationError::NetworkError(_) => ErrorCategory::Network,
            TranslationError::RateLimitExceeded { .. } => ErrorCategory::RateLimit,
            TranslationError::ServiceUnavailable { .. } => ErrorCategory::Service,
            TranslationError::BackendError { .. } => ErrorCategory::Service,
            TranslationError::UnsupportedLanguagePair { .. } => ErrorCategory::Input,
            TranslationError::TimeoutError(_) => ErrorCategory::Timeout,
            TranslationError::DeadlineExceeded(_) => ErrorCategory::Timeout,
            TranslationError::RetriesExhausted { .. } => ErrorCategory::Service,
            TranslationError::CacheError(_) => ErrorCategory::Cache,
            TranslationError::SerializationError(_) => ErrorCategory::Serialization,
            TranslationError::InternalError(_) => ErrorCategory::Internal,
        }
    }

    /// 创建带上下文的错误
    pub fn with_context<T: fmt::Display>(mut self, context: T) -> Self {
        let current_msg = self.to_string();
        let new_msg = format!("{} (上下文: {})", current_msg, context);

        match &mut self {
            TranslationError::ConfigError(ref mut msg)
            | TranslationError::InvalidInput(ref mut msg)
            | TranslationError::NetworkError(ref mut msg)
            | TranslationError::TimeoutError(ref mut msg)
            | TranslationError::CacheError(ref mut msg)
            | TranslationError::SerializationError(ref mut msg)
            | TranslationError::InternalError(ref mut msg) => *msg = new_msg,
            TranslationError::RateLimitExceeded { ref mut message, .. }
            | TranslationError::ServiceUnavailable { ref mut message, .. }
            | TranslationError::BackendError { ref mut message, .. } => *message = new_msg,
            // 这些变体的信息来自结构化字段，保持原样
            TranslationError::UnsupportedLanguagePair { .. }
            | TranslationError::DeadlineExceeded(_)
            | TranslationError::RetriesExhausted { .. } => {}
        }

        self
    }
}

/// 错误严重程度
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ErrorSeverity {
    Info,
    Warning,
    Error,
    Critical,
}

/// 错误类别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    Configuration,
    Network,
    RateLimit,
    Input,
    Cache,
    Service,
    Timeout,
    Serialization,
    Internal,
}

/// 标准错误转换
impl From<std::io::Error> for TranslationError {
    fn from(error: std::io::Error) -> Self {
        TranslationError::NetworkError(format!("IO错误: {}", error))
    }
}

impl From<serde_json::Error> for TranslationError {
    fn from(error: serde_json::Error) -> Self {
        TranslationError::SerializationError(format!("JSON序列化错误: {}", error))
    }
}

impl From<toml::de::Error> for TranslationError {
    fn from(error: toml::de::Error) -> Self {
        TranslationError::ConfigError(format!("TOML解析错误: {}", error))
    }
}

impl From<crate::env::EnvError> for TranslationError {
    fn from(error: crate::env::EnvError) -> Self {
        TranslationError::ConfigError(error.to_string())
    }
}

impl From<reqwest::Error> for TranslationError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            TranslationError::TimeoutError(format!("HTTP请求超时: {}", error))
        } else if error.is_decode() {
            TranslationError::SerializationError(format!("响应解析失败: {}", error))
        } else {
            TranslationError::NetworkError(format!("HTTP请求失败: {}", error))
        }
    }
}

#[cfg(feature = "mongodb")]
impl From<mongodb::error::Error> for TranslationError {
    fn from(error: mongodb::error::Error) -> Self {
        TranslationError::CacheError(format!("MongoDB错误: {}", error))
    }
}

impl From<tokio::time::error::Elapsed> for TranslationError {
    fn from(error: tokio::time::error::Elapsed) -> Self {
        TranslationError::TimeoutError(format!("异步操作超时: {}", error))
    }
}

/// 错误结果类型别名
pub type TranslationResult<T> = Result<T, TranslationError>;

/// 错误处理助手函数
pub mod helpers {
    use super::*;

    /// 按严重程度记录错误
    pub fn log_error(error: &TranslationError) {
        match error.severity() {
            ErrorSeverity::Info => tracing::info!("翻译信息: {}", error),
            ErrorSeverity::Warning => tracing::warn!("翻译警告: {}", error),
            ErrorSeverity::Error => tracing::error!("翻译错误: {}", error),
            ErrorSeverity::Critical => tracing::error!("翻译严重错误: {}", error),
        }
    }

    /// 创建配置错误
    pub fn config_error<T: fmt::Display>(msg: T) -> TranslationError {
        TranslationError::ConfigError(msg.to_string())
    }

    /// 创建缓存错误
    pub fn cache_error<T: fmt::Display>(msg: T) -> TranslationError {
        TranslationError::CacheError(msg.to_string())
    }

    /// 创建输入验证错误
    pub fn validation_error<T: fmt::Display>(msg: T) -> TranslationError {
        TranslationError::InvalidInput(msg.to_string())
    }
}
