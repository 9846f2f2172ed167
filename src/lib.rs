//! # Caching Translate Library
//!
//! 限流翻译服务前的内容寻址缓存层。相同语言对下相同的分句只翻译一次，
//! 之后从缓存中直接返回。
//!
//! ## 模块组织
//!
//! - `env` - 类型安全的环境变量
//! - `translation` - 缓存键、分句、缓存存储、后端客户端和编排服务
//! - `web` - HTTP 接口（可选）

pub mod env;
pub mod translation;
#[cfg(feature = "web")]
pub mod web;

// Re-export commonly used items for convenience
pub use translation::{
    TranslationConfig, TranslationError, TranslationOutcome, TranslationRequest,
    TranslationResult, TranslationService,
};
