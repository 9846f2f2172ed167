//! 翻译缓存核心模块
//!
//! 本模块包含缓存翻译的核心逻辑：如何切分输入、如何计算缓存键、
//! 如何判断命中以及如何重新组装结果。
//!
//! ## 架构设计
//!
//! - **缓存键** (`fingerprint.rs`): 由语言对和分句文本生成确定性摘要
//! - **分句器** (`segmenter.rs`): 切分输入并定义拼接方式
//! - **服务层** (`service.rs`): 编排缓存查询、后端调用和结果组装
//!
//! ## 模块依赖关系
//!
//! ```text
//! TranslationService (service.rs)
//!     ├── Segmenter (segmenter.rs)
//!     ├── Fingerprint (fingerprint.rs)
//!     ├── TranslationCache (storage/cache.rs)
//!     │       └── dyn CacheStore
//!     └── TranslationClient (client/mod.rs)
//!             └── dyn TranslationBackend
//! ```

pub mod fingerprint;
pub mod segmenter;
pub mod service;

pub use fingerprint::{CacheKey, Fingerprint};
pub use segmenter::{Segment, Segmenter};

/// 缓存翻译服务 - 主要的对外接口
pub use service::TranslationService;

pub use service::{TranslationOutcome, TranslationRequest};

pub use service::{HealthLevel, HealthStatus, ServiceStats, ServiceStatsSnapshot};
