//! 翻译后端客户端
//!
//! [`TranslationBackend`] 是外部翻译能力的抽象，[`TranslationClient`]
//! 在其上增加有限次数的重试和单次调用超时。

pub mod http;
pub mod retry;

pub use http::HttpTranslationBackend;
pub use retry::{with_retry, RetryPolicy};

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;

use crate::translation::error::TranslationResult;

/// 外部翻译能力
#[async_trait]
pub trait TranslationBackend: Send + Sync {
    /// 后端名称
    fn name(&self) -> &'static str;

    /// 翻译一段文本
    async fn translate(
        &self,
        text: &str,
        source_lang: &str,
        target_lang: &str,
    ) -> TranslationResult<String>;

    async fn health_check(&self) -> TranslationResult<()> {
        Ok(())
    }
}

/// 带重试的翻译客户端
pub struct TranslationClient {
    backend: Arc<dyn TranslationBackend>,
    policy: RetryPolicy,
    calls: AtomicU64,
}

impl TranslationClient {
    pub fn new(backend: Arc<dyn TranslationBackend>, policy: RetryPolicy) -> Self {
        Self {
            backend,
            policy,
            calls: AtomicU64::new(0),
        }
    }

    pub fn backend(&self) -> &Arc<dyn TranslationBackend> {
        &self.backend
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// 实际发往后端的调用次数（含重试）
    pub fn backend_calls(&self) -> u64 {
        self.calls.load(Ordering::Relaxed)
    }

    /// 翻译文本
    pub async fn translate(
        &self,
        source_lang: &str,
        target_lang: &str,
        text: &str,
    ) -> TranslationResult<String> {
        let operation = format!("{} 翻译 {}->{}", self.backend.name(), source_lang, target_lang);

        with_retry(&self.policy, &operation, |_| {
            self.calls.fetch_add(1, Ordering::Relaxed);
            metrics::counter!("translation_backend_calls_total").increment(1);
            self.backend.translate(text, source_lang, target_lang)
        })
        .await
    }
}
