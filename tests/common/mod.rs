// 集成测试公共模块
//
// 提供可编程的测试后端、故障存储和测试配置

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use caching_translate::translation::{
    CacheEntry, CacheKey, CacheStore, MemoryCacheStore, RetryPolicy, StoreKind, TranslationBackend,
    TranslationConfig, TranslationError, TranslationResult, TranslationService,
};

/// 测试后端的行为
#[derive(Debug, Clone)]
pub enum Script {
    /// 返回 `[目标语言]原文`
    Echo,
    /// 先失败 n 次（可重试错误），之后正常
    FailTimes(usize),
    /// 包含 `FAIL` 的文本返回不可重试错误
    FatalOn(&'static str),
    /// 每次调用都返回限流错误
    AlwaysThrottle,
    /// 每次调用耗时固定时长
    Slow(Duration),
}

/// 记录调用次数的测试后端
pub struct ScriptedBackend {
    script: Script,
    calls: AtomicUsize,
    per_text: Mutex<HashMap<String, usize>>,
}

impl ScriptedBackend {
    pub fn new(script: Script) -> Arc<Self> {
        Arc::new(Self {
            script,
            calls: AtomicUsize::new(0),
            per_text: Mutex::new(HashMap::new()),
        })
    }

    pub fn echo() -> Arc<Self> {
        Self::new(Script::Echo)
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// 某段文本被送往后端的次数
    pub fn calls_for(&self, text: &str) -> usize {
        self.per_text
            .lock()
            .unwrap()
            .get(text)
            .copied()
            .unwrap_or(0)
    }
}

pub fn echo_translation(text: &str, target_lang: &str) -> String {
    format!("[{}]{}", target_lang, text)
}

#[async_trait]
impl TranslationBackend for ScriptedBackend {
    fn name(&self) -> &'static str {
        "scripted"
    }

    async fn translate(
        &self,
        text: &str,
        _source_lang: &str,
        target_lang: &str,
    ) -> TranslationResult<String> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst);
        *self
            .per_text
            .lock()
            .unwrap()
            .entry(text.to_string())
            .or_insert(0) += 1;

        match &self.script {
            Script::Echo => Ok(echo_translation(text, target_lang)),
            Script::FailTimes(times) if n < *times => Err(TranslationError::ServiceUnavailable {
                code: "ServiceUnavailableException".to_string(),
                message: "temporarily unavailable".to_string(),
            }),
            Script::FailTimes(_) => Ok(echo_translation(text, target_lang)),
            Script::FatalOn(marker) if text.contains(marker) => {
                Err(TranslationError::BackendError {
                    code: "InvalidRequestException".to_string(),
                    message: format!("cannot translate {}", text),
                })
            }
            Script::FatalOn(_) => Ok(echo_translation(text, target_lang)),
            Script::AlwaysThrottle => Err(TranslationError::RateLimitExceeded {
                code: "ThrottlingException".to_string(),
                message: "429".to_string(),
            }),
            Script::Slow(delay) => {
                tokio::time::sleep(*delay).await;
                Ok(echo_translation(text, target_lang))
            }
        }
    }
}

/// 存储故障模式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreFault {
    /// 读取失败，写入正常
    Lookup,
    /// 读取正常，写入失败
    Insert,
    /// 读写都失败
    Both,
}

/// 按故障模式失败的存储，正常部分委托给内存存储
pub struct FaultyStore {
    fault: StoreFault,
    inner: MemoryCacheStore,
    puts: AtomicUsize,
}

impl FaultyStore {
    pub fn new(fault: StoreFault) -> Arc<Self> {
        Arc::new(Self {
            fault,
            inner: MemoryCacheStore::new(),
            puts: AtomicUsize::new(0),
        })
    }

    pub fn puts(&self) -> usize {
        self.puts.load(Ordering::SeqCst)
    }

    pub fn stored(&self) -> usize {
        self.inner.len()
    }
}

#[async_trait]
impl CacheStore for FaultyStore {
    fn name(&self) -> &'static str {
        "faulty"
    }

    async fn get(&self, key: &CacheKey) -> TranslationResult<Option<CacheEntry>> {
        match self.fault {
            StoreFault::Lookup | StoreFault::Both => Err(TranslationError::CacheError(
                "store unreachable".to_string(),
            )),
            StoreFault::Insert => self.inner.get(key).await,
        }
    }

    async fn put(&self, entry: CacheEntry) -> TranslationResult<()> {
        self.puts.fetch_add(1, Ordering::SeqCst);
        match self.fault {
            StoreFault::Insert | StoreFault::Both => Err(TranslationError::CacheError(
                "write throttled".to_string(),
            )),
            StoreFault::Lookup => self.inner.put(entry).await,
        }
    }

    async fn health_check(&self) -> TranslationResult<()> {
        Err(TranslationError::CacheError("store unreachable".to_string()))
    }
}

/// 测试用配置：内存存储，无请求截止时间
pub fn test_config() -> TranslationConfig {
    TranslationConfig {
        store: StoreKind::Memory,
        request_timeout_secs: 0,
        ..TranslationConfig::default()
    }
}

/// 不等待的重试策略
pub fn fast_retry_policy() -> RetryPolicy {
    RetryPolicy {
        base_delay: Duration::ZERO,
        max_delay: Duration::ZERO,
        jitter: false,
        attempt_timeout: None,
        ..RetryPolicy::default()
    }
}

/// 使用快速重试策略创建服务
pub fn build_service(
    config: TranslationConfig,
    store: Arc<dyn CacheStore>,
    backend: Arc<dyn TranslationBackend>,
) -> TranslationService {
    TranslationService::with_retry_policy(config, store, backend, fast_retry_policy())
        .expect("test config should be valid")
}
