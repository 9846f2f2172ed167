//! 缓存翻译服务
//!
//! 本模块是整个系统的编排层：切分输入，对每个分句计算缓存键并查询缓存，
//! 命中时直接使用缓存译文，未命中时调用翻译后端并写回缓存，最后按原顺序拼接。
//!
//! ## 错误处理
//!
//! - 缓存查询失败按未命中处理
//! - 缓存写入失败只记录日志，译文照常返回
//! - 后端不可恢复错误中止整个请求，已完成分句写入的缓存保留
//!
//! ## 使用示例
//!
//! ```rust,ignore
//! let service = TranslationService::new(config, store, backend)?;
//! let outcome = service
//!     .translate(&TranslationRequest::new("en", "es", "Hello. World."))
//!     .await?;
//! println!("{} (cache_hit = {})", outcome.translated_text, outcome.cache_hit);
//! ```

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use futures::stream::{self, StreamExt, TryStreamExt};
use serde::{Deserialize, Serialize};

use super::fingerprint::Fingerprint;
use super::segmenter::{Segment, Segmenter};
use crate::translation::client::{RetryPolicy, TranslationBackend, TranslationClient};
use crate::translation::config::TranslationConfig;
use crate::translation::error::{helpers, TranslationError, TranslationResult};
use crate::translation::storage::cache::{CacheStatsSnapshot, CacheStore, TranslationCache};

/// 翻译请求
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationRequest {
    pub source_lang: String,
    pub target_lang: String,
    pub text: String,
}

impl TranslationRequest {
    pub fn new(
        source_lang: impl Into<String>,
        target_lang: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            source_lang: source_lang.into(),
            target_lang: target_lang.into(),
            text: text.into(),
        }
    }
}

/// 翻译结果
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TranslationOutcome {
    pub translated_text: String,
    /// 最后一个分句是否命中缓存
    pub cache_hit: bool,
    pub processing_duration: Duration,
    pub segments: usize,
    pub cache_hits: usize,
    pub cache_misses: usize,
}

impl TranslationOutcome {
    fn empty(processing_duration: Duration) -> Self {
        Self {
            translated_text: String::new(),
            cache_hit: false,
            processing_duration,
            segments: 0,
            cache_hits: 0,
            cache_misses: 0,
        }
    }
}

/// 单个分句的处理结果
#[derive(Debug)]
struct SegmentOutcome {
    text: String,
    cache_hit: bool,
}

/// 缓存翻译服务
pub struct TranslationService {
    config: TranslationConfig,
    segmenter: Segmenter,
    cache: TranslationCache,
    client: TranslationClient,
    stats: ServiceStats,
}

impl TranslationService {
    /// 创建服务，存储和后端由调用方构造后注入
    pub fn new(
        config: TranslationConfig,
        store: Arc<dyn CacheStore>,
        backend: Arc<dyn TranslationBackend>,
    ) -> TranslationResult<Self> {
        let policy = RetryPolicy::from_config(&config);
        Self::with_retry_policy(config, store, backend, policy)
    }

    /// 使用自定义重试策略创建服务
    pub fn with_retry_policy(
        config: TranslationConfig,
        store: Arc<dyn CacheStore>,
        backend: Arc<dyn TranslationBackend>,
        policy: RetryPolicy,
    ) -> TranslationResult<Self> {
        config.validate()?;

        tracing::info!(
            "翻译服务初始化: store={}, backend={}, ttl={:?}, 分句并发={}",
            store.name(),
            backend.name(),
            config.cache_ttl(),
            config.max_concurrent_segments
        );

        Ok(Self {
            segmenter: Segmenter::new(config.segment_delimiter),
            cache: TranslationCache::new(store, config.cache_ttl(), config.store_timeout()),
            client: TranslationClient::new(backend, policy),
            stats: ServiceStats::default(),
            config,
        })
    }

    pub fn config(&self) -> &TranslationConfig {
        &self.config
    }

    pub fn segmenter(&self) -> &Segmenter {
        &self.segmenter
    }

    pub fn get_stats(&self) -> &ServiceStats {
        &self.stats
    }

    pub fn cache_stats(&self) -> CacheStatsSnapshot {
        self.cache.stats().snapshot()
    }

    /// 已配置的目标语言
    pub fn supported_target_languages(&self) -> &[String] {
        &self.config.supported_target_languages
    }

    pub fn does_target_language_exist(&self, language: &str) -> bool {
        self.config
            .supported_target_languages
            .iter()
            .any(|supported| supported.eq_ignore_ascii_case(language))
    }

    /// 翻译文本
    ///
    /// 设置了请求截止时间时，超时会取消尚未完成的分句，被取消的分句不会写入缓存。
    pub async fn translate(
        &self,
        request: &TranslationRequest,
    ) -> TranslationResult<TranslationOutcome> {
        let start = Instant::now();
        self.stats.inc_requests();

        let result = match self.config.request_timeout() {
            Some(deadline) => match tokio::time::timeout(deadline, self.process(request)).await {
                Ok(result) => result,
                Err(_) => Err(TranslationError::DeadlineExceeded(deadline)),
            },
            None => self.process(request).await,
        };

        let elapsed = start.elapsed();
        self.stats.add_processing_time(elapsed);
        metrics::histogram!("translation_processing_seconds").record(elapsed.as_secs_f64());

        match result {
            Ok(outcomes) => {
                let outcome = assemble(outcomes, elapsed);
                tracing::info!(
                    "翻译完成 {}->{}: {} 个分句, 命中 {}, 未命中 {}, 耗时 {:?}",
                    request.source_lang,
                    request.target_lang,
                    outcome.segments,
                    outcome.cache_hits,
                    outcome.cache_misses,
                    elapsed
                );
                Ok(outcome)
            }
            Err(e) => {
                self.stats.inc_errors();
                helpers::log_error(&e);
                Err(e)
            }
        }
    }

    async fn process(&self, request: &TranslationRequest) -> TranslationResult<Vec<SegmentOutcome>> {
        self.validate_request(request)?;

        let segments = self.segmenter.segment(&request.text);
        if segments.is_empty() {
            tracing::debug!("输入没有可翻译的分句");
            return Ok(Vec::new());
        }

        // buffered 保持输出顺序与输入一致
        stream::iter(segments)
            .map(|segment| self.process_segment(request, segment))
            .buffered(self.config.max_concurrent_segments.max(1))
            .try_collect()
            .await
    }

    fn validate_request(&self, request: &TranslationRequest) -> TranslationResult<()> {
        if request.source_lang.trim().is_empty() {
            return Err(helpers::validation_error("源语言不能为空"));
        }
        if request.target_lang.trim().is_empty() {
            return Err(helpers::validation_error("目标语言不能为空"));
        }
        if self.config.validate_target_language
            && !self.does_target_language_exist(&request.target_lang)
        {
            return Err(TranslationError::UnsupportedLanguagePair {
                source_lang: request.source_lang.clone(),
                target_lang: request.target_lang.clone(),
            });
        }
        Ok(())
    }

    async fn process_segment(
        &self,
        request: &TranslationRequest,
        segment: Segment,
    ) -> TranslationResult<SegmentOutcome> {
        let key = Fingerprint::generate(&request.source_lang, &request.target_lang, &segment.text);

        match self.cache.lookup(&key).await {
            Ok(Some(entry)) => {
                self.stats.inc_cache_hits();
                metrics::counter!("translation_cache_hits_total").increment(1);
                tracing::debug!("分句 {} 命中缓存: {}", segment.index, key);
                return Ok(SegmentOutcome {
                    text: entry.translated_text,
                    cache_hit: true,
                });
            }
            Ok(None) => {}
            Err(e) => {
                self.stats.inc_cache_errors();
                metrics::counter!("translation_cache_errors_total").increment(1);
                tracing::warn!("分句 {} 缓存查询失败，按未命中处理: {}", segment.index, e);
            }
        }

        self.stats.inc_cache_misses();
        metrics::counter!("translation_cache_misses_total").increment(1);
        tracing::debug!("分句 {} 未命中缓存，调用翻译后端", segment.index);

        let translated = self
            .client
            .translate(&request.source_lang, &request.target_lang, &segment.text)
            .await?;
        self.stats.add_chars_processed(segment.text.chars().count());

        if let Err(e) = self
            .cache
            .insert(
                key,
                &request.source_lang,
                &request.target_lang,
                &segment.text,
                &translated,
            )
            .await
        {
            self.stats.inc_cache_errors();
            metrics::counter!("translation_cache_errors_total").increment(1);
            tracing::warn!("分句 {} 写入缓存失败: {}", segment.index, e);
        }

        Ok(SegmentOutcome {
            text: translated,
            cache_hit: false,
        })
    }

    /// 检查服务健康状态
    ///
    /// 缓存故障只会降级（查询失败按未命中处理），后端故障则视为不健康。
    pub async fn get_health(&self) -> HealthStatus {
        let mut components = HashMap::new();

        let cache_level = match self.cache.health_check().await {
            Ok(()) => HealthLevel::Healthy,
            Err(e) => {
                tracing::warn!("缓存健康检查失败: {}", e);
                HealthLevel::Degraded
            }
        };
        components.insert(format!("cache:{}", self.cache.store().name()), cache_level);

        let backend_level = match self.client.backend().health_check().await {
            Ok(()) => HealthLevel::Healthy,
            Err(e) => {
                tracing::warn!("翻译后端健康检查失败: {}", e);
                HealthLevel::Unhealthy
            }
        };
        components.insert(
            format!("backend:{}", self.client.backend().name()),
            backend_level,
        );

        HealthStatus::from_components(components)
    }
}

fn assemble(outcomes: Vec<SegmentOutcome>, processing_duration: Duration) -> TranslationOutcome {
    if outcomes.is_empty() {
        return TranslationOutcome::empty(processing_duration);
    }

    let cache_hits = outcomes.iter().filter(|o| o.cache_hit).count();
    let cache_hit = outcomes.last().map(|o| o.cache_hit).unwrap_or(false);

    TranslationOutcome {
        segments: outcomes.len(),
        cache_hits,
        cache_misses: outcomes.len() - cache_hits,
        cache_hit,
        translated_text: Segmenter::join(outcomes.iter().map(|o| o.text.as_str())),
        processing_duration,
    }
}

/// 服务统计信息（线程安全）
#[derive(Debug, Default)]
pub struct ServiceStats {
    pub requests: AtomicUsize,
    pub cache_hits: AtomicUsize,
    pub cache_misses: AtomicUsize,
    pub cache_errors: AtomicUsize,
    /// 总处理时间，以微秒为单位存储
    pub processing_time: AtomicU64,
    pub total_chars_processed: AtomicUsize,
    pub errors_encountered: AtomicUsize,
}

impl ServiceStats {
    pub fn inc_requests(&self) {
        self.requests.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_cache_hits(&self) {
        self.cache_hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_cache_misses(&self) {
        self.cache_misses.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_cache_errors(&self) {
        self.cache_errors.fetch_add(1, Ordering::Relaxed);
    }

    pub fn add_processing_time(&self, duration: Duration) {
        self.processing_time
            .fetch_add(duration.as_micros() as u64, Ordering::Relaxed);
    }

    /// 只统计实际送往后端的字符
    pub fn add_chars_processed(&self, count: usize) {
        self.total_chars_processed
            .fetch_add(count, Ordering::Relaxed);
    }

    pub fn inc_errors(&self) {
        self.errors_encountered.fetch_add(1, Ordering::Relaxed);
    }

    /// 获取统计数据快照
    pub fn snapshot(&self) -> ServiceStatsSnapshot {
        ServiceStatsSnapshot {
            requests: self.requests.load(Ordering::Relaxed),
            cache_hits: self.cache_hits.load(Ordering::Relaxed),
            cache_misses: self.cache_misses.load(Ordering::Relaxed),
            cache_errors: self.cache_errors.load(Ordering::Relaxed),
            processing_time: Duration::from_micros(self.processing_time.load(Ordering::Relaxed)),
            total_chars_processed: self.total_chars_processed.load(Ordering::Relaxed),
            errors_encountered: self.errors_encountered.load(Ordering::Relaxed),
        }
    }
}

/// 统计信息快照
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ServiceStatsSnapshot {
    pub requests: usize,
    pub cache_hits: usize,
    pub cache_misses: usize,
    pub cache_errors: usize,
    pub processing_time: Duration,
    pub total_chars_processed: usize,
    pub errors_encountered: usize,
}

impl ServiceStatsSnapshot {
    /// 分句级缓存命中率
    pub fn hit_rate(&self) -> f64 {
        let total = self.cache_hits + self.cache_misses;
        if total == 0 {
            0.0
        } else {
            self.cache_hits as f64 / total as f64
        }
    }
}

/// 服务健康状态报告
#[derive(Debug, Clone, Serialize)]
pub struct HealthStatus {
    /// 整体健康级别
    pub overall: HealthLevel,
    /// 各组件的健康状态，键为 `类型:名称`
    pub components: HashMap<String, HealthLevel>,
}

impl HealthStatus {
    /// 任一组件不健康则整体不健康，否则有降级即降级
    pub fn from_components(components: HashMap<String, HealthLevel>) -> Self {
        let overall = if components.values().any(|&l| l == HealthLevel::Unhealthy) {
            HealthLevel::Unhealthy
        } else if components.values().any(|&l| l == HealthLevel::Degraded) {
            HealthLevel::Degraded
        } else {
            HealthLevel::Healthy
        };

        Self {
            overall,
            components,
        }
    }
}

/// 健康状态级别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthLevel {
    Healthy,
    Degraded,
    Unhealthy,
}
