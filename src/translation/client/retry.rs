//! 重试策略
//!
//! 指数退避加全抖动：第 n 次重试前等待 `[0, min(base * 2^n, max)]` 内的随机时长。
//! 每次尝试可单独设置超时，超时按可重试错误处理。

use std::future::Future;
use std::time::Duration;

use rand::Rng;
use tokio::time::sleep;

use crate::translation::config::{constants, TranslationConfig};
use crate::translation::error::{TranslationError, TranslationResult};

/// 重试策略配置
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// 总尝试次数（含首次）
    pub max_attempts: usize,
    pub base_delay: Duration,
    pub max_delay: Duration,
    /// 关闭后使用未抖动的上限值
    pub jitter: bool,
    /// 单次尝试超时
    pub attempt_timeout: Option<Duration>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: constants::DEFAULT_MAX_ATTEMPTS,
            base_delay: constants::DEFAULT_RETRY_BASE_DELAY,
            max_delay: constants::DEFAULT_RETRY_MAX_DELAY,
            jitter: true,
            attempt_timeout: Some(constants::DEFAULT_TRANSLATE_TIMEOUT),
        }
    }
}

impl RetryPolicy {
    pub fn from_config(config: &TranslationConfig) -> Self {
        Self {
            max_attempts: config.max_attempts,
            base_delay: config.retry_base_delay(),
            max_delay: config.retry_max_delay(),
            jitter: true,
            attempt_timeout: Some(config.translate_timeout()),
        }
    }

    /// 只尝试一次
    pub fn no_retry() -> Self {
        Self {
            max_attempts: 1,
            ..Default::default()
        }
    }

    /// 第 `attempt` 次失败（从 0 开始）后的等待上限
    pub fn backoff_cap(&self, attempt: usize) -> Duration {
        let factor = 1u32.checked_shl(attempt.min(31) as u32).unwrap_or(u32::MAX);
        self.base_delay
            .checked_mul(factor)
            .unwrap_or(self.max_delay)
            .min(self.max_delay)
    }

    /// 第 `attempt` 次失败后实际等待的时长
    pub fn delay_for_attempt(&self, attempt: usize) -> Duration {
        let cap = self.backoff_cap(attempt);
        if self.jitter {
            cap.mul_f64(rand_jitter())
        } else {
            cap
        }
    }
}

/// 全抖动系数 [0.0, 1.0)
fn rand_jitter() -> f64 {
    rand::thread_rng().gen::<f64>()
}

/// 按策略执行异步操作
///
/// 不可重试的错误立即返回；可重试错误用尽次数后返回
/// [`TranslationError::RetriesExhausted`]，其中携带最后一次的错误。
pub async fn with_retry<T, F, Fut>(
    policy: &RetryPolicy,
    operation_name: &str,
    mut operation: F,
) -> TranslationResult<T>
where
    F: FnMut(usize) -> Fut,
    Fut: Future<Output = TranslationResult<T>>,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 0;

    loop {
        let result = match policy.attempt_timeout {
            Some(limit) => match tokio::time::timeout(limit, operation(attempt)).await {
                Ok(result) => result,
                Err(_) => Err(TranslationError::TimeoutError(format!(
                    "{} 单次调用超时 ({:?})",
                    operation_name, limit
                ))),
            },
            None => operation(attempt).await,
        };

        let error = match result {
            Ok(value) => return Ok(value),
            Err(e) => e,
        };

        if !error.is_retryable() {
            tracing::debug!(
                "{}: 第 {} 次尝试遇到不可重试错误: {}",
                operation_name,
                attempt + 1,
                error
            );
            return Err(error);
        }

        attempt += 1;
        if attempt >= max_attempts {
            tracing::error!(
                "{}: 已尝试 {} 次仍失败: {}",
                operation_name,
                attempt,
                error
            );
            return Err(TranslationError::RetriesExhausted {
                attempts: attempt,
                last: Box::new(error),
            });
        }

        let delay = policy.delay_for_attempt(attempt - 1);
        tracing::warn!(
            "{}: 第 {}/{} 次尝试失败，{:?} 后重试: {}",
            operation_name,
            attempt,
            max_attempts,
            delay,
            error
        );
        sleep(delay).await;
    }
}
