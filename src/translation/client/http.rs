//! HTTP 翻译后端
//!
//! 兼容 DeepLX 的 JSON 接口：请求 `{text, source_lang, target_lang}`，
//! 响应 `{code, data}`。HTTP 状态按可重试与否分类。

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

use super::TranslationBackend;
use crate::translation::config::TranslationConfig;
use crate::translation::error::{TranslationError, TranslationResult};

#[derive(Debug, Serialize)]
struct TranslateBody<'a> {
    text: &'a str,
    source_lang: &'a str,
    target_lang: &'a str,
}

/// 后端响应，成功和失败共用
#[derive(Debug, Default, Deserialize)]
struct TranslateReply {
    #[serde(default)]
    code: Option<u16>,
    #[serde(default)]
    data: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error_code: Option<String>,
}

/// HTTP 翻译后端
pub struct HttpTranslationBackend {
    client: Client,
    api_url: String,
    api_key: Option<String>,
}

impl HttpTranslationBackend {
    pub fn new(
        api_url: impl Into<String>,
        api_key: Option<String>,
        timeout: Duration,
    ) -> TranslationResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("caching-translate/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| TranslationError::ConfigError(format!("创建HTTP客户端失败: {}", e)))?;

        Ok(Self {
            client,
            api_url: api_url.into(),
            api_key,
        })
    }

    pub fn from_config(config: &TranslationConfig) -> TranslationResult<Self> {
        Self::new(
            config.api_url.clone(),
            config.api_key.clone(),
            config.translate_timeout(),
        )
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }
}

#[async_trait]
impl TranslationBackend for HttpTranslationBackend {
    fn name(&self) -> &'static str {
        "http"
    }

    async fn translate(
        &self,
        text: &str,
        source_lang: &str,
        target_lang: &str,
    ) -> TranslationResult<String> {
        let mut request = self.client.post(&self.api_url).json(&TranslateBody {
            text,
            source_lang,
            target_lang,
        });
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(classify_failure(status, &body));
        }

        let reply: TranslateReply = serde_json::from_str(&body)?;
        // DeepLX 在 HTTP 200 中也可能携带错误码
        if let Some(code) = reply.code.and_then(|c| StatusCode::from_u16(c).ok()) {
            if !code.is_success() {
                return Err(classify_failure(code, &body));
            }
        }

        reply.data.ok_or_else(|| TranslationError::BackendError {
            code: "InvalidResponse".to_string(),
            message: "响应中缺少 data 字段".to_string(),
        })
    }
}

/// 将失败响应映射为错误类型
///
/// 429 限流和 5xx 可重试，其余 4xx 直接失败。错误码优先取响应体中的
/// `error_code`。
pub fn classify_failure(status: StatusCode, body: &str) -> TranslationError {
    let reply: TranslateReply = serde_json::from_str(body).unwrap_or_default();
    let message = reply
        .message
        .unwrap_or_else(|| format!("HTTP {}", status.as_u16()));

    match status {
        StatusCode::TOO_MANY_REQUESTS => TranslationError::RateLimitExceeded {
            code: reply
                .error_code
                .unwrap_or_else(|| "ThrottlingException".to_string()),
            message,
        },
        s if s.is_server_error() => TranslationError::ServiceUnavailable {
            code: reply
                .error_code
                .unwrap_or_else(|| "ServiceUnavailableException".to_string()),
            message,
        },
        StatusCode::BAD_REQUEST => TranslationError::BackendError {
            code: reply
                .error_code
                .unwrap_or_else(|| "InvalidRequestException".to_string()),
            message,
        },
        s => TranslationError::BackendError {
            code: reply
                .error_code
                .unwrap_or_else(|| format!("HttpError{}", s.as_u16())),
            message,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_throttling_is_retryable() {
        let err = classify_failure(StatusCode::TOO_MANY_REQUESTS, "");
        assert!(err.is_retryable());
        assert_eq!(err.error_code(), "ThrottlingException");

        // 响应体中的错误码优先
        let err = classify_failure(
            StatusCode::TOO_MANY_REQUESTS,
            r#"{"error_code":"TooManyRequestsException"}"#,
        );
        assert!(err.is_retryable());
        assert_eq!(err.error_code(), "TooManyRequestsException");
    }

    #[test]
    fn test_server_errors_are_retryable() {
        let err = classify_failure(StatusCode::SERVICE_UNAVAILABLE, r#"{"message":"down"}"#);
        assert!(err.is_retryable());
        assert_eq!(err.error_code(), "ServiceUnavailableException");
    }

    #[test]
    fn test_client_errors_are_fatal_and_keep_body_code() {
        let err = classify_failure(
            StatusCode::BAD_REQUEST,
            r#"{"code":400,"message":"bad pair","error_code":"UnsupportedLanguagePairException"}"#,
        );
        assert!(!err.is_retryable());
        assert_eq!(err.error_code(), "UnsupportedLanguagePairException");

        let err = classify_failure(StatusCode::UNAUTHORIZED, "not json");
        assert!(!err.is_retryable());
        assert_eq!(err.error_code(), "HttpError401");
    }

    #[test]
    fn test_reply_parsing() {
        let reply: TranslateReply = serde_json::from_str(r#"{"code":200,"data":"Hola."}"#).unwrap();
        assert_eq!(reply.code, Some(200));
        assert_eq!(reply.data.as_deref(), Some("Hola."));
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_network_error() {
        let backend =
            HttpTranslationBackend::new("http://127.0.0.1:9/translate", None, Duration::from_secs(2))
                .unwrap();
        let err = backend.translate("Hello.", "en", "es").await.unwrap_err();
        assert!(err.is_retryable());
    }
}
