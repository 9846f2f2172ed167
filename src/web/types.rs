//! Web 服务器类型定义

use std::sync::Arc;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::{Deserialize, Serialize};

use crate::translation::{
    storage::CacheStatsSnapshot, ServiceStatsSnapshot, TranslationError, TranslationOutcome,
    TranslationService,
};

/// 应用状态
pub struct AppState {
    pub service: Arc<TranslationService>,
}

/// 翻译请求
#[derive(Debug, Deserialize)]
pub struct TranslateRequest {
    pub src_locale: String,
    pub target_locale: String,
    pub input_text: String,
}

/// 翻译响应
#[derive(Debug, Serialize, Deserialize)]
pub struct TranslateResponse {
    pub translated_text: String,
    pub cached_result: bool,
    pub processing_seconds: f64,
}

impl From<TranslationOutcome> for TranslateResponse {
    fn from(outcome: TranslationOutcome) -> Self {
        Self {
            translated_text: outcome.translated_text,
            cached_result: outcome.cache_hit,
            processing_seconds: outcome.processing_duration.as_secs_f64(),
        }
    }
}

/// 错误响应，只包含错误码
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error_text: String,
}

/// 处理器错误
#[derive(Debug)]
pub struct ApiError(pub TranslationError);

impl From<TranslationError> for ApiError {
    fn from(error: TranslationError) -> Self {
        Self(error)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let body = ErrorResponse {
            error_text: self.0.error_code(),
        };
        (status, Json(body)).into_response()
    }
}

/// 支持的语言列表响应
#[derive(Debug, Serialize)]
pub struct LanguagesResponse {
    pub validate_target_language: bool,
    pub supported_target_languages: Vec<String>,
}

/// 统计信息响应
#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub service: ServiceStatsSnapshot,
    pub cache: CacheStatsSnapshot,
    pub hit_rate: f64,
}
