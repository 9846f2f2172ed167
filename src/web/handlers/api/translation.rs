//! 翻译相关API处理器

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    response::Json,
};

use crate::translation::{TranslationError, TranslationRequest};
use crate::web::types::{ApiError, AppState, LanguagesResponse, TranslateRequest, TranslateResponse};

/// 翻译文本
///
/// 成功返回 200；后端失败返回 500，请求超时返回 504，输入无效返回 400。
/// 出错时响应体只有 `error_text`，不附带部分译文。
pub async fn translate_text(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<TranslateRequest>, JsonRejection>,
) -> Result<Json<TranslateResponse>, ApiError> {
    let Json(request) = payload.map_err(|e| {
        tracing::warn!("无效的翻译请求: {}", e);
        TranslationError::InvalidInput(e.body_text())
    })?;

    tracing::info!(
        "收到翻译请求: {} -> {}, {} 字符",
        request.src_locale,
        request.target_locale,
        request.input_text.chars().count()
    );

    let outcome = state
        .service
        .translate(&TranslationRequest::new(
            request.src_locale,
            request.target_locale,
            request.input_text,
        ))
        .await?;

    Ok(Json(TranslateResponse::from(outcome)))
}

/// 列出支持的目标语言
pub async fn supported_languages(State(state): State<Arc<AppState>>) -> Json<LanguagesResponse> {
    Json(LanguagesResponse {
        validate_target_language: state.service.config().validate_target_language,
        supported_target_languages: state.service.supported_target_languages().to_vec(),
    })
}
