//! Web 路由定义

use axum::{
    routing::{get, post},
    Router,
};

use crate::web::{handlers::*, types::AppState};
use std::sync::Arc;

/// 创建路由结构
pub fn create_routes() -> Router<Arc<AppState>> {
    Router::new()
        // 翻译入口
        .route("/translate", post(translate_text))
        // 运维接口
        .route("/health", get(health_check))
        .route("/api/stats", get(get_stats))
        .route("/api/languages", get(supported_languages))
}
