//! 统计和健康检查处理器

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, response::Json};

use crate::translation::{HealthLevel, HealthStatus};
use crate::web::types::{AppState, StatsResponse};

/// 服务统计
pub async fn get_stats(State(state): State<Arc<AppState>>) -> Json<StatsResponse> {
    let service = state.service.get_stats().snapshot();
    let hit_rate = service.hit_rate();

    Json(StatsResponse {
        service,
        cache: state.service.cache_stats(),
        hit_rate,
    })
}

/// 健康检查，后端不可用时返回 503
pub async fn health_check(
    State(state): State<Arc<AppState>>,
) -> (StatusCode, Json<HealthStatus>) {
    let health = state.service.get_health().await;
    let status = match health.overall {
        HealthLevel::Healthy | HealthLevel::Degraded => StatusCode::OK,
        HealthLevel::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
    };
    (status, Json(health))
}
