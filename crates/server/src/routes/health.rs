use axum::{
    Router,
    extract::State,
    http::StatusCode,
    response::Json as ResponseJson,
    routing::get,
};
use serde::{Deserialize, Serialize};
use services::services::database_validator::{DatabaseStatus, DatabaseValidator};
use ts_rs::TS;
use utils::response::ApiResponse;

use crate::{AppState, error::ApiError};

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct HealthStatus {
    pub status: String,
    pub version: String,
    pub database: DatabaseStatus,
}

/// GET /api/health
/// 503 when the schema is missing or unmigrated
pub async fn health(
    State(state): State<AppState>,
) -> Result<(StatusCode, ResponseJson<ApiResponse<HealthStatus>>), ApiError> {
    let database = DatabaseValidator::new(state.db().pool.clone())
        .validate()
        .await?;

    let (code, status) = if database.is_ok() {
        (StatusCode::OK, "ok")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "degraded")
    };

    Ok((
        code,
        ResponseJson(ApiResponse::success(HealthStatus {
            status: status.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            database,
        })),
    ))
}

pub fn router(_state: &AppState) -> Router<AppState> {
    Router::new().route("/health", get(health))
}
