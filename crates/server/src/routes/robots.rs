//! robots.txt serving and admin editing.

use axum::{
    Json, Router,
    extract::State,
    http::header,
    response::{IntoResponse, Json as ResponseJson},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use services::services::{
    robots::{self, RobotsConfig, RobotsValidation},
    robots_store::RobotsStore,
};
use ts_rs::TS;
use utils::response::ApiResponse;

use crate::{AppState, error::ApiError};

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct RobotsText {
    pub content: String,
}

fn store(state: &AppState) -> RobotsStore {
    RobotsStore::new(state.db().pool.clone(), state.config().site_url.clone())
}

/// GET /robots.txt
pub async fn serve_robots_txt(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let content = store(&state).current().await?;
    Ok(([(header::CONTENT_TYPE, "text/plain; charset=utf-8")], content))
}

/// GET /api/robots
pub async fn get_robots(
    State(state): State<AppState>,
) -> Result<ResponseJson<ApiResponse<RobotsText>>, ApiError> {
    let content = store(&state).current().await?;
    Ok(ResponseJson(ApiResponse::success(RobotsText { content })))
}

/// PUT /api/robots
pub async fn save_robots(
    State(state): State<AppState>,
    Json(payload): Json<RobotsText>,
) -> Result<ResponseJson<ApiResponse<RobotsValidation>>, ApiError> {
    let validation = store(&state).save(&payload.content).await?;
    Ok(ResponseJson(ApiResponse::success(validation)))
}

/// POST /api/robots/validate
pub async fn validate_robots(Json(payload): Json<RobotsText>) -> ResponseJson<ApiResponse<RobotsValidation>> {
    ResponseJson(ApiResponse::success(robots::validate(&payload.content)))
}

/// POST /api/robots/generate
pub async fn generate_robots(Json(config): Json<RobotsConfig>) -> ResponseJson<ApiResponse<RobotsText>> {
    ResponseJson(ApiResponse::success(RobotsText {
        content: robots::generate(&config),
    }))
}

pub fn router(_state: &AppState) -> Router<AppState> {
    Router::new().nest(
        "/robots",
        Router::new()
            .route("/", get(get_robots).put(save_robots))
            .route("/validate", post(validate_robots))
            .route("/generate", post(generate_robots)),
    )
}
