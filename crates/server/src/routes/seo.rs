//! Routes for page SEO metadata.

use axum::{
    Json, Router,
    extract::{Query, State},
    response::Json as ResponseJson,
    routing::{get, post},
};
use db::models::seo_data::{SeoData, SeoRecord};
use serde::Deserialize;
use services::services::{
    seo::{SavedSeoData, SeoPreview, SeoService},
    seo_validator::ValidationReport,
};
use utils::response::ApiResponse;

use crate::{AppState, error::ApiError};

#[derive(Debug, Deserialize)]
pub struct PagePathQuery {
    pub path: String,
}

/// GET /api/seo
pub async fn list_seo(
    State(state): State<AppState>,
) -> Result<ResponseJson<ApiResponse<Vec<SeoRecord>>>, ApiError> {
    let records = SeoService::new(state.db().pool.clone()).list().await?;
    Ok(ResponseJson(ApiResponse::success(records)))
}

/// GET /api/seo/page?path=/industries/construction
/// Stored metadata, or a fresh record with defaults for the editor
pub async fn get_seo(
    State(state): State<AppState>,
    Query(query): Query<PagePathQuery>,
) -> Result<ResponseJson<ApiResponse<SeoData>>, ApiError> {
    let data = SeoService::new(state.db().pool.clone())
        .load_for_edit(&query.path)
        .await?;
    Ok(ResponseJson(ApiResponse::success(data)))
}

/// PUT /api/seo
/// Validate and upsert; rejected with 422 and the report when there are critical issues
pub async fn save_seo(
    State(state): State<AppState>,
    Json(payload): Json<SeoData>,
) -> Result<ResponseJson<ApiResponse<SavedSeoData>>, ApiError> {
    let saved = SeoService::new(state.db().pool.clone()).save(payload).await?;
    Ok(ResponseJson(ApiResponse::success(saved)))
}

/// DELETE /api/seo/page?path=/industries/construction
pub async fn delete_seo(
    State(state): State<AppState>,
    Query(query): Query<PagePathQuery>,
) -> Result<ResponseJson<ApiResponse<()>>, ApiError> {
    SeoService::new(state.db().pool.clone())
        .delete(&query.path)
        .await?;
    Ok(ResponseJson(ApiResponse::success(())))
}

/// POST /api/seo/validate
/// Live feedback for the editor; never writes
pub async fn validate_seo(
    State(state): State<AppState>,
    Json(payload): Json<SeoData>,
) -> ResponseJson<ApiResponse<ValidationReport>> {
    let report = SeoService::new(state.db().pool.clone()).evaluate(&payload);
    ResponseJson(ApiResponse::success(report))
}

/// GET /api/seo/preview?path=/inventory
pub async fn preview_seo(
    State(state): State<AppState>,
    Query(query): Query<PagePathQuery>,
) -> Result<ResponseJson<ApiResponse<SeoPreview>>, ApiError> {
    let preview = SeoService::new(state.db().pool.clone())
        .preview(&query.path, &state.config().site_url)
        .await?;
    Ok(ResponseJson(ApiResponse::success(preview)))
}

/// POST /api/seo/preview
/// Preview unsaved edits
pub async fn preview_draft(
    State(state): State<AppState>,
    Json(payload): Json<SeoData>,
) -> ResponseJson<ApiResponse<SeoPreview>> {
    let preview = SeoService::new(state.db().pool.clone())
        .preview_data(&payload, &state.config().site_url);
    ResponseJson(ApiResponse::success(preview))
}

pub fn router(_state: &AppState) -> Router<AppState> {
    Router::new().nest(
        "/seo",
        Router::new()
            .route("/", get(list_seo).put(save_seo))
            .route("/page", get(get_seo).delete(delete_seo))
            .route("/validate", post(validate_seo))
            .route("/preview", get(preview_seo).post(preview_draft)),
    )
}
