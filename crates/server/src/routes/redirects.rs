//! Routes for URL redirects.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    response::Json as ResponseJson,
    routing::{get, put},
};
use db::models::redirect::{CreateRedirect, Redirect};
use serde::Deserialize;
use services::services::redirects::{RedirectService, ResolvedRedirect};
use utils::response::ApiResponse;
use uuid::Uuid;

use crate::{AppState, error::ApiError};

#[derive(Debug, Deserialize)]
pub struct ResolveQuery {
    pub path: String,
}

pub async fn list_redirects(
    State(state): State<AppState>,
) -> Result<ResponseJson<ApiResponse<Vec<Redirect>>>, ApiError> {
    let redirects = RedirectService::new(state.db().pool.clone()).list().await?;
    Ok(ResponseJson(ApiResponse::success(redirects)))
}

pub async fn create_redirect(
    State(state): State<AppState>,
    Json(payload): Json<CreateRedirect>,
) -> Result<ResponseJson<ApiResponse<Redirect>>, ApiError> {
    let redirect = RedirectService::new(state.db().pool.clone())
        .create(payload)
        .await?;
    Ok(ResponseJson(ApiResponse::success(redirect)))
}

pub async fn update_redirect(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<CreateRedirect>,
) -> Result<ResponseJson<ApiResponse<Redirect>>, ApiError> {
    let redirect = RedirectService::new(state.db().pool.clone())
        .update(id, payload)
        .await?;
    Ok(ResponseJson(ApiResponse::success(redirect)))
}

pub async fn delete_redirect(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<ResponseJson<ApiResponse<()>>, ApiError> {
    RedirectService::new(state.db().pool.clone())
        .delete(id)
        .await?;
    Ok(ResponseJson(ApiResponse::success(())))
}

/// GET /api/redirects/resolve?path=/old-page
pub async fn resolve_redirect(
    State(state): State<AppState>,
    Query(query): Query<ResolveQuery>,
) -> Result<ResponseJson<ApiResponse<Option<ResolvedRedirect>>>, ApiError> {
    let resolved = RedirectService::new(state.db().pool.clone())
        .resolve(query.path.trim())
        .await?;
    Ok(ResponseJson(ApiResponse::success(resolved)))
}

pub fn router(_state: &AppState) -> Router<AppState> {
    Router::new().nest(
        "/redirects",
        Router::new()
            .route("/", get(list_redirects).post(create_redirect))
            .route("/resolve", get(resolve_redirect))
            .route("/{id}", put(update_redirect).delete(delete_redirect)),
    )
}
