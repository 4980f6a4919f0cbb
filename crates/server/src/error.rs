use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::Value;
use services::services::{
    database_validator::DatabaseValidationError, redirects::RedirectError,
    robots_store::RobotsStoreError, seo::SeoServiceError,
};
use thiserror::Error;
use utils::response::ApiResponse;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Seo(#[from] SeoServiceError),
    #[error(transparent)]
    Redirect(#[from] RedirectError),
    #[error(transparent)]
    Robots(#[from] RobotsStoreError),
    #[error(transparent)]
    DatabaseValidation(#[from] DatabaseValidationError),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Seo(SeoServiceError::MissingPagePath) => StatusCode::BAD_REQUEST,
            ApiError::Seo(SeoServiceError::NotFound(_)) | ApiError::Redirect(RedirectError::NotFound) => {
                StatusCode::NOT_FOUND
            }
            ApiError::Seo(SeoServiceError::Invalid(_))
            | ApiError::Redirect(RedirectError::Invalid(_))
            | ApiError::Robots(RobotsStoreError::Invalid(_)) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Seo(SeoServiceError::Database(_))
            | ApiError::Redirect(RedirectError::Database(_))
            | ApiError::Robots(RobotsStoreError::Database(_))
            | ApiError::DatabaseValidation(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Structured details the admin UI renders next to the form.
    fn details(&self) -> Option<Value> {
        match self {
            ApiError::Seo(SeoServiceError::Invalid(report)) => serde_json::to_value(report).ok(),
            ApiError::Redirect(RedirectError::Invalid(errors)) => serde_json::to_value(errors).ok(),
            ApiError::Robots(RobotsStoreError::Invalid(validation)) => {
                serde_json::to_value(validation).ok()
            }
            _ => None,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        }

        let message = match status {
            StatusCode::INTERNAL_SERVER_ERROR => "Internal server error".to_string(),
            _ => self.to_string(),
        };
        let body = match self.details() {
            Some(details) => ApiResponse::<(), Value>::error_with_data(details, &message),
            None => ApiResponse::<(), Value>::error(&message),
        };
        (status, Json(body)).into_response()
    }
}
