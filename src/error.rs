//! Domain error types for the exam PDF resolver.
//!
//! Uses thiserror for ergonomic error handling with automatic Display implementations.
//! User-facing error strings stay in Korean, matching the audience of the endpoint.

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Required query parameters, as reported in 400 responses.
pub const REQUIRED_PARAMS: &str = "year, month, grade, subject";

/// Optional query parameters, as reported in 400 responses.
pub const OPTIONAL_PARAMS: &str = "type (문제 또는 해설, 기본값: 문제)";

/// Usage example, as reported in 400 responses.
pub const USAGE_EXAMPLE: &str = "/api/download?year=2023&month=3&grade=3&subject=국어&type=문제";

/// Application-level errors.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// One of the required query parameters is absent or empty
    #[error("필수 파라미터 누락")]
    MissingParameters,

    /// No candidate filename resolved to a file
    #[error("파일을 찾을 수 없음")]
    NotFound {
        /// Attempted filenames, when the strategy tracks them
        tried: Option<Vec<String>>,
        message: Option<String>,
    },

    /// Transport-level failure talking to the storage host
    #[error("Upstream error: {0}")]
    Upstream(String),

    /// Anything else that should never reach a caller in detail
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::MissingParameters => StatusCode::BAD_REQUEST,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Upstream(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        match self {
            AppError::MissingParameters => {
                HttpResponse::build(status).json(MissingParametersResponse {
                    error: self.to_string(),
                    required: REQUIRED_PARAMS.to_string(),
                    optional: OPTIONAL_PARAMS.to_string(),
                    example: USAGE_EXAMPLE.to_string(),
                })
            }
            AppError::NotFound { tried, message } => {
                HttpResponse::build(status).json(NotFoundResponse {
                    error: self.to_string(),
                    tried: tried.clone(),
                    message: message.clone(),
                })
            }
            AppError::Upstream(err_str) | AppError::Internal(err_str) => {
                tracing::error!("Request failed: {}", err_str);
                HttpResponse::build(status).json(ErrorResponse {
                    error: "서버 오류".to_string(),
                    message: err_str.clone(),
                })
            }
        }
    }
}

/// Generic error body (`500`).
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

/// Body of a `400` for a request missing required parameters.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MissingParametersResponse {
    pub error: String,
    pub required: String,
    pub optional: String,
    pub example: String,
}

/// Body of a `404` when no candidate matched.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct NotFoundResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tried: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Convenience type alias for Results with AppError.
pub type AppResult<T> = Result<T, AppError>;

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::Upstream(err.to_string())
    }
}
