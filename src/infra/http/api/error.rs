use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use metrics::counter;

use postboard_api_types::ApiErrorBody;

use crate::application::error::ErrorReport;
use crate::application::posts::PostServiceError;

/// Failure answered as `{"error": message}`.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
    source: &'static str,
}

impl ApiError {
    pub fn new(source: &'static str, status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            source,
        }
    }

    pub fn bad_request(source: &'static str, message: impl Into<String>) -> Self {
        Self::new(source, StatusCode::BAD_REQUEST, message)
    }

    pub fn not_found(source: &'static str, message: impl Into<String>) -> Self {
        Self::new(source, StatusCode::NOT_FOUND, message)
    }

    pub fn from_service(source: &'static str, err: PostServiceError) -> Self {
        match err {
            PostServiceError::MissingFields => Self::bad_request(source, err.to_string()),
            PostServiceError::NotFound { .. } => Self::not_found(source, err.to_string()),
            PostServiceError::Repo(inner) => {
                Self::new(source, StatusCode::INTERNAL_SERVER_ERROR, inner.to_string())
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        counter!("postboard_api_errors_total", "status" => self.status.as_str().to_string())
            .increment(1);
        let report = ErrorReport::from_message(self.source, self.status, self.message.clone());
        let body = ApiErrorBody {
            error: self.message,
        };
        let mut response = (self.status, Json(body)).into_response();
        report.attach(&mut response);
        response
    }
}
