//! Client-facing error envelope: `{"error": {"message", "type", "param"?, "code"?}}`

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApiErrorType {
    InvalidRequestError,
    NotFoundError,
    PayloadTooLargeError,
    ServerError,
}

impl ApiErrorType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::InvalidRequestError => "invalid_request_error",
            Self::NotFoundError => "not_found_error",
            Self::PayloadTooLargeError => "payload_too_large_error",
            Self::ServerError => "server_error",
        }
    }

    /// Status used unless a caller overrides it
    pub fn default_status(self) -> StatusCode {
        match self {
            Self::InvalidRequestError => StatusCode::BAD_REQUEST,
            Self::NotFoundError => StatusCode::NOT_FOUND,
            Self::PayloadTooLargeError => StatusCode::PAYLOAD_TOO_LARGE,
            Self::ServerError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    pub error: ApiErrorDetail,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorDetail {
    pub message: String,
    #[serde(rename = "type")]
    pub error_type: ApiErrorType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub param: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

#[derive(Debug, thiserror::Error)]
#[error("{}: {}", .response.error.error_type.as_str(), .response.error.message)]
pub struct ApiError {
    pub status: StatusCode,
    pub response: ApiErrorResponse,
}

impl ApiError {
    pub fn of(error_type: ApiErrorType, message: impl Into<String>) -> Self {
        Self {
            status: error_type.default_status(),
            response: ApiErrorResponse {
                error: ApiErrorDetail {
                    message: message.into(),
                    error_type,
                    param: None,
                    code: None,
                },
            },
        }
    }

    /// Keep the category but answer with a different status (415, 422 ...)
    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }

    /// Name the request field at fault
    pub fn with_param(mut self, param: impl Into<String>) -> Self {
        self.response.error.param = Some(param.into());
        self
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.response.error.code = Some(code.into());
        self
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::of(ApiErrorType::InvalidRequestError, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::of(ApiErrorType::NotFoundError, message)
    }

    pub fn payload_too_large(message: impl Into<String>) -> Self {
        Self::of(ApiErrorType::PayloadTooLargeError, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::of(ApiErrorType::ServerError, message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            tracing::error!(message = %self.response.error.message, "Request failed");
        }
        (self.status, Json(self.response)).into_response()
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        match &err {
            DomainError::UnsupportedDataset { .. } => Self::bad_request(err.to_string())
                .with_param("dataset")
                .with_code("unsupported_dataset"),
            DomainError::Validation { .. } => Self::bad_request(err.to_string()),
            DomainError::Internal { .. } => Self::internal(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_sets_status() {
        assert_eq!(ApiError::bad_request("x").status, StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::not_found("x").status, StatusCode::NOT_FOUND);
        assert_eq!(
            ApiError::payload_too_large("x").status,
            StatusCode::PAYLOAD_TOO_LARGE
        );
        assert_eq!(
            ApiError::internal("x").status,
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_status_override_keeps_type() {
        let err = ApiError::bad_request("Missing Content-Type")
            .with_status(StatusCode::UNSUPPORTED_MEDIA_TYPE);

        assert_eq!(err.status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
        assert_eq!(err.response.error.error_type, ApiErrorType::InvalidRequestError);
    }

    #[test]
    fn test_unsupported_dataset_names_the_field() {
        let err: ApiError = DomainError::unsupported_dataset("colon").into();

        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.response.error.param.as_deref(), Some("dataset"));
        assert_eq!(err.response.error.code.as_deref(), Some("unsupported_dataset"));
        assert_eq!(err.response.error.message, "Dataset colon not supported");
    }

    #[test]
    fn test_internal_maps_to_500() {
        let err: ApiError = DomainError::internal("worker panicked").into();
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.to_string(), "server_error: worker panicked");
    }

    #[test]
    fn test_envelope_omits_empty_fields() {
        let err = ApiError::payload_too_large("File too large. Maximum size is 1GB");
        let json = serde_json::to_value(&err.response).unwrap();

        assert_eq!(json["error"]["type"], "payload_too_large_error");
        assert!(json["error"].get("param").is_none());
        assert!(json["error"].get("code").is_none());
    }
}
