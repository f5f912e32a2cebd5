//! JSON error envelope of the admin API

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::domain::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApiErrorType {
    InvalidRequestError,
    NotFoundError,
    ServerError,
}

impl std::fmt::Display for ApiErrorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidRequestError => write!(f, "invalid_request_error"),
            Self::NotFoundError => write!(f, "not_found_error"),
            Self::ServerError => write!(f, "server_error"),
        }
    }
}

/// `{ "error": { ... } }`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    pub error: ApiErrorDetail,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorDetail {
    pub message: String,
    #[serde(rename = "type")]
    pub error_type: ApiErrorType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub param: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

/// API error with status code
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub response: ApiErrorResponse,
}

impl ApiError {
    pub fn new(status: StatusCode, error_type: ApiErrorType, message: impl Into<String>) -> Self {
        Self {
            status,
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

    pub fn with_param(mut self, param: impl Into<String>) -> Self {
        self.response.error.param = Some(param.into());
        self
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.response.error.code = Some(code.into());
        self
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, ApiErrorType::InvalidRequestError, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, ApiErrorType::NotFoundError, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, ApiErrorType::ServerError, message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.response)).into_response()
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::NotFound { message } => Self::not_found(message),
            DomainError::InvalidInput { message } => Self::bad_request(message),
            DomainError::InvalidId { message } => Self::bad_request(message).with_param("id"),
            DomainError::Configuration { message } | DomainError::Storage { message } => {
                error!(error = %message, "Request failed");
                Self::internal(message)
            }
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: {}",
            self.response.error.error_type, self.response.error.message
        )
    }
}

impl std::error::Error for ApiError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_with_param_and_code() {
        let err = ApiError::bad_request("Unknown window")
            .with_param("window")
            .with_code("invalid_window");

        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.response.error.param, Some("window".to_string()));
        assert_eq!(err.response.error.code, Some("invalid_window".to_string()));
    }

    #[test]
    fn test_domain_error_conversion() {
        let cases = [
            (DomainError::not_found("gone"), StatusCode::NOT_FOUND, ApiErrorType::NotFoundError),
            (
                DomainError::invalid_input("blank"),
                StatusCode::BAD_REQUEST,
                ApiErrorType::InvalidRequestError,
            ),
            (
                DomainError::invalid_id("bad id"),
                StatusCode::BAD_REQUEST,
                ApiErrorType::InvalidRequestError,
            ),
            (
                DomainError::storage("disk full"),
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiErrorType::ServerError,
            ),
            (
                DomainError::configuration("bad backend"),
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiErrorType::ServerError,
            ),
        ];

        for (domain_err, status, error_type) in cases {
            let api_err: ApiError = domain_err.into();
            assert_eq!(api_err.status, status);
            assert_eq!(api_err.response.error.error_type, error_type);
        }
    }

    #[test]
    fn test_error_serialization() {
        let err = ApiError::not_found("Pattern 'pattern-x' not found");
        let json = serde_json::to_value(&err.response).unwrap();

        assert_eq!(json["error"]["type"], "not_found_error");
        assert_eq!(json["error"]["message"], "Pattern 'pattern-x' not found");
        assert!(json["error"].get("code").is_none());
    }
}
