use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::json;

use crate::error::Error;

/// Standard API response wrapper
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    #[must_use]
    pub fn success(data: T) -> Self {
        Self {
            data: Some(data),
            error: None,
        }
    }
}

/// API error that converts to a proper HTTP response
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    #[must_use]
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    #[must_use]
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }

    #[must_use]
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, message)
    }

    #[must_use]
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    #[must_use]
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(StatusCode::CONFLICT, message)
    }

    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }
}

impl From<Error> for ApiError {
    fn from(e: Error) -> Self {
        match e {
            Error::DuplicateUsername(_) => Self::conflict("Username already exists"),
            Error::AuthenticationFailed => Self::unauthorized("Invalid credentials"),
            Error::Unauthorized => Self::unauthorized("Authentication required"),
            Error::Forbidden => Self::forbidden("Not permitted for your role"),
            Error::NotFound => Self::not_found("Document not found"),
            Error::BadRequest(message) => Self::bad_request(message),
            Error::Io(e) => {
                tracing::error!("Storage failure: {e}");
                Self::internal("Storage error")
            }
            Error::Database(e) => {
                tracing::error!("Database failure: {e}");
                Self::internal("Database error")
            }
            Error::PasswordHash(message) => {
                tracing::error!("Password hashing failure: {message}");
                Self::internal("Internal server error")
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = json!({ "data": null, "error": self.message });
        (self.status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_mapping() {
        let cases = [
            (Error::DuplicateUsername("a".into()), StatusCode::CONFLICT),
            (Error::AuthenticationFailed, StatusCode::UNAUTHORIZED),
            (Error::Unauthorized, StatusCode::UNAUTHORIZED),
            (Error::Forbidden, StatusCode::FORBIDDEN),
            (Error::NotFound, StatusCode::NOT_FOUND),
            (
                Error::PasswordHash("bad salt".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (Error::BadRequest("x".into()), StatusCode::BAD_REQUEST),
            (
                Error::Io(std::io::Error::other("disk full")),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (error, status) in cases {
            assert_eq!(ApiError::from(error).status, status);
        }
    }

    #[test]
    fn test_internal_errors_hide_details() {
        let err = ApiError::from(Error::Io(std::io::Error::other("/secret/path")));
        assert_eq!(err.message, "Storage error");
    }
}
