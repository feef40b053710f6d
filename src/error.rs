//! Error types for the Cardex server

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Application error codes carried in every error response body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum ErrorCode {
    Success = 0,
    Failure = 1,
    DbFailure = 2,
    NoSuchBook = 3,
    NoSuchMember = 4,
    NoSuchBorrowing = 5,
    BookUnavailable = 6,
    AlreadyReturned = 7,
    DuplicateEmail = 8,
    MemberHasOpenBorrowings = 9,
    BadValue = 10,
}

/// Why the lending ledger refused a borrow or return.
///
/// A rejection is a normal business outcome, not a transport failure: the
/// store is left untouched and the caller gets a 400 with this tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum RejectReason {
    NotFound,
    Unavailable,
    AlreadyReturned,
}

impl RejectReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            RejectReason::NotFound => "not_found",
            RejectReason::Unavailable => "unavailable",
            RejectReason::AlreadyReturned => "already_returned",
        }
    }

    fn error_code(&self) -> ErrorCode {
        match self {
            RejectReason::NotFound => ErrorCode::NoSuchBorrowing,
            RejectReason::Unavailable => ErrorCode::BookUnavailable,
            RejectReason::AlreadyReturned => ErrorCode::AlreadyReturned,
        }
    }
}

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("Rejected: {}", .0.as_str())]
    Rejected(RejectReason),
}

/// Error response body
#[derive(Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub code: u32,
    pub error: String,
    pub message: String,
    /// Ledger reject tag, present only on borrow/return rejections
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<RejectReason>,
}

impl AppError {
    fn status_and_code(&self) -> (StatusCode, ErrorCode) {
        match self {
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, ErrorCode::NoSuchBook),
            AppError::Validation(_) => (StatusCode::BAD_REQUEST, ErrorCode::BadValue),
            AppError::Database(_) => (StatusCode::INTERNAL_SERVER_ERROR, ErrorCode::DbFailure),
            AppError::Conflict(_) => (StatusCode::CONFLICT, ErrorCode::DuplicateEmail),
            AppError::BadRequest(_) => (StatusCode::BAD_REQUEST, ErrorCode::BadValue),
            AppError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, ErrorCode::Failure),
            AppError::Rejected(reason) => (StatusCode::BAD_REQUEST, reason.error_code()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        let (message, reason) = match &self {
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                ("Database error".to_string(), None)
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                ("Internal server error".to_string(), None)
            }
            AppError::Rejected(reason) => (self.to_string(), Some(*reason)),
            other => (other.to_string(), None),
        };

        let body = Json(ErrorResponse {
            code: code as u32,
            error: format!("{:?}", code),
            message,
            reason,
        });

        (status, body).into_response()
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reject_reason_serializes_as_snake_case() {
        assert_eq!(
            serde_json::to_string(&RejectReason::AlreadyReturned).unwrap(),
            "\"already_returned\""
        );
        assert_eq!(RejectReason::Unavailable.as_str(), "unavailable");
    }

    #[test]
    fn rejections_map_to_bad_request() {
        for reason in [
            RejectReason::NotFound,
            RejectReason::Unavailable,
            RejectReason::AlreadyReturned,
        ] {
            let (status, _) = AppError::Rejected(reason).status_and_code();
            assert_eq!(status, StatusCode::BAD_REQUEST);
        }
    }

    #[test]
    fn conflict_maps_to_409() {
        let (status, code) = AppError::Conflict("email taken".into()).status_and_code();
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(code, ErrorCode::DuplicateEmail);
    }
}
