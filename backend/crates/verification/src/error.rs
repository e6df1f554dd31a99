//! Verification Error Types

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

/// Verification-specific result type alias
pub type VerificationResult<T> = Result<T, VerificationError>;

/// Verification-specific error variants
#[derive(Debug, Error)]
pub enum VerificationError {
    /// Application not found
    #[error("Application not found")]
    ApplicationNotFound,

    /// An application for this user is already awaiting review
    #[error("An application is already pending review")]
    AlreadyPending,

    /// The user's identity is already approved
    #[error("Identity is already verified")]
    AlreadyApproved,

    /// Decision attempted on an application that is not pending
    #[error("Application is not pending review")]
    NotPending,

    /// Reopen attempted on an application that is still pending
    #[error("Application is still pending review")]
    StillPending,

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl VerificationError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            VerificationError::ApplicationNotFound => StatusCode::NOT_FOUND,
            VerificationError::AlreadyPending
            | VerificationError::AlreadyApproved
            | VerificationError::NotPending
            | VerificationError::StillPending => StatusCode::CONFLICT,
            VerificationError::Database(_) | VerificationError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            VerificationError::ApplicationNotFound => ErrorKind::NotFound,
            VerificationError::AlreadyPending
            | VerificationError::AlreadyApproved
            | VerificationError::NotPending
            | VerificationError::StillPending => ErrorKind::Conflict,
            VerificationError::Database(_) | VerificationError::Internal(_) => {
                ErrorKind::InternalServerError
            }
        }
    }

    /// Convert to AppError
    pub fn to_app_error(&self) -> AppError {
        AppError::new(self.kind(), self.to_string())
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            VerificationError::Database(e) => {
                tracing::error!(error = %e, "Verification database error");
            }
            VerificationError::Internal(msg) => {
                tracing::error!(message = %msg, "Verification internal error");
            }
            _ => {
                tracing::debug!(error = %self, "Verification error");
            }
        }
    }
}

impl IntoResponse for VerificationError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}
