//! Unified error handling for contactd.
//!
//! Every failure a route can produce maps to a status code and a plain-text
//! body. Store failures are logged here, at the point they become responses.

use crate::db::DbError;
use crate::validation::ValidationErrors;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

pub const SAVE_FAILED_MESSAGE: &str = "Erro ao salvar contato";
pub const LIST_FAILED_MESSAGE: &str = "Erro ao buscar contatos";

// ============================================================================
// Route Errors
// ============================================================================

/// Errors that can occur while handling a request.
#[derive(Debug, Error)]
pub enum AppError {
    /// Submitted contact failed the schema.
    #[error("{0}")]
    Validation(#[from] ValidationErrors),

    /// Body could not be decoded under its declared content type.
    #[error("{0}")]
    Payload(String),

    #[error("failed to save contact: {0}")]
    Save(#[source] DbError),

    #[error("failed to list contacts: {0}")]
    List(#[source] DbError),
}

impl AppError {
    /// Get a static error code string for log labeling.
    #[inline]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation",
            Self::Payload(_) => "payload",
            Self::Save(_) => "save_failed",
            Self::List(_) => "list_failed",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::Payload(_) => StatusCode::BAD_REQUEST,
            Self::Save(_) | Self::List(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Client-visible body. Store details never leave the server.
    pub fn body(&self) -> String {
        match self {
            Self::Validation(errors) => errors.to_string(),
            Self::Payload(message) => message.clone(),
            Self::Save(_) => SAVE_FAILED_MESSAGE.to_string(),
            Self::List(_) => LIST_FAILED_MESSAGE.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(code = self.error_code(), error = %self, "Request failed");
        } else {
            tracing::debug!(code = self.error_code(), error = %self, "Request rejected");
        }
        (status, self.body()).into_response()
    }
}

/// Result type for route handlers.
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        let err = AppError::Payload("bad".into());
        assert_eq!(err.error_code(), "payload");
        let err = AppError::List(DbError::Integrity("corrupt".into()));
        assert_eq!(err.error_code(), "list_failed");
    }

    #[test]
    fn test_validation_joins_messages() {
        let err = AppError::from(ValidationErrors(vec!["a".into(), "b".into()]));
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.body(), "a; b");
    }

    #[test]
    fn test_store_errors_hide_details() {
        let err = AppError::Save(DbError::Integrity("page 3 corrupt".into()));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.body(), SAVE_FAILED_MESSAGE);
        assert!(err.to_string().contains("page 3 corrupt"));

        let err = AppError::List(DbError::Integrity("page 3 corrupt".into()));
        assert_eq!(err.body(), LIST_FAILED_MESSAGE);
    }

    #[test]
    fn test_into_response_status() {
        let response = AppError::Payload("bad".into()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = AppError::List(DbError::Integrity("x".into())).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
