//! Client error types

use shared::error::{AppError, ErrorCode};
use thiserror::Error;

/// Client error type
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Invalid response format
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Authentication required
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Permission denied
    #[error("Permission denied: {0}")]
    Forbidden(String),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Structured API error returned by the backend
    #[error("API error {code}: {message}")]
    Api {
        code: ErrorCode,
        message: String,
        details: Option<serde_json::Value>,
    },

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ClientError {
    /// Error code equivalent of this client error
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Http(e) if e.is_timeout() => ErrorCode::TimeoutError,
            Self::Http(_) => ErrorCode::NetworkError,
            Self::InvalidResponse(_) | Self::Serialization(_) => ErrorCode::InvalidFormat,
            Self::Unauthorized(_) => ErrorCode::NotAuthenticated,
            Self::Forbidden(_) => ErrorCode::PermissionDenied,
            Self::NotFound(_) => ErrorCode::NotFound,
            Self::Validation(_) => ErrorCode::ValidationFailed,
            Self::Api { code, .. } => *code,
            Self::Internal(_) => ErrorCode::InternalError,
        }
    }

    /// Human-readable message for the operator (never a raw transport error)
    pub fn user_message(&self) -> String {
        match self {
            Self::Http(e) if e.is_timeout() => ErrorCode::TimeoutError.message().to_string(),
            Self::Http(e) if e.is_connect() => {
                "No se pudo conectar con el servidor".to_string()
            }
            Self::Http(_) => ErrorCode::NetworkError.message().to_string(),
            Self::Unauthorized(_) => "Su sesión expiró, inicie sesión de nuevo".to_string(),
            Self::Forbidden(_) => ErrorCode::PermissionDenied.message().to_string(),
            Self::NotFound(msg) | Self::Validation(msg) if !msg.trim().is_empty() => msg.clone(),
            Self::NotFound(_) => ErrorCode::NotFound.message().to_string(),
            Self::Validation(_) => ErrorCode::ValidationFailed.message().to_string(),
            Self::Api { code, message, .. } => {
                if message.trim().is_empty() {
                    code.message().to_string()
                } else {
                    message.clone()
                }
            }
            Self::InvalidResponse(_) | Self::Serialization(_) | Self::Internal(_) => {
                "Ocurrió un error inesperado en el servidor".to_string()
            }
        }
    }
}

impl From<ClientError> for AppError {
    fn from(err: ClientError) -> Self {
        let code = err.code();
        let message = err.user_message();
        tracing::debug!(error = %err, code = %code, "Client error converted");
        let app = AppError::with_message(code, message);
        match err {
            ClientError::Api {
                details: Some(details),
                ..
            } => app.with_detail("api", details),
            _ => app,
        }
    }
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;
