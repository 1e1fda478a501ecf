//! Error types for the Chirp client core

use thiserror::Error;

use crate::models::FieldError;

/// Application-wide error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The token is missing, invalid, or expired.
    #[error("unauthorized")]
    Unauthorized,

    /// The entity is absent; views render this as an empty state.
    #[error("not found: {0}")]
    NotFound(String),

    /// Server-side validation failed; every field message is carried.
    #[error("validation failed: {}", format_field_errors(.0))]
    Validation(Vec<FieldError>),

    /// Any other HTTP failure.
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Not authenticated")]
    NotAuthenticated,

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type alias for client operations
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    /// Human-readable message for display near a form or in a toast.
    ///
    /// Prefers what the server said; falls back to the given static string
    /// when the error carries no message of its own.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            AppError::Validation(errors) if !errors.is_empty() => format_field_errors(errors),
            AppError::Api { message, .. } if !message.is_empty() => message.clone(),
            AppError::NotFound(message) if !message.is_empty() => message.clone(),
            AppError::Unauthorized => "Unauthorized".to_string(),
            _ => fallback.to_string(),
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, AppError::Unauthorized)
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, AppError::NotFound(_))
    }
}

fn format_field_errors(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| format!("{}: {}", e.field, e.message))
        .collect::<Vec<_>>()
        .join("; ")
}
