use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;

use crate::domain::params::ValidationError;

/// Transport-level failures: authentication and protocol negotiation.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("bad request: {message}")]
    BadRequest {
        code: &'static str,
        message: &'static str,
    },
    #[error("unauthorized: {message}")]
    Unauthorized {
        code: &'static str,
        message: &'static str,
    },
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
    pub details: serde_json::Value,
}

impl AppError {
    pub fn bad_request(code: &'static str, message: &'static str) -> Self {
        Self::BadRequest { code, message }
    }

    pub fn unauthorized(code: &'static str, message: &'static str) -> Self {
        Self::Unauthorized { code, message }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::BadRequest { code, .. } | Self::Unauthorized { code, .. } => code,
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            Self::BadRequest { message, .. } | Self::Unauthorized { message, .. } => message,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            Self::BadRequest { code, message } => (StatusCode::BAD_REQUEST, code, message),
            Self::Unauthorized { code, message } => (StatusCode::UNAUTHORIZED, code, message),
        };

        (
            status,
            Json(ErrorResponse {
                code: code.to_string(),
                message: message.to_string(),
                details: json!({}),
            }),
        )
            .into_response()
    }
}

/// Failure of a single tool invocation. The `Display` output is the exact
/// text handed back to the tool host.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ToolError {
    #[error("Invalid parameters: {0}")]
    InvalidParameters(#[from] ValidationError),
    /// The upstream service answered with an error. Only the message is
    /// shown to callers; the code is kept for logs.
    #[error("AWS Error: {message}")]
    Upstream { code: String, message: String },
    #[error("Error: {0}")]
    Unclassified(String),
}

impl ToolError {
    pub fn upstream(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Upstream {
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn unclassified(message: impl Into<String>) -> Self {
        Self::Unclassified(message.into())
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidParameters(_) => "invalid_parameters",
            Self::Upstream { .. } => "upstream",
            Self::Unclassified(_) => "unclassified",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ToolError;
    use crate::domain::params::ValidationError;

    #[test]
    fn invalid_parameters_are_prefixed() {
        let error = ToolError::from(ValidationError::single("hours_back", "must be ≤ 168 (got 200)"));
        assert_eq!(
            error.to_string(),
            "Invalid parameters: hours_back: must be ≤ 168 (got 200)"
        );
    }

    #[test]
    fn upstream_error_hides_code() {
        let error = ToolError::upstream("ThrottlingException", "Rate exceeded");
        assert_eq!(error.to_string(), "AWS Error: Rate exceeded");
        assert!(!error.to_string().contains("ThrottlingException"));
    }

    #[test]
    fn unclassified_error_is_prefixed() {
        let error = ToolError::unclassified("Unexpected error");
        assert_eq!(error.to_string(), "Error: Unexpected error");
        assert_eq!(error.kind(), "unclassified");
    }
}
