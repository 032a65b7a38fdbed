//! Error types for the Coolify client

use std::fmt;

use openapi_client::models::ErrorResponse;
use thiserror::Error;

/// Fallback shown when the server gives no message
pub const GENERIC_ERROR_MESSAGE: &str = "Something went wrong";

/// Main error type for the Coolify client
#[derive(Error, Debug)]
pub enum CoolifyError {
    /// Server address or token missing before a request is attempted
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server answered, and the answer is a failure
    #[error("{0}")]
    Domain(ApiError),

    /// Input rejected client-side, before any network call
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid server: {0}")]
    InvalidServer(String),

    #[error("Invalid token")]
    InvalidToken,

    #[error("API is disabled on this instance")]
    ApiDisabled,

    #[error("API error: {0}")]
    Api(String),

    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoolifyError {
    /// Message suitable for a transient user notification
    pub fn user_message(&self) -> String {
        match self {
            CoolifyError::Domain(e) => e.display_message().to_string(),
            CoolifyError::Transport(_) => GENERIC_ERROR_MESSAGE.to_string(),
            other => other.to_string(),
        }
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, CoolifyError::Transport(_))
    }
}

impl From<anyhow::Error> for CoolifyError {
    fn from(err: anyhow::Error) -> Self {
        CoolifyError::Internal(err.to_string())
    }
}

impl From<ApiError> for CoolifyError {
    fn from(err: ApiError) -> Self {
        CoolifyError::Domain(err)
    }
}

/// A structured failure reported by the server
///
/// Built from the JSON body of a 4xx/5xx response, or from an error body
/// embedded in a success response.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiError {
    /// HTTP status, when the failure came with one
    pub status: Option<u16>,
    pub message: Option<String>,
    /// Field validation errors, keyed by field name
    pub errors: serde_json::Map<String, serde_json::Value>,
    /// The body as received
    pub body: serde_json::Value,
}

impl ApiError {
    /// Parse an error body; non-JSON bodies become the message
    pub fn from_body(status: Option<u16>, raw: &str) -> Self {
        match serde_json::from_str::<serde_json::Value>(raw) {
            Ok(body) => {
                let parsed: ErrorResponse =
                    serde_json::from_value(body.clone()).unwrap_or_default();
                Self::from_parts(status, parsed, body)
            }
            Err(_) => Self {
                status,
                message: (!raw.trim().is_empty()).then(|| raw.trim().to_string()),
                errors: serde_json::Map::new(),
                body: serde_json::Value::String(raw.to_string()),
            },
        }
    }

    pub fn from_response(status: Option<u16>, response: ErrorResponse) -> Self {
        let body = serde_json::to_value(&response).unwrap_or_default();
        Self::from_parts(status, response, body)
    }

    fn from_parts(status: Option<u16>, response: ErrorResponse, body: serde_json::Value) -> Self {
        Self {
            status,
            message: response.message,
            errors: response.errors.unwrap_or_default(),
            body,
        }
    }

    /// `message`, or a generic fallback
    pub fn display_message(&self) -> &str {
        self.message.as_deref().unwrap_or(GENERIC_ERROR_MESSAGE)
    }

    /// First validation message reported for `field`
    pub fn field_error(&self, field: &str) -> Option<String> {
        match self.errors.get(field)? {
            serde_json::Value::Array(items) => items.first().map(|v| match v {
                serde_json::Value::String(s) => s.clone(),
                other => other.to_string(),
            }),
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status {
            Some(status) => write!(f, "{} ({})", self.display_message(), status),
            None => f.write_str(self.display_message()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_from_json_body() {
        let err = ApiError::from_body(
            Some(422),
            r#"{"message":"Validation failed.","errors":{"name":["The name field is required."]}}"#,
        );
        assert_eq!(err.message.as_deref(), Some("Validation failed."));
        assert_eq!(
            err.field_error("name").as_deref(),
            Some("The name field is required.")
        );
        assert_eq!(err.to_string(), "Validation failed. (422)");
    }

    #[test]
    fn test_api_error_from_text_body() {
        let err = ApiError::from_body(Some(502), "Bad Gateway");
        assert_eq!(err.display_message(), "Bad Gateway");

        let err = ApiError::from_body(Some(500), "");
        assert_eq!(err.display_message(), GENERIC_ERROR_MESSAGE);
    }
}
