//! Response envelopes shared across endpoints

use serde::{Deserialize, Serialize};

use super::Extra;

/// Response of start/stop/restart actions
///
/// Carries a human readable `message` on success, so the presence of a message
/// alone does not indicate failure here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActionResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deployment_uuid: Option<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

/// Response of create endpoints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatedResource {
    pub uuid: String,
    #[serde(flatten)]
    pub extra: Extra,
}

/// Error body returned with a 4xx/5xx, or embedded in a 200 on some endpoints
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub errors: Option<serde_json::Map<String, serde_json::Value>>,
    #[serde(default)]
    pub success: Option<bool>,
}

/// A body that is either the expected success shape or an error message.
///
/// Variants are tried in order, so the success shape must have at least one
/// required field that an error body lacks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Outcome<T> {
    Success(T),
    Failure(ErrorResponse),
}
