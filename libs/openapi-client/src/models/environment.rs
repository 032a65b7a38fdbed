//! Environment variable models

use serde::{Deserialize, Serialize};

use super::Extra;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentVariable {
    pub uuid: String,
    pub key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(default, deserialize_with = "super::de::loose_bool")]
    pub is_preview: Option<bool>,
    #[serde(default, deserialize_with = "super::de::loose_bool")]
    pub is_literal: Option<bool>,
    #[serde(default, deserialize_with = "super::de::loose_bool")]
    pub is_multiline: Option<bool>,
    #[serde(flatten)]
    pub extra: Extra,
}

/// `POST /applications/{uuid}/envs`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateEnvironmentVariable {
    pub key: String,
    pub value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_preview: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_literal: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_multiline: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_shown_once: Option<bool>,
}
