//! Server and private key models

use serde::{Deserialize, Serialize};

use super::Extra;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Server {
    pub uuid: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    #[serde(
        default,
        deserialize_with = "super::de::loose_bool",
        skip_serializing_if = "Option::is_none"
    )]
    pub is_reachable: Option<bool>,
    #[serde(
        default,
        deserialize_with = "super::de::loose_bool",
        skip_serializing_if = "Option::is_none"
    )]
    pub is_usable: Option<bool>,
    #[serde(flatten)]
    pub extra: Extra,
}

/// An entry of `GET /servers/{uuid}/resources`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerResource {
    pub uuid: String,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

/// An SSH key registered under `/security/keys`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrivateKey {
    pub uuid: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fingerprint: Option<String>,
    #[serde(
        default,
        deserialize_with = "super::de::loose_bool",
        skip_serializing_if = "Option::is_none"
    )]
    pub is_git_related: Option<bool>,
    #[serde(flatten)]
    pub extra: Extra,
}
