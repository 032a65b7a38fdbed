//! Application models

use serde::{Deserialize, Serialize};

use super::Extra;

/// An application as returned by `GET /applications` and `GET /applications/{uuid}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Application {
    pub uuid: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fqdn: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub git_repository: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub git_branch: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub build_pack: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ports_exposes: Option<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

/// Fields accepted by `PATCH /applications/{uuid}`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateApplication {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domains: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub git_branch: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub build_pack: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub install_command: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub build_command: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_command: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ports_exposes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub health_check_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub health_check_path: Option<String>,
}

/// Target placement shared by every create request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Placement {
    pub project_uuid: String,
    pub server_uuid: String,
    pub environment_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination_uuid: Option<String>,
}

/// `POST /applications/public`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePublicApplication {
    #[serde(flatten)]
    pub placement: Placement,
    pub git_repository: String,
    pub git_branch: String,
    pub build_pack: String,
    pub ports_exposes: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domains: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instant_deploy: Option<bool>,
}

/// `POST /applications/dockerfile`
///
/// `dockerfile` holds the plain text; it is base64-encoded on the way out.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateDockerfileApplication {
    #[serde(flatten)]
    pub placement: Placement,
    pub dockerfile: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ports_exposes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instant_deploy: Option<bool>,
}

/// `POST /applications/dockerimage`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateDockerImageApplication {
    #[serde(flatten)]
    pub placement: Placement,
    pub docker_registry_image_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub docker_registry_image_tag: Option<String>,
    pub ports_exposes: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instant_deploy: Option<bool>,
}

/// Response of `GET /applications/{uuid}/logs`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicationLogs {
    #[serde(default)]
    pub logs: String,
}
