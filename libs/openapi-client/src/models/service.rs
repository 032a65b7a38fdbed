//! Service models

use serde::{Deserialize, Serialize};

use super::{Extra, Placement};

/// A one-click or compose based service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Service {
    pub uuid: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_type: Option<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

/// `POST /services`
///
/// Either `service_type` (a one-click template name) or `docker_compose_raw`
/// must be set. The compose file is plain text here and base64-encoded on the
/// way out.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateService {
    #[serde(flatten)]
    pub placement: Placement,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub service_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub docker_compose_raw: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instant_deploy: Option<bool>,
}

/// Cleanup switches for `DELETE /services/{uuid}`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteServiceOptions {
    pub delete_configurations: bool,
    pub delete_volumes: bool,
    pub docker_cleanup: bool,
    pub delete_connected_networks: bool,
}

impl Default for DeleteServiceOptions {
    fn default() -> Self {
        Self {
            delete_configurations: true,
            delete_volumes: true,
            docker_cleanup: true,
            delete_connected_networks: true,
        }
    }
}

impl DeleteServiceOptions {
    /// Render as a query string without the leading `?`
    pub fn to_query(&self) -> String {
        format!(
            "delete_configurations={}&delete_volumes={}&docker_cleanup={}&delete_connected_networks={}",
            self.delete_configurations,
            self.delete_volumes,
            self.docker_cleanup,
            self.delete_connected_networks
        )
    }
}
