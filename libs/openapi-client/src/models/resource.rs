//! Resource kinds

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The closed set of manageable resource kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceType {
    Application,
    Database,
    Service,
    Project,
    Server,
    Team,
}

impl ResourceType {
    pub const ALL: [ResourceType; 6] = [
        ResourceType::Application,
        ResourceType::Database,
        ResourceType::Service,
        ResourceType::Project,
        ResourceType::Server,
        ResourceType::Team,
    ];

    /// Singular wire name (`"application"`)
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceType::Application => "application",
            ResourceType::Database => "database",
            ResourceType::Service => "service",
            ResourceType::Project => "project",
            ResourceType::Server => "server",
            ResourceType::Team => "team",
        }
    }

    /// Collection path segment (`"applications"`), also the first query key part
    pub fn collection(&self) -> &'static str {
        match self {
            ResourceType::Application => "applications",
            ResourceType::Database => "databases",
            ResourceType::Service => "services",
            ResourceType::Project => "projects",
            ResourceType::Server => "servers",
            ResourceType::Team => "teams",
        }
    }

    /// Whether the resource reports a runtime status and accepts start/stop/restart
    pub fn is_runnable(&self) -> bool {
        matches!(
            self,
            ResourceType::Application | ResourceType::Database | ResourceType::Service
        )
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResourceType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_lowercase();
        ResourceType::ALL
            .into_iter()
            .find(|t| t.as_str() == lower || t.collection() == lower)
            .ok_or_else(|| format!("Invalid resource type: {}", s))
    }
}
