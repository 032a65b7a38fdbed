//! Deployment models

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::Extra;

/// Deployment status
///
/// The set is open: values the client does not know are carried verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DeploymentStatus {
    Queued,
    InProgress,
    Finished,
    Failed,
    CancelledByUser,
    Other(String),
}

impl DeploymentStatus {
    pub fn as_str(&self) -> &str {
        match self {
            DeploymentStatus::Queued => "queued",
            DeploymentStatus::InProgress => "in_progress",
            DeploymentStatus::Finished => "finished",
            DeploymentStatus::Failed => "failed",
            DeploymentStatus::CancelledByUser => "cancelled-by-user",
            DeploymentStatus::Other(s) => s,
        }
    }

    /// No further status change is expected once a deployment reaches one of these
    pub fn is_terminal(&self) -> bool {
        match self {
            DeploymentStatus::Finished
            | DeploymentStatus::Failed
            | DeploymentStatus::CancelledByUser => true,
            DeploymentStatus::Other(s) => s == "cancelled",
            _ => false,
        }
    }
}

impl From<&str> for DeploymentStatus {
    fn from(s: &str) -> Self {
        match s {
            "queued" => DeploymentStatus::Queued,
            "in_progress" => DeploymentStatus::InProgress,
            "finished" => DeploymentStatus::Finished,
            "failed" => DeploymentStatus::Failed,
            "cancelled-by-user" => DeploymentStatus::CancelledByUser,
            other => DeploymentStatus::Other(other.to_string()),
        }
    }
}

impl Default for DeploymentStatus {
    fn default() -> Self {
        DeploymentStatus::Queued
    }
}

impl fmt::Display for DeploymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for DeploymentStatus {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for DeploymentStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(DeploymentStatus::from(s.as_str()))
    }
}

/// A deployment queued or executed for an application
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Deployment {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    pub deployment_uuid: String,
    #[serde(
        default,
        deserialize_with = "super::de::string_or_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub application_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub application_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server_name: Option<String>,
    #[serde(default)]
    pub status: DeploymentStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commit_message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deployment_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    /// JSON-encoded array of [`DeploymentLogLine`]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logs: Option<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

impl Deployment {
    /// Decode the embedded log lines
    pub fn log_lines(&self) -> Result<Vec<DeploymentLogLine>, serde_json::Error> {
        match self.logs.as_deref().map(str::trim) {
            None | Some("") => Ok(Vec::new()),
            Some(raw) => serde_json::from_str(raw),
        }
    }

    /// Non-hidden log lines in display order
    pub fn visible_log_lines(&self) -> Result<Vec<DeploymentLogLine>, serde_json::Error> {
        let mut lines: Vec<DeploymentLogLine> = self
            .log_lines()?
            .into_iter()
            .filter(|l| !l.hidden)
            .collect();
        // stable, so lines without `order` keep their arrival order
        lines.sort_by_key(|l| (l.batch, l.order.unwrap_or(u64::MAX)));
        Ok(lines)
    }
}

/// One record of a deployment's log stream
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeploymentLogLine {
    #[serde(default)]
    pub output: String,
    /// `stdout` or `stderr`
    #[serde(rename = "type", default)]
    pub stream: String,
    #[serde(default)]
    pub timestamp: String,
    #[serde(default)]
    pub hidden: bool,
    #[serde(default)]
    pub batch: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<u64>,
}

impl DeploymentLogLine {
    pub fn is_stderr(&self) -> bool {
        self.stream == "stderr"
    }

    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(&self.timestamp)
            .ok()
            .map(|t| t.with_timezone(&Utc))
    }
}

/// Response of `GET /deployments/applications/{uuid}`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeploymentsPage {
    /// Total deployments for the application, when reported
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<u64>,
    #[serde(default)]
    pub deployments: Vec<Deployment>,
}
