//! Settings file management

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::errors::CoolifyError;
use crate::filesys::file::File;
use crate::logs::LogLevel;
use crate::storage::layout::StorageLayout;

/// Client settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,

    /// Emit JSON log lines
    #[serde(default)]
    pub log_json: bool,

    /// Directory for daily rolling log files; the layout's `logs/` when unset
    #[serde(default)]
    pub log_dir: Option<PathBuf>,

    /// Page size for per-application deployment listings
    #[serde(default = "default_deployments_page_size")]
    pub deployments_page_size: u32,

    /// Interval between polls while watching a deployment
    #[serde(default = "default_deployment_poll_interval")]
    pub deployment_poll_interval_secs: u64,

    /// Interval between refetches of resource status
    #[serde(default = "default_status_refetch_interval")]
    pub status_refetch_interval_secs: u64,
}

fn default_deployments_page_size() -> u32 {
    10
}

fn default_deployment_poll_interval() -> u64 {
    3
}

fn default_status_refetch_interval() -> u64 {
    10
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            log_level: LogLevel::Warn,
            log_json: false,
            log_dir: None,
            deployments_page_size: default_deployments_page_size(),
            deployment_poll_interval_secs: default_deployment_poll_interval(),
            status_refetch_interval_secs: default_status_refetch_interval(),
        }
    }
}

impl Settings {
    /// Load settings, falling back to defaults when the file is absent
    pub async fn load(file: &File) -> Result<Self, CoolifyError> {
        Ok(file.read_json::<Settings>().await?.unwrap_or_default())
    }

    /// Where log files go under `layout`
    pub fn resolved_log_dir(&self, layout: &StorageLayout) -> PathBuf {
        self.log_dir
            .clone()
            .unwrap_or_else(|| layout.logs_dir().path().to_path_buf())
    }
}
