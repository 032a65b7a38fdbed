//! Application configuration options

use std::time::Duration;

use crate::storage::layout::StorageLayout;
use crate::storage::settings::Settings;
use crate::workers::{deployment_watch, poller};

/// Main application options
#[derive(Debug, Clone)]
pub struct AppOptions {
    /// Storage layout paths
    pub layout: StorageLayout,

    /// Page size for application deployment history
    pub deployments_page_size: u32,

    /// Status refetch options for `--get --follow`
    pub poller: poller::Options,

    /// Deployment watch options
    pub deployment_watch: deployment_watch::Options,
}

impl Default for AppOptions {
    fn default() -> Self {
        Self::from_settings(StorageLayout::default(), &Settings::default())
    }
}

impl AppOptions {
    /// Options for `layout`, tuned by the values in `settings`
    pub fn from_settings(layout: StorageLayout, settings: &Settings) -> Self {
        Self {
            layout,
            deployments_page_size: settings.deployments_page_size.max(1),
            poller: poller::Options {
                interval: Duration::from_secs(settings.status_refetch_interval_secs.max(1)),
                ..Default::default()
            },
            deployment_watch: deployment_watch::Options {
                interval: Duration::from_secs(settings.deployment_poll_interval_secs.max(1)),
            },
        }
    }
}
