//! Follow one deployment until it settles

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use openapi_client::models::Deployment;
use tracing::{debug, info, warn};

use crate::errors::CoolifyError;
use crate::queries::Queries;

#[derive(Debug, Clone)]
pub struct Options {
    pub interval: Duration,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(3),
        }
    }
}

/// Poll `/deployments/{uuid}` until its status is terminal
///
/// Returns the final deployment, or `None` when shut down first. Transport
/// failures are logged and polling continues; any other error ends the watch.
pub async fn run<S, F>(
    queries: &Queries,
    deployment_uuid: &str,
    options: &Options,
    sleep_fn: S,
    mut shutdown_signal: Pin<Box<dyn Future<Output = ()> + Send>>,
) -> Result<Option<Deployment>, CoolifyError>
where
    S: Fn(Duration) -> F,
    F: Future<Output = ()>,
{
    info!("Watching deployment {}", deployment_uuid);
    let mut last_status = None;

    loop {
        let polled = tokio::select! {
            _ = &mut shutdown_signal => {
                info!("Deployment watch shutting down...");
                return Ok(None);
            }
            polled = queries.refetch_deployment(deployment_uuid) => polled,
        };

        match polled {
            Ok(deployment) => {
                if last_status.as_ref() != Some(&deployment.status) {
                    debug!("Deployment {} is {}", deployment_uuid, deployment.status);
                    last_status = Some(deployment.status.clone());
                }
                if deployment.status.is_terminal() {
                    info!("Deployment {} finished: {}", deployment_uuid, deployment.status);
                    return Ok(Some(deployment));
                }
            }
            Err(e) if e.is_transport() => warn!("Polling deployment {} failed: {}", deployment_uuid, e),
            Err(e) => return Err(e),
        }

        tokio::select! {
            _ = &mut shutdown_signal => {
                info!("Deployment watch shutting down...");
                return Ok(None);
            }
            _ = sleep_fn(options.interval) => {}
        }
    }
}
