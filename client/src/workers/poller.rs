//! Focus-aware refetch loop

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use tokio::sync::watch;
use tracing::{debug, error, info};

use crate::errors::CoolifyError;

/// Poller worker options
#[derive(Debug, Clone)]
pub struct Options {
    /// Delay between refetches
    pub interval: Duration,

    /// Delay before the first refetch
    pub initial_delay: Duration,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(10),
            initial_delay: Duration::ZERO,
        }
    }
}

/// Call `refetch` every `interval` while `focus` holds `true`
///
/// While unfocused the loop parks until focus returns. Refetch errors are
/// logged and the loop carries on. Returns on shutdown, or when the focus
/// sender is dropped while unfocused.
pub async fn run<R, RF, T, S, F>(
    options: &Options,
    mut refetch: R,
    mut focus: watch::Receiver<bool>,
    sleep_fn: S,
    mut shutdown_signal: Pin<Box<dyn Future<Output = ()> + Send>>,
) where
    R: FnMut() -> RF,
    RF: Future<Output = Result<T, CoolifyError>>,
    S: Fn(Duration) -> F,
    F: Future<Output = ()>,
{
    info!("Poller worker starting...");

    tokio::select! {
        _ = &mut shutdown_signal => {
            info!("Poller worker shutting down...");
            return;
        }
        _ = sleep_fn(options.initial_delay) => {}
    }

    loop {
        if !*focus.borrow_and_update() {
            debug!("Poller paused until focus returns");
            tokio::select! {
                _ = &mut shutdown_signal => {
                    info!("Poller worker shutting down...");
                    return;
                }
                changed = focus.changed() => {
                    if changed.is_err() {
                        info!("Focus channel closed, poller stopping");
                        return;
                    }
                    continue;
                }
            }
        }

        match refetch().await {
            Ok(_) => debug!("Refetch completed"),
            Err(e) => error!("Refetch failed: {}", e),
        }

        tokio::select! {
            _ = &mut shutdown_signal => {
                info!("Poller worker shutting down...");
                return;
            }
            _ = sleep_fn(options.interval) => {}
        }
    }
}
