//! Background measurement loop
//!
//! Runs one probe+append cycle per interval with drift correction:
//! the sleep after each cycle is shortened by the time the cycle took,
//! so successive cycle starts stay spaced by the configured interval.
//! A cycle that overruns the interval is followed immediately by a
//! single next cycle, never by a catch-up burst.

use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::prober::Prober;
use crate::store::ResultStore;

/// Monitor configuration
#[derive(Debug, Clone)]
pub struct MonitorConfig {
    /// Seconds between cycle starts
    pub interval_secs: u64,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self { interval_secs: 60 }
    }
}

impl MonitorConfig {
    /// Create a new configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the measurement interval
    pub fn with_interval(mut self, secs: u64) -> Self {
        self.interval_secs = secs;
        self
    }
}

/// Periodic measurement engine
///
/// Owns the timing; the store and prober are shared with the query
/// path.
pub struct MonitorEngine {
    store: Arc<ResultStore>,
    prober: Arc<dyn Prober>,
    config: MonitorConfig,
}

impl MonitorEngine {
    /// Create a new monitor engine
    pub fn new(store: Arc<ResultStore>, prober: Arc<dyn Prober>, config: MonitorConfig) -> Self {
        Self {
            store,
            prober,
            config,
        }
    }

    /// Run the measurement loop until the token is cancelled
    ///
    /// The first cycle starts immediately. Probe and storage failures
    /// are logged and skipped; the loop itself never exits on error.
    pub async fn run(&self, shutdown: CancellationToken) {
        info!(interval_secs = self.config.interval_secs, "monitor starting");
        let interval = Duration::from_secs(self.config.interval_secs);

        loop {
            let started = Instant::now();
            self.run_cycle().await;

            let sleep_for = next_sleep(interval, started.elapsed());
            tokio::select! {
                _ = tokio::time::sleep(sleep_for) => {}
                _ = shutdown.cancelled() => {
                    info!("monitor shutting down");
                    break;
                }
            }
        }
    }

    /// Perform one probe+append cycle
    ///
    /// A failed probe is never appended; the next scheduled cycle
    /// still runs.
    pub async fn run_cycle(&self) {
        match self.prober.measure().await {
            Ok(measurement) => match self.store.append(&measurement).await {
                Ok(id) => {
                    debug!(
                        id,
                        download_mbps = measurement.download_mbps,
                        upload_mbps = measurement.upload_mbps,
                        ping_ms = measurement.ping_ms,
                        "recorded measurement"
                    );
                }
                Err(e) => error!("failed to record measurement: {}", e),
            },
            Err(e) => warn!("speed probe failed: {}", e),
        }
    }
}

/// Sleep needed to keep cycle starts spaced by `interval`
///
/// Zero when the cycle itself already overran the interval.
fn next_sleep(interval: Duration, elapsed: Duration) -> Duration {
    interval.saturating_sub(elapsed)
}
