//! The external measurement seam
//!
//! A [`Prober`] performs one network measurement cycle and reports
//! download/upload throughput, latency and the identity of the remote
//! server it measured against. The production implementation shells
//! out to the `speedtest-cli` executable; tests substitute mocks.

use async_trait::async_trait;
use chrono::Utc;
use serde::Deserialize;
use tokio::process::Command;
use tracing::debug;

use crate::types::{Measurement, Result, SpeedtestError};

/// External capability performing one network measurement
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Prober: Send + Sync {
    /// Run one measurement cycle
    ///
    /// May block on network I/O for an arbitrary duration; no timeout
    /// is imposed here. The returned measurement carries the
    /// completion timestamp.
    async fn measure(&self) -> Result<Measurement>;
}

/// Prober that runs the `speedtest-cli` executable
///
/// Invokes `<command> --json` and parses the report. Throughput comes
/// back in bits per second and is converted to Mbps.
pub struct CliProber {
    command: String,
}

/// JSON report emitted by `speedtest-cli --json`
#[derive(Deserialize)]
struct CliReport {
    download: f64,
    upload: f64,
    ping: f64,
    server: CliServer,
}

#[derive(Deserialize)]
struct CliServer {
    sponsor: String,
    name: String,
    country: String,
}

impl CliProber {
    /// Create a prober that invokes the given executable
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }

    fn parse_report(raw: &[u8]) -> Result<Measurement> {
        let report: CliReport = serde_json::from_slice(raw)
            .map_err(|e| SpeedtestError::Probe(format!("unparseable speedtest report: {}", e)))?;

        Ok(Measurement {
            timestamp: Utc::now(),
            download_mbps: report.download / 1_000_000.0,
            upload_mbps: report.upload / 1_000_000.0,
            ping_ms: report.ping,
            server_name: report.server.sponsor,
            server_location: format!("{}, {}", report.server.name, report.server.country),
        })
    }
}

impl Default for CliProber {
    fn default() -> Self {
        Self::new("speedtest-cli")
    }
}

#[async_trait]
impl Prober for CliProber {
    async fn measure(&self) -> Result<Measurement> {
        debug!(command = %self.command, "starting speed probe");

        let output = Command::new(&self.command)
            .arg("--json")
            .output()
            .await
            .map_err(|e| {
                SpeedtestError::Probe(format!("failed to run {}: {}", self.command, e))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(SpeedtestError::Probe(format!(
                "{} exited with {}: {}",
                self.command,
                output.status,
                stderr.trim()
            )));
        }

        Self::parse_report(&output.stdout)
    }
}
