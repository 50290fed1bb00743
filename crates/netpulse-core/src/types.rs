//! Measurement types and error definitions
//!
//! Contains the core types shared by the store, prober, monitor and
//! query service.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Result type for speedtest operations
pub type Result<T> = std::result::Result<T, SpeedtestError>;

/// Speedtest error types
#[derive(Debug, thiserror::Error)]
pub enum SpeedtestError {
    /// Persistence layer failure
    #[error("storage error: {0}")]
    Storage(#[from] sqlx::Error),
    /// The external measurement failed
    #[error("probe failed: {0}")]
    Probe(String),
    /// The store holds no results yet
    #[error("no results found")]
    NoResults,
    /// Invalid configuration
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// A completed probe that has not yet been persisted
///
/// The store assigns the id at append time; everything else, including
/// the completion timestamp, is set by the component that captured the
/// measurement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    /// Point in time the measurement completed
    pub timestamp: DateTime<Utc>,
    /// Download throughput in Mbps
    pub download_mbps: f64,
    /// Upload throughput in Mbps
    pub upload_mbps: f64,
    /// Round-trip latency in milliseconds
    pub ping_ms: f64,
    /// Name of the remote speedtest server
    pub server_name: String,
    /// Location of the remote speedtest server
    pub server_location: String,
}

/// One persisted measurement
///
/// Immutable once appended. The id strictly increases with insertion
/// order and is used only for ordering, never as a business key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeasurementRecord {
    /// Store-assigned ordering key
    pub id: i64,
    /// Point in time the measurement completed
    pub timestamp: DateTime<Utc>,
    /// Download throughput in Mbps
    pub download_mbps: f64,
    /// Upload throughput in Mbps
    pub upload_mbps: f64,
    /// Round-trip latency in milliseconds
    pub ping_ms: f64,
    /// Name of the remote speedtest server
    pub server_name: String,
    /// Location of the remote speedtest server
    pub server_location: String,
}

impl MeasurementRecord {
    /// Attach a store-assigned id to a measurement
    pub fn from_measurement(id: i64, measurement: Measurement) -> Self {
        Self {
            id,
            timestamp: measurement.timestamp,
            download_mbps: measurement.download_mbps,
            upload_mbps: measurement.upload_mbps,
            ping_ms: measurement.ping_ms,
            server_name: measurement.server_name,
            server_location: measurement.server_location,
        }
    }
}

/// Internal row type for result queries
#[derive(FromRow)]
pub(crate) struct ResultRow {
    pub id: i64,
    pub timestamp: DateTime<Utc>,
    pub download: f64,
    pub upload: f64,
    pub ping: f64,
    pub server_name: String,
    pub server_location: String,
}

impl From<ResultRow> for MeasurementRecord {
    fn from(row: ResultRow) -> Self {
        MeasurementRecord {
            id: row.id,
            timestamp: row.timestamp,
            download_mbps: row.download,
            upload_mbps: row.upload,
            ping_ms: row.ping,
            server_name: row.server_name,
            server_location: row.server_location,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_measurement() -> Measurement {
        Measurement {
            timestamp: Utc::now(),
            download_mbps: 100.5,
            upload_mbps: 20.1,
            ping_ms: 15.3,
            server_name: "ACME".to_string(),
            server_location: "Metropolis, US".to_string(),
        }
    }

    #[test]
    fn test_record_from_measurement_preserves_fields() {
        let measurement = sample_measurement();
        let record = MeasurementRecord::from_measurement(7, measurement.clone());

        assert_eq!(record.id, 7);
        assert_eq!(record.timestamp, measurement.timestamp);
        assert_eq!(record.download_mbps, 100.5);
        assert_eq!(record.upload_mbps, 20.1);
        assert_eq!(record.ping_ms, 15.3);
        assert_eq!(record.server_name, "ACME");
        assert_eq!(record.server_location, "Metropolis, US");
    }

    #[test]
    fn test_error_messages() {
        let err = SpeedtestError::Probe("network unreachable".to_string());
        assert_eq!(err.to_string(), "probe failed: network unreachable");

        assert_eq!(SpeedtestError::NoResults.to_string(), "no results found");
    }

    #[test]
    fn test_measurement_serialization_round_trip() {
        let measurement = sample_measurement();
        let json = serde_json::to_string(&measurement).unwrap();
        let back: Measurement = serde_json::from_str(&json).unwrap();
        assert_eq!(back, measurement);
    }
}
