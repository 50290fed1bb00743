//! Netpulse Core - Measurement Engine
//!
//! This crate provides the measurement pipeline for the netpulse speed
//! monitor:
//! - Store: append-only SQLite log of completed measurements
//! - Prober: external measurement capability (speedtest-cli by default)
//! - Monitor: drift-corrected periodic probe loop with cancellation
//! - Query: latest / all / run-now operations over the store
//!
//! Data flows monitor cycle → prober → store; the query service reads
//! the store directly and can trigger an on-demand probe without
//! touching the monitor's clock.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod monitor;
pub mod prober;
pub mod query;
pub mod store;
pub mod types;

pub use monitor::{MonitorConfig, MonitorEngine};
pub use prober::{CliProber, Prober};
pub use query::QueryService;
pub use store::ResultStore;
pub use types::{Measurement, MeasurementRecord, Result as SpeedtestResult, SpeedtestError};
