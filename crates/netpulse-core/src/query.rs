//! Read and on-demand measurement operations
//!
//! Thin service over the store and prober; stateless beyond them. All
//! operations are safe to call concurrently with each other and with
//! the monitor loop, which shares the same store.

use std::sync::Arc;

use crate::prober::Prober;
use crate::store::ResultStore;
use crate::types::{MeasurementRecord, Result, SpeedtestError};

/// Query operations over stored results
pub struct QueryService {
    store: Arc<ResultStore>,
    prober: Arc<dyn Prober>,
}

impl QueryService {
    /// Create a new query service
    pub fn new(store: Arc<ResultStore>, prober: Arc<dyn Prober>) -> Self {
        Self { store, prober }
    }

    /// Get the most recent record
    ///
    /// Returns [`SpeedtestError::NoResults`] when the store is empty.
    pub async fn latest(&self) -> Result<MeasurementRecord> {
        self.store.latest().await?.ok_or(SpeedtestError::NoResults)
    }

    /// Get all records, newest first; empty is not an error
    pub async fn all(&self) -> Result<Vec<MeasurementRecord>> {
        self.store.all().await
    }

    /// Run one measurement immediately and persist it
    ///
    /// Independent of the monitor's clock; does not reset its timer.
    /// On probe failure nothing is appended and the error is returned.
    pub async fn run_now(&self) -> Result<MeasurementRecord> {
        let measurement = self.prober.measure().await?;
        let id = self.store.append(&measurement).await?;
        Ok(MeasurementRecord::from_measurement(id, measurement))
    }
}
