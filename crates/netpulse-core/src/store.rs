//! Result storage using SQLite
//!
//! Append-only log of completed measurements. The store is the only
//! component that touches the database; appends are serialized by
//! SQLite so concurrent callers never observe a partially written row,
//! and assigned ids strictly increase in insertion order.

use sqlx::sqlite::SqlitePoolOptions;
use sqlx::{Pool, Sqlite};
use std::path::Path;

use crate::types::{Measurement, MeasurementRecord, Result, ResultRow, SpeedtestError};

/// SQLite-based measurement store
pub struct ResultStore {
    pool: Pool<Sqlite>,
}

impl ResultStore {
    /// Create a new store from database path
    ///
    /// Creates the file and schema if absent; safe to call on every
    /// startup.
    pub async fn from_path(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                SpeedtestError::InvalidConfig(format!("failed to create data directory: {}", e))
            })?;
        }

        let url = format!("sqlite:{}?mode=rwc", path.display());
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect(&url)
            .await?;

        let store = Self { pool };
        store.migrate().await?;
        Ok(store)
    }

    /// Run database migrations
    async fn migrate(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS results (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                timestamp TIMESTAMP NOT NULL,
                download REAL NOT NULL,
                upload REAL NOT NULL,
                ping REAL NOT NULL,
                server_name TEXT NOT NULL,
                server_location TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Append a completed measurement and return the assigned id
    pub async fn append(&self, measurement: &Measurement) -> Result<i64> {
        let result = sqlx::query(
            r#"
            INSERT INTO results (timestamp, download, upload, ping, server_name, server_location)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(measurement.timestamp)
        .bind(measurement.download_mbps)
        .bind(measurement.upload_mbps)
        .bind(measurement.ping_ms)
        .bind(&measurement.server_name)
        .bind(&measurement.server_location)
        .execute(&self.pool)
        .await?;

        Ok(result.last_insert_rowid())
    }

    /// Get the most recently appended record, if any
    pub async fn latest(&self) -> Result<Option<MeasurementRecord>> {
        let row: Option<ResultRow> = sqlx::query_as(
            r#"
            SELECT id, timestamp, download, upload, ping, server_name, server_location
            FROM results
            ORDER BY id DESC
            LIMIT 1
            "#,
        )
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    /// Get all records, newest first
    ///
    /// Ordering is by descending id, not by timestamp, which could be
    /// skewed.
    pub async fn all(&self) -> Result<Vec<MeasurementRecord>> {
        let rows: Vec<ResultRow> = sqlx::query_as(
            r#"
            SELECT id, timestamp, download, upload, ping, server_name, server_location
            FROM results
            ORDER BY id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Count stored records
    pub async fn count(&self) -> Result<i64> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM results")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}
