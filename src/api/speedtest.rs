//! Speedtest result endpoints
//!
//! - `GET /speedtest/latest` — most recent record, 404 when empty
//! - `GET /speedtest/all` — all records, newest first
//! - `GET /speedtest/run` — run one measurement now and return it

use axum::response::Json;
use axum::routing::get;
use axum::{Extension, Router};
use chrono::{DateTime, Utc};
use netpulse_core::MeasurementRecord;
use serde::Serialize;
use tracing::{info, warn};

use super::ApiError;
use crate::server::ServiceContext;

/// Outward record shape
///
/// Mirrors the stored columns. The internal id is an ordering key
/// only and is not exposed.
#[derive(Debug, Serialize)]
pub struct RecordView {
    pub timestamp: DateTime<Utc>,
    pub download: f64,
    pub upload: f64,
    pub ping: f64,
    pub server_name: String,
    pub server_location: String,
}

impl From<MeasurementRecord> for RecordView {
    fn from(record: MeasurementRecord) -> Self {
        Self {
            timestamp: record.timestamp,
            download: record.download_mbps,
            upload: record.upload_mbps,
            ping: record.ping_ms,
            server_name: record.server_name,
            server_location: record.server_location,
        }
    }
}

/// Most recent measurement
async fn get_latest(
    Extension(context): Extension<ServiceContext>,
) -> Result<Json<RecordView>, ApiError> {
    let record = context.query.latest().await?;
    Ok(Json(record.into()))
}

/// All measurements, newest first
async fn get_all(
    Extension(context): Extension<ServiceContext>,
) -> Result<Json<Vec<RecordView>>, ApiError> {
    let records = context.query.all().await?;
    Ok(Json(records.into_iter().map(RecordView::from).collect()))
}

/// Run one measurement immediately
async fn run_now(
    Extension(context): Extension<ServiceContext>,
) -> Result<Json<RecordView>, ApiError> {
    match context.query.run_now().await {
        Ok(record) => {
            info!(id = record.id, "on-demand speed probe recorded");
            Ok(Json(record.into()))
        }
        Err(e) => {
            warn!("on-demand speed probe failed: {}", e);
            Err(e.into())
        }
    }
}

/// Create speedtest routes
pub fn routes() -> Router {
    Router::new()
        .route("/speedtest/latest", get(get_latest))
        .route("/speedtest/all", get(get_all))
        .route("/speedtest/run", get(run_now))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api;
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use netpulse_core::{
        Measurement, Prober, QueryService, ResultStore, SpeedtestError, SpeedtestResult,
    };
    use serde_json::Value;
    use std::sync::Arc;
    use tempfile::TempDir;
    use tower::ServiceExt;

    /// Prober stub with a fixed outcome
    struct FixedProber {
        fail: bool,
    }

    #[async_trait]
    impl Prober for FixedProber {
        async fn measure(&self) -> SpeedtestResult<Measurement> {
            if self.fail {
                Err(SpeedtestError::Probe("no server found".to_string()))
            } else {
                Ok(sample_measurement(100.5))
            }
        }
    }

    fn sample_measurement(download: f64) -> Measurement {
        Measurement {
            timestamp: Utc::now(),
            download_mbps: download,
            upload_mbps: 20.1,
            ping_ms: 15.3,
            server_name: "ACME".to_string(),
            server_location: "Metropolis, US".to_string(),
        }
    }

    struct TestContext {
        app: Router,
        store: Arc<ResultStore>,
        _dir: TempDir,
    }

    async fn create_test_context(fail_probe: bool) -> TestContext {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("test_api.db");
        let store = Arc::new(ResultStore::from_path(&path).await.unwrap());
        let prober = Arc::new(FixedProber { fail: fail_probe });
        let query = Arc::new(QueryService::new(store.clone(), prober));
        let app = api::router(ServiceContext {
            query,
            store: store.clone(),
        });
        TestContext {
            app,
            store,
            _dir: dir,
        }
    }

    async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = serde_json::from_slice(&bytes).unwrap();
        (status, body)
    }

    #[tokio::test]
    async fn test_latest_on_empty_store_is_404() {
        let ctx = create_test_context(false).await;

        let (status, body) = get(ctx.app, "/speedtest/latest").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "No results found");
    }

    #[tokio::test]
    async fn test_latest_returns_stored_record() {
        let ctx = create_test_context(false).await;
        ctx.store.append(&sample_measurement(100.5)).await.unwrap();

        let (status, body) = get(ctx.app, "/speedtest/latest").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["download"], 100.5);
        assert_eq!(body["upload"], 20.1);
        assert_eq!(body["ping"], 15.3);
        assert_eq!(body["server_name"], "ACME");
        assert_eq!(body["server_location"], "Metropolis, US");
        assert!(body.get("id").is_none());
    }

    #[tokio::test]
    async fn test_all_is_empty_array_when_no_results() {
        let ctx = create_test_context(false).await;

        let (status, body) = get(ctx.app, "/speedtest/all").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, serde_json::json!([]));
    }

    #[tokio::test]
    async fn test_all_returns_newest_first() {
        let ctx = create_test_context(false).await;
        ctx.store.append(&sample_measurement(10.0)).await.unwrap();
        ctx.store.append(&sample_measurement(20.0)).await.unwrap();

        let (status, body) = get(ctx.app, "/speedtest/all").await;
        assert_eq!(status, StatusCode::OK);
        let records = body.as_array().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0]["download"], 20.0);
        assert_eq!(records[1]["download"], 10.0);
    }

    #[tokio::test]
    async fn test_run_returns_new_record_and_persists_it() {
        let ctx = create_test_context(false).await;

        let (status, body) = get(ctx.app, "/speedtest/run").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["download"], 100.5);
        assert_eq!(ctx.store.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_run_failure_is_500_and_appends_nothing() {
        let ctx = create_test_context(true).await;

        let (status, body) = get(ctx.app, "/speedtest/run").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body["error"].as_str().unwrap().contains("no server found"));
        assert_eq!(ctx.store.count().await.unwrap(), 0);
    }
}
