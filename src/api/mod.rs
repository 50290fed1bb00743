//! HTTP API layer
//!
//! Route modules each expose a `routes()` Router; this module merges
//! them and attaches the shared [`ServiceContext`] extension plus
//! request tracing.

pub mod dashboard;
pub mod health;
pub mod speedtest;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use axum::{Extension, Router};
use netpulse_core::SpeedtestError;
use serde_json::json;
use tower_http::trace::TraceLayer;

use crate::server::ServiceContext;

/// Build the application router
pub fn router(context: ServiceContext) -> Router {
    Router::new()
        .merge(dashboard::routes())
        .merge(health::routes())
        .merge(speedtest::routes())
        .layer(Extension(context))
        .layer(TraceLayer::new_for_http())
}

/// Error responses carry `{"error": <message>}` with a matching status
pub struct ApiError(SpeedtestError);

impl From<SpeedtestError> for ApiError {
    fn from(err: SpeedtestError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            SpeedtestError::NoResults => {
                (StatusCode::NOT_FOUND, "No results found".to_string())
            }
            other => (StatusCode::INTERNAL_SERVER_ERROR, other.to_string()),
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
