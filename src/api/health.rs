//! Health check endpoint
//!
//! `GET /health` — service status, version and stored result count.

use axum::response::Json;
use axum::routing::get;
use axum::{Extension, Router};
use serde::Serialize;

use crate::server::ServiceContext;

/// Health response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub results_recorded: i64,
}

/// Health check
async fn health_check(Extension(context): Extension<ServiceContext>) -> Json<HealthResponse> {
    let (status, results_recorded) = match context.store.count().await {
        Ok(count) => ("healthy", count),
        Err(_) => ("degraded", 0),
    };

    Json(HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION"),
        results_recorded,
    })
}

/// Create health routes
pub fn routes() -> Router {
    Router::new().route("/health", get(health_check))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_response_serialization() {
        let response = HealthResponse {
            status: "healthy",
            version: "0.1.0",
            results_recorded: 3,
        };

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["status"], "healthy");
        assert_eq!(json["results_recorded"], 3);
    }
}
