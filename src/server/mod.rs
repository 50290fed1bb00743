//! Server startup and wiring
//!
//! Builds the store, prober and query service once, hands them to the
//! HTTP layer through a [`ServiceContext`], and runs the background
//! monitor on its own task so the request path never serializes behind
//! it.

pub mod config;

use anyhow::{Context, Result};
use netpulse_core::{CliProber, MonitorConfig, MonitorEngine, Prober, QueryService, ResultStore};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::info;

use config::AppConfig;

/// Shared handles for the HTTP layer
#[derive(Clone)]
pub struct ServiceContext {
    pub query: Arc<QueryService>,
    pub store: Arc<ResultStore>,
}

/// Run the server until ctrl-c
pub async fn run(config: AppConfig) -> Result<()> {
    let db_path = config.resolved_db_path();
    let store = Arc::new(ResultStore::from_path(&db_path).await?);
    info!(db = %db_path.display(), "result store ready");

    let prober: Arc<dyn Prober> = Arc::new(CliProber::new(&config.prober.command));
    let query = Arc::new(QueryService::new(store.clone(), prober.clone()));
    let context = ServiceContext {
        query,
        store: store.clone(),
    };

    let shutdown = CancellationToken::new();

    if config.monitor.enabled {
        let engine = MonitorEngine::new(
            store,
            prober,
            MonitorConfig::new().with_interval(config.monitor.interval_secs),
        );
        let token = shutdown.clone();
        tokio::spawn(async move { engine.run(token).await });
        info!(
            interval_secs = config.monitor.interval_secs,
            "background monitor started"
        );
    } else {
        info!("background monitor disabled by configuration");
    }

    let app = crate::api::router(context);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            let _ = tokio::signal::ctrl_c().await;
            info!("shutdown signal received");
            shutdown.cancel();
        })
        .await
        .context("server error")?;

    Ok(())
}
