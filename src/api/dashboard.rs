//! HTML dashboard
//!
//! `GET /` — server-rendered table of all stored results, newest
//! first. Intentionally plain; the JSON API is the real interface.

use axum::response::Html;
use axum::routing::get;
use axum::{Extension, Router};
use netpulse_core::MeasurementRecord;
use std::fmt::Write;

use super::ApiError;
use crate::server::ServiceContext;

/// Rendered results table
async fn show_results(
    Extension(context): Extension<ServiceContext>,
) -> Result<Html<String>, ApiError> {
    let records = context.query.all().await?;
    Ok(Html(render_page(&records)))
}

fn render_page(records: &[MeasurementRecord]) -> String {
    let mut rows = String::new();
    for record in records {
        let _ = write!(
            rows,
            "<tr><td>{}</td><td>{:.2}</td><td>{:.2}</td><td>{:.1}</td><td>{}</td><td>{}</td></tr>",
            record.timestamp.format("%Y-%m-%d %H:%M:%S UTC"),
            record.download_mbps,
            record.upload_mbps,
            record.ping_ms,
            escape(&record.server_name),
            escape(&record.server_location),
        );
    }

    let body = if records.is_empty() {
        "<p>No results yet.</p>".to_string()
    } else {
        format!(
            "<table>\
             <tr><th>Timestamp</th><th>Download (Mbps)</th><th>Upload (Mbps)</th>\
             <th>Ping (ms)</th><th>Server</th><th>Location</th></tr>{}</table>",
            rows
        )
    };

    format!(
        "<!DOCTYPE html><html><head><title>netpulse</title>\
         <style>body{{font-family:sans-serif;margin:2em}}\
         table{{border-collapse:collapse}}\
         td,th{{border:1px solid #ccc;padding:0.4em 0.8em;text-align:left}}</style>\
         </head><body><h1>Speed Test Results</h1>{}</body></html>",
        body
    )
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Create dashboard routes
pub fn routes() -> Router {
    Router::new().route("/", get(show_results))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn sample_record(id: i64, server_name: &str) -> MeasurementRecord {
        MeasurementRecord {
            id,
            timestamp: Utc::now(),
            download_mbps: 100.5,
            upload_mbps: 20.1,
            ping_ms: 15.3,
            server_name: server_name.to_string(),
            server_location: "Metropolis, US".to_string(),
        }
    }

    #[test]
    fn test_render_empty_page() {
        let html = render_page(&[]);
        assert!(html.contains("No results yet."));
        assert!(!html.contains("<table>"));
    }

    #[test]
    fn test_render_page_with_records() {
        let html = render_page(&[sample_record(1, "ACME")]);
        assert!(html.contains("<table>"));
        assert!(html.contains("100.50"));
        assert!(html.contains("20.10"));
        assert!(html.contains("15.3"));
        assert!(html.contains("ACME"));
        assert!(html.contains("Metropolis, US"));
    }

    #[test]
    fn test_render_escapes_server_fields() {
        let html = render_page(&[sample_record(1, "<script>alert(1)</script>")]);
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn test_escape_covers_quotes() {
        assert_eq!(escape(r#"ACME "Turbo" & Co"#), "ACME &quot;Turbo&quot; &amp; Co");
    }
}
