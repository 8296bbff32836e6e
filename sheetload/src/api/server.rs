//! Echo ingestion sink.
//!
//! A minimal stand-in for the real downstream service, honoring the same
//! transport contract the uploader speaks: a text payload of record lines
//! in, an error string plus accepted-object counts out. Useful as a local
//! sink for development and demos (`sheetload serve`).
//!
//! # API Endpoints
//!
//! | Method | Path         | Description                        |
//! |--------|--------------|------------------------------------|
//! | GET    | `/health`    | Health check                       |
//! | POST   | `/api/write` | Accept a batch payload, echo counts|
//! | GET    | `/api/logs`  | SSE stream for real-time logs      |

use axum::{
    http::{header, Method},
    response::{sse::Event, Json, Sse},
    routing::{get, post},
    Router,
};
use futures::stream::Stream;
use serde_json::{json, Value};
use std::{convert::Infallible, net::SocketAddr, time::Duration};
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::StreamExt as _;
use tower_http::cors::CorsLayer;
use uuid::Uuid;

use super::logs::{log_info, LOG_BROADCASTER};
use crate::upload::SinkResponse;

/// Start the echo sink.
pub async fn start_server(port: u16) -> Result<(), Box<dyn std::error::Error>> {
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT]);

    let app = Router::new()
        .route("/", get(health))
        .route("/health", get(health))
        .route("/api/write", post(write))
        .route("/api/logs", get(sse_logs))
        .layer(cors);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    println!("🚀 Sheetload echo sink listening on http://localhost:{}", port);
    println!("   POST /api/write - Accept a batch payload");
    println!("   GET  /api/logs  - SSE log stream");
    println!("   GET  /health    - Health check");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Health check endpoint
async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "sheetload",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "write": "POST /api/write",
            "logs": "GET /api/logs (SSE)"
        }
    }))
}

/// Accept a batch payload and echo back how much of it was counted.
async fn write(body: String) -> Json<SinkResponse> {
    let request_id = Uuid::new_v4();
    let objects = body.lines().filter(|line| !line.trim().is_empty()).count() as u64;
    log_info(format!(
        "write {}: accepted {} objects ({} bytes)",
        request_id,
        objects,
        body.len()
    ));

    Json(SinkResponse {
        error: String::new(),
        points: 0,
        objects,
    })
}

/// SSE endpoint for real-time log streaming
async fn sse_logs() -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = LOG_BROADCASTER.subscribe();

    let stream = BroadcastStream::new(rx).filter_map(|result| match result {
        Ok(entry) => {
            let json = serde_json::to_string(&entry).ok()?;
            Some(Ok(Event::default().data(json)))
        }
        Err(_) => None,
    });

    Sse::new(stream).keep_alive(
        axum::response::sse::KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("keep-alive"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_write_counts_non_blank_lines() {
        let response = write("a,name=x message={}\nb,name=y message={}\n\n".to_string()).await;
        assert_eq!(response.0.objects, 2);
        assert_eq!(response.0.points, 0);
        assert!(response.0.error.is_empty());
    }

    #[tokio::test]
    async fn test_write_empty_payload() {
        let response = write(String::new()).await;
        assert_eq!(response.0.objects, 0);
    }

    #[tokio::test]
    async fn test_health_reports_service() {
        let response = health().await;
        assert_eq!(response.0["status"], "ok");
        assert_eq!(response.0["service"], "sheetload");
    }
}
