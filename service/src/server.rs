//! HTTP surface of the quote service.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use tokio::net::TcpListener;
use tracing::info;
use uuid::Uuid;

use cambio_common::QuoteBody;

use crate::processor::QuoteProcessor;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub processor: Arc<QuoteProcessor>,
}

/// Build the router for the quote service.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/cotacao", get(cotacao_handler))
        .with_state(state)
}

/// `GET /cotacao`: fetch, persist, and return the current quote.
///
/// Internal failures all collapse to one opaque 500; which stage failed is
/// visible only in server-side logs.
async fn cotacao_handler(State(state): State<AppState>) -> Response {
    let request_id = Uuid::new_v4();

    match state.processor.handle(request_id).await {
        Ok(quote) => (StatusCode::OK, Json(QuoteBody::from(quote))).into_response(),
        Err(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal error").into_response(),
    }
}

/// Run the server on the given listener until a shutdown signal arrives.
pub async fn run(listener: TcpListener, state: AppState) -> std::io::Result<()> {
    let addr = listener.local_addr()?;
    info!(address = %addr, "Quote service listening");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Quote service stopped");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C).
async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_err() {
        tracing::error!("Failed to install Ctrl+C handler");
        return;
    }
    info!("Shutdown signal received");
}
