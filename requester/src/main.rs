//! Cambio Requester Binary
//!
//! Fetches the current quote from the quote service and writes it to a
//! local artifact, all under one 300 ms round-trip budget.

use std::path::PathBuf;

use clap::Parser;
use tracing::error;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cambio_common::budget::constants;
use cambio_common::{Budget, QuoteError};
use cambio_requester::{fetch_bid, write_artifact};

/// Cambio requester CLI
#[derive(Parser, Debug)]
#[command(name = "requester")]
#[command(about = "Fetch the current USD-BRL quote and write it to a local artifact")]
struct Args {
    /// Quote service endpoint
    #[arg(long, default_value = "http://localhost:8080/cotacao")]
    service_url: String,

    /// Artifact output path
    #[arg(long, default_value = "cotacao.txt")]
    output: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    // The budget covers the entire round trip and starts at process start.
    let budget = Budget::new(constants::round_trip_budget());

    let client = reqwest::Client::builder()
        .build()
        .map_err(|e| QuoteError::RequestConstruction(e.to_string()))?;

    let bid = match fetch_bid(&client, &args.service_url, &budget).await {
        Ok(bid) => bid,
        Err(e) => {
            error!(
                service_url = %args.service_url,
                error = %e,
                deadline_exceeded = e.is_deadline_exceeded(),
                "Quote request failed"
            );
            return Err(e.into());
        }
    };

    write_artifact(&args.output, &bid)?;
    Ok(())
}
