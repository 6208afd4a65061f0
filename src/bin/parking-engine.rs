// Copyright (c) 2025 - Cowboy AI, Inc.
//! Parking Engine
//!
//! Serves the parking request/response protocol over stdio:
//! - one JSON `RequestEnvelope` per line on stdin
//! - one JSON `ResponseEnvelope` per line on stdout
//! - logs on stderr
//!
//! Run with: cargo run --bin parking-engine
//!
//! ```text
//! echo '{"correlation_id":"00000000-0000-0000-0000-000000000001","request":{"type":"Ping"}}' \
//!     | cargo run --bin parking-engine
//! ```
//!
//! Configuration comes from `PARKING_*` environment variables, see
//! `parking_ledger::config`.

use anyhow::{Context, Result};
use parking_ledger::{
    AvailabilityLedger, Clock, InMemoryLedgerStore, ParkingConfig, ParkingDispatcher,
    ParkingResponse, RequestEnvelope, ResponseEnvelope, SystemClock,
};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

const CHANNEL_BUFFER: usize = 256;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    info!("Starting parking engine");

    let config = ParkingConfig::from_env().context("Invalid PARKING_* configuration")?;
    info!("Configuration loaded:");
    info!("  - Lookahead days: {}", config.lookahead_days);
    info!("  - Commit timeout: {:?}", config.commit_timeout);
    info!("  - Max conflict retries: {}", config.max_conflict_retries);
    info!("  - Request timeout: {:?}", config.request_timeout);

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let store = Arc::new(InMemoryLedgerStore::new());

    AvailabilityLedger::new(Arc::clone(&store))
        .ensure_horizon(clock.today(), config.lookahead_days)
        .await
        .context("Failed to prepare ledger horizon")?;

    let dispatcher = ParkingDispatcher::new(store, clock, &config);
    let (request_tx, request_rx) = mpsc::channel::<RequestEnvelope>(CHANNEL_BUFFER);
    let (response_tx, mut response_rx) = mpsc::channel::<ResponseEnvelope>(CHANNEL_BUFFER);

    let server = {
        let response_tx = response_tx.clone();
        tokio::spawn(async move { dispatcher.serve(request_rx, response_tx).await })
    };

    let writer = tokio::spawn(async move {
        let mut stdout = tokio::io::stdout();
        while let Some(reply) = response_rx.recv().await {
            let mut line = serde_json::to_vec(&reply).context("Failed to encode response")?;
            line.push(b'\n');
            stdout.write_all(&line).await.context("Failed to write response")?;
            stdout.flush().await.context("Failed to flush stdout")?;
        }
        anyhow::Ok(())
    });

    info!("Reading requests from stdin");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut received = 0u64;

    while let Some(line) = lines.next_line().await.context("Failed to read stdin")? {
        if line.trim().is_empty() {
            continue;
        }

        match serde_json::from_str::<RequestEnvelope>(&line) {
            Ok(envelope) => {
                received += 1;
                debug!(correlation_id = %envelope.correlation_id, "Request received");
                if request_tx.send(envelope).await.is_err() {
                    error!("Dispatcher stopped accepting requests");
                    break;
                }
            }
            Err(e) => {
                warn!("Malformed request: {}", e);
                let reply = ResponseEnvelope {
                    correlation_id: Uuid::nil(),
                    response: ParkingResponse::bad_request(e.to_string()),
                };
                if response_tx.send(reply).await.is_err() {
                    break;
                }
            }
        }
    }

    info!(received, "Input closed, draining in-flight requests");
    drop(request_tx);
    drop(response_tx);

    server.await.context("Dispatcher task panicked")?;
    writer.await.context("Writer task panicked")??;

    info!("Parking engine stopped");
    Ok(())
}
