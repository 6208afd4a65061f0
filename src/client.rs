// Copyright (c) 2025 - Cowboy AI, Inc.
//! Request/Response Client
//!
//! Sends [`RequestEnvelope`]s and matches incoming [`ResponseEnvelope`]s to
//! the waiting caller by correlation id. A background router task owns the
//! response stream; each caller waits on its own oneshot with a deadline.
//!
//! ```text
//! caller → pending[correlation_id] = oneshot → requests channel
//! responses channel → router → pending.remove(correlation_id).send(response)
//! ```

use chrono::{NaiveDate, NaiveTime};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::{mpsc, oneshot, Mutex};
use tokio::task::JoinHandle;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::config::ParkingConfig;
use crate::dispatch::ParkingDispatcher;
use crate::ledger::LedgerStore;
use crate::protocol::{ParkingRequest, ParkingResponse, RequestEnvelope, ResponseEnvelope};

type PendingMap = Arc<Mutex<HashMap<Uuid, oneshot::Sender<ParkingResponse>>>>;

/// Client-side failures. Engine errors arrive as [`ParkingResponse::Error`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ClientError {
    #[error("No response to {correlation_id} within {after:?}")]
    Timeout { correlation_id: Uuid, after: Duration },

    #[error("Engine connection closed")]
    Disconnected,
}

/// Correlating client over a pair of channels
pub struct ParkingClient {
    requests: mpsc::Sender<RequestEnvelope>,
    pending: PendingMap,
    default_timeout: Duration,
    router: JoinHandle<()>,
}

impl ParkingClient {
    /// Start routing `responses` to callers
    pub fn new(
        requests: mpsc::Sender<RequestEnvelope>,
        mut responses: mpsc::Receiver<ResponseEnvelope>,
        default_timeout: Duration,
    ) -> Self {
        let pending: PendingMap = Arc::new(Mutex::new(HashMap::new()));

        let router_pending = Arc::clone(&pending);
        let router = tokio::spawn(async move {
            while let Some(envelope) = responses.recv().await {
                let waiter = router_pending.lock().await.remove(&envelope.correlation_id);
                match waiter {
                    Some(tx) => {
                        // Receiver gone means the caller already timed out
                        let _ = tx.send(envelope.response);
                    }
                    None => warn!(
                        correlation_id = %envelope.correlation_id,
                        "Response with no waiting request"
                    ),
                }
            }
            // Closing the senders wakes every waiter with Disconnected
            router_pending.lock().await.clear();
            debug!("Response stream closed");
        });

        Self {
            requests,
            pending,
            default_timeout,
            router,
        }
    }

    /// Client wired to a dispatcher running on this runtime
    pub fn in_process<S: LedgerStore + 'static>(
        dispatcher: ParkingDispatcher<S>,
        buffer: usize,
        default_timeout: Duration,
    ) -> (Self, JoinHandle<()>) {
        let (request_tx, request_rx) = mpsc::channel(buffer);
        let (response_tx, response_rx) = mpsc::channel(buffer);

        let server = tokio::spawn(async move { dispatcher.serve(request_rx, response_tx).await });
        (Self::new(request_tx, response_rx, default_timeout), server)
    }

    /// In-process client waiting up to `config.request_timeout` per request
    pub fn from_config<S: LedgerStore + 'static>(
        dispatcher: ParkingDispatcher<S>,
        buffer: usize,
        config: &ParkingConfig,
    ) -> (Self, JoinHandle<()>) {
        Self::in_process(dispatcher, buffer, config.request_timeout)
    }

    /// Timeout applied by [`ParkingClient::request`]
    pub fn default_timeout(&self) -> Duration {
        self.default_timeout
    }

    /// Send a request and wait up to the default timeout
    pub async fn request(&self, request: ParkingRequest) -> Result<ParkingResponse, ClientError> {
        self.request_with_timeout(request, self.default_timeout).await
    }

    /// Send a request and wait up to `timeout`
    pub async fn request_with_timeout(
        &self,
        request: ParkingRequest,
        timeout: Duration,
    ) -> Result<ParkingResponse, ClientError> {
        let envelope = RequestEnvelope::new(request);
        let correlation_id = envelope.correlation_id;

        let (tx, rx) = oneshot::channel();
        self.pending.lock().await.insert(correlation_id, tx);

        if self.requests.send(envelope).await.is_err() {
            self.pending.lock().await.remove(&correlation_id);
            return Err(ClientError::Disconnected);
        }

        match tokio::time::timeout(timeout, rx).await {
            Ok(Ok(response)) => Ok(response),
            Ok(Err(_)) => Err(ClientError::Disconnected),
            Err(_) => {
                self.pending.lock().await.remove(&correlation_id);
                warn!(%correlation_id, ?timeout, "Request timed out");
                Err(ClientError::Timeout {
                    correlation_id,
                    after: timeout,
                })
            }
        }
    }

    pub async fn park_now(&self, customer_id: impl Into<String>) -> Result<ParkingResponse, ClientError> {
        self.request(ParkingRequest::ParkNow {
            customer_id: customer_id.into(),
        })
        .await
    }

    pub async fn check_availability(&self) -> Result<ParkingResponse, ClientError> {
        self.request(ParkingRequest::CheckAvailability).await
    }

    pub async fn pre_book(
        &self,
        customer_id: impl Into<String>,
        date: NaiveDate,
        start_time: NaiveTime,
    ) -> Result<ParkingResponse, ClientError> {
        self.request(ParkingRequest::PreBook {
            customer_id: customer_id.into(),
            date,
            start_time,
        })
        .await
    }

    pub async fn summary(&self) -> Result<ParkingResponse, ClientError> {
        self.request(ParkingRequest::GetSummary).await
    }

    pub async fn time_frames(&self, date: NaiveDate) -> Result<ParkingResponse, ClientError> {
        self.request(ParkingRequest::ListTimeFrames { date }).await
    }

    pub async fn ping(&self) -> Result<ParkingResponse, ClientError> {
        self.request(ParkingRequest::Ping).await
    }

    /// Requests still waiting for a response
    pub async fn pending_requests(&self) -> usize {
        self.pending.lock().await.len()
    }
}

impl Drop for ParkingClient {
    fn drop(&mut self) {
        self.router.abort();
    }
}
