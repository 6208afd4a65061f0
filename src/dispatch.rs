// Copyright (c) 2025 - Cowboy AI, Inc.
//! Request Dispatcher
//!
//! Routes each [`ParkingRequest`] to its service and turns every outcome,
//! including errors, into a [`ParkingResponse`].
//!
//! ```text
//! mpsc<RequestEnvelope> → serve → tokio task per envelope → handle
//!                                                            ↓
//!                                   mpsc<ResponseEnvelope> ← reply
//! ```

use futures::future::join_all;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::config::ParkingConfig;
use crate::ledger::{AvailabilityLedger, LedgerStore};
use crate::protocol::{ParkingRequest, ParkingResponse, RequestEnvelope, ResponseEnvelope};
use crate::service::{
    Clock, CommitPolicy, ImmediateParkingService, PrebookingService, SummaryService,
};

pub struct ParkingDispatcher<S: LedgerStore> {
    park_now: ImmediateParkingService<S>,
    prebooking: PrebookingService<S>,
    summary: SummaryService<S>,
}

impl<S: LedgerStore> Clone for ParkingDispatcher<S> {
    fn clone(&self) -> Self {
        Self {
            park_now: self.park_now.clone(),
            prebooking: self.prebooking.clone(),
            summary: self.summary.clone(),
        }
    }
}

impl<S: LedgerStore + 'static> ParkingDispatcher<S> {
    /// Build all services over one shared store and clock
    pub fn new(store: Arc<S>, clock: Arc<dyn Clock>, config: &ParkingConfig) -> Self {
        let ledger = AvailabilityLedger::new(store);
        let policy = CommitPolicy::from(config);

        Self {
            park_now: ImmediateParkingService::new(ledger.clone(), Arc::clone(&clock), policy),
            prebooking: PrebookingService::new(
                ledger.clone(),
                Arc::clone(&clock),
                policy,
                config.lookahead_days,
            ),
            summary: SummaryService::new(ledger, clock),
        }
    }

    /// Execute one request
    pub async fn handle(&self, request: ParkingRequest) -> ParkingResponse {
        let result = match request {
            ParkingRequest::ParkNow { customer_id } => self
                .park_now
                .park_now(&customer_id)
                .await
                .map(ParkingResponse::Confirmation),
            ParkingRequest::CheckAvailability => self
                .park_now
                .check_availability()
                .await
                .map(ParkingResponse::from),
            ParkingRequest::PreBook {
                customer_id,
                date,
                start_time,
            } => self
                .prebooking
                .pre_book(&customer_id, date, start_time)
                .await
                .map(ParkingResponse::Confirmation),
            ParkingRequest::GetSummary => self
                .summary
                .summary_now()
                .await
                .map(ParkingResponse::Summary),
            ParkingRequest::ListTimeFrames { date } => self
                .prebooking
                .time_frames(date)
                .await
                .map(|frames| ParkingResponse::time_frames(date, &frames)),
            ParkingRequest::Ping => Ok(ParkingResponse::Pong),
        };

        result.unwrap_or_else(|e| ParkingResponse::error(&e))
    }

    /// Execute one request and address the response to it
    pub async fn handle_envelope(&self, envelope: RequestEnvelope) -> ResponseEnvelope {
        let RequestEnvelope {
            correlation_id,
            request,
        } = envelope;
        let name = request.name();
        debug!(%correlation_id, request = name, "Handling request");

        let response = self.handle(request).await;
        if let Some(kind) = response.error_kind() {
            debug!(%correlation_id, request = name, ?kind, "Request failed");
        }
        ResponseEnvelope {
            correlation_id,
            response,
        }
    }

    /// Handle envelopes until `requests` closes, one task per envelope
    ///
    /// Returns after every in-flight request has been answered.
    pub async fn serve(
        &self,
        mut requests: mpsc::Receiver<RequestEnvelope>,
        responses: mpsc::Sender<ResponseEnvelope>,
    ) {
        info!("Dispatcher started");
        let mut in_flight: Vec<JoinHandle<()>> = Vec::new();

        while let Some(envelope) = requests.recv().await {
            in_flight.retain(|handle| !handle.is_finished());

            let dispatcher = self.clone();
            let responses = responses.clone();
            in_flight.push(tokio::spawn(async move {
                let reply = dispatcher.handle_envelope(envelope).await;
                let correlation_id = reply.correlation_id;
                if responses.send(reply).await.is_err() {
                    warn!(%correlation_id, "Response channel closed, dropping reply");
                }
            }));
        }

        let pending = in_flight.len();
        for outcome in join_all(in_flight).await {
            if let Err(e) = outcome {
                warn!("Request task failed: {}", e);
            }
        }
        info!(drained = pending, "Dispatcher stopped");
    }
}
