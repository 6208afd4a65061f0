// Copyright (c) 2025 - Cowboy AI, Inc.
//! Request/Response Contract
//!
//! Messages exchanged with the engine, serialized as JSON with an explicit
//! `"type"` discriminant. Every message travels in an envelope carrying a
//! correlation id so responses can be matched to requests on any transport.
//!
//! # Wire Format
//!
//! ```json
//! {"correlation_id":"0190...","request":{"type":"PreBook","customer_id":"C2","date":"2026-03-03","start_time":"09:00:00"}}
//! {"correlation_id":"0190...","response":{"type":"Confirmation","spot":1,...}}
//! ```

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{AvailabilitySummary, SpotNumber, TimeFrame};
use crate::errors::ParkingError;
use crate::service::{AvailabilityReport, Confirmation};

/// Requests understood by the engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ParkingRequest {
    /// Book from the current slot
    ParkNow { customer_id: String },
    /// Best spot right now, without booking
    CheckAvailability,
    /// Book from a future slot
    PreBook {
        customer_id: String,
        date: NaiveDate,
        start_time: NaiveTime,
    },
    /// Occupancy at the current slot
    GetSummary,
    /// Bookable start times for a date
    ListTimeFrames { date: NaiveDate },
    /// Liveness check
    Ping,
}

impl ParkingRequest {
    pub fn name(&self) -> &'static str {
        match self {
            ParkingRequest::ParkNow { .. } => "ParkNow",
            ParkingRequest::CheckAvailability => "CheckAvailability",
            ParkingRequest::PreBook { .. } => "PreBook",
            ParkingRequest::GetSummary => "GetSummary",
            ParkingRequest::ListTimeFrames { .. } => "ListTimeFrames",
            ParkingRequest::Ping => "Ping",
        }
    }
}

/// One bookable start time with its best assignment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookableFrame {
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub spot: SpotNumber,
    pub duration_hours: f64,
    pub free_spots: u32,
}

impl From<&TimeFrame> for BookableFrame {
    fn from(frame: &TimeFrame) -> Self {
        Self {
            start_time: frame.assignment.start_time(),
            end_time: frame.assignment.end_time(),
            spot: frame.assignment.spot,
            duration_hours: frame.assignment.duration_hours(),
            free_spots: frame.free_spots,
        }
    }
}

/// Error categories, so clients can decide on retry without parsing text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Validation,
    NoAvailability,
    Conflict,
    Timeout,
    Persistence,
    /// Message could not be decoded
    BadRequest,
}

impl ErrorKind {
    pub fn is_retryable(self) -> bool {
        matches!(self, ErrorKind::Conflict)
    }
}

impl From<&ParkingError> for ErrorKind {
    fn from(err: &ParkingError) -> Self {
        match err {
            ParkingError::Validation(_) => ErrorKind::Validation,
            ParkingError::NoAvailability { .. } => ErrorKind::NoAvailability,
            ParkingError::Conflict { .. } => ErrorKind::Conflict,
            ParkingError::Timeout { .. } => ErrorKind::Timeout,
            ParkingError::Persistence(_) => ErrorKind::Persistence,
        }
    }
}

/// Responses produced by the engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ParkingResponse {
    Confirmation(Confirmation),
    SpotAvailability {
        spot: SpotNumber,
        duration_hours: f64,
        available_from: NaiveTime,
        free_until: NaiveTime,
        total_available: u32,
    },
    Summary(AvailabilitySummary),
    TimeFrames {
        date: NaiveDate,
        frames: Vec<BookableFrame>,
    },
    Pong,
    Error { kind: ErrorKind, message: String },
}

impl ParkingResponse {
    pub fn error(err: &ParkingError) -> Self {
        ParkingResponse::Error {
            kind: ErrorKind::from(err),
            message: err.to_string(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        ParkingResponse::Error {
            kind: ErrorKind::BadRequest,
            message: message.into(),
        }
    }

    pub fn time_frames(date: NaiveDate, frames: &[TimeFrame]) -> Self {
        ParkingResponse::TimeFrames {
            date,
            frames: frames.iter().map(BookableFrame::from).collect(),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, ParkingResponse::Error { .. })
    }

    /// Error category, `None` for successful responses
    pub fn error_kind(&self) -> Option<ErrorKind> {
        match self {
            ParkingResponse::Error { kind, .. } => Some(*kind),
            _ => None,
        }
    }
}

impl From<AvailabilityReport> for ParkingResponse {
    fn from(report: AvailabilityReport) -> Self {
        ParkingResponse::SpotAvailability {
            spot: report.best.spot,
            duration_hours: report.best.duration_hours(),
            available_from: report.best.available_from.start_time(),
            free_until: report.best.free_until(),
            total_available: report.total_available,
        }
    }
}

/// Request with its correlation id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestEnvelope {
    pub correlation_id: Uuid,
    pub request: ParkingRequest,
}

impl RequestEnvelope {
    /// Wrap a request under a fresh correlation id
    pub fn new(request: ParkingRequest) -> Self {
        Self {
            correlation_id: Uuid::now_v7(),
            request,
        }
    }

    /// Response addressed to this request
    pub fn reply(&self, response: ParkingResponse) -> ResponseEnvelope {
        ResponseEnvelope {
            correlation_id: self.correlation_id,
            response,
        }
    }
}

/// Response with the correlation id of its request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseEnvelope {
    pub correlation_id: Uuid,
    pub response: ParkingResponse,
}
