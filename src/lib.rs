// Copyright (c) 2025 - Cowboy AI, Inc.
//! Parking spot assignment engine
//!
//! Assigns spots of a 100-spot lot to customers in 15-minute slots, either
//! starting now or prebooked within a short horizon. Each assignment is the
//! longest free run of up to four hours, lowest spot number first, committed
//! atomically against a slot-based availability ledger.
//!
//! # Layers
//!
//! ```text
//! protocol / client ── dispatch ── service ── planner (pure)
//!                                     └────── ledger ── LedgerStore
//! ```

pub mod client;
pub mod config;
pub mod dispatch;
pub mod domain;
pub mod errors;
pub mod ledger;
pub mod planner;
pub mod protocol;
pub mod service;

// Re-export commonly used types
pub use client::{ClientError, ParkingClient};
pub use config::ParkingConfig;
pub use dispatch::ParkingDispatcher;
pub use errors::{ConfigError, ParkingError, ParkingResult};
pub use ledger::{AvailabilityLedger, InMemoryLedgerStore, LedgerStore};
pub use protocol::{ErrorKind, ParkingRequest, ParkingResponse, RequestEnvelope, ResponseEnvelope};
pub use service::{
    Clock, Confirmation, FixedClock, ImmediateParkingService, PrebookingService, SummaryService,
    SystemClock,
};
