// Copyright (c) 2025 - Cowboy AI, Inc.
//! Property-Based Tests Module
//!
//! - `slot_clock`: rounding and range helpers
//! - `planner_selection`: run length, tie-break and determinism
//! - `ledger_invariants`: counts and double booking after arbitrary writes

mod ledger_invariants;
mod planner_selection;
mod slot_clock;
