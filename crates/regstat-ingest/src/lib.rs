//! Event-to-update transformation and batch application.
//!
//! This crate is the heart of the collector. [`build_update`] maps one
//! registry event to the field updates it implies, or rejects it;
//! [`EnvelopeIntake`] applies a whole envelope of events against a
//! [`regstat_store::StatsStore`] in delivery order, stopping at the first
//! failure and reporting its index.
//!
//! # Invariants
//!
//! - `build_update` is pure: no side effects, same input, same output.
//! - Only manifest-level push and pull events produce updates; blob
//!   transfers and unknown actions are rejected before any store call.
//! - Repeated delivery of the same event re-converges the min/max and
//!   actor-set fields; the push/pull counters are additive and therefore
//!   NOT idempotent under redelivery.
//! - Partial application is visible: events before a failure stay applied,
//!   and the error names the failing index.

pub mod builder;
pub mod error;
pub mod intake;

pub use builder::build_update;
pub use error::{IngestError, IngestResult, RejectError};
pub use intake::{BatchSummary, EnvelopeIntake};
