//! Foundation types for the registry statistics collector.
//!
//! This crate defines the wire-facing notification types and the shapes the
//! collector persists or hands to a store. Every other `regstat` crate
//! depends on it.
//!
//! # Key Types
//!
//! - [`RegistryEvent`] — one decoded registry notification
//! - [`EventAction`] — closed action enum, decided once at decode time
//! - [`Envelope`] — an ordered batch of events from one inbound request
//! - [`RepositoryStats`] — the persisted per-repository aggregate
//! - [`UpdateDocument`] — field updates for one upsert, partitioned by
//!   merge strategy

pub mod event;
pub mod stats;
pub mod update;

pub use event::{
    Envelope, EventAction, EventActor, EventTarget, RegistryEvent, EVENTS_MEDIA_TYPE,
    MANIFEST_MEDIA_TYPE,
};
pub use stats::RepositoryStats;
pub use update::{far_future, far_past, InsertDefaults, TimestampField, UpdateDocument};
