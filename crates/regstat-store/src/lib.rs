//! Statistics document storage for the registry collector.
//!
//! One document per repository, keyed by a unique `repository_name`. The
//! only operations the collector needs are an insert-or-merge upsert and an
//! idempotent remove; everything else (queries, rankings) belongs to the
//! consumers reading the collection directly.
//!
//! # Backends
//!
//! All backends implement the [`StatsStore`] trait:
//!
//! - [`MongoStatsStore`] — production adapter over a MongoDB collection
//! - [`InMemoryStatsStore`] — `HashMap`-based store for tests and embedding
//!
//! # Design Rules
//!
//! 1. `repository_name` is unique across the store; concurrent inserts for
//!    a never-seen repository collapse to one document.
//! 2. An upsert applies all merge groups of one update atomically per
//!    document.
//! 3. Insert-only fields apply only when no document matched.
//! 4. Removing an absent repository is a successful no-op.
//! 5. Writes are acknowledged only once durable.

pub mod config;
pub mod error;
pub mod memory;
pub mod mongo;
pub mod traits;

pub use config::StoreConfig;
pub use error::{StoreError, StoreResult};
pub use memory::InMemoryStatsStore;
pub use mongo::MongoStatsStore;
pub use traits::{StatsStore, UpsertOutcome};
