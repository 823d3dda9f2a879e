use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Persisted per-repository aggregate, one document per distinct repository
/// name.
///
/// Owned exclusively by the statistics store; the collector never caches it
/// in memory. Created by the first accepted push or pull event (a document
/// with zero pushes and zero pulls is never created), mutated by every
/// subsequent accepted event, and deleted by a delete-action event.
///
/// All four timestamps are present from creation on: the pair belonging to
/// the creating action holds the event instant, the opposite pair holds the
/// sentinel seeds (see [`crate::update`]).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RepositoryStats {
    /// Unique key across the store.
    pub repository_name: String,
    pub first_pushed: DateTime<Utc>,
    pub last_pushed: DateTime<Utc>,
    pub first_pulled: DateTime<Utc>,
    pub last_pulled: DateTime<Utc>,
    /// Monotonically non-decreasing.
    pub num_pushes: u64,
    /// Monotonically non-decreasing.
    pub num_pulls: u64,
    /// Set at creation, never modified by the collector.
    pub num_stars: u64,
    /// Distinct actor names that have ever acted on the repository.
    /// Set semantics; insertion order is irrelevant.
    pub actors: Vec<String>,
}
