use async_trait::async_trait;

use regstat_types::UpdateDocument;

use crate::error::StoreResult;

/// Which branch an upsert took.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UpsertOutcome {
    /// `true` if a document for the repository already existed and the
    /// update merged into it; `false` if the insert branch created one.
    pub matched_existing: bool,
}

/// Keyed document store for per-repository statistics.
///
/// All implementations must satisfy these invariants:
/// - `repository_name` is unique across the store; if two concurrent
///   inserts race for a never-seen repository, the enforcing layer must
///   collapse them to a single document (last writer merges, not
///   overwrites).
/// - `upsert` applies every merge group of one update atomically per
///   document; concurrent updates to the same repository never observe a
///   partially merged document.
/// - Insert-only fields are applied only when no document matched.
/// - `remove` of an absent repository is a successful no-op.
/// - Writes are acknowledged only after reaching stable storage.
#[async_trait]
pub trait StatsStore: Send + Sync {
    /// Insert-or-merge one update. The update's `repository_name` is the
    /// selector.
    async fn upsert(&self, update: &UpdateDocument) -> StoreResult<UpsertOutcome>;

    /// Delete the document for `repository`, returning whether one existed.
    async fn remove(&self, repository: &str) -> StoreResult<bool>;
}
