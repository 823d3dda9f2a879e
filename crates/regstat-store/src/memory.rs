use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use regstat_types::{RepositoryStats, TimestampField, UpdateDocument};

use crate::error::StoreResult;
use crate::traits::{StatsStore, UpsertOutcome};

/// In-memory, HashMap-based statistics store.
///
/// Intended for tests and embedding. Implements the same merge semantics as
/// the MongoDB adapter: insert-only fields on the insert branch only,
/// min/max convergence for timestamps, set-semantics actors, additive
/// counters. Documents are held behind a `RwLock`, which also provides the
/// per-document atomicity the [`StatsStore`] contract requires.
pub struct InMemoryStatsStore {
    docs: RwLock<HashMap<String, RepositoryStats>>,
}

impl InMemoryStatsStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self {
            docs: RwLock::new(HashMap::new()),
        }
    }

    /// Snapshot the document for `repository`, if any.
    pub fn get(&self, repository: &str) -> Option<RepositoryStats> {
        self.docs
            .read()
            .expect("lock poisoned")
            .get(repository)
            .cloned()
    }

    /// Number of statistics documents currently stored.
    pub fn len(&self) -> usize {
        self.docs.read().expect("lock poisoned").len()
    }

    /// Returns `true` if no documents are stored.
    pub fn is_empty(&self) -> bool {
        self.docs.read().expect("lock poisoned").is_empty()
    }

    /// Remove all documents.
    pub fn clear(&self) {
        self.docs.write().expect("lock poisoned").clear();
    }
}

impl Default for InMemoryStatsStore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for InMemoryStatsStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryStatsStore")
            .field("document_count", &self.len())
            .finish()
    }
}

fn field_mut(stats: &mut RepositoryStats, field: TimestampField) -> &mut DateTime<Utc> {
    match field {
        TimestampField::FirstPushed => &mut stats.first_pushed,
        TimestampField::LastPushed => &mut stats.last_pushed,
        TimestampField::FirstPulled => &mut stats.first_pulled,
        TimestampField::LastPulled => &mut stats.last_pulled,
    }
}

/// Insert branch: every group applies, and a previously absent timestamp
/// simply takes the incoming value. The sentinel seeds and the acting
/// min/max pair together cover all four timestamp fields.
fn insert_document(update: &UpdateDocument) -> RepositoryStats {
    let placeholder = regstat_types::far_past();
    let mut stats = RepositoryStats {
        repository_name: update.repository_name.clone(),
        first_pushed: placeholder,
        last_pushed: placeholder,
        first_pulled: placeholder,
        last_pulled: placeholder,
        num_pushes: update.push_increment,
        num_pulls: update.pull_increment,
        num_stars: update.on_insert.num_stars,
        actors: vec![update.actor.clone()],
    };
    for (field, ts) in &update.on_insert.sentinels {
        *field_mut(&mut stats, *field) = *ts;
    }
    for (field, ts) in update.mins.iter().chain(&update.maxs) {
        *field_mut(&mut stats, *field) = *ts;
    }
    stats
}

/// Merge branch: insert-only fields are skipped because the document
/// already exists.
fn merge_document(stats: &mut RepositoryStats, update: &UpdateDocument) {
    for (field, ts) in &update.mins {
        let slot = field_mut(stats, *field);
        if *ts < *slot {
            *slot = *ts;
        }
    }
    for (field, ts) in &update.maxs {
        let slot = field_mut(stats, *field);
        if *ts > *slot {
            *slot = *ts;
        }
    }
    if !stats.actors.iter().any(|a| a == &update.actor) {
        stats.actors.push(update.actor.clone());
    }
    stats.num_pushes += update.push_increment;
    stats.num_pulls += update.pull_increment;
}

#[async_trait]
impl StatsStore for InMemoryStatsStore {
    async fn upsert(&self, update: &UpdateDocument) -> StoreResult<UpsertOutcome> {
        let mut docs = self.docs.write().expect("lock poisoned");
        match docs.entry(update.repository_name.clone()) {
            Entry::Occupied(mut entry) => {
                merge_document(entry.get_mut(), update);
                Ok(UpsertOutcome {
                    matched_existing: true,
                })
            }
            Entry::Vacant(entry) => {
                entry.insert(insert_document(update));
                Ok(UpsertOutcome {
                    matched_existing: false,
                })
            }
        }
    }

    async fn remove(&self, repository: &str) -> StoreResult<bool> {
        let mut docs = self.docs.write().expect("lock poisoned");
        Ok(docs.remove(repository).is_some())
    }
}
