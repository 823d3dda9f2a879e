use std::sync::Arc;

use tracing::debug;

use regstat_store::StatsStore;
use regstat_types::{Envelope, EventAction};

use crate::builder::build_update;
use crate::error::{IngestError, IngestResult, RejectError};

/// Outcome of applying one envelope.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BatchSummary {
    /// Events applied to the store (upserts and removes).
    pub applied: usize,
    /// Upserts that created a fresh statistics document.
    pub created: usize,
    /// Upserts that merged into an existing document.
    pub merged: usize,
    /// Delete events processed, whether or not a document existed.
    pub removed: usize,
}

/// Applies envelopes of registry events to the statistics store.
///
/// The store handle is injected at construction and shared for the process
/// lifetime; the intake itself keeps no state between envelopes, so one
/// instance can serve any number of concurrent requests.
pub struct EnvelopeIntake {
    store: Arc<dyn StatsStore>,
}

impl EnvelopeIntake {
    pub fn new(store: Arc<dyn StatsStore>) -> Self {
        Self { store }
    }

    /// Apply `envelope` to the store, one event at a time, in delivery
    /// order.
    ///
    /// Stops at the first rejected event or store failure. Events before
    /// the failing index are already durably applied and stay applied; the
    /// returned error carries that index so the caller can account for
    /// them. No retries happen here: the registry redelivers notifications
    /// it considers lost, and a redelivered event re-converges the min/max
    /// and actor-set fields while incrementing the push/pull counters
    /// again (counter inflation under at-least-once delivery is a known,
    /// accepted property).
    pub async fn apply(&self, envelope: &Envelope) -> IngestResult<BatchSummary> {
        let mut summary = BatchSummary::default();
        for (index, event) in envelope.events.iter().enumerate() {
            match &event.action {
                EventAction::Delete => {
                    let existed = self
                        .store
                        .remove(event.repository())
                        .await
                        .map_err(|source| IngestError::Store { index, source })?;
                    debug!(
                        repository = event.repository(),
                        existed, "removed statistics document"
                    );
                    summary.removed += 1;
                }
                EventAction::Push | EventAction::Pull => {
                    let update = build_update(event)
                        .map_err(|source| IngestError::Rejected { index, source })?;
                    let outcome = self
                        .store
                        .upsert(&update)
                        .await
                        .map_err(|source| IngestError::Store { index, source })?;
                    if outcome.matched_existing {
                        summary.merged += 1;
                    } else {
                        summary.created += 1;
                    }
                }
                EventAction::Unsupported(raw) => {
                    return Err(IngestError::Rejected {
                        index,
                        source: RejectError::UnsupportedAction(raw.clone()),
                    });
                }
            }
            summary.applied += 1;
        }
        debug!(
            applied = summary.applied,
            created = summary.created,
            merged = summary.merged,
            removed = summary.removed,
            "envelope applied"
        );
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};
    use regstat_store::InMemoryStatsStore;
    use regstat_types::{
        far_future, far_past, EventActor, EventTarget, RegistryEvent, MANIFEST_MEDIA_TYPE,
    };

    fn t(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2021, 6, 1, hour, 0, 0).unwrap()
    }

    fn event(
        action: EventAction,
        repository: &str,
        actor: &str,
        at: DateTime<Utc>,
    ) -> RegistryEvent {
        RegistryEvent {
            action,
            target: EventTarget {
                media_type: MANIFEST_MEDIA_TYPE.to_owned(),
                repository: repository.to_owned(),
            },
            actor: EventActor {
                name: actor.to_owned(),
            },
            timestamp: at,
        }
    }

    fn intake() -> (EnvelopeIntake, Arc<InMemoryStatsStore>) {
        let store = Arc::new(InMemoryStatsStore::new());
        (EnvelopeIntake::new(store.clone()), store)
    }

    #[tokio::test]
    async fn first_push_creates_document() {
        let (intake, store) = intake();
        let envelope = Envelope::new(vec![event(
            EventAction::Push,
            "library/test",
            "alice",
            t(9),
        )]);

        let summary = intake.apply(&envelope).await.unwrap();
        assert_eq!(
            summary,
            BatchSummary {
                applied: 1,
                created: 1,
                merged: 0,
                removed: 0
            }
        );

        let stats = store.get("library/test").unwrap();
        assert_eq!(stats.num_pushes, 1);
        assert_eq!(stats.num_pulls, 0);
        assert_eq!(stats.first_pushed, t(9));
        assert_eq!(stats.last_pushed, t(9));
        assert_eq!(stats.first_pulled, far_future());
        assert_eq!(stats.last_pulled, far_past());
        assert_eq!(stats.num_stars, 0);
        assert_eq!(stats.actors, vec!["alice".to_owned()]);
    }

    #[tokio::test]
    async fn push_then_pull_scenario() {
        // Push by alice at T1, pull by bob at T2 > T1, one document results.
        let (intake, store) = intake();
        let envelope = Envelope::new(vec![
            event(EventAction::Push, "library/test", "alice", t(9)),
            event(EventAction::Pull, "library/test", "bob", t(10)),
        ]);

        let summary = intake.apply(&envelope).await.unwrap();
        assert_eq!(summary.applied, 2);
        assert_eq!(summary.created, 1);
        assert_eq!(summary.merged, 1);

        let stats = store.get("library/test").unwrap();
        assert_eq!(stats.repository_name, "library/test");
        assert_eq!(stats.num_pushes, 1);
        assert_eq!(stats.num_pulls, 1);
        assert_eq!(stats.first_pushed, t(9));
        assert_eq!(stats.last_pushed, t(9));
        assert_eq!(stats.first_pulled, t(10));
        assert_eq!(stats.last_pulled, t(10));
        assert_eq!(stats.num_stars, 0);
        assert_eq!(stats.actors, vec!["alice".to_owned(), "bob".to_owned()]);
    }

    #[tokio::test]
    async fn counters_and_bounds_across_interleaving() {
        let (intake, store) = intake();
        let envelope = Envelope::new(vec![
            event(EventAction::Push, "a/b", "alice", t(12)),
            event(EventAction::Pull, "a/b", "bob", t(14)),
            event(EventAction::Push, "a/b", "carol", t(8)),
            event(EventAction::Pull, "a/b", "bob", t(10)),
            event(EventAction::Push, "a/b", "alice", t(16)),
        ]);

        intake.apply(&envelope).await.unwrap();

        let stats = store.get("a/b").unwrap();
        assert_eq!(stats.num_pushes, 3);
        assert_eq!(stats.num_pulls, 2);
        assert_eq!(stats.first_pushed, t(8));
        assert_eq!(stats.last_pushed, t(16));
        assert_eq!(stats.first_pulled, t(10));
        assert_eq!(stats.last_pulled, t(14));
    }

    #[tokio::test]
    async fn redelivery_converges_everything_but_counters() {
        let (intake, store) = intake();
        let envelope = Envelope::new(vec![event(
            EventAction::Push,
            "library/test",
            "alice",
            t(9),
        )]);

        intake.apply(&envelope).await.unwrap();
        let first = store.get("library/test").unwrap();
        intake.apply(&envelope).await.unwrap();
        let second = store.get("library/test").unwrap();

        assert_eq!(second.num_pushes, first.num_pushes + 1);
        assert_eq!(second.first_pushed, first.first_pushed);
        assert_eq!(second.last_pushed, first.last_pushed);
        assert_eq!(second.actors, first.actors);
    }

    #[tokio::test]
    async fn delete_removes_document() {
        let (intake, store) = intake();
        intake
            .apply(&Envelope::single(event(
                EventAction::Push,
                "library/test",
                "alice",
                t(9),
            )))
            .await
            .unwrap();

        let summary = intake
            .apply(&Envelope::single(event(
                EventAction::Delete,
                "library/test",
                "alice",
                t(10),
            )))
            .await
            .unwrap();

        assert_eq!(summary.removed, 1);
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn delete_of_absent_repository_succeeds() {
        let (intake, store) = intake();
        let summary = intake
            .apply(&Envelope::single(event(
                EventAction::Delete,
                "library/never-seen",
                "alice",
                t(9),
            )))
            .await
            .unwrap();

        assert_eq!(
            summary,
            BatchSummary {
                applied: 1,
                created: 0,
                merged: 0,
                removed: 1
            }
        );
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn unknown_action_halts_the_batch() {
        let (intake, store) = intake();
        let envelope = Envelope::new(vec![
            event(EventAction::Push, "a/applied", "alice", t(9)),
            event(EventAction::Unsupported("prune".to_owned()), "a/bad", "x", t(10)),
            event(EventAction::Push, "a/skipped", "bob", t(11)),
        ]);

        let err = intake.apply(&envelope).await.unwrap_err();
        assert_eq!(err.index(), 1);
        assert!(err.is_validation());

        // The event before the failure stays applied; the one after is not.
        assert!(store.get("a/applied").is_some());
        assert!(store.get("a/skipped").is_none());
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn rejected_media_type_mutates_nothing() {
        let (intake, store) = intake();
        let mut bad = event(EventAction::Push, "library/test", "alice", t(9));
        bad.target.media_type = "application/octet-stream".to_owned();

        let err = intake.apply(&Envelope::single(bad)).await.unwrap_err();
        assert_eq!(err.index(), 0);
        assert!(err.is_validation());
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn empty_envelope_is_a_noop() {
        let (intake, store) = intake();
        let summary = intake.apply(&Envelope::default()).await.unwrap();
        assert_eq!(summary, BatchSummary::default());
        assert!(store.is_empty());
    }
}
