use regstat_types::{
    far_future, far_past, EventAction, InsertDefaults, RegistryEvent, TimestampField,
    UpdateDocument, MANIFEST_MEDIA_TYPE,
};

use crate::error::RejectError;

/// Decide how one event changes its repository's statistics document.
///
/// Pure decision function: no side effects, referentially transparent, safe
/// to call any number of times with the same input. Delete events are routed
/// around this builder by the intake; any action other than push or pull is
/// rejected here, as is any event that does not target a manifest (a
/// layer-blob transfer is not a user-visible push or pull).
///
/// The acting action's timestamp pair goes under keep-min/keep-max; the
/// opposite pair is seeded with sentinels in the insert-only group, so a
/// later event of the other kind converges through the same min/max
/// comparison whether or not the document existed before.
pub fn build_update(event: &RegistryEvent) -> Result<UpdateDocument, RejectError> {
    let is_push = match &event.action {
        EventAction::Push => true,
        EventAction::Pull => false,
        other => return Err(RejectError::UnsupportedAction(other.to_string())),
    };

    if event.media_type() != MANIFEST_MEDIA_TYPE {
        return Err(RejectError::UnsupportedMediaType {
            got: event.media_type().to_owned(),
        });
    }

    let ts = event.timestamp;
    let (mins, maxs, sentinels) = if is_push {
        (
            vec![(TimestampField::FirstPushed, ts)],
            vec![(TimestampField::LastPushed, ts)],
            vec![
                (TimestampField::FirstPulled, far_future()),
                (TimestampField::LastPulled, far_past()),
            ],
        )
    } else {
        (
            vec![(TimestampField::FirstPulled, ts)],
            vec![(TimestampField::LastPulled, ts)],
            vec![
                (TimestampField::FirstPushed, far_future()),
                (TimestampField::LastPushed, far_past()),
            ],
        )
    };

    Ok(UpdateDocument {
        repository_name: event.repository().to_owned(),
        on_insert: InsertDefaults {
            num_stars: 0,
            sentinels,
        },
        mins,
        maxs,
        actor: event.actor_name().to_owned(),
        push_increment: u64::from(is_push),
        pull_increment: u64::from(!is_push),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use regstat_types::{EventActor, EventTarget};

    fn manifest_event(action: EventAction) -> RegistryEvent {
        RegistryEvent {
            action,
            target: EventTarget {
                media_type: MANIFEST_MEDIA_TYPE.to_owned(),
                repository: "library/test".to_owned(),
            },
            actor: EventActor {
                name: "test-actor".to_owned(),
            },
            timestamp: Utc.with_ymd_and_hms(2006, 1, 2, 15, 4, 5).unwrap(),
        }
    }

    #[test]
    fn push_event_update() {
        let event = manifest_event(EventAction::Push);
        let update = build_update(&event).unwrap();

        assert_eq!(update.repository_name, "library/test");
        assert_eq!(update.actor, "test-actor");
        assert_eq!(update.push_increment, 1);
        assert_eq!(update.pull_increment, 0);
        assert_eq!(
            update.mins,
            vec![(TimestampField::FirstPushed, event.timestamp)]
        );
        assert_eq!(
            update.maxs,
            vec![(TimestampField::LastPushed, event.timestamp)]
        );
        assert_eq!(update.on_insert.num_stars, 0);
        assert_eq!(
            update.on_insert.sentinels,
            vec![
                (TimestampField::FirstPulled, far_future()),
                (TimestampField::LastPulled, far_past()),
            ]
        );
    }

    #[test]
    fn pull_event_update() {
        let event = manifest_event(EventAction::Pull);
        let update = build_update(&event).unwrap();

        assert_eq!(update.push_increment, 0);
        assert_eq!(update.pull_increment, 1);
        assert_eq!(
            update.mins,
            vec![(TimestampField::FirstPulled, event.timestamp)]
        );
        assert_eq!(
            update.maxs,
            vec![(TimestampField::LastPulled, event.timestamp)]
        );
        assert_eq!(
            update.on_insert.sentinels,
            vec![
                (TimestampField::FirstPushed, far_future()),
                (TimestampField::LastPushed, far_past()),
            ]
        );
    }

    #[test]
    fn layer_push_is_rejected() {
        let mut event = manifest_event(EventAction::Push);
        event.target.media_type =
            "application/vnd.docker.container.image.rootfs.diff+x-gtar".to_owned();

        let err = build_update(&event).unwrap_err();
        assert!(matches!(err, RejectError::UnsupportedMediaType { .. }));
    }

    #[test]
    fn non_push_pull_actions_are_rejected() {
        for action in [
            EventAction::Delete,
            EventAction::Unsupported("prune".to_owned()),
        ] {
            let event = manifest_event(action.clone());
            let err = build_update(&event).unwrap_err();
            assert_eq!(err, RejectError::UnsupportedAction(action.to_string()));
        }
    }

    #[test]
    fn action_is_checked_before_media_type() {
        let mut event = manifest_event(EventAction::Delete);
        event.target.media_type = "application/json".to_owned();

        // Both preconditions fail; the action check wins.
        let err = build_update(&event).unwrap_err();
        assert!(matches!(err, RejectError::UnsupportedAction(_)));
    }

    #[test]
    fn builder_is_deterministic() {
        let event = manifest_event(EventAction::Pull);
        assert_eq!(build_update(&event).unwrap(), build_update(&event).unwrap());
    }

    #[test]
    fn exactly_one_counter_increments() {
        for action in [EventAction::Push, EventAction::Pull] {
            let update = build_update(&manifest_event(action)).unwrap();
            assert_eq!(update.push_increment + update.pull_increment, 1);
        }
    }
}
