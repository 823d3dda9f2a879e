use chrono::{DateTime, TimeZone, Utc};

/// Timestamp fields of the persisted statistics document.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TimestampField {
    FirstPushed,
    LastPushed,
    FirstPulled,
    LastPulled,
}

impl TimestampField {
    /// Field name as stored in the statistics document.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FirstPushed => "first_pushed",
            Self::LastPushed => "last_pushed",
            Self::FirstPulled => "first_pulled",
            Self::LastPulled => "last_pulled",
        }
    }
}

/// Sentinel seeded into a `first_*` field whose action has never been seen:
/// far enough in the future that any real event instant wins the minimum
/// comparison on a later merge.
pub fn far_future() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2099, 1, 1, 0, 0, 0).unwrap()
}

/// Counterpart sentinel for `last_*` fields: the Unix epoch, so any real
/// event instant wins the maximum comparison.
pub fn far_past() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(1970, 1, 1, 0, 0, 0).unwrap()
}

/// Fields assigned only when the upsert takes its insert branch.
#[derive(Clone, Debug, PartialEq)]
pub struct InsertDefaults {
    /// A repository starts with no stars; stars are managed elsewhere and
    /// never touched again by the collector.
    pub num_stars: u64,
    /// Sentinel seeds for the timestamp pair of the *opposite* action, so
    /// later min/max merges converge without special-casing "document did
    /// not previously exist".
    pub sentinels: Vec<(TimestampField, DateTime<Utc>)>,
}

/// Field-update instructions for one upsert, partitioned by merge strategy.
///
/// Handed to a store and discarded; never persisted. A well-formed update
/// is safe to apply through any conforming store implementation:
/// insert-only fields never overwrite an existing document, min/max fields
/// converge under repeated application, and both counter increments are
/// always present (the inactive one explicitly zero) so the increment group
/// is complete for merge implementations that require full field sets.
#[derive(Clone, Debug, PartialEq)]
pub struct UpdateDocument {
    /// Assign-always; doubles as the upsert selector.
    pub repository_name: String,
    /// Assign-on-insert-only.
    pub on_insert: InsertDefaults,
    /// Keep-minimum.
    pub mins: Vec<(TimestampField, DateTime<Utc>)>,
    /// Keep-maximum.
    pub maxs: Vec<(TimestampField, DateTime<Utc>)>,
    /// Add-to-set: the acting user joins the repository's actor set.
    pub actor: String,
    pub push_increment: u64,
    pub pull_increment: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sentinels_bracket_real_instants() {
        let real = Utc.with_ymd_and_hms(2015, 6, 1, 12, 0, 0).unwrap();
        assert!(far_past() < real);
        assert!(real < far_future());
    }

    #[test]
    fn field_names_are_distinct() {
        let names = [
            TimestampField::FirstPushed.as_str(),
            TimestampField::LastPushed.as_str(),
            TimestampField::FirstPulled.as_str(),
            TimestampField::LastPulled.as_str(),
        ];
        for (i, a) in names.iter().enumerate() {
            for b in &names[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }
}
