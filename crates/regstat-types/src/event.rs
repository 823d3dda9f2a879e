use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Content type of the notification envelope a registry POSTs to its
/// configured endpoints.
pub const EVENTS_MEDIA_TYPE: &str = "application/vnd.docker.distribution.events.v1+json";

/// Canonical media type of an image manifest.
///
/// Only events targeting a manifest count as a logical image push or pull;
/// layer-blob transfers carry other media types and are never counted.
pub const MANIFEST_MEDIA_TYPE: &str = "application/vnd.docker.distribution.manifest.v1+json";

/// What a registry event reports having happened.
///
/// Decided once at decode time and matched exhaustively everywhere else, so
/// an action the registry grows in the future lands in
/// [`EventAction::Unsupported`] with the original wire string preserved for
/// error reporting.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EventAction {
    Push,
    Pull,
    Delete,
    Unsupported(String),
}

impl From<String> for EventAction {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "push" => Self::Push,
            "pull" => Self::Pull,
            "delete" => Self::Delete,
            _ => Self::Unsupported(raw),
        }
    }
}

impl From<EventAction> for String {
    fn from(action: EventAction) -> Self {
        match action {
            EventAction::Push => "push".to_owned(),
            EventAction::Pull => "pull".to_owned(),
            EventAction::Delete => "delete".to_owned(),
            EventAction::Unsupported(raw) => raw,
        }
    }
}

impl fmt::Display for EventAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Push => write!(f, "push"),
            Self::Pull => write!(f, "pull"),
            Self::Delete => write!(f, "delete"),
            Self::Unsupported(raw) => write!(f, "{raw}"),
        }
    }
}

/// The artifact an event acted on.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventTarget {
    #[serde(rename = "mediaType", default)]
    pub media_type: String,
    /// Fully qualified repository name, e.g. `library/test`.
    #[serde(default)]
    pub repository: String,
}

/// Who performed the action. The name may be empty when the registry allows
/// anonymous access.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventActor {
    #[serde(default)]
    pub name: String,
}

/// One reported occurrence from the registry's notification stream.
///
/// Decoded from one element of an inbound envelope, consumed once, never
/// persisted as-is.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RegistryEvent {
    pub action: EventAction,
    #[serde(default)]
    pub target: EventTarget,
    #[serde(default)]
    pub actor: EventActor,
    /// Instant the action occurred, as reported by the registry.
    pub timestamp: DateTime<Utc>,
}

impl RegistryEvent {
    pub fn repository(&self) -> &str {
        &self.target.repository
    }

    pub fn media_type(&self) -> &str {
        &self.target.media_type
    }

    pub fn actor_name(&self) -> &str {
        &self.actor.name
    }
}

/// A batch of events as delivered in one inbound request.
///
/// Constructed per request and discarded after processing; there is no
/// cross-request state. The `events` key is required so that the legacy
/// single-event body shape never half-decodes as an empty envelope.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    pub events: Vec<RegistryEvent>,
}

impl Envelope {
    pub fn new(events: Vec<RegistryEvent>) -> Self {
        Self { events }
    }

    /// Wrap a single event (the legacy notification form).
    pub fn single(event: RegistryEvent) -> Self {
        Self {
            events: vec![event],
        }
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
