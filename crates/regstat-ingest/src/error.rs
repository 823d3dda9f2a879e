use thiserror::Error;

use regstat_store::StoreError;
use regstat_types::MANIFEST_MEDIA_TYPE;

/// A single event failed validation and must not touch the store.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RejectError {
    #[error("unsupported action \"{0}\": only push and pull events update statistics")]
    UnsupportedAction(String),

    #[error("unsupported media type \"{got}\": expected \"{}\"", MANIFEST_MEDIA_TYPE)]
    UnsupportedMediaType { got: String },
}

/// Failure while applying an envelope.
///
/// Both variants name the index of the failing event; everything before
/// that index has already been durably applied.
#[derive(Debug, Error)]
pub enum IngestError {
    /// Caller-fixable validation failure.
    #[error("event {index} rejected: {source}")]
    Rejected {
        index: usize,
        #[source]
        source: RejectError,
    },

    /// Infrastructure failure talking to the statistics store.
    #[error("store failure at event {index}: {source}")]
    Store {
        index: usize,
        #[source]
        source: StoreError,
    },
}

impl IngestError {
    /// Index of the first event that failed to apply. Events at lower
    /// indices were applied successfully.
    pub fn index(&self) -> usize {
        match self {
            Self::Rejected { index, .. } | Self::Store { index, .. } => *index,
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Rejected { .. })
    }
}

/// Result alias for intake operations.
pub type IngestResult<T> = Result<T, IngestError>;
