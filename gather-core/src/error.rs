//! Error types for gather.

use thiserror::Error;

/// Errors from storage, configuration and lifecycle operations.
#[derive(Error, Debug)]
pub enum GatherError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Event not found: {0}")]
    EventNotFound(String),

    #[error("Series not found: {0}")]
    SeriesNotFound(String),

    #[error("Invalid {kind} '{id}': {reason}")]
    Invalid {
        kind: &'static str,
        id: String,
        reason: String,
    },

    #[error("Event '{event}' already belongs to series '{series}'")]
    EventAlreadyInSeries { event: String, series: String },

    #[error("Event '{event}' is not part of series '{series}'")]
    EventNotInSeries { event: String, series: String },

    #[error("'{user}' does not own '{id}'")]
    NotOwner { id: String, user: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for GatherError {
    fn from(e: serde_json::Error) -> Self {
        GatherError::Serialization(e.to_string())
    }
}

/// Result type alias for gather operations.
pub type GatherResult<T> = Result<T, GatherError>;

/// Rejections from join/quit.
///
/// Every variant maps to a distinct user-facing message, so callers match on
/// them instead of treating them as generic failures.
#[derive(Error, Debug)]
pub enum MembershipError {
    #[error("'{id}' is full ({max} participants)")]
    CapacityExceeded { id: String, max: u32 },

    #[error("'{user}' is already a participant of '{id}'")]
    AlreadyMember { id: String, user: String },

    #[error("'{user}' is not a participant of '{id}'")]
    NotAMember { id: String, user: String },

    #[error("The owner cannot leave '{id}'")]
    OwnerCannotQuit { id: String },

    #[error(transparent)]
    Store(#[from] GatherError),
}
