use crate::domain::models::tutoring_request::TutoringStatus;
use crate::domain::services::lifecycle::LifecycleAction;
use crate::domain::services::validator::SlotRejection;
use chrono::{DateTime, NaiveDate, Utc};
use thiserror::Error;

/// Local, recoverable input problems. Never sent to the backend.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{0}")]
    Slot(#[from] SlotRejection),
    #[error("Requested date {date} is before today ({today})")]
    DateInPast { date: NaiveDate, today: NaiveDate },
    #[error("Rejection reason must have at least {min} characters, got {actual}")]
    ReasonTooShort { min: usize, actual: usize },
    #[error("Attendance can only be recorded once the session has started ({starts_at})")]
    SessionNotHeldYet { starts_at: DateTime<Utc> },
}

/// A lifecycle transition attempted from a status that does not allow it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GuardViolation {
    #[error("Cannot apply '{action}' to a tutoring request in status '{from}'")]
    InvalidTransition { action: LifecycleAction, from: TutoringStatus },
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid input: {0}")]
    Validation(#[from] ValidationError),
    #[error("Illegal transition: {0}")]
    Guard(#[from] GuardViolation),
    #[error("Unauthorized")]
    Unauthorized,
    #[error("Resource not found: {0}")]
    NotFound(String),
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Backend responded with status {status}: {body}")]
    Backend { status: u16, body: String },
    #[error("Backend unreachable: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("Malformed backend payload: {0}")]
    Decode(String),
    #[error("Configuration error: {0}")]
    Config(String),
}

impl AppError {
    /// Maps a non-2xx backend response onto the error taxonomy.
    pub fn from_status(status: u16, body: String) -> Self {
        match status {
            401 | 403 => AppError::Unauthorized,
            404 => AppError::NotFound(body),
            409 | 422 => AppError::Conflict(body),
            _ => AppError::Backend { status, body },
        }
    }

    /// Whether repeating the same call unchanged could succeed. Local
    /// validation and guard failures are deterministic and never are.
    pub fn is_retryable(&self) -> bool {
        match self {
            AppError::Transport(e) => e.is_timeout() || e.is_connect() || e.is_request(),
            AppError::Backend { status, .. } => *status >= 500,
            _ => false,
        }
    }
}
