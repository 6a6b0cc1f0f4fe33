//! Shared error types for the services crate.

use thiserror::Error;

use interview_core::model::{ProfileError, QuestionError, Stage};
use remote::ApiError;

/// Errors emitted by `InterviewSession`.
///
/// Everything above `Api` is caught locally, before any remote call is made;
/// `Api` carries the remote service's own failure.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionError {
    #[error(transparent)]
    Profile(#[from] ProfileError),

    #[error("missing required field: {0}")]
    MissingField(&'static str),

    #[error(transparent)]
    Questions(#[from] QuestionError),

    #[error("question index {index} is out of range (question count: {count})")]
    IndexOutOfRange { index: usize, count: usize },

    #[error("key {key:?} does not belong to the question at index {index}")]
    KeyMismatch { index: usize, key: String },

    #[error("unknown question key: {0}")]
    UnknownKey(String),

    #[error("the interview has not been started")]
    NotStarted,

    #[error("the interview has already been started")]
    AlreadyStarted,

    #[error("operation not available in the {stage} stage")]
    WrongStage { stage: Stage },

    #[error("a follow-up question must be resolved first")]
    FollowUpPending,

    #[error("no follow-up question is pending")]
    NoFollowUp,

    #[error("another request is already in flight")]
    Busy,

    #[error(transparent)]
    Api(#[from] ApiError),
}

impl SessionError {
    /// True if the failure came from the remote service rather than local
    /// validation or state checks.
    #[must_use]
    pub fn is_remote(&self) -> bool {
        matches!(self, SessionError::Api(_))
    }
}
