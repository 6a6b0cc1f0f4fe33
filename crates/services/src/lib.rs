#![forbid(unsafe_code)]

pub mod error;
pub mod interview;
pub mod roles;
pub mod typewriter;

pub use interview_core::Clock;

pub use error::SessionError;
pub use interview::{
    Advance, InterviewProgress, InterviewSession, NullObserver, PendingFollowUp,
    RecordingObserver, SessionEvent, SessionObserver,
};
pub use roles::{JOB_ROLES, SuggestionCursor, suggest_roles};
pub use typewriter::{TypeRun, Typewriter};
