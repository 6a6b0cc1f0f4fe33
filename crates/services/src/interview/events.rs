use std::sync::{Arc, Mutex};

use serde::Serialize;

use interview_core::model::FollowUpKind;

/// Lifecycle notifications relayed to the presentation layer.
///
/// Each variant carries what a renderer needs without re-deriving session
/// state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SessionEvent {
    Started { total_questions: usize },
    Advanced { index: usize },
    Retreated { index: usize },
    Skipped { index: usize },
    FollowUpShown { kind: FollowUpKind, prompt: String },
    Finished { answered: usize },
    GenerateCompleted { filename: String },
    TranslateCompleted { filename: String },
    Failed { message: String },
}

/// Receives lifecycle notifications as the session mutates.
pub trait SessionObserver: Send + Sync {
    fn notify(&self, event: &SessionEvent);
}

/// Observer that drops every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullObserver;

impl SessionObserver for NullObserver {
    fn notify(&self, _event: &SessionEvent) {}
}

/// Observer that records events, for assertions and debugging.
#[derive(Debug, Clone, Default)]
pub struct RecordingObserver {
    events: Arc<Mutex<Vec<SessionEvent>>>,
}

impl RecordingObserver {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything observed so far.
    #[must_use]
    pub fn events(&self) -> Vec<SessionEvent> {
        self.events.lock().map(|events| events.clone()).unwrap_or_default()
    }
}

impl SessionObserver for RecordingObserver {
    fn notify(&self, event: &SessionEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event.clone());
        }
    }
}
