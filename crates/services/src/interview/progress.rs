use serde::Serialize;

/// Aggregated view of interview progress, useful for UI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InterviewProgress {
    pub total: usize,
    pub current: usize,
    pub answered: usize,
    pub remaining: usize,
    /// The wizard offers Finish once the candidate is three quarters of the
    /// way through the questions.
    pub finish_available: bool,
}
