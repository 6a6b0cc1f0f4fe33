use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use interview_core::model::{
    AnswerMap, CandidateProfile, FollowUp, FollowUpKind, GeneratedDocument, Question, QuestionKey,
    SkillSet, TranslatedDocument,
};

/// Errors surfaced by the remote interview service.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ApiError {
    /// Non-2xx response. The detail string is the server's own message and is
    /// shown to the user as-is.
    #[error("{detail}")]
    Remote { status: u16, detail: String },

    /// The request could not complete.
    #[error(transparent)]
    Network(#[from] reqwest::Error),
}

impl ApiError {
    #[must_use]
    pub fn remote(status: u16, detail: impl Into<String>) -> Self {
        ApiError::Remote {
            status,
            detail: detail.into(),
        }
    }

    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Remote { status, .. } => Some(*status),
            ApiError::Network(_) => None,
        }
    }
}

/// Coaching note attached to an answer submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feedback {
    pub message: String,
}

/// Outcome of persisting one answer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerReceipt {
    #[serde(default)]
    pub feedback: Option<Feedback>,
    #[serde(default, rename = "followup")]
    pub follow_up: Option<FollowUp>,
}

/// One question with the answer persisted so far, as served by
/// `GET question/{index}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionDetail {
    pub section: String,
    pub key: QuestionKey,
    #[serde(rename = "question")]
    pub prompt: String,
    #[serde(default)]
    pub current_answer: String,
}

/// Contract for the interview service.
///
/// One implementation speaks HTTP to the real service; an in-memory scripted
/// implementation backs tests and offline prototyping. No implementation
/// retries: a failed call surfaces immediately and the caller decides.
#[async_trait]
pub trait InterviewApi: Send + Sync {
    /// Create the server-side session for this candidate.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the session cannot be created.
    async fn initialize(&self, profile: &CandidateProfile) -> Result<(), ApiError>;

    /// Fetch the ordered question list for the initialized session.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the session is missing or the request fails.
    async fn questions(&self) -> Result<Vec<Question>, ApiError>;

    /// Fetch one question together with its persisted answer.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` for an out-of-range index or a failed request.
    async fn question(&self, index: usize) -> Result<QuestionDetail, ApiError>;

    /// Persist an answer for the question at `index`.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` for server-side validation failures (e.g. a
    /// malformed email) or a failed request. Nothing is stored on failure.
    async fn submit_answer(
        &self,
        index: usize,
        key: &QuestionKey,
        answer: &str,
    ) -> Result<AnswerReceipt, ApiError>;

    /// Persist the response to a follow-up question.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the session is missing or the request fails.
    async fn submit_follow_up(
        &self,
        kind: &FollowUpKind,
        answer: &str,
        original_key: &QuestionKey,
        next_question: Option<&str>,
    ) -> Result<(), ApiError>;

    /// Fetch the authoritative answer map.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the session is missing or the request fails.
    async fn answers(&self) -> Result<AnswerMap, ApiError>;

    /// Infer skills from the answers given so far.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails. Callers treat this as
    /// best-effort enrichment.
    async fn analyze_skills(&self) -> Result<SkillSet, ApiError>;

    /// Generate the resume document.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if generation fails.
    async fn generate_resume(
        &self,
        format: &str,
        style: &str,
        confirmed_skills: &SkillSet,
    ) -> Result<GeneratedDocument, ApiError>;

    /// Translate a previously generated resume.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if no document exists yet or translation fails.
    async fn translate_resume(
        &self,
        filename: &str,
        target_language: &str,
    ) -> Result<TranslatedDocument, ApiError>;

    /// Fetch a document's bytes via a server-supplied download path.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the file is missing or the request fails.
    async fn download(&self, path: &str) -> Result<Vec<u8>, ApiError>;
}
