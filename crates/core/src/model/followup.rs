use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum FollowUpError {
    #[error("follow-up kind is empty")]
    EmptyKind,
}

/// Server-assigned follow-up discriminator.
///
/// The vocabulary is owned by the remote service (`linkedin_profiles`,
/// `work_arrangement`, `job_details`, `professional_context` today) and the
/// client's only obligation is echoing it back into `follow-up/{type}`, so
/// this stays an open string rather than a closed enum.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FollowUpKind(String);

impl FollowUpKind {
    /// Create a validated kind.
    ///
    /// # Errors
    ///
    /// Returns `FollowUpError::EmptyKind` if the kind is empty after trimming.
    pub fn new(value: impl Into<String>) -> Result<Self, FollowUpError> {
        let raw = value.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(FollowUpError::EmptyKind);
        }
        Ok(Self(trimmed.to_string()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FollowUpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A clarifying question attached to an answer submission.
///
/// Exists only between the submission that produced it and its resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FollowUp {
    #[serde(rename = "type")]
    pub kind: FollowUpKind,
    #[serde(rename = "message")]
    pub prompt: String,
    #[serde(default, rename = "additional_questions")]
    pub additional: Vec<String>,
}
