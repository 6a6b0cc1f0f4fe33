use std::collections::{BTreeMap, HashSet};
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question list is empty")]
    Empty,

    #[error("question key is empty")]
    EmptyKey,

    #[error("duplicate question key: {0}")]
    DuplicateKey(String),

    #[error("question at position {expected} reports index {found}")]
    IndexMismatch { expected: usize, found: usize },
}

/// Key a question's answer is stored under, unique within a session.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuestionKey(String);

impl QuestionKey {
    /// Create a validated key.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError::EmptyKey` if the key is empty after trimming.
    pub fn new(value: impl Into<String>) -> Result<Self, QuestionError> {
        let raw = value.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(QuestionError::EmptyKey);
        }
        Ok(Self(trimmed.to_string()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for QuestionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Answers keyed by question key. The remote service is the source of truth
/// at finish time; until then this mirrors what has been persisted.
pub type AnswerMap = BTreeMap<QuestionKey, String>;

/// One interview question as supplied by the remote service at session start.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub index: usize,
    pub section: String,
    pub key: QuestionKey,
    #[serde(rename = "question")]
    pub prompt: String,
}

/// The ordered question list for one session, immutable once fetched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Questionnaire {
    questions: Vec<Question>,
}

impl Questionnaire {
    /// Validate and wrap the fetched question list.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError::Empty` for an empty list, `EmptyKey` /
    /// `DuplicateKey` for malformed keys, and `IndexMismatch` if the
    /// server-reported indices disagree with list order.
    pub fn new(questions: Vec<Question>) -> Result<Self, QuestionError> {
        if questions.is_empty() {
            return Err(QuestionError::Empty);
        }
        let mut seen = HashSet::new();
        for (position, question) in questions.iter().enumerate() {
            if question.key.as_str().trim().is_empty() {
                return Err(QuestionError::EmptyKey);
            }
            if !seen.insert(question.key.clone()) {
                return Err(QuestionError::DuplicateKey(question.key.to_string()));
            }
            if question.index != position {
                return Err(QuestionError::IndexMismatch {
                    expected: position,
                    found: question.index,
                });
            }
        }
        Ok(Self { questions })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    /// Always false: construction rejects empty lists.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    #[must_use]
    pub fn last_index(&self) -> usize {
        self.questions.len() - 1
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }

    /// Position of the question carrying `key`, if any.
    #[must_use]
    pub fn index_of(&self, key: &QuestionKey) -> Option<usize> {
        self.questions.iter().position(|q| &q.key == key)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Question> {
        self.questions.iter()
    }

    /// Questions grouped by section, preserving first-seen section order.
    #[must_use]
    pub fn by_section(&self) -> Vec<(&str, Vec<&Question>)> {
        let mut sections: Vec<(&str, Vec<&Question>)> = Vec::new();
        for question in &self.questions {
            match sections.iter_mut().find(|(name, _)| *name == question.section) {
                Some((_, entries)) => entries.push(question),
                None => sections.push((question.section.as_str(), vec![question])),
            }
        }
        sections
    }
}
