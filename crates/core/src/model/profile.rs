use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ProfileError {
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    #[error("unknown experience level: {0}")]
    UnknownLevel(String),
}

/// Self-reported experience bracket.
///
/// The remote service words its question set differently per bracket, so the
/// wire strings must match exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExperienceLevel {
    EntryLevel,
    MidLevel,
    Senior,
    Executive,
}

impl ExperienceLevel {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ExperienceLevel::EntryLevel => "entry-level",
            ExperienceLevel::MidLevel => "mid-level",
            ExperienceLevel::Senior => "senior",
            ExperienceLevel::Executive => "executive",
        }
    }
}

impl fmt::Display for ExperienceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ExperienceLevel {
    type Err = ProfileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "entry-level" | "entry" => Ok(ExperienceLevel::EntryLevel),
            "mid-level" | "mid" => Ok(ExperienceLevel::MidLevel),
            "senior" => Ok(ExperienceLevel::Senior),
            "executive" => Ok(ExperienceLevel::Executive),
            other => Err(ProfileError::UnknownLevel(other.to_string())),
        }
    }
}

/// Validated candidate details collected on the welcome screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateProfile {
    full_name: String,
    job_role: String,
    experience_level: ExperienceLevel,
}

impl CandidateProfile {
    /// Create a profile from raw form input.
    ///
    /// Fields are trimmed before validation so whitespace-only input counts
    /// as missing.
    ///
    /// # Errors
    ///
    /// Returns `ProfileError::MissingField` for an empty field and
    /// `ProfileError::UnknownLevel` for an unrecognized experience level.
    pub fn new(
        full_name: impl Into<String>,
        job_role: impl Into<String>,
        experience_level: &str,
    ) -> Result<Self, ProfileError> {
        let full_name = full_name.into().trim().to_string();
        if full_name.is_empty() {
            return Err(ProfileError::MissingField("full_name"));
        }
        let job_role = job_role.into().trim().to_string();
        if job_role.is_empty() {
            return Err(ProfileError::MissingField("job_role"));
        }
        if experience_level.trim().is_empty() {
            return Err(ProfileError::MissingField("experience_level"));
        }
        let experience_level = experience_level.parse()?;

        Ok(Self {
            full_name,
            job_role,
            experience_level,
        })
    }

    #[must_use]
    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    #[must_use]
    pub fn job_role(&self) -> &str {
        &self.job_role
    }

    #[must_use]
    pub fn experience_level(&self) -> ExperienceLevel {
        self.experience_level
    }
}
