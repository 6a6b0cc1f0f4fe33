use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use interview_core::model::{
    AnswerMap, CandidateProfile, FollowUp, FollowUpKind, GeneratedDocument, Question, QuestionKey,
    SkillCategory, SkillSet, TranslatedDocument,
};

use crate::api::{AnswerReceipt, ApiError, Feedback, InterviewApi, QuestionDetail};

const NOT_INITIALIZED: &str = "Session not initialized";
const NO_DOCUMENT: &str = "No resume has been generated yet";
const INDEX_OUT_OF_RANGE: &str = "Question index out of range";

/// Scripted in-memory stand-in for the interview service, for tests and
/// offline prototyping.
///
/// Mirrors the real service's observable behavior: operations fail with 400
/// until `initialize`, email answers are format-checked, certain answers
/// spawn follow-ups, and generated filenames are derived from the candidate
/// name. Failures can be injected per-call and every call is counted so
/// tests can assert that an operation stayed local.
#[derive(Clone, Default)]
pub struct InMemoryInterviewApi {
    inner: Arc<Mutex<Inner>>,
}

#[derive(Default)]
struct Inner {
    profile: Option<CandidateProfile>,
    questions: Vec<Question>,
    answers: AnswerMap,
    implied_skills: Option<SkillSet>,
    generated: Option<GeneratedDocument>,
    document_body: Option<Vec<u8>>,
    failures: VecDeque<(u16, String)>,
    requests: u64,
}

impl InMemoryInterviewApi {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fix the skill set returned by `analyze_skills` instead of deriving one
    /// from the answers.
    #[must_use]
    pub fn with_implied_skills(self, skills: SkillSet) -> Self {
        if let Ok(mut inner) = self.inner.lock() {
            inner.implied_skills = Some(skills);
        }
        self
    }

    /// Queue a failure; the next call consumes it and fails with this status
    /// and detail, whatever the operation.
    pub fn push_failure(&self, status: u16, detail: impl Into<String>) {
        if let Ok(mut inner) = self.inner.lock() {
            inner.failures.push_back((status, detail.into()));
        }
    }

    /// Number of calls received so far, successful or not.
    #[must_use]
    pub fn request_count(&self) -> u64 {
        self.inner.lock().map(|inner| inner.requests).unwrap_or(0)
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Inner>, ApiError> {
        self.inner
            .lock()
            .map_err(|_| ApiError::remote(500, "test double lock poisoned"))
    }

    fn enter(&self) -> Result<std::sync::MutexGuard<'_, Inner>, ApiError> {
        let mut inner = self.lock()?;
        inner.requests += 1;
        if let Some((status, detail)) = inner.failures.pop_front() {
            return Err(ApiError::remote(status, detail));
        }
        Ok(inner)
    }
}

impl Inner {
    fn require_initialized(&self) -> Result<(), ApiError> {
        if self.profile.is_none() {
            return Err(ApiError::remote(400, NOT_INITIALIZED));
        }
        Ok(())
    }
}

#[async_trait]
impl InterviewApi for InMemoryInterviewApi {
    async fn initialize(&self, profile: &CandidateProfile) -> Result<(), ApiError> {
        let mut inner = self.enter()?;
        inner.questions = default_questions();
        inner.answers = AnswerMap::new();
        if let Ok(key) = QuestionKey::new("full_name") {
            inner
                .answers
                .insert(key, profile.full_name().to_string());
        }
        inner.profile = Some(profile.clone());
        Ok(())
    }

    async fn questions(&self) -> Result<Vec<Question>, ApiError> {
        let inner = self.enter()?;
        inner.require_initialized()?;
        Ok(inner.questions.clone())
    }

    async fn question(&self, index: usize) -> Result<QuestionDetail, ApiError> {
        let inner = self.enter()?;
        inner.require_initialized()?;
        let question = inner
            .questions
            .get(index)
            .ok_or_else(|| ApiError::remote(404, INDEX_OUT_OF_RANGE))?;
        Ok(QuestionDetail {
            section: question.section.clone(),
            key: question.key.clone(),
            prompt: question.prompt.clone(),
            current_answer: inner
                .answers
                .get(&question.key)
                .cloned()
                .unwrap_or_default(),
        })
    }

    async fn submit_answer(
        &self,
        index: usize,
        key: &QuestionKey,
        answer: &str,
    ) -> Result<AnswerReceipt, ApiError> {
        let mut inner = self.enter()?;
        inner.require_initialized()?;
        if index >= inner.questions.len() {
            return Err(ApiError::remote(404, INDEX_OUT_OF_RANGE));
        }
        let answer = answer.trim();
        if key.as_str() == "email" && !answer.is_empty() && !looks_like_email(answer) {
            return Err(ApiError::remote(400, "Invalid email format"));
        }
        inner.answers.insert(key.clone(), answer.to_string());

        Ok(AnswerReceipt {
            feedback: feedback_for(key.as_str(), answer),
            follow_up: follow_up_for(key.as_str(), answer),
        })
    }

    async fn submit_follow_up(
        &self,
        kind: &FollowUpKind,
        answer: &str,
        original_key: &QuestionKey,
        _next_question: Option<&str>,
    ) -> Result<(), ApiError> {
        let mut inner = self.enter()?;
        inner.require_initialized()?;
        let answer = answer.trim();
        if answer.is_empty() {
            return Ok(());
        }
        match kind.as_str() {
            // Clarifications fold back into the answer they amend.
            "professional_context" => {
                if let Some(existing) = inner.answers.get_mut(original_key) {
                    existing.push_str("\n\nAdditional context: ");
                    existing.push_str(answer);
                }
            }
            "job_details" => {
                if let Some(existing) = inner.answers.get_mut(original_key) {
                    existing.push('\n');
                    existing.push_str(answer);
                }
            }
            // Everything else lands under its own key.
            other => {
                if let Ok(key) = QuestionKey::new(other) {
                    inner.answers.insert(key, answer.to_string());
                }
            }
        }
        Ok(())
    }

    async fn answers(&self) -> Result<AnswerMap, ApiError> {
        let inner = self.enter()?;
        inner.require_initialized()?;
        Ok(inner.answers.clone())
    }

    async fn analyze_skills(&self) -> Result<SkillSet, ApiError> {
        let inner = self.enter()?;
        inner.require_initialized()?;
        if let Some(skills) = &inner.implied_skills {
            return Ok(skills.clone());
        }
        // Default inference: split the technical-skills answer on commas.
        let mut skills = SkillSet::default();
        if let Ok(key) = QuestionKey::new("technical_skills") {
            if let Some(answer) = inner.answers.get(&key) {
                for part in answer.split(',') {
                    let part = part.trim();
                    if !part.is_empty() {
                        skills.insert(SkillCategory::TechnicalSkills, part);
                    }
                }
            }
        }
        Ok(skills)
    }

    async fn generate_resume(
        &self,
        format: &str,
        style: &str,
        _confirmed_skills: &SkillSet,
    ) -> Result<GeneratedDocument, ApiError> {
        let mut inner = self.enter()?;
        inner.require_initialized()?;
        let Some(profile) = inner.profile.clone() else {
            return Err(ApiError::remote(400, NOT_INITIALIZED));
        };
        let filename = format!(
            "{}_resume.{}",
            profile.full_name().to_lowercase().replace(' ', "_"),
            format
        );
        let document = GeneratedDocument {
            filename: filename.clone(),
            download_url: Some(format!("/download-resume?filename={filename}")),
            career_tips: vec![
                "Tailor your resume for each job application by highlighting the most relevant skills for the position.".to_string(),
                format!(
                    "For {} roles, emphasize your measurable achievements with specific metrics and outcomes.",
                    profile.job_role()
                ),
                format!(
                    "As a {} candidate, focus on showcasing your growth and progression.",
                    profile.experience_level()
                ),
            ],
        };
        inner.document_body = Some(
            format!(
                "{} resume for {} ({style})",
                profile.job_role(),
                profile.full_name()
            )
            .into_bytes(),
        );
        inner.generated = Some(document.clone());
        Ok(document)
    }

    async fn translate_resume(
        &self,
        filename: &str,
        target_language: &str,
    ) -> Result<TranslatedDocument, ApiError> {
        let inner = self.enter()?;
        inner.require_initialized()?;
        if inner.generated.is_none() {
            return Err(ApiError::remote(400, NO_DOCUMENT));
        }
        let suffix = target_language.to_lowercase().replace(' ', "");
        let translated = match filename.rsplit_once('.') {
            Some((base, ext)) => format!("{base}_{suffix}.{ext}"),
            None => format!("{filename}_{suffix}"),
        };
        Ok(TranslatedDocument {
            download_url: format!("/download-resume?filename={translated}"),
            filename: translated,
        })
    }

    async fn download(&self, _path: &str) -> Result<Vec<u8>, ApiError> {
        let inner = self.enter()?;
        inner.require_initialized()?;
        inner
            .document_body
            .clone()
            .ok_or_else(|| ApiError::remote(400, NO_DOCUMENT))
    }
}

fn feedback_for(key: &str, answer: &str) -> Option<Feedback> {
    if answer.is_empty() {
        return None;
    }
    let message = match key {
        "summary" => "💡 Strong start. Leading with one concrete outcome would make it land harder.",
        "job_history" => "💡 Consider quantifying the impact of each position with a metric or two.",
        "achievements" => "💡 Numbers help here: how much, how many, how fast?",
        "technical_skills" => "💡 Grouping these by proficiency makes them easier to scan.",
        _ => return None,
    };
    Some(Feedback {
        message: message.to_string(),
    })
}

fn follow_up_for(key: &str, answer: &str) -> Option<FollowUp> {
    let follow_up = match key {
        "linkedin" if declines_linkedin(answer) => FollowUp {
            kind: FollowUpKind::new("linkedin_profiles").ok()?,
            prompt: "Do you have any other professional social media profiles you'd like to include? (e.g., GitHub, portfolio website)".to_string(),
            additional: Vec::new(),
        },
        "location" => FollowUp {
            kind: FollowUpKind::new("work_arrangement").ok()?,
            prompt: "What is your preferred work arrangement? (Remote, Hybrid, On-site, or No preference)".to_string(),
            additional: Vec::new(),
        },
        "job_history" if !answer.is_empty() && !mentions_date(answer) => FollowUp {
            kind: FollowUpKind::new("job_details").ok()?,
            prompt: "If you accidentally left out any of the details regarding the date range, job title, or company name, it's recommended to add them now for maximum clarity".to_string(),
            additional: Vec::new(),
        },
        _ => return None,
    };
    Some(follow_up)
}

fn declines_linkedin(answer: &str) -> bool {
    matches!(
        answer.to_lowercase().as_str(),
        "" | "no" | "n" | "none" | "skip" | "dont have one" | "don't have one" | "dont have"
            | "don't have"
    )
}

fn mentions_date(answer: &str) -> bool {
    const MONTHS: [&str; 12] = [
        "jan", "feb", "mar", "apr", "may", "jun", "jul", "aug", "sep", "oct", "nov", "dec",
    ];
    let lower = answer.to_lowercase();
    if MONTHS.iter().any(|month| lower.contains(month)) {
        return true;
    }
    lower
        .as_bytes()
        .windows(4)
        .any(|window| window.iter().all(u8::is_ascii_digit))
}

fn looks_like_email(answer: &str) -> bool {
    let Some((local, domain)) = answer.split_once('@') else {
        return false;
    };
    !local.is_empty() && domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.')
}

fn default_questions() -> Vec<Question> {
    const QUESTIONS: [(&str, &str, &str); 10] = [
        ("Personal", "full_name", "What is your full name as it should appear on the resume?"),
        ("Personal", "email", "What email address would you like to include on your resume?"),
        ("Personal", "phone", "What's the best phone number for employers to reach you?"),
        ("Personal", "location", "Where are you currently located? (City and Country)"),
        ("Personal", "linkedin", "Do you have a LinkedIn profile you'd like to include? (If so, please share the URL)"),
        ("Summary", "summary", "Give a short professional summary of who you are and what you bring."),
        ("Experience", "job_history", "Walk me through your work history: roles, companies, and date ranges."),
        ("Experience", "achievements", "What achievements are you most proud of in these roles?"),
        ("Experience", "technical_skills", "Which technical skills and tools do you use day to day?"),
        ("Education", "education", "What degrees, certifications, or training should we list?"),
    ];
    QUESTIONS
        .iter()
        .enumerate()
        .filter_map(|(index, (section, key, prompt))| {
            Some(Question {
                index,
                section: (*section).to_string(),
                key: QuestionKey::new(*key).ok()?,
                prompt: (*prompt).to_string(),
            })
        })
        .collect()
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
