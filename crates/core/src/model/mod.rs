mod document;
mod followup;
mod profile;
mod question;
mod skills;
mod stage;

pub use document::{GeneratedDocument, TranslatedDocument};
pub use followup::{FollowUp, FollowUpError, FollowUpKind};
pub use profile::{CandidateProfile, ExperienceLevel, ProfileError};
pub use question::{AnswerMap, Question, QuestionError, QuestionKey, Questionnaire};
pub use skills::{SkillCategory, SkillSet};
pub use stage::Stage;
