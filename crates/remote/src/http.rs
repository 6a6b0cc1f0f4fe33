use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::debug;

use interview_core::model::{
    AnswerMap, CandidateProfile, FollowUpKind, GeneratedDocument, Question, QuestionKey, SkillSet,
    TranslatedDocument,
};

use crate::api::{AnswerReceipt, ApiError, InterviewApi, QuestionDetail};
use crate::config::{ConfigError, RemoteConfig};

/// `InterviewApi` over HTTP, one request per call, no retries.
#[derive(Clone)]
pub struct HttpInterviewApi {
    client: Client,
    config: RemoteConfig,
}

impl HttpInterviewApi {
    #[must_use]
    pub fn new(config: RemoteConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    /// Build a client from `INTERVIEW_API_URL`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the configured base URL does not parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self::new(RemoteConfig::from_env()?))
    }

    #[must_use]
    pub fn config(&self) -> &RemoteConfig {
        &self.config
    }

    async fn ok_or_remote(response: Response) -> Result<Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.bytes().await.unwrap_or_default();
        Err(ApiError::Remote {
            status: status.as_u16(),
            detail: error_detail(status, &body),
        })
    }

    async fn get(&self, path: &str) -> Result<Response, ApiError> {
        let url = self.config.endpoint(path);
        debug!(%url, "GET");
        let response = self.client.get(url).send().await?;
        Self::ok_or_remote(response).await
    }

    async fn post<T: Serialize + ?Sized>(
        &self,
        path: &str,
        payload: &T,
    ) -> Result<Response, ApiError> {
        let url = self.config.endpoint(path);
        debug!(%url, "POST");
        let response = self.client.post(url).json(payload).send().await?;
        Self::ok_or_remote(response).await
    }
}

/// Extract the human-readable message from an error response.
///
/// The service reports failures as `{"detail": "..."}`; anything else falls
/// back to the HTTP status text.
fn error_detail(status: StatusCode, body: &[u8]) -> String {
    serde_json::from_slice::<ErrorBody>(body)
        .map(|parsed| parsed.detail)
        .unwrap_or_else(|_| {
            status
                .canonical_reason()
                .unwrap_or("request failed")
                .to_string()
        })
}

#[async_trait]
impl InterviewApi for HttpInterviewApi {
    async fn initialize(&self, profile: &CandidateProfile) -> Result<(), ApiError> {
        let payload = InitializeRequest {
            full_name: profile.full_name(),
            job_role: profile.job_role(),
            resume_level: profile.experience_level().as_str(),
        };
        self.post("initialize", &payload).await?;
        Ok(())
    }

    async fn questions(&self) -> Result<Vec<Question>, ApiError> {
        let body: QuestionsResponse = self.get("questions").await?.json().await?;
        Ok(body.questions)
    }

    async fn question(&self, index: usize) -> Result<QuestionDetail, ApiError> {
        Ok(self.get(&format!("question/{index}")).await?.json().await?)
    }

    async fn submit_answer(
        &self,
        index: usize,
        key: &QuestionKey,
        answer: &str,
    ) -> Result<AnswerReceipt, ApiError> {
        let payload = AnswerRequest {
            key: key.as_str(),
            answer,
        };
        Ok(self
            .post(&format!("answer/{index}"), &payload)
            .await?
            .json()
            .await?)
    }

    async fn submit_follow_up(
        &self,
        kind: &FollowUpKind,
        answer: &str,
        original_key: &QuestionKey,
        next_question: Option<&str>,
    ) -> Result<(), ApiError> {
        let payload = FollowUpRequest {
            answer,
            original_key: original_key.as_str(),
            next_question,
        };
        self.post(&format!("follow-up/{}", kind.as_str()), &payload)
            .await?;
        Ok(())
    }

    async fn answers(&self) -> Result<AnswerMap, ApiError> {
        let body: AnswersResponse = self.get("answers").await?.json().await?;
        Ok(body.answers)
    }

    async fn analyze_skills(&self) -> Result<SkillSet, ApiError> {
        let body: AnalyzeSkillsResponse = self
            .post("analyze-skills", &EmptyRequest {})
            .await?
            .json()
            .await?;
        Ok(body.implied_skills)
    }

    async fn generate_resume(
        &self,
        format: &str,
        style: &str,
        confirmed_skills: &SkillSet,
    ) -> Result<GeneratedDocument, ApiError> {
        let payload = GenerateRequest {
            format,
            style,
            confirmed_skills,
        };
        Ok(self
            .post("generate-resume", &payload)
            .await?
            .json()
            .await?)
    }

    async fn translate_resume(
        &self,
        filename: &str,
        target_language: &str,
    ) -> Result<TranslatedDocument, ApiError> {
        let payload = TranslateRequest {
            filename,
            target_language,
        };
        Ok(self
            .post("translate-resume", &payload)
            .await?
            .json()
            .await?)
    }

    async fn download(&self, path: &str) -> Result<Vec<u8>, ApiError> {
        let url = self.config.download_url(path);
        debug!(%url, "GET");
        let response = self.client.get(url).send().await?;
        let response = Self::ok_or_remote(response).await?;
        Ok(response.bytes().await?.to_vec())
    }
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: String,
}

#[derive(Debug, Serialize)]
struct InitializeRequest<'a> {
    full_name: &'a str,
    job_role: &'a str,
    resume_level: &'a str,
}

#[derive(Debug, Deserialize)]
struct QuestionsResponse {
    questions: Vec<Question>,
}

#[derive(Debug, Serialize)]
struct AnswerRequest<'a> {
    key: &'a str,
    answer: &'a str,
}

#[derive(Debug, Serialize)]
struct FollowUpRequest<'a> {
    answer: &'a str,
    original_key: &'a str,
    next_question: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct AnswersResponse {
    answers: AnswerMap,
}

#[derive(Debug, Deserialize)]
struct AnalyzeSkillsResponse {
    implied_skills: SkillSet,
}

#[derive(Debug, Serialize)]
struct EmptyRequest {}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    format: &'a str,
    style: &'a str,
    confirmed_skills: &'a SkillSet,
}

#[derive(Debug, Serialize)]
struct TranslateRequest<'a> {
    filename: &'a str,
    target_language: &'a str,
}
