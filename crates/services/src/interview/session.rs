use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::warn;

use interview_core::Clock;
use interview_core::model::{
    AnswerMap, CandidateProfile, FollowUp, GeneratedDocument, Question, QuestionKey, Questionnaire,
    SkillSet, Stage, TranslatedDocument,
};
use remote::{AnswerReceipt, ApiError, InterviewApi};

use super::events::{NullObserver, SessionEvent, SessionObserver};
use super::progress::InterviewProgress;
use crate::error::SessionError;

//
// ─── OUTCOMES ──────────────────────────────────────────────────────────────────
//

/// A follow-up awaiting resolution, pinned to the question that spawned it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingFollowUp {
    pub follow_up: FollowUp,
    pub original_key: QuestionKey,
}

/// Outcome of a forward navigation step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    /// Moved to the question at this index.
    Moved(usize),
    /// The last question was active, so the interview was finished instead.
    Finished,
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// Drives one candidate's interview against the remote service.
///
/// Owns the wizard state, issues the remote calls in sequence, and notifies
/// an observer of lifecycle transitions. Local state never commits ahead of
/// the remote call that persists it: an answer is stored only after the
/// service accepted it, and `finish` replaces the whole map only after the
/// authoritative fetch succeeded.
///
/// Remote-calling operations hold the session's single in-flight slot; a
/// second entry while one is outstanding fails with `SessionError::Busy`
/// instead of racing it.
pub struct InterviewSession {
    api: Arc<dyn InterviewApi>,
    observer: Arc<dyn SessionObserver>,
    clock: Clock,
    stage: Stage,
    profile: Option<CandidateProfile>,
    questionnaire: Option<Questionnaire>,
    current: usize,
    answers: AnswerMap,
    pending_follow_up: Option<PendingFollowUp>,
    implied_skills: SkillSet,
    confirmed_skills: SkillSet,
    generated: Option<GeneratedDocument>,
    translated: Option<TranslatedDocument>,
    started_at: Option<DateTime<Utc>>,
    in_flight: bool,
}

impl InterviewSession {
    #[must_use]
    pub fn new(api: Arc<dyn InterviewApi>) -> Self {
        Self {
            api,
            observer: Arc::new(NullObserver),
            clock: Clock::default(),
            stage: Stage::NotStarted,
            profile: None,
            questionnaire: None,
            current: 0,
            answers: AnswerMap::new(),
            pending_follow_up: None,
            implied_skills: SkillSet::default(),
            confirmed_skills: SkillSet::default(),
            generated: None,
            translated: None,
            started_at: None,
            in_flight: false,
        }
    }

    #[must_use]
    pub fn with_observer(mut self, observer: Arc<dyn SessionObserver>) -> Self {
        self.observer = observer;
        self
    }

    #[must_use]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    //
    // ─── ACCESSORS ─────────────────────────────────────────────────────────
    //

    #[must_use]
    pub fn stage(&self) -> Stage {
        self.stage
    }

    #[must_use]
    pub fn profile(&self) -> Option<&CandidateProfile> {
        self.profile.as_ref()
    }

    #[must_use]
    pub fn questionnaire(&self) -> Option<&Questionnaire> {
        self.questionnaire.as_ref()
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        self.questionnaire.as_ref()?.get(self.current)
    }

    #[must_use]
    pub fn answers(&self) -> &AnswerMap {
        &self.answers
    }

    #[must_use]
    pub fn pending_follow_up(&self) -> Option<&PendingFollowUp> {
        self.pending_follow_up.as_ref()
    }

    #[must_use]
    pub fn implied_skills(&self) -> &SkillSet {
        &self.implied_skills
    }

    #[must_use]
    pub fn confirmed_skills(&self) -> &SkillSet {
        &self.confirmed_skills
    }

    #[must_use]
    pub fn generated_document(&self) -> Option<&GeneratedDocument> {
        self.generated.as_ref()
    }

    #[must_use]
    pub fn translated_document(&self) -> Option<&TranslatedDocument> {
        self.translated.as_ref()
    }

    #[must_use]
    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    /// Progress snapshot, or `None` before the interview starts.
    #[must_use]
    pub fn progress(&self) -> Option<InterviewProgress> {
        let questionnaire = self.questionnaire.as_ref()?;
        let total = questionnaire.len();
        let answered = self.answered_count();
        Some(InterviewProgress {
            total,
            current: self.current,
            answered,
            remaining: total - answered,
            finish_available: self.current >= total * 3 / 4,
        })
    }

    fn answered_count(&self) -> usize {
        let Some(questionnaire) = self.questionnaire.as_ref() else {
            return 0;
        };
        questionnaire
            .iter()
            .filter(|question| {
                self.answers
                    .get(&question.key)
                    .is_some_and(|answer| !answer.is_empty())
            })
            .count()
    }

    //
    // ─── OPERATIONS ────────────────────────────────────────────────────────
    //

    /// Start the interview: validate the form input, create the remote
    /// session, and fetch the question list.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Profile` for empty or malformed form fields
    /// (caught before any remote call), `AlreadyStarted` on reuse, and `Api`
    /// for remote failures.
    pub async fn start(
        &mut self,
        full_name: &str,
        job_role: &str,
        experience_level: &str,
    ) -> Result<&Questionnaire, SessionError> {
        if self.stage != Stage::NotStarted {
            return Err(SessionError::AlreadyStarted);
        }
        let profile = CandidateProfile::new(full_name, job_role, experience_level)?;

        self.begin_call()?;
        let result = match self.api.initialize(&profile).await {
            Ok(()) => self.api.questions().await,
            Err(err) => Err(err),
        };
        let raw = self.settle(result)?;
        let questionnaire = Questionnaire::new(raw)?;

        let total = questionnaire.len();
        self.profile = Some(profile);
        self.questionnaire = Some(questionnaire);
        self.current = 0;
        self.answers.clear();
        self.stage = Stage::Interviewing;
        self.started_at = Some(self.clock.now());
        self.emit(SessionEvent::Started {
            total_questions: total,
        });
        self.questionnaire.as_ref().ok_or(SessionError::NotStarted)
    }

    /// Persist an answer for the question at `index`.
    ///
    /// The text is stored locally only after the remote call succeeded; on
    /// failure the local entry for that key is untouched and the session does
    /// not advance. A follow-up in the receipt parks the session until it is
    /// resolved.
    ///
    /// # Errors
    ///
    /// Returns local validation errors (`IndexOutOfRange`, `KeyMismatch`,
    /// `FollowUpPending`, `WrongStage`), `Busy` while a call is outstanding,
    /// or `Api` for remote failures.
    pub async fn submit_answer(
        &mut self,
        index: usize,
        key: &QuestionKey,
        text: &str,
    ) -> Result<AnswerReceipt, SessionError> {
        self.require_stage(Stage::Interviewing)?;
        self.require_no_follow_up()?;
        {
            let questionnaire = self.questionnaire.as_ref().ok_or(SessionError::NotStarted)?;
            let question = questionnaire
                .get(index)
                .ok_or(SessionError::IndexOutOfRange {
                    index,
                    count: questionnaire.len(),
                })?;
            if &question.key != key {
                return Err(SessionError::KeyMismatch {
                    index,
                    key: key.to_string(),
                });
            }
        }
        let text = text.trim();

        self.begin_call()?;
        let result = self.api.submit_answer(index, key, text).await;
        let receipt = self.settle(result)?;

        self.answers.insert(key.clone(), text.to_string());
        if let Some(follow_up) = receipt.follow_up.clone() {
            self.emit(SessionEvent::FollowUpShown {
                kind: follow_up.kind.clone(),
                prompt: follow_up.prompt.clone(),
            });
            self.pending_follow_up = Some(PendingFollowUp {
                follow_up,
                original_key: key.clone(),
            });
        }
        Ok(receipt)
    }

    /// Move to the next question, or finish the interview when the last
    /// question is active.
    ///
    /// # Errors
    ///
    /// Returns `FollowUpPending` while a follow-up is unresolved, and
    /// whatever `finish` returns when invoked from the last question.
    pub async fn advance(&mut self) -> Result<Advance, SessionError> {
        self.step(false).await
    }

    /// Like `advance`, but tagged as a skip: the question stays answerable
    /// and the observer hears `Skipped` instead of `Advanced`.
    ///
    /// # Errors
    ///
    /// Same as `advance`.
    pub async fn skip(&mut self) -> Result<Advance, SessionError> {
        self.step(true).await
    }

    async fn step(&mut self, skipped: bool) -> Result<Advance, SessionError> {
        self.require_stage(Stage::Interviewing)?;
        self.require_no_follow_up()?;
        let last = self
            .questionnaire
            .as_ref()
            .ok_or(SessionError::NotStarted)?
            .last_index();
        if self.current >= last {
            self.finish_inner(None).await?;
            return Ok(Advance::Finished);
        }
        self.current += 1;
        if skipped {
            self.emit(SessionEvent::Skipped {
                index: self.current,
            });
        } else {
            self.emit(SessionEvent::Advanced {
                index: self.current,
            });
        }
        Ok(Advance::Moved(self.current))
    }

    /// Move back one question. A no-op at index 0; never touches the remote
    /// service.
    ///
    /// # Errors
    ///
    /// Returns `FollowUpPending` while a follow-up is unresolved (backwards
    /// motion would sidestep the gate) and `WrongStage` outside the
    /// interview.
    pub fn retreat(&mut self) -> Result<usize, SessionError> {
        self.require_stage(Stage::Interviewing)?;
        self.require_no_follow_up()?;
        if self.current > 0 {
            self.current -= 1;
            self.emit(SessionEvent::Retreated {
                index: self.current,
            });
        }
        Ok(self.current)
    }

    /// Answer the pending follow-up. An empty answer resolves it locally
    /// without a remote call, matching a skip.
    ///
    /// # Errors
    ///
    /// Returns `NoFollowUp` if nothing is pending, or `Api` if the remote
    /// call fails; in that case the follow-up stays pending and can be
    /// retried or skipped.
    pub async fn resolve_follow_up(&mut self, answer: &str) -> Result<(), SessionError> {
        let pending = self
            .pending_follow_up
            .clone()
            .ok_or(SessionError::NoFollowUp)?;
        let answer = answer.trim();
        if !answer.is_empty() {
            self.begin_call()?;
            let next = pending.follow_up.additional.first().map(String::as_str);
            let result = self
                .api
                .submit_follow_up(
                    &pending.follow_up.kind,
                    answer,
                    &pending.original_key,
                    next,
                )
                .await;
            self.settle(result)?;
        }
        self.pending_follow_up = None;
        Ok(())
    }

    /// Dismiss the pending follow-up without answering it.
    ///
    /// # Errors
    ///
    /// Returns `NoFollowUp` if nothing is pending.
    pub fn skip_follow_up(&mut self) -> Result<(), SessionError> {
        if self.pending_follow_up.take().is_none() {
            return Err(SessionError::NoFollowUp);
        }
        Ok(())
    }

    /// Finish the interview: flush a non-empty pending answer for the current
    /// question, then replace the local answer map with the service's
    /// authoritative copy and move to review.
    ///
    /// # Errors
    ///
    /// Flush failures propagate and abort the finish; the local map is only
    /// replaced after the authoritative fetch succeeded.
    pub async fn finish(&mut self, pending_answer: Option<&str>) -> Result<&AnswerMap, SessionError> {
        self.require_stage(Stage::Interviewing)?;
        self.require_no_follow_up()?;
        self.finish_inner(pending_answer).await?;
        Ok(&self.answers)
    }

    async fn finish_inner(&mut self, pending_answer: Option<&str>) -> Result<(), SessionError> {
        if let Some(text) = pending_answer {
            let text = text.trim();
            if !text.is_empty() {
                let key = self
                    .current_question()
                    .ok_or(SessionError::NotStarted)?
                    .key
                    .clone();
                self.submit_answer(self.current, &key, text).await?;
                // The flush itself may spawn a follow-up; it gates the finish
                // like any other.
                self.require_no_follow_up()?;
            }
        }

        self.begin_call()?;
        let result = self.api.answers().await;
        let authoritative = self.settle(result)?;
        self.answers = authoritative;
        self.stage = Stage::Reviewing;
        self.emit(SessionEvent::Finished {
            answered: self.answered_count(),
        });
        Ok(())
    }

    /// Request the inferred skill set for the answers given so far.
    ///
    /// # Errors
    ///
    /// Returns `Api` on failure. Callers that want the wizard's best-effort
    /// behavior use `proceed_to_generate` instead.
    pub async fn analyze_skills(&mut self) -> Result<&SkillSet, SessionError> {
        self.require_stage(Stage::Reviewing)?;
        self.begin_call()?;
        let result = self.api.analyze_skills().await;
        let skills = self.settle(result)?;
        self.implied_skills = skills;
        Ok(&self.implied_skills)
    }

    /// Move from review to generation, analyzing skills on the way.
    ///
    /// Skill analysis is best-effort enrichment: a failure is logged and
    /// reported through the observer, and the wizard still moves on with an
    /// empty inferred set.
    ///
    /// # Errors
    ///
    /// Returns `WrongStage` outside review. Remote analysis failures do not
    /// surface here.
    pub async fn proceed_to_generate(&mut self) -> Result<&SkillSet, SessionError> {
        self.require_stage(Stage::Reviewing)?;
        if let Err(err) = self.analyze_skills().await {
            warn!(error = %err, "skill analysis failed; continuing without inferred skills");
            self.implied_skills = SkillSet::default();
        }
        self.stage = Stage::Generating;
        Ok(&self.implied_skills)
    }

    /// Generate the resume with the candidate's confirmed skill selection.
    ///
    /// # Errors
    ///
    /// Empty format or style fail locally; remote failures leave the
    /// previously recorded document (if any) untouched.
    pub async fn generate(
        &mut self,
        format: &str,
        style: &str,
        confirmed_skills: SkillSet,
    ) -> Result<&GeneratedDocument, SessionError> {
        self.require_stage(Stage::Generating)?;
        let format = format.trim();
        if format.is_empty() {
            return Err(SessionError::MissingField("format"));
        }
        let style = style.trim();
        if style.is_empty() {
            return Err(SessionError::MissingField("style"));
        }

        self.begin_call()?;
        let result = self
            .api
            .generate_resume(format, style, &confirmed_skills)
            .await;
        let document = self.settle(result)?;

        self.confirmed_skills = confirmed_skills;
        self.stage = Stage::Done;
        self.emit(SessionEvent::GenerateCompleted {
            filename: document.filename.clone(),
        });
        Ok(self.generated.insert(document))
    }

    /// Translate a generated resume.
    ///
    /// # Errors
    ///
    /// An empty filename or target language fails locally with no remote
    /// call; remote failures leave the previous translation untouched.
    pub async fn translate(
        &mut self,
        filename: &str,
        target_language: &str,
    ) -> Result<&TranslatedDocument, SessionError> {
        self.require_stage(Stage::Done)?;
        let filename = filename.trim();
        if filename.is_empty() {
            return Err(SessionError::MissingField("filename"));
        }
        let target_language = target_language.trim();
        if target_language.is_empty() {
            return Err(SessionError::MissingField("target_language"));
        }

        self.begin_call()?;
        let result = self.api.translate_resume(filename, target_language).await;
        let document = self.settle(result)?;

        self.emit(SessionEvent::TranslateCompleted {
            filename: document.filename.clone(),
        });
        Ok(self.translated.insert(document))
    }

    /// Re-save one answer from the review screen (or after generation, which
    /// loops the wizard back to review).
    ///
    /// Review-time edits render no coaching feedback, so the receipt is
    /// dropped.
    ///
    /// # Errors
    ///
    /// Returns `UnknownKey` for a key outside the questionnaire, `WrongStage`
    /// during the interview itself, and `Api` for remote failures (the local
    /// answer keeps its previous value).
    pub async fn edit_answer(
        &mut self,
        key: &QuestionKey,
        text: &str,
    ) -> Result<(), SessionError> {
        match self.stage {
            Stage::Reviewing | Stage::Generating | Stage::Done => {}
            stage => return Err(SessionError::WrongStage { stage }),
        }
        let index = self
            .questionnaire
            .as_ref()
            .ok_or(SessionError::NotStarted)?
            .index_of(key)
            .ok_or_else(|| SessionError::UnknownKey(key.to_string()))?;
        let text = text.trim();

        self.begin_call()?;
        let result = self.api.submit_answer(index, key, text).await;
        self.settle(result)?;

        self.answers.insert(key.clone(), text.to_string());
        self.stage = Stage::Reviewing;
        Ok(())
    }

    //
    // ─── INTERNALS ─────────────────────────────────────────────────────────
    //

    fn require_stage(&self, stage: Stage) -> Result<(), SessionError> {
        if self.stage == Stage::NotStarted && stage != Stage::NotStarted {
            return Err(SessionError::NotStarted);
        }
        if self.stage != stage {
            return Err(SessionError::WrongStage { stage: self.stage });
        }
        Ok(())
    }

    fn require_no_follow_up(&self) -> Result<(), SessionError> {
        if self.pending_follow_up.is_some() {
            return Err(SessionError::FollowUpPending);
        }
        Ok(())
    }

    fn begin_call(&mut self) -> Result<(), SessionError> {
        if self.in_flight {
            return Err(SessionError::Busy);
        }
        self.in_flight = true;
        Ok(())
    }

    /// Release the in-flight slot and map a remote failure, notifying the
    /// observer on the way out.
    fn settle<T>(&mut self, result: Result<T, ApiError>) -> Result<T, SessionError> {
        self.in_flight = false;
        result.map_err(|err| {
            let err = SessionError::Api(err);
            self.emit(SessionEvent::Failed {
                message: err.to_string(),
            });
            err
        })
    }

    fn emit(&self, event: SessionEvent) {
        self.observer.notify(&event);
    }
}

impl std::fmt::Debug for InterviewSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InterviewSession")
            .field("stage", &self.stage)
            .field("current", &self.current)
            .field("answers_len", &self.answers.len())
            .field("pending_follow_up", &self.pending_follow_up.is_some())
            .field("generated", &self.generated.as_ref().map(|d| &d.filename))
            .field("started_at", &self.started_at)
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interview::events::RecordingObserver;
    use interview_core::time::fixed_now;
    use remote::InMemoryInterviewApi;

    fn key(raw: &str) -> QuestionKey {
        QuestionKey::new(raw).unwrap()
    }

    fn session_with(api: &InMemoryInterviewApi) -> (InterviewSession, RecordingObserver) {
        let observer = RecordingObserver::new();
        let session = InterviewSession::new(Arc::new(api.clone()))
            .with_observer(Arc::new(observer.clone()))
            .with_clock(Clock::fixed(fixed_now()));
        (session, observer)
    }

    async fn started(api: &InMemoryInterviewApi) -> (InterviewSession, RecordingObserver) {
        let (mut session, observer) = session_with(api);
        session
            .start("Dana", "Backend Developer", "mid-level")
            .await
            .unwrap();
        (session, observer)
    }

    #[tokio::test]
    async fn start_validates_before_any_remote_call() {
        let api = InMemoryInterviewApi::new();
        let (mut session, _) = session_with(&api);

        let err = session.start("  ", "Backend Developer", "mid-level").await.unwrap_err();
        assert!(matches!(err, SessionError::Profile(_)));
        assert_eq!(api.request_count(), 0);
        assert_eq!(session.stage(), Stage::NotStarted);
    }

    #[tokio::test]
    async fn start_sets_index_zero_and_question_count() {
        let api = InMemoryInterviewApi::new();
        let (mut session, observer) = session_with(&api);

        let total = session
            .start("Dana", "Backend Developer", "mid-level")
            .await
            .unwrap()
            .len();
        assert_eq!(total, 10);
        assert_eq!(session.current_index(), 0);
        assert_eq!(session.stage(), Stage::Interviewing);
        assert_eq!(session.started_at(), Some(fixed_now()));
        assert_eq!(
            observer.events(),
            vec![SessionEvent::Started {
                total_questions: 10
            }]
        );

        let err = session
            .start("Dana", "Backend Developer", "mid-level")
            .await
            .unwrap_err();
        assert!(matches!(err, SessionError::AlreadyStarted));
    }

    #[tokio::test]
    async fn plain_answer_then_advance_moves_to_next_question() {
        let api = InMemoryInterviewApi::new();
        let (mut session, _) = started(&api).await;

        let receipt = session
            .submit_answer(0, &key("full_name"), "Dana Cohen")
            .await
            .unwrap();
        assert!(receipt.feedback.is_none());
        assert!(receipt.follow_up.is_none());

        assert_eq!(session.advance().await.unwrap(), Advance::Moved(1));
        assert_eq!(session.current_index(), 1);
    }

    #[tokio::test]
    async fn wrong_key_for_index_is_rejected_locally() {
        let api = InMemoryInterviewApi::new();
        let (mut session, _) = started(&api).await;
        let before = api.request_count();

        let err = session
            .submit_answer(0, &key("email"), "dana@example.com")
            .await
            .unwrap_err();
        assert!(matches!(err, SessionError::KeyMismatch { index: 0, .. }));
        let err = session
            .submit_answer(99, &key("email"), "dana@example.com")
            .await
            .unwrap_err();
        assert!(matches!(err, SessionError::IndexOutOfRange { index: 99, .. }));
        assert_eq!(api.request_count(), before);
    }

    #[tokio::test]
    async fn failed_submission_leaves_local_state_unchanged() {
        let api = InMemoryInterviewApi::new();
        let (mut session, _) = started(&api).await;

        api.push_failure(503, "temporarily unavailable");
        let err = session
            .submit_answer(0, &key("full_name"), "Dana Cohen")
            .await
            .unwrap_err();
        assert!(err.is_remote());
        assert!(!session.answers().contains_key(&key("full_name")));
        assert_eq!(session.current_index(), 0);

        // The session stays usable; the same call succeeds afterwards.
        session
            .submit_answer(0, &key("full_name"), "Dana Cohen")
            .await
            .unwrap();
        assert_eq!(session.answers().get(&key("full_name")).unwrap(), "Dana Cohen");
    }

    #[tokio::test]
    async fn index_stays_in_bounds_under_any_navigation_sequence() {
        let api = InMemoryInterviewApi::new();
        let (mut session, _) = started(&api).await;
        let total = session.questionnaire().unwrap().len();

        assert_eq!(session.retreat().unwrap(), 0);
        let calls = api.request_count();
        assert_eq!(session.retreat().unwrap(), 0);
        assert_eq!(api.request_count(), calls, "retreat must stay local");

        for _ in 0..7 {
            session.advance().await.unwrap();
            assert!(session.current_index() < total);
        }
        for _ in 0..20 {
            session.retreat().unwrap();
        }
        assert_eq!(session.current_index(), 0);
        for _ in 0..5 {
            session.skip().await.unwrap();
            assert!(session.current_index() < total);
        }
    }

    #[tokio::test]
    async fn follow_up_blocks_navigation_until_resolved() {
        let api = InMemoryInterviewApi::new();
        let (mut session, observer) = started(&api).await;

        for _ in 0..3 {
            session.skip().await.unwrap();
        }
        let receipt = session
            .submit_answer(3, &key("location"), "Tel Aviv, Israel")
            .await
            .unwrap();
        let follow_up = receipt.follow_up.unwrap();
        assert_eq!(follow_up.kind.as_str(), "work_arrangement");
        assert!(session.pending_follow_up().is_some());
        assert!(observer.events().contains(&SessionEvent::FollowUpShown {
            kind: follow_up.kind.clone(),
            prompt: follow_up.prompt.clone(),
        }));

        assert!(matches!(
            session.advance().await.unwrap_err(),
            SessionError::FollowUpPending
        ));
        assert!(matches!(
            session.retreat().unwrap_err(),
            SessionError::FollowUpPending
        ));
        assert!(matches!(
            session.skip().await.unwrap_err(),
            SessionError::FollowUpPending
        ));

        session.resolve_follow_up("Remote").await.unwrap();
        assert!(session.pending_follow_up().is_none());
        assert_eq!(session.advance().await.unwrap(), Advance::Moved(4));
    }

    #[tokio::test]
    async fn empty_follow_up_answer_resolves_without_a_remote_call() {
        let api = InMemoryInterviewApi::new();
        let (mut session, _) = started(&api).await;

        for _ in 0..3 {
            session.skip().await.unwrap();
        }
        session
            .submit_answer(3, &key("location"), "Tel Aviv, Israel")
            .await
            .unwrap();
        let calls = api.request_count();
        session.resolve_follow_up("   ").await.unwrap();
        assert_eq!(api.request_count(), calls);

        let err = session.skip_follow_up().unwrap_err();
        assert!(matches!(err, SessionError::NoFollowUp));
    }

    #[tokio::test]
    async fn submitted_answer_survives_the_finish_round_trip() {
        let api = InMemoryInterviewApi::new();
        let (mut session, observer) = started(&api).await;

        session
            .submit_answer(0, &key("full_name"), "Dana Cohen")
            .await
            .unwrap();
        session.finish(None).await.unwrap();
        assert_eq!(
            session.answers().get(&key("full_name")).unwrap(),
            "Dana Cohen"
        );
        assert_eq!(session.stage(), Stage::Reviewing);
        assert!(observer
            .events()
            .iter()
            .any(|event| matches!(event, SessionEvent::Finished { .. })));
    }

    #[tokio::test]
    async fn finish_flushes_the_pending_answer_first() {
        let api = InMemoryInterviewApi::new();
        let (mut session, _) = started(&api).await;

        session.finish(Some("Dana Cohen")).await.unwrap();
        assert_eq!(
            session.answers().get(&key("full_name")).unwrap(),
            "Dana Cohen"
        );
    }

    #[tokio::test]
    async fn failed_flush_aborts_the_finish() {
        let api = InMemoryInterviewApi::new();
        let (mut session, _) = started(&api).await;

        api.push_failure(500, "storage hiccup");
        let err = session.finish(Some("Dana Cohen")).await.unwrap_err();
        assert!(err.is_remote());
        assert_eq!(session.stage(), Stage::Interviewing);
        assert!(!session.answers().contains_key(&key("full_name")));
    }

    #[tokio::test]
    async fn advancing_past_the_last_question_finishes() {
        let api = InMemoryInterviewApi::new();
        let (mut session, _) = started(&api).await;
        let last = session.questionnaire().unwrap().last_index();

        for _ in 0..last {
            session.advance().await.unwrap();
        }
        assert_eq!(session.current_index(), last);
        assert_eq!(session.advance().await.unwrap(), Advance::Finished);
        assert_eq!(session.stage(), Stage::Reviewing);
    }

    #[tokio::test]
    async fn skill_analysis_failure_is_not_fatal_to_the_wizard() {
        let api = InMemoryInterviewApi::new();
        let (mut session, observer) = started(&api).await;
        session.finish(None).await.unwrap();

        api.push_failure(500, "model overloaded");
        assert!(session.proceed_to_generate().await.unwrap().is_empty());
        assert_eq!(session.stage(), Stage::Generating);
        assert!(observer.events().contains(&SessionEvent::Failed {
            message: "model overloaded".to_string()
        }));
    }

    #[tokio::test]
    async fn generation_failure_leaves_the_recorded_document_unchanged() {
        let api = InMemoryInterviewApi::new();
        let (mut session, _) = started(&api).await;
        session.finish(None).await.unwrap();
        session.proceed_to_generate().await.unwrap();

        api.push_failure(502, "generator offline");
        let err = session
            .generate("html", "modern", SkillSet::default())
            .await
            .unwrap_err();
        assert!(err.is_remote());
        assert!(session.generated_document().is_none());
        assert_eq!(session.stage(), Stage::Generating);

        let filename = session
            .generate("html", "modern", SkillSet::default())
            .await
            .unwrap()
            .filename
            .clone();
        assert_eq!(filename, "dana_resume.html");
        assert_eq!(session.stage(), Stage::Done);
    }

    #[tokio::test]
    async fn translate_rejects_an_empty_language_without_a_remote_call() {
        let api = InMemoryInterviewApi::new();
        let (mut session, _) = started(&api).await;
        session.finish(None).await.unwrap();
        session.proceed_to_generate().await.unwrap();
        session
            .generate("html", "modern", SkillSet::default())
            .await
            .unwrap();

        let calls = api.request_count();
        let err = session
            .translate("dana_resume.html", "  ")
            .await
            .unwrap_err();
        assert!(matches!(err, SessionError::MissingField("target_language")));
        assert_eq!(api.request_count(), calls);

        let translated = session
            .translate("dana_resume.html", "Hebrew")
            .await
            .unwrap();
        assert_eq!(translated.filename, "dana_resume_hebrew.html");
    }

    #[tokio::test]
    async fn editing_after_generation_loops_back_to_review() {
        let api = InMemoryInterviewApi::new();
        let (mut session, _) = started(&api).await;
        session
            .submit_answer(0, &key("full_name"), "Dana Cohen")
            .await
            .unwrap();
        session.finish(None).await.unwrap();
        session.proceed_to_generate().await.unwrap();
        session
            .generate("html", "modern", SkillSet::default())
            .await
            .unwrap();
        assert_eq!(session.stage(), Stage::Done);

        session
            .edit_answer(&key("full_name"), "Dana L. Cohen")
            .await
            .unwrap();
        assert_eq!(session.stage(), Stage::Reviewing);
        assert_eq!(
            session.answers().get(&key("full_name")).unwrap(),
            "Dana L. Cohen"
        );

        let err = session
            .edit_answer(&key("nonexistent"), "x")
            .await
            .unwrap_err();
        assert!(matches!(err, SessionError::UnknownKey(_)));

        // The edited value is what a fresh authoritative fetch reports.
        let fetched = api.answers().await.unwrap();
        assert_eq!(fetched.get(&key("full_name")).unwrap(), "Dana L. Cohen");
    }

    mod scripted {
        use super::*;
        use async_trait::async_trait;
        use interview_core::model::{FollowUpKind, Question};
        use remote::QuestionDetail;
        use std::sync::Mutex;

        /// Hand-rolled stand-in that attaches additional questions to every
        /// follow-up and records what the follow-up endpoint receives.
        #[derive(Default)]
        struct ScriptedApi {
            follow_up_calls: Mutex<Vec<(String, String, Option<String>)>>,
        }

        fn two_questions() -> Vec<Question> {
            vec![
                Question {
                    index: 0,
                    section: "Experience".to_string(),
                    key: QuestionKey::new("job_history").unwrap(),
                    prompt: "Walk me through your work history.".to_string(),
                },
                Question {
                    index: 1,
                    section: "Experience".to_string(),
                    key: QuestionKey::new("achievements").unwrap(),
                    prompt: "What are you most proud of?".to_string(),
                },
            ]
        }

        #[async_trait]
        impl InterviewApi for ScriptedApi {
            async fn initialize(&self, _profile: &CandidateProfile) -> Result<(), ApiError> {
                Ok(())
            }

            async fn questions(&self) -> Result<Vec<Question>, ApiError> {
                Ok(two_questions())
            }

            async fn question(&self, _index: usize) -> Result<QuestionDetail, ApiError> {
                Err(ApiError::remote(500, "not scripted"))
            }

            async fn submit_answer(
                &self,
                _index: usize,
                _key: &QuestionKey,
                _answer: &str,
            ) -> Result<AnswerReceipt, ApiError> {
                Ok(AnswerReceipt {
                    feedback: None,
                    follow_up: Some(FollowUp {
                        kind: FollowUpKind::new("professional_context").unwrap(),
                        prompt: "Which team was that with?".to_string(),
                        additional: vec!["Which stack did you use?".to_string()],
                    }),
                })
            }

            async fn submit_follow_up(
                &self,
                kind: &FollowUpKind,
                answer: &str,
                _original_key: &QuestionKey,
                next_question: Option<&str>,
            ) -> Result<(), ApiError> {
                if let Ok(mut calls) = self.follow_up_calls.lock() {
                    calls.push((
                        kind.to_string(),
                        answer.to_string(),
                        next_question.map(str::to_string),
                    ));
                }
                Ok(())
            }

            async fn answers(&self) -> Result<AnswerMap, ApiError> {
                Ok(AnswerMap::new())
            }

            async fn analyze_skills(&self) -> Result<SkillSet, ApiError> {
                Err(ApiError::remote(500, "not scripted"))
            }

            async fn generate_resume(
                &self,
                _format: &str,
                _style: &str,
                _confirmed_skills: &SkillSet,
            ) -> Result<GeneratedDocument, ApiError> {
                Err(ApiError::remote(500, "not scripted"))
            }

            async fn translate_resume(
                &self,
                _filename: &str,
                _target_language: &str,
            ) -> Result<TranslatedDocument, ApiError> {
                Err(ApiError::remote(500, "not scripted"))
            }

            async fn download(&self, _path: &str) -> Result<Vec<u8>, ApiError> {
                Err(ApiError::remote(500, "not scripted"))
            }
        }

        #[tokio::test]
        async fn follow_up_resolution_forwards_the_next_additional_question() {
            let api = Arc::new(ScriptedApi::default());
            let mut session = InterviewSession::new(Arc::clone(&api) as Arc<dyn InterviewApi>);
            session
                .start("Dana", "Backend Developer", "mid-level")
                .await
                .unwrap();

            session
                .submit_answer(0, &key("job_history"), "Backend work at Acme")
                .await
                .unwrap();
            session
                .resolve_follow_up("The payments team, mostly Rust")
                .await
                .unwrap();

            let calls = api.follow_up_calls.lock().unwrap().clone();
            assert_eq!(calls.len(), 1);
            let (kind, answer, next) = &calls[0];
            assert_eq!(kind, "professional_context");
            assert_eq!(answer, "The payments team, mostly Rust");
            assert_eq!(next.as_deref(), Some("Which stack did you use?"));
        }
    }

    #[tokio::test]
    async fn progress_reports_the_three_quarter_finish_gate() {
        let api = InMemoryInterviewApi::new();
        let (mut session, _) = started(&api).await;

        let progress = session.progress().unwrap();
        assert_eq!(progress.total, 10);
        assert!(!progress.finish_available);

        for _ in 0..7 {
            session.advance().await.unwrap();
        }
        let progress = session.progress().unwrap();
        assert_eq!(progress.current, 7);
        assert!(progress.finish_available);
    }
}
