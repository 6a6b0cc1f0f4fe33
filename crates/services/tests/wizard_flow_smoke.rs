use std::sync::Arc;

use interview_core::model::{QuestionKey, SkillCategory, SkillSet, Stage};
use remote::{InMemoryInterviewApi, InterviewApi};
use services::{Advance, InterviewSession, RecordingObserver, SessionEvent};

fn key(raw: &str) -> QuestionKey {
    QuestionKey::new(raw).unwrap()
}

#[tokio::test]
async fn full_wizard_flow_from_welcome_to_translation() {
    let api = InMemoryInterviewApi::new();
    let observer = RecordingObserver::new();
    let mut session = InterviewSession::new(Arc::new(api.clone()))
        .with_observer(Arc::new(observer.clone()));

    let questionnaire = session
        .start("Dana Cohen", "Backend Developer", "mid-level")
        .await
        .unwrap();
    let total = questionnaire.len();
    assert_eq!(total, 10);

    // Answer every question; resolve whatever follow-ups come up.
    for index in 0..total {
        let question = session.questionnaire().unwrap().get(index).unwrap().clone();
        let answer = match question.key.as_str() {
            "full_name" => "Dana Cohen".to_string(),
            "email" => "dana@example.com".to_string(),
            "phone" => "+972-50-000-0000".to_string(),
            "location" => "Tel Aviv, Israel".to_string(),
            "linkedin" => "https://linkedin.com/in/danacohen".to_string(),
            "job_history" => "Backend developer at Acme, 2019 to 2023".to_string(),
            "technical_skills" => "Rust, PostgreSQL, Kubernetes".to_string(),
            _ => format!("Answer about {}", question.key),
        };
        let receipt = session
            .submit_answer(index, &question.key, &answer)
            .await
            .unwrap();
        if receipt.follow_up.is_some() {
            session.resolve_follow_up("No preference").await.unwrap();
        }
        match session.advance().await.unwrap() {
            Advance::Moved(next) => assert_eq!(next, index + 1),
            Advance::Finished => assert_eq!(index, total - 1),
        }
    }
    assert_eq!(session.stage(), Stage::Reviewing);

    // The authoritative map kept every interview answer.
    assert_eq!(
        session.answers().get(&key("email")).unwrap(),
        "dana@example.com"
    );
    // The follow-up's own answer also landed server-side.
    assert_eq!(
        session.answers().get(&key("work_arrangement")).unwrap(),
        "No preference"
    );

    // Review → generate, with skills inferred from the technical answer.
    let implied = session.proceed_to_generate().await.unwrap();
    assert!(implied.contains(SkillCategory::TechnicalSkills, "Rust"));

    let mut confirmed = SkillSet::default();
    confirmed.insert(SkillCategory::TechnicalSkills, "Rust");
    let document = session.generate("html", "modern", confirmed).await.unwrap();
    let filename = document.filename.clone();
    assert_eq!(filename, "dana_cohen_resume.html");
    assert_eq!(session.stage(), Stage::Done);

    let translated = session.translate(&filename, "Hebrew").await.unwrap();
    assert_eq!(translated.filename, "dana_cohen_resume_hebrew.html");

    // The document can be fetched through the download path.
    let path = session
        .translated_document()
        .unwrap()
        .download_url
        .clone();
    let bytes = api.download(&path).await.unwrap();
    assert!(!bytes.is_empty());

    // Every lifecycle notification fired at least once.
    let events = observer.events();
    assert!(events
        .iter()
        .any(|e| matches!(e, SessionEvent::Started { total_questions: 10 })));
    assert!(events.iter().any(|e| matches!(e, SessionEvent::Advanced { .. })));
    assert!(events
        .iter()
        .any(|e| matches!(e, SessionEvent::FollowUpShown { .. })));
    assert!(events.iter().any(|e| matches!(e, SessionEvent::Finished { .. })));
    assert!(events
        .iter()
        .any(|e| matches!(e, SessionEvent::GenerateCompleted { .. })));
    assert!(events
        .iter()
        .any(|e| matches!(e, SessionEvent::TranslateCompleted { .. })));
}

#[tokio::test]
async fn skipped_questions_stay_answerable_on_a_second_pass() {
    let api = InMemoryInterviewApi::new();
    let mut session = InterviewSession::new(Arc::new(api.clone()));
    session
        .start("Dana Cohen", "Backend Developer", "mid-level")
        .await
        .unwrap();

    // Skip the email question on the first pass.
    session
        .submit_answer(0, &key("full_name"), "Dana Cohen")
        .await
        .unwrap();
    session.advance().await.unwrap();
    session.skip().await.unwrap();
    assert_eq!(session.current_index(), 2);

    // Come back and answer it later.
    session.retreat().unwrap();
    assert_eq!(session.current_index(), 1);
    session
        .submit_answer(1, &key("email"), "dana@example.com")
        .await
        .unwrap();

    let answers = session.finish(None).await.unwrap();
    assert_eq!(answers.get(&key("email")).unwrap(), "dana@example.com");
}
