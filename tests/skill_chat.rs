// SkillAssistant against a fake service

mod common;

use common::{analysis, user, FakeApi, Harness};
use pretty_assertions::assert_eq;
use std::sync::Arc;

use skillpath::api::{ChatSkillResponse, ExtractedSkill, UpdateSkillsResponse};
use skillpath::chat::{ChatTranscript, Sender, SkillAssistant};
use skillpath::session::{ExpertiseLevel, SessionController, SessionStore};
use skillpath::storage::{KeyValueStore, MemoryStore, StorageError, CHAT_KEY, TOKEN_KEY};
use skillpath::ApiError;

/// Storage whose token entry cannot be read
#[derive(Default)]
struct UnreadableToken {
    inner: MemoryStore,
}

impl KeyValueStore for UnreadableToken {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        if key == TOKEN_KEY {
            return Err(StorageError::Io(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "token locked",
            )));
        }
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.inner.set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.inner.remove(key)
    }
}

fn noted() -> ChatSkillResponse {
    ChatSkillResponse {
        bot_message: Some("Noted.".to_string()),
        extracted_skills: vec![],
        updated_skills: None,
        user: None,
    }
}

fn rated(skill: &str, level: &str) -> ExtractedSkill {
    ExtractedSkill::Rated {
        skill: skill.to_string(),
        expertise_level: Some(level.to_string()),
    }
}

#[tokio::test]
async fn test_anonymous_update_triggers_reanalysis() {
    let h = Harness::new();
    h.store().set_skills("Python");
    *h.api.chat.lock().unwrap() = Some(Ok(ChatSkillResponse {
        bot_message: Some("Nice, Docker added.".to_string()),
        extracted_skills: vec![rated("Docker", "Beginner")],
        updated_skills: Some("Python, Docker".to_string()),
        user: None,
    }));
    h.api.push_analysis(Ok(analysis("DevOps Engineer")));

    let mut assistant = SkillAssistant::new(&h.controller, 50, true).unwrap();
    let reply = assistant.send("I learned Docker last week").await.unwrap();
    assert_eq!(reply.bot_message, "Nice, Docker added.");

    let task = reply.reanalysis.expect("re-analysis should be scheduled");
    task.wait().await.unwrap();

    let state = h.store().snapshot();
    assert_eq!(state.skills, "Python, Docker");
    assert_eq!(state.analysis.unwrap().selected_path.title, "DevOps Engineer");
    assert!(!state.is_loading);
    assert_eq!(
        h.api.calls(),
        vec![
            "chat - / I learned Docker last week".to_string(),
            "analyze Python, Docker / Beginner".to_string(),
        ]
    );

    // the transcript outlives the assistant
    let restored = ChatTranscript::load(&*h.storage, 50).unwrap();
    let senders: Vec<Sender> = restored.messages().map(|m| m.sender).collect();
    assert_eq!(senders, vec![Sender::User, Sender::Bot]);
    assert_eq!(
        restored.last().unwrap().extracted_skills,
        vec!["Docker".to_string()]
    );
}

#[tokio::test]
async fn test_anonymous_update_forwards_token() {
    let h = Harness::new();
    h.storage.set(TOKEN_KEY, "tok-1").unwrap();
    *h.api.chat.lock().unwrap() = Some(Ok(ChatSkillResponse {
        bot_message: None,
        extracted_skills: vec![],
        updated_skills: None,
        user: None,
    }));

    let mut assistant = SkillAssistant::new(&h.controller, 50, true).unwrap();
    let reply = assistant.send("hello").await.unwrap();

    assert!(reply.reanalysis.is_none());
    assert!(reply.bot_message.starts_with("I couldn't spot"));
    assert_eq!(h.api.calls(), vec!["chat tok-1 / hello".to_string()]);
}

#[tokio::test]
async fn test_signed_in_update_replaces_profile() {
    let h = Harness::new();
    h.store().set_user(Some(user("Go", ExpertiseLevel::Advanced)));
    *h.api.update_skills.lock().unwrap() = Some(Ok(UpdateSkillsResponse {
        user: user("Go, Kubernetes", ExpertiseLevel::Advanced),
        extracted_skills: vec![rated("Kubernetes", "Intermediate")],
        updated_skills_list: vec![],
        bot_message: None,
    }));

    let mut assistant = SkillAssistant::new(&h.controller, 50, false).unwrap();
    let reply = assistant.send("Deployed my first Kubernetes cluster").await.unwrap();

    assert!(reply.reanalysis.is_none());
    assert_eq!(
        reply.bot_message,
        "Great! I've added Kubernetes (Intermediate) to your skills."
    );

    let state = h.store().snapshot();
    assert_eq!(state.skills, "Go, Kubernetes");
    assert_eq!(state.current_user.unwrap().skills, "Go, Kubernetes");
    assert_eq!(
        h.api.calls(),
        vec!["update-skills 1 / Deployed my first Kubernetes cluster".to_string()]
    );
}

#[tokio::test]
async fn test_blank_message_is_rejected_locally() {
    let h = Harness::new();
    let mut assistant = SkillAssistant::new(&h.controller, 50, true).unwrap();

    let err = assistant.send("   ").await.err().unwrap();
    assert!(matches!(err, ApiError::Validation(_)));
    assert!(assistant.transcript().is_empty());
    assert!(h.api.calls().is_empty());
}

#[tokio::test]
async fn test_failure_leaves_an_apology_in_the_transcript() {
    let h = Harness::new();
    h.store().set_skills("Python");

    let mut assistant = SkillAssistant::new(&h.controller, 50, true).unwrap();
    let err = assistant.send("I learned Rust").await.err().unwrap();
    assert_eq!(err, ApiError::unreachable());

    let state = h.store().snapshot();
    assert_eq!(state.skills, "Python");
    assert!(!state.is_loading);
    assert_eq!(
        state.last_error.as_deref(),
        Some("Network Error: Unable to connect to server")
    );

    let last = assistant.transcript().last().unwrap();
    assert_eq!(last.sender, Sender::Bot);
    assert!(last.text.starts_with("Sorry"));
    assert_eq!(assistant.transcript().len(), 2);
}

#[tokio::test]
async fn test_extracted_skills_merge_locally_when_server_sends_none() {
    let h = Harness::new();
    h.store().set_skills("Python, React");
    *h.api.chat.lock().unwrap() = Some(Ok(ChatSkillResponse {
        bot_message: None,
        extracted_skills: vec![
            ExtractedSkill::Named("react".to_string()),
            rated("TypeScript", "Beginner"),
        ],
        updated_skills: None,
        user: None,
    }));

    let mut assistant = SkillAssistant::new(&h.controller, 50, false).unwrap();
    assistant.send("Picked up TypeScript with React").await.unwrap();

    assert_eq!(h.store().snapshot().skills, "Python, React, TypeScript");
}

#[tokio::test]
async fn test_clear_transcript_removes_persisted_messages() {
    let h = Harness::new();
    *h.api.chat.lock().unwrap() = Some(Ok(ChatSkillResponse {
        bot_message: Some("Noted.".to_string()),
        extracted_skills: vec![],
        updated_skills: None,
        user: None,
    }));

    let mut assistant = SkillAssistant::new(&h.controller, 50, true).unwrap();
    assistant.send("hi").await.unwrap();
    assert!(h.storage.get(CHAT_KEY).unwrap().is_some());

    assistant.clear_transcript();
    let restored = ChatTranscript::load(&*h.storage, 50).unwrap();
    assert!(restored.is_empty());
}

#[tokio::test]
async fn test_unreadable_token_falls_back_to_anonymous() {
    let api = Arc::new(FakeApi::new());
    *api.chat.lock().unwrap() = Some(Ok(noted()));
    let controller = SessionController::new(
        SessionStore::new(),
        api.clone(),
        Arc::new(UnreadableToken::default()),
    );

    let mut assistant = SkillAssistant::new(&controller, 50, true).unwrap();
    let reply = assistant.send("hi").await.unwrap();

    assert_eq!(reply.bot_message, "Noted.");
    assert_eq!(api.calls(), vec!["chat - / hi".to_string()]);
    assert_eq!(controller.store().snapshot().last_error, None);
}

#[tokio::test]
async fn test_blank_token_is_not_forwarded() {
    let h = Harness::new();
    h.storage.set(TOKEN_KEY, "   ").unwrap();
    *h.api.chat.lock().unwrap() = Some(Ok(noted()));

    let mut assistant = SkillAssistant::new(&h.controller, 50, true).unwrap();
    assistant.send("hi").await.unwrap();

    assert_eq!(h.api.calls(), vec!["chat - / hi".to_string()]);
}
