use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::transcript::{ChatMessage, ChatTranscript};
use crate::api::{CareerApi, ChatRequest, ExtractedSkill, UpdateSkillsRequest};
use crate::error::ApiError;
use crate::session::{SessionController, SessionStore, UserProfile};
use crate::storage::{KeyValueStore, StorageError, TOKEN_KEY};

/// Handle on a background re-analysis started by a chat message.
///
/// Await it with [`ReanalysisTask::wait`] or drop it; dropping does not stop
/// the task, the store still receives its outcome.
pub struct ReanalysisTask {
    handle: JoinHandle<Result<(), ApiError>>,
}

impl ReanalysisTask {
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    pub async fn wait(self) -> Result<(), ApiError> {
        match self.handle.await {
            Ok(result) => result,
            Err(e) => Err(ApiError::Network(format!("Re-analysis interrupted: {}", e))),
        }
    }
}

/// What the assistant answered to one message
pub struct ChatReply {
    pub bot_message: String,
    pub extracted_skills: Vec<ExtractedSkill>,
    pub reanalysis: Option<ReanalysisTask>,
}

struct SkillUpdate {
    bot_message: Option<String>,
    extracted: Vec<ExtractedSkill>,
    skills: String,
    user: Option<UserProfile>,
}

/// Conversational skill updates: the user describes what they learned, the
/// service extracts skills, the session absorbs them.
pub struct SkillAssistant {
    store: SessionStore,
    api: Arc<dyn CareerApi>,
    storage: Arc<dyn KeyValueStore>,
    transcript: ChatTranscript,
    auto_reanalyze: bool,
}

impl SkillAssistant {
    /// Build an assistant sharing the controller's store, API and storage,
    /// with the persisted transcript loaded
    pub fn new(
        controller: &SessionController,
        max_messages: usize,
        auto_reanalyze: bool,
    ) -> Result<Self, StorageError> {
        let storage = controller.storage();
        let transcript = ChatTranscript::load(storage.as_ref(), max_messages)?;
        Ok(Self {
            store: controller.store().clone(),
            api: controller.api(),
            storage,
            transcript,
            auto_reanalyze,
        })
    }

    pub fn transcript(&self) -> &ChatTranscript {
        &self.transcript
    }

    pub fn clear_transcript(&mut self) {
        self.transcript.clear();
        self.persist();
    }

    pub async fn send(&mut self, message: &str) -> Result<ChatReply, ApiError> {
        let message = message.trim();
        if message.is_empty() {
            let err = ApiError::validation("Please type a message");
            self.store.fail_request(err.to_string());
            return Err(err);
        }

        self.transcript.push(ChatMessage::user(message));
        self.persist();
        self.store.begin_request();

        let user = self.store.read(|s| s.current_user.clone());
        let outcome = match user {
            Some(user) => self.update_as_user(&user, message).await,
            None => self.update_anonymously(message).await,
        };

        let update = match outcome {
            Ok(update) => update,
            Err(e) => {
                self.store.fail_request(e.to_string());
                self.transcript.push(ChatMessage::bot(
                    format!("Sorry, I couldn't update your skills right now. {}", e),
                    Vec::new(),
                ));
                self.persist();
                return Err(e);
            }
        };

        let names: Vec<String> = update
            .extracted
            .iter()
            .map(|s| s.name().to_string())
            .collect();
        let bot_message = update
            .bot_message
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| summarize(&update.extracted));

        self.store.complete_skill_update(update.skills, update.user);
        self.transcript
            .push(ChatMessage::bot(bot_message.clone(), names.clone()));
        self.persist();

        let reanalysis = if self.auto_reanalyze && !names.is_empty() {
            info!("extracted {} skill(s), re-analyzing", names.len());
            Some(self.spawn_reanalysis())
        } else {
            None
        };

        Ok(ChatReply {
            bot_message,
            extracted_skills: update.extracted,
            reanalysis,
        })
    }

    async fn update_as_user(&self, user: &UserProfile, message: &str) -> Result<SkillUpdate, ApiError> {
        debug!("skill update for user {}", user.id);
        let request = UpdateSkillsRequest {
            user_id: user.id.clone(),
            message: message.to_string(),
        };
        let response = self.api.update_skills(&request).await?;
        Ok(SkillUpdate {
            bot_message: response.bot_message,
            extracted: response.extracted_skills,
            skills: response.user.skills.clone(),
            user: Some(response.user),
        })
    }

    async fn update_anonymously(&self, message: &str) -> Result<SkillUpdate, ApiError> {
        let token = match self.storage.get(TOKEN_KEY) {
            Ok(token) => token.filter(|t| !t.trim().is_empty()),
            Err(e) => {
                warn!("could not read token: {}", e);
                None
            }
        };
        let request = ChatRequest {
            message: message.to_string(),
        };
        let response = self.api.chat_update_skills(token.as_deref(), &request).await?;

        let skills = match (&response.user, response.updated_skills) {
            (Some(user), _) => user.skills.clone(),
            (None, Some(updated)) if !updated.trim().is_empty() => updated,
            _ => {
                let current = self.store.read(|s| s.skills.clone());
                merge_skills(&current, &response.extracted_skills)
            }
        };

        Ok(SkillUpdate {
            bot_message: response.bot_message,
            extracted: response.extracted_skills,
            skills,
            user: response.user,
        })
    }

    fn spawn_reanalysis(&self) -> ReanalysisTask {
        let store = self.store.clone();
        let api = self.api.clone();
        let (skills, expertise) = store.read(|s| (s.skills.clone(), s.expertise_level));
        let handle =
            tokio::spawn(async move { store.reanalyze(api.as_ref(), skills, expertise).await });
        ReanalysisTask { handle }
    }

    fn persist(&self) {
        if let Err(e) = self.transcript.save(self.storage.as_ref()) {
            warn!("could not save chat transcript: {}", e);
        }
    }
}

/// Append extracted skills to a comma-separated list, skipping ones already
/// present (case-insensitive)
pub fn merge_skills(current: &str, extracted: &[ExtractedSkill]) -> String {
    let mut skills: Vec<String> = current
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();

    for skill in extracted {
        let name = skill.name().trim();
        if name.is_empty() {
            continue;
        }
        if !skills.iter().any(|s| s.eq_ignore_ascii_case(name)) {
            skills.push(name.to_string());
        }
    }

    skills.join(", ")
}

fn summarize(extracted: &[ExtractedSkill]) -> String {
    if extracted.is_empty() {
        return "I couldn't spot any new skills in that message. Try something like \"I learned Docker\"."
            .to_string();
    }
    let labels: Vec<String> = extracted.iter().map(ExtractedSkill::label).collect();
    format!("Great! I've added {} to your skills.", labels.join(", "))
}
