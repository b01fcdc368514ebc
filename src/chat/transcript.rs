//! Chat Transcript Module
//!
//! Bounded conversation log between the user and the skill assistant.
//! Oldest messages fall off once capacity is reached; the whole log is kept
//! as one JSON blob in the key-value store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use tracing::warn;

use crate::storage::{KeyValueStore, StorageError, CHAT_KEY};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Bot,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub sender: Sender,
    pub text: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extracted_skills: Vec<String>,
}

impl ChatMessage {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            sender: Sender::User,
            text: text.into(),
            timestamp: Utc::now(),
            extracted_skills: Vec::new(),
        }
    }

    pub fn bot(text: impl Into<String>, extracted_skills: Vec<String>) -> Self {
        Self {
            sender: Sender::Bot,
            text: text.into(),
            timestamp: Utc::now(),
            extracted_skills,
        }
    }
}

/// Conversation log with a fixed capacity
#[derive(Debug, Clone)]
pub struct ChatTranscript {
    messages: VecDeque<ChatMessage>,
    max_size: usize,
}

impl ChatTranscript {
    pub fn new(max_size: usize) -> Self {
        Self {
            messages: VecDeque::new(),
            max_size: max_size.max(1),
        }
    }

    /// Load the persisted transcript.
    ///
    /// A missing key gives an empty transcript; so does a corrupt blob, which
    /// is logged and later overwritten.
    pub fn load(storage: &dyn KeyValueStore, max_size: usize) -> Result<Self, StorageError> {
        let mut transcript = Self::new(max_size);
        let Some(raw) = storage.get(CHAT_KEY)? else {
            return Ok(transcript);
        };

        match serde_json::from_str::<Vec<ChatMessage>>(&raw) {
            Ok(messages) => {
                for message in messages {
                    transcript.push(message);
                }
            }
            Err(e) => warn!("discarding unreadable chat transcript: {}", e),
        }
        Ok(transcript)
    }

    pub fn save(&self, storage: &dyn KeyValueStore) -> Result<(), StorageError> {
        let json = serde_json::to_string(&self.messages)?;
        storage.set(CHAT_KEY, &json)
    }

    /// Append a message, dropping the oldest one when full
    pub fn push(&mut self, message: ChatMessage) {
        if self.messages.len() >= self.max_size {
            self.messages.pop_front();
        }
        self.messages.push_back(message);
    }

    pub fn messages(&self) -> impl Iterator<Item = &ChatMessage> {
        self.messages.iter()
    }

    pub fn last(&self) -> Option<&ChatMessage> {
        self.messages.back()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }

    /// Case-insensitive search over message text, most recent first
    pub fn search(&self, pattern: &str) -> Vec<&ChatMessage> {
        let pattern = pattern.to_lowercase();
        self.messages
            .iter()
            .filter(|m| m.text.to_lowercase().contains(&pattern))
            .rev()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    #[test]
    fn test_capacity_drops_oldest() {
        let mut transcript = ChatTranscript::new(2);
        transcript.push(ChatMessage::user("one"));
        transcript.push(ChatMessage::bot("two", vec![]));
        transcript.push(ChatMessage::user("three"));

        let texts: Vec<&str> = transcript.messages().map(|m| m.text.as_str()).collect();
        assert_eq!(texts, vec!["two", "three"]);
        assert_eq!(transcript.last().map(|m| m.sender), Some(Sender::User));
    }

    #[test]
    fn test_save_and_load() {
        let storage = MemoryStore::new();
        let mut transcript = ChatTranscript::new(10);
        transcript.push(ChatMessage::user("I learned Docker"));
        transcript.push(ChatMessage::bot("Added Docker", vec!["Docker".to_string()]));
        transcript.save(&storage).unwrap();

        let loaded = ChatTranscript::load(&storage, 10).unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded.last().unwrap().extracted_skills, vec!["Docker".to_string()]);

        // a smaller capacity keeps only the newest messages
        let trimmed = ChatTranscript::load(&storage, 1).unwrap();
        assert_eq!(trimmed.len(), 1);
        assert_eq!(trimmed.last().unwrap().text, "Added Docker");
    }

    #[test]
    fn test_load_tolerates_missing_and_corrupt_data() {
        let storage = MemoryStore::new();
        assert!(ChatTranscript::load(&storage, 10).unwrap().is_empty());

        storage.set(CHAT_KEY, "definitely not json").unwrap();
        assert!(ChatTranscript::load(&storage, 10).unwrap().is_empty());
    }

    #[test]
    fn test_search() {
        let mut transcript = ChatTranscript::new(10);
        transcript.push(ChatMessage::user("learning React"));
        transcript.push(ChatMessage::user("learning SQL"));
        transcript.push(ChatMessage::user("react hooks too"));

        let hits = transcript.search("REACT");
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].text, "react hooks too");
    }
}
