//! Chat-driven skill updates and the persisted conversation log.

pub mod assistant;
pub mod transcript;

pub use assistant::{merge_skills, ChatReply, ReanalysisTask, SkillAssistant};
pub use transcript::{ChatMessage, ChatTranscript, Sender};
