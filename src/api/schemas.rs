//! Request bodies and the response envelopes that are not session records.

use serde::{Deserialize, Serialize};

use crate::session::model::{ExpertiseLevel, UserProfile};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalyzeRequest {
    pub skills: String,
    pub expertise: ExpertiseLevel,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MockTestRequest {
    pub skills: String,
    pub expertise: ExpertiseLevel,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResourceRequest {
    pub skills: String,
    pub expertise: ExpertiseLevel,
    pub limit: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub service: Option<String>,
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        matches!(self.status.to_lowercase().as_str(), "healthy" | "ok" | "up")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub full_name: String,
    pub skills: String,
    pub expertise: ExpertiseLevel,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Returned by both register and login
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AuthResponse {
    #[serde(default, alias = "access_token")]
    pub token: Option<String>,
    pub user: UserProfile,
}

/// Partial profile update; absent fields are left alone by the service
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UserUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skills: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expertise: Option<ExpertiseLevel>,
}

impl UserUpdate {
    pub fn is_empty(&self) -> bool {
        self.full_name.is_none() && self.skills.is_none() && self.expertise.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatRequest {
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UpdateSkillsRequest {
    pub user_id: String,
    pub message: String,
}

/// A skill picked out of a chat message. The anonymous chat route sends bare
/// names, the authenticated one sends objects with a level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ExtractedSkill {
    Rated {
        skill: String,
        #[serde(default)]
        expertise_level: Option<String>,
    },
    Named(String),
}

impl ExtractedSkill {
    pub fn name(&self) -> &str {
        match self {
            ExtractedSkill::Rated { skill, .. } => skill,
            ExtractedSkill::Named(name) => name,
        }
    }

    pub fn label(&self) -> String {
        match self {
            ExtractedSkill::Rated {
                skill,
                expertise_level: Some(level),
            } => format!("{} ({})", skill, level),
            _ => self.name().to_string(),
        }
    }
}

/// Response of `POST /chat/update-skills`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ChatSkillResponse {
    #[serde(default)]
    pub bot_message: Option<String>,
    #[serde(default)]
    pub extracted_skills: Vec<ExtractedSkill>,
    #[serde(default)]
    pub updated_skills: Option<String>,
    #[serde(default)]
    pub user: Option<UserProfile>,
}

/// Response of `POST /update-skills`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct UpdateSkillsResponse {
    pub user: UserProfile,
    #[serde(default)]
    pub extracted_skills: Vec<ExtractedSkill>,
    #[serde(default)]
    pub updated_skills_list: Vec<ExtractedSkill>,
    #[serde(default)]
    pub bot_message: Option<String>,
}
