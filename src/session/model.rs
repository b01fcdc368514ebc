//! Records held by the session: career analysis, mock tests, learning
//! resources and the authenticated profile.
//!
//! Field names follow the backend's snake_case JSON so the same types are
//! used on the wire and in session state.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use tracing::warn;

/// Self-declared expertise of the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum ExpertiseLevel {
    #[default]
    Beginner,
    Intermediate,
    Advanced,
    Expert,
}

impl ExpertiseLevel {
    pub fn all() -> [ExpertiseLevel; 4] {
        [
            ExpertiseLevel::Beginner,
            ExpertiseLevel::Intermediate,
            ExpertiseLevel::Advanced,
            ExpertiseLevel::Expert,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ExpertiseLevel::Beginner => "Beginner",
            ExpertiseLevel::Intermediate => "Intermediate",
            ExpertiseLevel::Advanced => "Advanced",
            ExpertiseLevel::Expert => "Expert",
        }
    }
}

impl fmt::Display for ExpertiseLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExpertiseLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "beginner" => Ok(ExpertiseLevel::Beginner),
            "intermediate" => Ok(ExpertiseLevel::Intermediate),
            "advanced" => Ok(ExpertiseLevel::Advanced),
            "expert" => Ok(ExpertiseLevel::Expert),
            other => Err(format!("unknown expertise level '{}'", other)),
        }
    }
}

/// Profiles store expertise as free text; anything unrecognised (including
/// an empty string or null) reads as `Beginner` instead of failing the record.
impl<'de> Deserialize<'de> for ExpertiseLevel {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?.unwrap_or_default();
        Ok(raw.parse().unwrap_or_else(|e| {
            warn!("{}, using {}", e, ExpertiseLevel::default());
            ExpertiseLevel::default()
        }))
    }
}

/// Difficulty tag on a recommended course
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CourseDifficulty {
    Beginner,
    Intermediate,
    Advanced,
}

impl fmt::Display for CourseDifficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            CourseDifficulty::Beginner => "Beginner",
            CourseDifficulty::Intermediate => "Intermediate",
            CourseDifficulty::Advanced => "Advanced",
        };
        f.write_str(label)
    }
}

impl<'de> Deserialize<'de> for CourseDifficulty {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        match raw.trim().to_lowercase().as_str() {
            "beginner" => Ok(CourseDifficulty::Beginner),
            "intermediate" => Ok(CourseDifficulty::Intermediate),
            "advanced" => Ok(CourseDifficulty::Advanced),
            other => Err(serde::de::Error::custom(format!(
                "unknown course difficulty '{}'",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CareerPath {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub required_skills: BTreeSet<String>,
    pub salary_range: String,
    pub growth_prospect: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoadmapStep {
    #[serde(rename = "step")]
    pub step_number: u32,
    pub title: String,
    pub description: String,
    pub duration: String,
    #[serde(default)]
    pub resources: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseRef {
    pub title: String,
    pub provider: String,
    pub duration: String,
    pub difficulty: CourseDifficulty,
    pub url: String,
}

/// Career analysis computed by the service for a skills/expertise pair.
/// Replaced wholesale whenever a new analysis arrives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub selected_path: CareerPath,
    #[serde(rename = "career_paths", default)]
    pub all_paths: Vec<CareerPath>,
    #[serde(rename = "roadmap", default)]
    pub roadmap_steps: Vec<RoadmapStep>,
    #[serde(default)]
    pub courses: Vec<CourseRef>,
}

impl AnalysisResult {
    /// Roadmap steps are numbered from 1.
    pub fn has_valid_roadmap(&self) -> bool {
        self.roadmap_steps.iter().all(|step| step.step_number >= 1)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MockQuestion {
    pub question: String,
    pub answer: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MockTest {
    pub test_id: String,
    #[serde(deserialize_with = "lenient_time::deserialize")]
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub questions: Vec<MockQuestion>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceLink {
    pub title: String,
    pub url: String,
}

/// YouTube courses and articles picked for the user's skills
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LearningResources {
    pub resource_id: String,
    #[serde(deserialize_with = "lenient_time::deserialize")]
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub youtube_courses: Vec<ResourceLink>,
    #[serde(default)]
    pub articles: Vec<ResourceLink>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(deserialize_with = "lenient_id::deserialize")]
    pub id: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub skills: String,
    #[serde(rename = "expertise", alias = "expertise_level", default)]
    pub expertise_level: ExpertiseLevel,
    #[serde(default, deserialize_with = "lenient_time::deserialize_opt")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Ids come back as strings from the user service but as integers from
/// older deployments.
mod lenient_id {
    use serde::{Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(i64),
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
        Ok(match RawId::deserialize(deserializer)? {
            RawId::Text(s) => s,
            RawId::Number(n) => n.to_string(),
        })
    }
}

/// The backend emits `datetime.isoformat()`, which has no offset. Those
/// timestamps are taken as UTC.
pub(crate) mod lenient_time {
    use super::*;

    pub fn parse(raw: &str) -> Option<DateTime<Utc>> {
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(dt.with_timezone(&Utc));
        }
        NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
            .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f"))
            .ok()
            .map(|naive| naive.and_utc())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp '{}'", raw)))
    }

    pub fn deserialize_opt<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<DateTime<Utc>>, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        match raw {
            None => Ok(None),
            Some(raw) => parse(&raw)
                .map(Some)
                .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp '{}'", raw))),
        }
    }
}
