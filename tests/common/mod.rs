// Shared fixtures: an in-process CareerApi with scripted answers.

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::Utc;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::sync::oneshot;

use skillpath::api::{
    AnalyzeRequest, AuthResponse, CareerApi, ChatRequest, ChatSkillResponse, HealthStatus,
    LoginRequest, MockTestRequest, RegisterRequest, ResourceRequest, UpdateSkillsRequest,
    UpdateSkillsResponse, UserUpdate,
};
use skillpath::session::{
    AnalysisResult, CareerPath, ExpertiseLevel, LearningResources, MockQuestion, MockTest,
    ResourceLink, RoadmapStep, SessionController, SessionStore, UserProfile,
};
use skillpath::storage::MemoryStore;
use skillpath::ApiError;

/// One scripted analysis answer, optionally held back until the gate opens
pub struct ScriptedAnalysis {
    pub result: Result<AnalysisResult, ApiError>,
    pub gate: Option<oneshot::Receiver<()>>,
}

#[derive(Default)]
pub struct FakeApi {
    pub analyses: Mutex<VecDeque<ScriptedAnalysis>>,
    pub mock_test: Mutex<Option<Result<MockTest, ApiError>>>,
    pub resources: Mutex<Option<Result<LearningResources, ApiError>>>,
    pub auth: Mutex<Option<Result<AuthResponse, ApiError>>>,
    pub me: Mutex<Option<Result<UserProfile, ApiError>>>,
    pub chat: Mutex<Option<Result<ChatSkillResponse, ApiError>>>,
    pub update_skills: Mutex<Option<Result<UpdateSkillsResponse, ApiError>>>,
    /// Every request, as "<operation> <detail>"
    pub calls: Mutex<Vec<String>>,
}

impl FakeApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_analysis(&self, result: Result<AnalysisResult, ApiError>) {
        self.analyses
            .lock()
            .unwrap()
            .push_back(ScriptedAnalysis { result, gate: None });
    }

    /// Queue an analysis that only resolves once the returned sender fires
    pub fn push_gated_analysis(&self, result: Result<AnalysisResult, ApiError>) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.analyses.lock().unwrap().push_back(ScriptedAnalysis {
            result,
            gate: Some(rx),
        });
        tx
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

fn scripted<T: Clone>(slot: &Mutex<Option<Result<T, ApiError>>>) -> Result<T, ApiError> {
    slot.lock()
        .unwrap()
        .clone()
        .unwrap_or_else(|| Err(ApiError::unreachable()))
}

#[async_trait]
impl CareerApi for FakeApi {
    async fn health(&self) -> Result<HealthStatus, ApiError> {
        self.record("health".to_string());
        Ok(HealthStatus {
            status: "healthy".to_string(),
            service: Some("fake".to_string()),
        })
    }

    async fn analyze(&self, request: &AnalyzeRequest) -> Result<AnalysisResult, ApiError> {
        self.record(format!("analyze {} / {}", request.skills, request.expertise));
        let next = self.analyses.lock().unwrap().pop_front();
        let Some(entry) = next else {
            return Err(ApiError::unreachable());
        };
        if let Some(gate) = entry.gate {
            let _ = gate.await;
        }
        entry.result
    }

    async fn generate_mock_test(&self, request: &MockTestRequest) -> Result<MockTest, ApiError> {
        self.record(format!(
            "mock-test {} / {}",
            request.skills,
            request.topic.clone().unwrap_or_default()
        ));
        scripted(&self.mock_test)
    }

    async fn learning_resources(
        &self,
        request: &ResourceRequest,
    ) -> Result<LearningResources, ApiError> {
        self.record(format!("resources {} / {}", request.skills, request.limit));
        scripted(&self.resources)
    }

    async fn register(&self, request: &RegisterRequest) -> Result<AuthResponse, ApiError> {
        self.record(format!("register {}", request.email));
        scripted(&self.auth)
    }

    async fn login(&self, request: &LoginRequest) -> Result<AuthResponse, ApiError> {
        self.record(format!("login {}", request.email));
        scripted(&self.auth)
    }

    async fn current_user(&self, token: &str) -> Result<UserProfile, ApiError> {
        self.record(format!("me {}", token));
        scripted(&self.me)
    }

    async fn update_current_user(
        &self,
        token: &str,
        update: &UserUpdate,
    ) -> Result<UserProfile, ApiError> {
        self.record(format!(
            "update-me {} {}",
            token,
            update.skills.clone().unwrap_or_default()
        ));
        scripted(&self.me)
    }

    async fn chat_update_skills(
        &self,
        token: Option<&str>,
        request: &ChatRequest,
    ) -> Result<ChatSkillResponse, ApiError> {
        self.record(format!(
            "chat {} / {}",
            token.unwrap_or("-"),
            request.message
        ));
        scripted(&self.chat)
    }

    async fn update_skills(
        &self,
        request: &UpdateSkillsRequest,
    ) -> Result<UpdateSkillsResponse, ApiError> {
        self.record(format!("update-skills {} / {}", request.user_id, request.message));
        scripted(&self.update_skills)
    }
}

pub struct Harness {
    pub api: Arc<FakeApi>,
    pub storage: Arc<MemoryStore>,
    pub controller: SessionController,
}

impl Harness {
    pub fn new() -> Self {
        let api = Arc::new(FakeApi::new());
        let storage = Arc::new(MemoryStore::new());
        let controller = SessionController::new(SessionStore::new(), api.clone(), storage.clone());
        Self {
            api,
            storage,
            controller,
        }
    }

    pub fn store(&self) -> &SessionStore {
        self.controller.store()
    }
}

pub fn career_path(title: &str) -> CareerPath {
    CareerPath {
        title: title.to_string(),
        description: format!("Work as a {}", title),
        required_skills: ["Python".to_string()].into_iter().collect(),
        salary_range: "$60,000 - $120,000".to_string(),
        growth_prospect: "High".to_string(),
    }
}

pub fn analysis(title: &str) -> AnalysisResult {
    AnalysisResult {
        selected_path: career_path(title),
        all_paths: vec![career_path(title), career_path("Project Manager")],
        roadmap_steps: vec![RoadmapStep {
            step_number: 1,
            title: "Learn Programming Fundamentals".to_string(),
            description: "Master the basics".to_string(),
            duration: "3-6 months".to_string(),
            resources: vec!["Online tutorials".to_string()],
        }],
        courses: vec![],
    }
}

pub fn mock_test() -> MockTest {
    MockTest {
        test_id: "test_42".to_string(),
        created_at: Utc::now(),
        questions: vec![MockQuestion {
            question: "What does GROUP BY do?".to_string(),
            answer: "Aggregates rows sharing a key".to_string(),
        }],
    }
}

pub fn resources() -> LearningResources {
    LearningResources {
        resource_id: "resource_1".to_string(),
        created_at: Utc::now(),
        youtube_courses: vec![ResourceLink {
            title: "SQL in 4 hours".to_string(),
            url: "https://youtube.com/watch?v=sql".to_string(),
        }],
        articles: vec![],
    }
}

pub fn user(skills: &str, level: ExpertiseLevel) -> UserProfile {
    UserProfile {
        id: "1".to_string(),
        email: "gopher@example.com".to_string(),
        full_name: "Gopher".to_string(),
        skills: skills.to_string(),
        expertise_level: level,
        created_at: None,
    }
}
