//! Session state and the closed set of transitions that may change it.

use serde::{Deserialize, Serialize};

use super::model::{AnalysisResult, ExpertiseLevel, LearningResources, MockTest, UserProfile};

/// Everything the front end knows about the current session
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    pub skills: String,
    pub expertise_level: ExpertiseLevel,
    pub analysis: Option<AnalysisResult>,
    pub mock_test: Option<MockTest>,
    pub resources: Option<LearningResources>,
    pub current_user: Option<UserProfile>,
    pub is_authenticated: bool,
    pub is_loading: bool,
    pub last_error: Option<String>,
}

/// Where the request lifecycle currently stands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestPhase {
    Idle,
    Loading,
}

/// One atomic transition of the session
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    SetSkills(String),
    SetExpertise(ExpertiseLevel),
    BeginRequest,
    CompleteAnalysis(AnalysisResult),
    CompleteMockTest(MockTest),
    CompleteResources(LearningResources),
    CompleteAuth(UserProfile),
    CompleteSkillUpdate {
        skills: String,
        user: Option<UserProfile>,
    },
    /// Successful re-analysis: inputs and result land together
    ApplyReanalysis {
        skills: String,
        expertise: ExpertiseLevel,
        analysis: AnalysisResult,
    },
    FailRequest(String),
    DismissError,
    SetUser(Option<UserProfile>),
    /// Logout and "clear all data" both land here
    Reset,
}

impl Action {
    pub fn name(&self) -> &'static str {
        match self {
            Action::SetSkills(_) => "set_skills",
            Action::SetExpertise(_) => "set_expertise",
            Action::BeginRequest => "begin_request",
            Action::CompleteAnalysis(_) => "complete_analysis",
            Action::CompleteMockTest(_) => "complete_mock_test",
            Action::CompleteResources(_) => "complete_resources",
            Action::CompleteAuth(_) => "complete_auth",
            Action::CompleteSkillUpdate { .. } => "complete_skill_update",
            Action::ApplyReanalysis { .. } => "apply_reanalysis",
            Action::FailRequest(_) => "fail_request",
            Action::DismissError => "dismiss_error",
            Action::SetUser(_) => "set_user",
            Action::Reset => "reset",
        }
    }
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> RequestPhase {
        if self.is_loading {
            RequestPhase::Loading
        } else {
            RequestPhase::Idle
        }
    }

    /// Apply a single action. Every variant is handled here and nowhere else.
    pub fn apply(&mut self, action: Action) {
        match action {
            Action::SetSkills(skills) => {
                self.skills = skills;
                self.last_error = None;
            }
            Action::SetExpertise(level) => {
                self.expertise_level = level;
                self.last_error = None;
            }
            Action::BeginRequest => {
                self.is_loading = true;
                self.last_error = None;
            }
            Action::CompleteAnalysis(analysis) => {
                self.analysis = Some(analysis);
                self.finish_ok();
            }
            Action::CompleteMockTest(test) => {
                self.mock_test = Some(test);
                self.finish_ok();
            }
            Action::CompleteResources(resources) => {
                self.resources = Some(resources);
                self.finish_ok();
            }
            Action::CompleteAuth(user) => {
                self.set_user(Some(user));
                self.finish_ok();
            }
            Action::CompleteSkillUpdate { skills, user } => {
                match user {
                    Some(user) => self.set_user(Some(user)),
                    None => self.skills = skills,
                }
                self.finish_ok();
            }
            Action::ApplyReanalysis {
                skills,
                expertise,
                analysis,
            } => {
                self.skills = skills;
                self.expertise_level = expertise;
                self.analysis = Some(analysis);
                self.finish_ok();
            }
            Action::FailRequest(message) => {
                self.last_error = Some(message);
                self.is_loading = false;
            }
            Action::DismissError => {
                self.last_error = None;
            }
            Action::SetUser(user) => self.set_user(user),
            Action::Reset => *self = SessionState::default(),
        }
    }

    fn finish_ok(&mut self) {
        self.is_loading = false;
        self.last_error = None;
    }

    // The profile wins over locally entered skills once it is known.
    fn set_user(&mut self, user: Option<UserProfile>) {
        if let Some(profile) = &user {
            self.skills = profile.skills.clone();
            self.expertise_level = profile.expertise_level;
        }
        self.is_authenticated = user.is_some();
        self.current_user = user;
    }
}
