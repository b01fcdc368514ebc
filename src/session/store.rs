use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, info};

use super::model::{AnalysisResult, ExpertiseLevel, LearningResources, MockTest, UserProfile};
use super::state::{Action, SessionState};
use crate::api::{AnalyzeRequest, CareerApi};
use crate::error::ApiError;

/// Single source of truth for session state.
///
/// Cloning yields another handle onto the same state. Each action is applied
/// under the channel lock and then broadcast, so subscribers never see a
/// half-applied transition.
#[derive(Clone)]
pub struct SessionStore {
    state: Arc<watch::Sender<SessionState>>,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore {
    pub fn new() -> Self {
        Self::with_state(SessionState::default())
    }

    pub fn with_state(initial: SessionState) -> Self {
        let (state, _) = watch::channel(initial);
        Self {
            state: Arc::new(state),
        }
    }

    /// Copy of the current state
    pub fn snapshot(&self) -> SessionState {
        self.state.borrow().clone()
    }

    /// Read a piece of state without cloning the whole thing
    pub fn read<R>(&self, f: impl FnOnce(&SessionState) -> R) -> R {
        f(&self.state.borrow())
    }

    /// Receiver that is notified after every transition
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    /// Apply one action and notify subscribers
    pub fn dispatch(&self, action: Action) {
        debug!("dispatch {}", action.name());
        self.state.send_modify(|state| state.apply(action));
    }

    pub fn set_skills(&self, skills: impl Into<String>) {
        self.dispatch(Action::SetSkills(skills.into()));
    }

    pub fn set_expertise(&self, level: ExpertiseLevel) {
        self.dispatch(Action::SetExpertise(level));
    }

    pub fn begin_request(&self) {
        self.dispatch(Action::BeginRequest);
    }

    pub fn complete_analysis(&self, result: AnalysisResult) {
        self.dispatch(Action::CompleteAnalysis(result));
    }

    pub fn complete_mock_test(&self, test: MockTest) {
        self.dispatch(Action::CompleteMockTest(test));
    }

    pub fn complete_resources(&self, resources: LearningResources) {
        self.dispatch(Action::CompleteResources(resources));
    }

    pub fn complete_auth(&self, user: UserProfile) {
        self.dispatch(Action::CompleteAuth(user));
    }

    pub fn complete_skill_update(&self, skills: impl Into<String>, user: Option<UserProfile>) {
        self.dispatch(Action::CompleteSkillUpdate {
            skills: skills.into(),
            user,
        });
    }

    pub fn fail_request(&self, message: impl Into<String>) {
        self.dispatch(Action::FailRequest(message.into()));
    }

    pub fn dismiss_error(&self) {
        self.dispatch(Action::DismissError);
    }

    pub fn set_user(&self, user: Option<UserProfile>) {
        self.dispatch(Action::SetUser(user));
    }

    /// Back to the initial defaults. Persisted data is the caller's business.
    pub fn reset(&self) {
        info!("session reset");
        self.dispatch(Action::Reset);
    }

    /// Re-run the analysis for new inputs.
    ///
    /// The inputs are only committed together with a successful result; on
    /// failure the previous analysis stays in place and the error is recorded.
    /// Overlapping calls are not de-duplicated: whichever finishes last wins.
    pub async fn reanalyze(
        &self,
        api: &dyn CareerApi,
        skills: String,
        expertise: ExpertiseLevel,
    ) -> Result<(), ApiError> {
        self.begin_request();

        let request = AnalyzeRequest {
            skills: skills.clone(),
            expertise,
        };
        match api.analyze(&request).await {
            Ok(analysis) => {
                self.dispatch(Action::ApplyReanalysis {
                    skills,
                    expertise,
                    analysis,
                });
                Ok(())
            }
            Err(e) => {
                self.fail_request(e.to_string());
                Err(e)
            }
        }
    }
}
