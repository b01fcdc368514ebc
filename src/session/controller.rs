//! Network-facing session actions.
//!
//! Each async action follows the same shape: validate, `begin_request`, call
//! the service, then either complete or `fail_request`. Errors are recorded in
//! the session and also handed back to the caller.

use regex::Regex;
use std::sync::{Arc, OnceLock};
use tracing::{info, warn};

use super::model::{ExpertiseLevel, UserProfile};
use super::store::SessionStore;
use crate::api::{
    AnalyzeRequest, CareerApi, HealthStatus, LoginRequest, MockTestRequest, RegisterRequest,
    ResourceRequest, UserUpdate,
};
use crate::error::ApiError;
use crate::storage::{KeyValueStore, CHAT_KEY, TOKEN_KEY};

const MIN_PASSWORD_LEN: usize = 6;

/// Fields collected by the sign-up form
#[derive(Debug, Clone, PartialEq)]
pub struct RegistrationForm {
    pub email: String,
    pub password: String,
    pub full_name: String,
    pub skills: String,
    pub expertise: ExpertiseLevel,
}

pub struct SessionController {
    store: SessionStore,
    api: Arc<dyn CareerApi>,
    storage: Arc<dyn KeyValueStore>,
}

impl SessionController {
    pub fn new(store: SessionStore, api: Arc<dyn CareerApi>, storage: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            api,
            storage,
        }
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    pub fn api(&self) -> Arc<dyn CareerApi> {
        self.api.clone()
    }

    pub fn storage(&self) -> Arc<dyn KeyValueStore> {
        self.storage.clone()
    }

    /// Persisted bearer token, if any. Unreadable storage counts as logged out.
    pub fn token(&self) -> Option<String> {
        match self.storage.get(TOKEN_KEY) {
            Ok(token) => token.filter(|t| !t.trim().is_empty()),
            Err(e) => {
                warn!("could not read token: {}", e);
                None
            }
        }
    }

    /// Restore the signed-in user from a persisted token.
    ///
    /// Returns whether a user was restored.
    pub async fn hydrate(&self) -> Result<bool, ApiError> {
        let Some(token) = self.token() else {
            return Ok(false);
        };

        match self.api.current_user(&token).await {
            Ok(user) => {
                info!("restored session for {}", user.email);
                self.store.set_user(Some(user));
                Ok(true)
            }
            Err(e) if e.is_auth() => {
                warn!("stored token rejected, signing out: {}", e);
                self.discard(TOKEN_KEY);
                self.store.set_user(None);
                Ok(false)
            }
            Err(e) => {
                self.store.fail_request(e.to_string());
                Err(e)
            }
        }
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<UserProfile, ApiError> {
        let request = LoginRequest {
            email: email.trim().to_string(),
            password: password.to_string(),
        };
        self.guard(validate_credentials(&request.email, &request.password))?;

        self.store.begin_request();
        let result = self.api.login(&request).await.and_then(|auth| {
            let token = auth
                .token
                .ok_or_else(|| ApiError::Decode("login response carried no token".to_string()))?;
            Ok((token, auth.user))
        });
        let (token, user) = self.settle(result)?;

        self.persist_token(&token);
        self.store.complete_auth(user.clone());
        info!("logged in as {}", user.email);
        Ok(user)
    }

    pub async fn register(&self, form: RegistrationForm) -> Result<UserProfile, ApiError> {
        let request = RegisterRequest {
            email: form.email.trim().to_string(),
            password: form.password,
            full_name: form.full_name.trim().to_string(),
            skills: form.skills.trim().to_string(),
            expertise: form.expertise,
        };
        self.guard(validate_registration(&request))?;

        self.store.begin_request();
        let auth = self.settle(self.api.register(&request).await)?;

        if let Some(token) = &auth.token {
            self.persist_token(token);
        }
        self.store.complete_auth(auth.user.clone());
        info!("registered {}", auth.user.email);
        Ok(auth.user)
    }

    pub async fn update_profile(&self, update: UserUpdate) -> Result<UserProfile, ApiError> {
        if update.is_empty() {
            self.guard(Err(ApiError::validation("Nothing to update")))?;
        }
        let Some(token) = self.token() else {
            let err = ApiError::Auth("Please log in to update your profile".to_string());
            self.store.fail_request(err.to_string());
            return Err(err);
        };

        self.store.begin_request();
        let user = self.settle(self.api.update_current_user(&token, &update).await)?;
        self.store.complete_auth(user.clone());
        Ok(user)
    }

    /// Analyze the skills and expertise currently held by the session
    pub async fn analyze(&self) -> Result<(), ApiError> {
        let request = self.store.read(|s| AnalyzeRequest {
            skills: s.skills.trim().to_string(),
            expertise: s.expertise_level,
        });
        self.guard(require_skills(&request.skills))?;

        self.store.begin_request();
        let analysis = self.settle(self.api.analyze(&request).await)?;
        if !analysis.has_valid_roadmap() {
            warn!("analysis roadmap contains steps numbered below 1");
        }
        self.store.complete_analysis(analysis);
        Ok(())
    }

    /// Analyze new inputs, committing them only if the analysis succeeds
    pub async fn reanalyze(&self, skills: String, expertise: ExpertiseLevel) -> Result<(), ApiError> {
        self.guard(require_skills(&skills))?;
        self.store.reanalyze(self.api.as_ref(), skills, expertise).await
    }

    pub async fn generate_mock_test(&self, topic: Option<String>) -> Result<(), ApiError> {
        let request = self.store.read(|s| MockTestRequest {
            skills: s.skills.trim().to_string(),
            expertise: s.expertise_level,
            topic: topic.filter(|t| !t.trim().is_empty()),
        });
        self.guard(require_skills(&request.skills))?;

        self.store.begin_request();
        let test = self.settle(self.api.generate_mock_test(&request).await)?;
        self.store.complete_mock_test(test);
        Ok(())
    }

    pub async fn fetch_resources(&self, limit: u32, topic: Option<String>) -> Result<(), ApiError> {
        let request = self.store.read(|s| ResourceRequest {
            skills: s.skills.trim().to_string(),
            expertise: s.expertise_level,
            limit,
            topic: topic.filter(|t| !t.trim().is_empty()),
        });
        self.guard(require_skills(&request.skills))?;
        if limit == 0 {
            self.guard(Err(ApiError::validation("Limit must be at least 1")))?;
        }

        self.store.begin_request();
        let resources = self.settle(self.api.learning_resources(&request).await)?;
        self.store.complete_resources(resources);
        Ok(())
    }

    /// Service liveness; leaves the session untouched
    pub async fn health(&self) -> Result<HealthStatus, ApiError> {
        self.api.health().await
    }

    pub fn logout(&self) {
        self.discard(TOKEN_KEY);
        self.store.reset();
    }

    /// Like `logout`, but the chat transcript goes too
    pub fn clear_data(&self) {
        self.discard(TOKEN_KEY);
        self.discard(CHAT_KEY);
        self.store.reset();
    }

    /// Record a pre-flight failure in the session before returning it
    fn guard(&self, check: Result<(), ApiError>) -> Result<(), ApiError> {
        if let Err(e) = &check {
            self.store.fail_request(e.to_string());
        }
        check
    }

    /// Close out an in-flight request on failure
    fn settle<T>(&self, result: Result<T, ApiError>) -> Result<T, ApiError> {
        result.map_err(|e| {
            self.store.fail_request(e.to_string());
            e
        })
    }

    fn persist_token(&self, token: &str) {
        if let Err(e) = self.storage.set(TOKEN_KEY, token) {
            warn!("could not persist token: {}", e);
        }
    }

    fn discard(&self, key: &str) {
        if let Err(e) = self.storage.remove(key) {
            warn!("could not remove '{}': {}", key, e);
        }
    }
}

fn is_valid_email(email: &str) -> bool {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    match PATTERN.get_or_init(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").ok()) {
        Some(pattern) => pattern.is_match(email),
        None => email.contains('@'),
    }
}

fn require_skills(skills: &str) -> Result<(), ApiError> {
    if skills.trim().is_empty() {
        return Err(ApiError::validation("Please enter your skills"));
    }
    Ok(())
}

fn validate_credentials(email: &str, password: &str) -> Result<(), ApiError> {
    if email.is_empty() || password.is_empty() {
        return Err(ApiError::validation("Email and password are required"));
    }
    if !is_valid_email(email) {
        return Err(ApiError::validation(format!(
            "'{}' is not a valid email address",
            email
        )));
    }
    Ok(())
}

fn validate_registration(request: &RegisterRequest) -> Result<(), ApiError> {
    validate_credentials(&request.email, &request.password)?;
    if request.password.len() < MIN_PASSWORD_LEN {
        return Err(ApiError::validation(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LEN
        )));
    }
    if request.full_name.is_empty() {
        return Err(ApiError::validation("Full name is required"));
    }
    Ok(())
}
