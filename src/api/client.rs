use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use tracing::debug;

use super::schemas::{
    AnalyzeRequest, AuthResponse, ChatRequest, ChatSkillResponse, HealthStatus, LoginRequest,
    MockTestRequest, RegisterRequest, ResourceRequest, UpdateSkillsRequest, UpdateSkillsResponse,
    UserUpdate,
};
use crate::error::ApiError;
use crate::session::model::{AnalysisResult, LearningResources, MockTest, UserProfile};

/// Operations offered by the career-guidance service.
///
/// The session layer only talks to this trait, so tests can swap in an
/// in-process fake.
#[async_trait]
pub trait CareerApi: Send + Sync {
    async fn health(&self) -> Result<HealthStatus, ApiError>;

    async fn analyze(&self, request: &AnalyzeRequest) -> Result<AnalysisResult, ApiError>;

    async fn generate_mock_test(&self, request: &MockTestRequest) -> Result<MockTest, ApiError>;

    async fn learning_resources(
        &self,
        request: &ResourceRequest,
    ) -> Result<LearningResources, ApiError>;

    async fn register(&self, request: &RegisterRequest) -> Result<AuthResponse, ApiError>;

    async fn login(&self, request: &LoginRequest) -> Result<AuthResponse, ApiError>;

    async fn current_user(&self, token: &str) -> Result<UserProfile, ApiError>;

    async fn update_current_user(
        &self,
        token: &str,
        update: &UserUpdate,
    ) -> Result<UserProfile, ApiError>;

    /// Skill extraction for anonymous (or token-only) users
    async fn chat_update_skills(
        &self,
        token: Option<&str>,
        request: &ChatRequest,
    ) -> Result<ChatSkillResponse, ApiError>;

    /// Skill extraction bound to a known user id
    async fn update_skills(
        &self,
        request: &UpdateSkillsRequest,
    ) -> Result<UpdateSkillsResponse, ApiError>;
}

/// HTTP client for the career-guidance backend
#[derive(Clone)]
pub struct HttpCareerApi {
    client: Client,
    base_url: String,
}

impl HttpCareerApi {
    /// Create a client against the given base URL
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: normalize_base_url(base_url.into()),
        }
    }

    /// Create a client with a per-request timeout
    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ApiError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: normalize_base_url(base_url.into()),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        token: Option<&str>,
    ) -> Result<T, ApiError> {
        debug!("GET {}", path);
        let request = authorize(self.client.get(self.url(path)), token);
        decode(request.send().await?).await
    }

    async fn send_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        method: reqwest::Method,
        path: &str,
        body: &B,
        token: Option<&str>,
    ) -> Result<T, ApiError> {
        debug!("{} {}", method, path);
        let request = self
            .client
            .request(method, self.url(path))
            .header("Content-Type", "application/json")
            .json(body);
        decode(authorize(request, token).send().await?).await
    }

    async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
        token: Option<&str>,
    ) -> Result<T, ApiError> {
        self.send_json(reqwest::Method::POST, path, body, token).await
    }
}

#[async_trait]
impl CareerApi for HttpCareerApi {
    async fn health(&self) -> Result<HealthStatus, ApiError> {
        self.get_json("/health", None).await
    }

    async fn analyze(&self, request: &AnalyzeRequest) -> Result<AnalysisResult, ApiError> {
        self.post_json("/analyze", request, None).await
    }

    async fn generate_mock_test(&self, request: &MockTestRequest) -> Result<MockTest, ApiError> {
        self.post_json("/mock-test", request, None).await
    }

    async fn learning_resources(
        &self,
        request: &ResourceRequest,
    ) -> Result<LearningResources, ApiError> {
        self.post_json("/resources", request, None).await
    }

    async fn register(&self, request: &RegisterRequest) -> Result<AuthResponse, ApiError> {
        self.post_json("/auth/register", request, None).await
    }

    async fn login(&self, request: &LoginRequest) -> Result<AuthResponse, ApiError> {
        self.post_json("/auth/login", request, None).await
    }

    async fn current_user(&self, token: &str) -> Result<UserProfile, ApiError> {
        self.get_json("/auth/me", Some(token)).await
    }

    async fn update_current_user(
        &self,
        token: &str,
        update: &UserUpdate,
    ) -> Result<UserProfile, ApiError> {
        self.send_json(reqwest::Method::PUT, "/auth/me", update, Some(token))
            .await
    }

    async fn chat_update_skills(
        &self,
        token: Option<&str>,
        request: &ChatRequest,
    ) -> Result<ChatSkillResponse, ApiError> {
        self.post_json("/chat/update-skills", request, token).await
    }

    async fn update_skills(
        &self,
        request: &UpdateSkillsRequest,
    ) -> Result<UpdateSkillsResponse, ApiError> {
        self.post_json("/update-skills", request, None).await
    }
}

fn authorize(request: RequestBuilder, token: Option<&str>) -> RequestBuilder {
    match token {
        Some(token) => request.header("Authorization", format!("Bearer {}", token)),
        None => request,
    }
}

/// Turn a response into `T`, or into the matching `ApiError` for non-2xx
async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        debug!("request failed with {}: {}", status, body);
        return Err(ApiError::from_status(
            status.as_u16(),
            status.canonical_reason(),
            &body,
        ));
    }

    Ok(serde_json::from_str(&body)?)
}

fn normalize_base_url(base_url: String) -> String {
    base_url.trim_end_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_is_normalized() {
        let api = HttpCareerApi::new("http://127.0.0.1:8001/");
        assert_eq!(api.base_url(), "http://127.0.0.1:8001");
        assert_eq!(api.url("/analyze"), "http://127.0.0.1:8001/analyze");
    }

    /// Serve one canned HTTP response on a loopback port
    async fn serve_once(status_line: &str, body: &str) -> String {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};
        use tokio::net::TcpListener;

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let response = format!(
            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status_line,
            body.len(),
            body
        );
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 4096];
            let _ = socket.read(&mut buf).await;
            socket.write_all(response.as_bytes()).await.unwrap();
            let _ = socket.shutdown().await;
        });
        format!("http://{}", addr)
    }

    #[tokio::test]
    async fn test_server_error_carries_detail() {
        let base = serve_once(
            "500 Internal Server Error",
            r#"{"detail": "Error analyzing career paths"}"#,
        )
        .await;
        let api = HttpCareerApi::with_timeout(base, Duration::from_secs(5)).unwrap();

        let err = api.health().await.unwrap_err();
        assert_eq!(err.to_string(), "Server Error: Error analyzing career paths");
        assert!(matches!(err, ApiError::Server { status: 500, .. }));
    }

    #[tokio::test]
    async fn test_undecodable_success_body() {
        let base = serve_once("200 OK", r#"{"unexpected": true}"#).await;
        let api = HttpCareerApi::with_timeout(base, Duration::from_secs(5)).unwrap();

        let err = api.health().await.unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)), "got {:?}", err);
        assert!(err.to_string().starts_with("Invalid response: "));
    }

    #[tokio::test]
    async fn test_unreachable_host_maps_to_network_error() {
        // port 9 on loopback refuses connections
        let api = HttpCareerApi::with_timeout("http://127.0.0.1:9", Duration::from_secs(2)).unwrap();
        let err = api.health().await.unwrap_err();
        assert!(matches!(err, ApiError::Network(_)), "got {:?}", err);
    }
}
