//! Error types surfaced by the API client and the session layer.
//!
//! Every variant renders to the human-readable line that ends up in
//! `SessionState::last_error`, so the `Display` text is part of the contract.

use thiserror::Error;

/// Message used when the service could not be reached at all.
pub const UNREACHABLE: &str = "Unable to connect to server";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// No response was received (connect failure, timeout, reset).
    #[error("Network Error: {0}")]
    Network(String),

    /// The service answered with a non-2xx status.
    #[error("Server Error: {detail}")]
    Server { status: u16, detail: String },

    /// Missing/rejected credentials, or the user behind a token no longer exists.
    #[error("Authentication Error: {0}")]
    Auth(String),

    /// Raised client-side before any request is sent.
    #[error("Validation Error: {0}")]
    Validation(String),

    /// The body of a successful response could not be decoded.
    #[error("Invalid response: {0}")]
    Decode(String),
}

impl ApiError {
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::Validation(message.into())
    }

    pub fn unreachable() -> Self {
        ApiError::Network(UNREACHABLE.to_string())
    }

    /// True when the right reaction is to drop the token and ask for a new login.
    pub fn is_auth(&self) -> bool {
        matches!(self, ApiError::Auth(_))
    }

    /// Map a non-2xx status and its raw body to an error.
    ///
    /// FastAPI puts the reason in `detail`; other handlers use `message`.
    pub fn from_status(status: u16, reason: Option<&str>, body: &str) -> Self {
        let detail = extract_detail(body)
            .or_else(|| {
                let trimmed = body.trim();
                (!trimmed.is_empty()).then(|| trimmed.to_string())
            })
            .or_else(|| reason.map(str::to_string))
            .unwrap_or_else(|| format!("HTTP {}", status));

        let lowered = detail.to_lowercase();
        if status == 401 || status == 403 || lowered.contains("user not found") {
            ApiError::Auth(detail)
        } else {
            ApiError::Server { status, detail }
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ApiError::Network("Request timed out".to_string())
        } else if err.is_connect() || err.is_request() {
            ApiError::unreachable()
        } else if err.is_decode() {
            ApiError::Decode(err.to_string())
        } else if let Some(status) = err.status() {
            ApiError::from_status(status.as_u16(), status.canonical_reason(), "")
        } else {
            ApiError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Decode(err.to_string())
    }
}

fn extract_detail(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    let field = value.get("detail").or_else(|| value.get("message"))?;
    match field {
        serde_json::Value::String(s) => Some(s.clone()),
        // Pydantic validation failures come back as a list of {loc, msg, type}
        serde_json::Value::Array(items) => {
            let messages: Vec<String> = items
                .iter()
                .filter_map(|item| item.get("msg").and_then(|m| m.as_str()))
                .map(str::to_string)
                .collect();
            (!messages.is_empty()).then(|| messages.join("; "))
        }
        serde_json::Value::Null => None,
        other => Some(other.to_string()),
    }
}
