//! Career Service Integration Module
//!
//! HTTP client for the remote career-guidance service plus the request and
//! response shapes it speaks.

pub mod client;
pub mod schemas;

// Re-export main types
pub use client::{CareerApi, HttpCareerApi};
pub use schemas::{
    AnalyzeRequest, AuthResponse, ChatRequest, ChatSkillResponse, ExtractedSkill, HealthStatus,
    LoginRequest, MockTestRequest, RegisterRequest, ResourceRequest, UpdateSkillsRequest,
    UpdateSkillsResponse, UserUpdate,
};
