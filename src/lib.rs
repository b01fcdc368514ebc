//! skillpath - client for a career-guidance service
//!
//! Keeps the user's session (skills, expertise, latest career analysis, mock
//! test and learning resources, signed-in profile) in a single store and talks
//! to the remote service over HTTP.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use skillpath::api::HttpCareerApi;
//! use skillpath::session::{ExpertiseLevel, SessionController, SessionStore};
//! use skillpath::storage::MemoryStore;
//!
//! # async fn demo() -> Result<(), skillpath::ApiError> {
//! let controller = SessionController::new(
//!     SessionStore::new(),
//!     Arc::new(HttpCareerApi::new("http://127.0.0.1:8001")),
//!     Arc::new(MemoryStore::new()),
//! );
//!
//! controller.store().set_skills("Python, SQL");
//! controller.store().set_expertise(ExpertiseLevel::Intermediate);
//! controller.analyze().await?;
//!
//! if let Some(analysis) = controller.store().snapshot().analysis {
//!     println!("Best match: {}", analysis.selected_path.title);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Modules
//!
//! - **session** - state, the action enum, the store and the network-facing controller
//! - **api** - HTTP client and wire types
//! - **storage** - key-value persistence for the token and chat transcript
//! - **chat** - conversational skill updates
//! - **cli** - the `skillpath` terminal front end

pub mod api;
pub mod chat;
pub mod cli;
pub mod config;
pub mod error;
pub mod logger;
pub mod session;
pub mod storage;

// Re-export commonly used types for convenience
pub use api::{CareerApi, HttpCareerApi};
pub use error::ApiError;
pub use session::{Action, SessionController, SessionState, SessionStore};
