pub mod controller;
pub mod model;
pub mod state;
pub mod store;

pub use controller::{RegistrationForm, SessionController};
pub use model::{
    AnalysisResult, CareerPath, CourseDifficulty, CourseRef, ExpertiseLevel, LearningResources,
    MockQuestion, MockTest, ResourceLink, RoadmapStep, UserProfile,
};
pub use state::{Action, RequestPhase, SessionState};
pub use store::SessionStore;
