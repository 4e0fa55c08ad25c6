//! Seams to the remote tutoring backend.
//!
//! Each trait covers one area of the REST API so trackers can be tested
//! against small fakes; [`HttpApi`] implements all of them over `reqwest`.

use async_trait::async_trait;

use tutor_core::model::{
    Category, CategoryId, Credentials, GameAnswerResult, GameFeedback, LeaderboardEntry, MyRank,
    PracticeKind, Registration, SessionId, SubmitAnswerResponse, Topic, TopicId, User,
    UserExercise, UserExerciseId,
};

use crate::error::ApiError;

mod http;
mod types;

pub use http::HttpApi;
pub use types::{
    AuthResponse, ChatRequest, ChatTurnResponse, ExerciseResult, GameFeedbackRequest,
    HistoryMessage, PolyaExercise, PolyaStartResponse, PolyaTurnResponse, SessionRef,
    StartSessionResponse, SubmitAnswerRequest,
};

#[async_trait]
pub trait AuthApi: Send + Sync {
    async fn register(&self, registration: &Registration) -> Result<AuthResponse, ApiError>;
    async fn login(&self, credentials: &Credentials) -> Result<AuthResponse, ApiError>;
    async fn profile(&self) -> Result<User, ApiError>;
}

#[async_trait]
pub trait ProgressApi: Send + Sync {
    async fn start_warmup(&self) -> Result<Vec<UserExercise>, ApiError>;
    async fn submit_answer(
        &self,
        request: &SubmitAnswerRequest,
    ) -> Result<SubmitAnswerResponse, ApiError>;
    async fn complete_exercise(&self, id: &UserExerciseId) -> Result<(), ApiError>;
    async fn exercise_result(&self, id: &UserExerciseId) -> Result<ExerciseResult, ApiError>;
}

/// Linear scaffolding chat and post-quiz feedback.
#[async_trait]
pub trait LearningApi: Send + Sync {
    async fn start_session(&self, kind: PracticeKind) -> Result<StartSessionResponse, ApiError>;
    async fn chat(&self, session: &SessionId, message: &str) -> Result<ChatTurnResponse, ApiError>;
    async fn session_messages(&self, session: &SessionId) -> Result<Vec<HistoryMessage>, ApiError>;
    async fn complete_session(&self, session: &SessionId) -> Result<(), ApiError>;
    async fn game_feedback(&self, results: &[GameAnswerResult]) -> Result<GameFeedback, ApiError>;
}

/// Four-step guided chat, keyed by practice exercise id.
#[async_trait]
pub trait PolyaApi: Send + Sync {
    async fn start_polya(&self, kind: PracticeKind) -> Result<PolyaStartResponse, ApiError>;
    async fn polya_chat(
        &self,
        exercise: &SessionId,
        message: &str,
    ) -> Result<PolyaTurnResponse, ApiError>;
    async fn polya_messages(&self, exercise: &SessionId) -> Result<Vec<HistoryMessage>, ApiError>;
    async fn complete_polya(&self, exercise: &SessionId) -> Result<(), ApiError>;
}

#[async_trait]
pub trait CatalogApi: Send + Sync {
    async fn categories(&self) -> Result<Vec<Category>, ApiError>;
    async fn category_children(&self, id: &CategoryId) -> Result<Vec<Category>, ApiError>;
    async fn category_topics(&self, id: &CategoryId) -> Result<Vec<Topic>, ApiError>;
    async fn leaderboard(&self, topic: &TopicId) -> Result<Vec<LeaderboardEntry>, ApiError>;
    async fn my_rank(&self, topic: &TopicId) -> Result<MyRank, ApiError>;
}

/// Everything the app needs from the backend.
pub trait TutorApi: AuthApi + ProgressApi + LearningApi + PolyaApi + CatalogApi {}

impl<T> TutorApi for T where T: AuthApi + ProgressApi + LearningApi + PolyaApi + CatalogApi {}
