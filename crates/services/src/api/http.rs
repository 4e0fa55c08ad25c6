use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde_json::Value;

use storage::{Storage, StorageKey};
use tutor_core::model::{
    Category, CategoryId, Credentials, GameAnswerResult, GameFeedback, LeaderboardEntry, MyRank,
    PracticeKind, Registration, SessionId, SubmitAnswerResponse, Topic, TopicId, User,
    UserExercise, UserExerciseId,
};

use super::types::{
    AuthResponse, ChatRequest, ChatTurnResponse, ExerciseResult, GameFeedbackRequest,
    HistoryMessage, PolyaStartResponse, PolyaTurnResponse, StartSessionResponse,
    SubmitAnswerRequest,
};
use super::{AuthApi, CatalogApi, LearningApi, PolyaApi, ProgressApi};
use crate::config::ApiConfig;
use crate::error::ApiError;

/// `reqwest` client for the tutoring backend.
///
/// The bearer token is read from storage on every request, so logging in or
/// out takes effect without rebuilding the client.
#[derive(Clone)]
pub struct HttpApi {
    client: Client,
    config: ApiConfig,
    storage: Storage,
}

impl HttpApi {
    /// # Errors
    ///
    /// Returns `ApiError::Http` if the underlying client cannot be built.
    pub fn new(config: ApiConfig, storage: Storage) -> Result<Self, ApiError> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            client,
            config,
            storage,
        })
    }

    #[must_use]
    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    async fn request(&self, method: Method, path: &str) -> Result<RequestBuilder, ApiError> {
        let url = self.config.endpoint(path);
        tracing::debug!(%method, %url, "api request");
        let mut builder = self.client.request(method, url);
        if let Some(token) = self.storage.get_string(StorageKey::Token).await? {
            builder = builder.bearer_auth(token);
        }
        Ok(builder)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self.request(Method::GET, path).await?.send().await?;
        decode(checked(response).await?).await
    }

    async fn post<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &(impl serde::Serialize + Sync),
    ) -> Result<T, ApiError> {
        let response = self
            .request(Method::POST, path)
            .await?
            .json(body)
            .send()
            .await?;
        decode(checked(response).await?).await
    }

    async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self.request(Method::POST, path).await?.send().await?;
        decode(checked(response).await?).await
    }

    /// POST whose response body is irrelevant.
    async fn notify(&self, path: &str) -> Result<(), ApiError> {
        let response = self.request(Method::POST, path).await?.send().await?;
        checked(response).await.map(|_| ())
    }
}

async fn checked(response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    let message = error_message(&body);
    tracing::debug!(status = status.as_u16(), ?message, "api request failed");
    Err(ApiError::Status {
        status: status.as_u16(),
        message,
    })
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let bytes = response.bytes().await?;
    serde_json::from_slice(&bytes).map_err(|err| ApiError::Decode(err.to_string()))
}

/// Pulls the `message` field out of an error body; validation errors send a list.
fn error_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    match value.get("message")? {
        Value::String(text) => Some(text.clone()),
        Value::Array(items) => {
            let parts: Vec<&str> = items.iter().filter_map(Value::as_str).collect();
            (!parts.is_empty()).then(|| parts.join(", "))
        }
        _ => None,
    }
}

fn practice_segment(kind: PracticeKind) -> &'static str {
    match kind {
        PracticeKind::Basic => "start-practice",
        PracticeKind::Advanced => "start-advanced",
        PracticeKind::Application => "start-application",
    }
}

#[async_trait]
impl AuthApi for HttpApi {
    async fn register(&self, registration: &Registration) -> Result<AuthResponse, ApiError> {
        self.post("auth/register", registration).await
    }

    async fn login(&self, credentials: &Credentials) -> Result<AuthResponse, ApiError> {
        self.post("auth/login", credentials).await
    }

    async fn profile(&self) -> Result<User, ApiError> {
        self.get("auth/profile").await
    }
}

#[async_trait]
impl ProgressApi for HttpApi {
    async fn start_warmup(&self) -> Result<Vec<UserExercise>, ApiError> {
        self.post_empty("progress/start-warmup").await
    }

    async fn submit_answer(
        &self,
        request: &SubmitAnswerRequest,
    ) -> Result<SubmitAnswerResponse, ApiError> {
        self.post("progress/submit-answer", request).await
    }

    async fn complete_exercise(&self, id: &UserExerciseId) -> Result<(), ApiError> {
        self.notify(&format!("progress/complete/{id}")).await
    }

    async fn exercise_result(&self, id: &UserExerciseId) -> Result<ExerciseResult, ApiError> {
        self.get(&format!("progress/result/{id}")).await
    }
}

#[async_trait]
impl LearningApi for HttpApi {
    async fn start_session(&self, kind: PracticeKind) -> Result<StartSessionResponse, ApiError> {
        self.post_empty(&format!("learning/{}", practice_segment(kind)))
            .await
    }

    async fn chat(&self, session: &SessionId, message: &str) -> Result<ChatTurnResponse, ApiError> {
        self.post(&format!("learning/chat/{session}"), &ChatRequest { message })
            .await
    }

    async fn session_messages(&self, session: &SessionId) -> Result<Vec<HistoryMessage>, ApiError> {
        self.get(&format!("learning/session/{session}/messages"))
            .await
    }

    async fn complete_session(&self, session: &SessionId) -> Result<(), ApiError> {
        self.notify(&format!("learning/session/{session}/complete"))
            .await
    }

    async fn game_feedback(&self, results: &[GameAnswerResult]) -> Result<GameFeedback, ApiError> {
        self.post(
            "learning/game-feedback",
            &GameFeedbackRequest {
                game_results: results,
            },
        )
        .await
    }
}

#[async_trait]
impl PolyaApi for HttpApi {
    async fn start_polya(&self, kind: PracticeKind) -> Result<PolyaStartResponse, ApiError> {
        self.post_empty(&format!("learning/polya/{}", practice_segment(kind)))
            .await
    }

    async fn polya_chat(
        &self,
        exercise: &SessionId,
        message: &str,
    ) -> Result<PolyaTurnResponse, ApiError> {
        self.post(
            &format!("learning/polya/chat/{exercise}"),
            &ChatRequest { message },
        )
        .await
    }

    async fn polya_messages(&self, exercise: &SessionId) -> Result<Vec<HistoryMessage>, ApiError> {
        self.get(&format!("learning/polya/{exercise}/messages"))
            .await
    }

    async fn complete_polya(&self, exercise: &SessionId) -> Result<(), ApiError> {
        self.notify(&format!("learning/polya/{exercise}/complete"))
            .await
    }
}

#[async_trait]
impl CatalogApi for HttpApi {
    async fn categories(&self) -> Result<Vec<Category>, ApiError> {
        self.get("categories").await
    }

    async fn category_children(&self, id: &CategoryId) -> Result<Vec<Category>, ApiError> {
        self.get(&format!("categories/{id}/children")).await
    }

    async fn category_topics(&self, id: &CategoryId) -> Result<Vec<Topic>, ApiError> {
        self.get(&format!("categories/{id}/topics")).await
    }

    async fn leaderboard(&self, topic: &TopicId) -> Result<Vec<LeaderboardEntry>, ApiError> {
        self.get(&format!("leaderboard/{topic}")).await
    }

    async fn my_rank(&self, topic: &TopicId) -> Result<MyRank, ApiError> {
        self.get(&format!("leaderboard/{topic}/my-rank")).await
    }
}
