#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::json;

use services::ApiError;
use services::api::{
    AuthApi, AuthResponse, CatalogApi, ChatTurnResponse, ExerciseResult, HistoryMessage,
    LearningApi, PolyaApi, PolyaExercise, PolyaStartResponse, PolyaTurnResponse, ProgressApi,
    SessionRef, StartSessionResponse, SubmitAnswerRequest,
};
use tutor_core::model::{
    AnswerOption, Category, CategoryId, Credentials, Exercise, ExerciseId, ExerciseType,
    GameAnswerResult, GameFeedback, LeaderboardEntry, MyRank, OptionId, PolyaStep, PracticeKind,
    Question, QuestionId, QuestionType, Registration, SessionId, SubmitAnswerResponse, Topic,
    TopicId, User, UserExercise, UserExerciseId, UserId,
};

pub fn unavailable() -> ApiError {
    ApiError::Status {
        status: 503,
        message: None,
    }
}

/// Scripted backend; every call is recorded by name.
#[derive(Default)]
pub struct FakeApi {
    pub calls: Mutex<Vec<String>>,
    pub warmup: Mutex<Vec<UserExercise>>,
    pub grades: Mutex<VecDeque<Result<SubmitAnswerResponse, ApiError>>>,
    pub fail_complete_exercise: Mutex<bool>,
    pub sessions_started: Mutex<u32>,
    pub known_sessions: Mutex<Vec<SessionId>>,
    pub chat_replies: Mutex<VecDeque<Result<ChatTurnResponse, ApiError>>>,
    pub polya_replies: Mutex<VecDeque<Result<PolyaTurnResponse, ApiError>>>,
    pub fail_complete_session: Mutex<bool>,
    pub feedback: Mutex<Option<GameFeedback>>,
    pub children: Mutex<Vec<(CategoryId, Vec<Category>)>>,
    pub topics: Mutex<Vec<(CategoryId, Vec<Topic>)>>,
    pub login_error: Mutex<Option<String>>,
    pub profile_ok: Mutex<bool>,
}

impl FakeApi {
    pub fn record(&self, call: impl Into<String>) {
        self.calls.lock().unwrap().push(call.into());
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, prefix: &str) -> usize {
        self.calls().iter().filter(|c| c.starts_with(prefix)).count()
    }
}

pub fn user() -> User {
    User {
        id: UserId::new("u-1"),
        email: "hs@example.com".into(),
        name: "Học sinh".into(),
    }
}

/// A warm-up exercise with one single-choice question whose correct option is `<id>-a`.
pub fn single_question_exercise(id: &str) -> UserExercise {
    let option = |suffix: &str, correct: bool| AnswerOption {
        id: OptionId::new(format!("{id}-{suffix}")),
        content: format!("{id} {suffix}"),
        is_correct: correct,
        error_type: (!correct).then(|| "CALCULATION".to_string()),
        error_description: (!correct).then(|| "Nhân sai".to_string()),
    };
    UserExercise {
        id: UserExerciseId::new(format!("ue-{id}")),
        exercise_id: ExerciseId::new(format!("ex-{id}")),
        exercise: Exercise {
            id: ExerciseId::new(format!("ex-{id}")),
            kind: ExerciseType::Basic,
            scenario: "Cửa hàng bánh".into(),
            time_limit: 140,
            bonus_time: 0,
            questions: vec![Question {
                id: QuestionId::new(format!("q-{id}")),
                order_index: 0,
                content: format!("Câu {id}"),
                kind: QuestionType::Single,
                correct_points: 10,
                wrong_points: 0,
                bonus_points: 0,
                options: vec![option("a", true), option("b", false)],
            }],
        },
        phase: 1,
        score: 0,
        status: "IN_PROGRESS".into(),
    }
}

pub fn turn(text: &str) -> ChatTurnResponse {
    serde_json::from_value(json!({ "aiResponse": text, "promptType": "SCAFFOLDING_2", "emotion": "encouraging" }))
        .unwrap()
}

pub fn category(id: &str, name: &str, order: i32) -> Category {
    Category {
        id: CategoryId::new(id),
        parent_id: None,
        level: 1,
        name: name.into(),
        sort_order: order,
        is_active: true,
        children: None,
    }
}

pub fn topic(id: &str, category_id: &str, supported: bool) -> Topic {
    Topic {
        id: TopicId::new(id),
        category_id: CategoryId::new(category_id),
        name: format!("Chủ đề {id}"),
        is_game_supported: supported,
        sort_order: 0,
        is_active: true,
    }
}

#[async_trait]
impl AuthApi for FakeApi {
    async fn register(&self, registration: &Registration) -> Result<AuthResponse, ApiError> {
        self.record(format!("register {}", registration.email()));
        Ok(AuthResponse {
            access_token: "token-new".into(),
            user: user(),
        })
    }

    async fn login(&self, credentials: &Credentials) -> Result<AuthResponse, ApiError> {
        self.record(format!("login {}", credentials.email()));
        if let Some(message) = self.login_error.lock().unwrap().clone() {
            return Err(ApiError::Status {
                status: 401,
                message: Some(message),
            });
        }
        Ok(AuthResponse {
            access_token: "token-1".into(),
            user: user(),
        })
    }

    async fn profile(&self) -> Result<User, ApiError> {
        self.record("profile");
        if *self.profile_ok.lock().unwrap() {
            Ok(user())
        } else {
            Err(ApiError::Status {
                status: 401,
                message: None,
            })
        }
    }
}

#[async_trait]
impl ProgressApi for FakeApi {
    async fn start_warmup(&self) -> Result<Vec<UserExercise>, ApiError> {
        self.record("start-warmup");
        Ok(self.warmup.lock().unwrap().clone())
    }

    async fn submit_answer(
        &self,
        request: &SubmitAnswerRequest,
    ) -> Result<SubmitAnswerResponse, ApiError> {
        self.record(format!("submit {}", request.question_id));
        self.grades
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(unavailable()))
    }

    async fn complete_exercise(&self, id: &UserExerciseId) -> Result<(), ApiError> {
        self.record(format!("complete-exercise {id}"));
        if *self.fail_complete_exercise.lock().unwrap() {
            return Err(unavailable());
        }
        Ok(())
    }

    async fn exercise_result(&self, id: &UserExerciseId) -> Result<ExerciseResult, ApiError> {
        self.record(format!("result {id}"));
        Ok(ExerciseResult(json!({ "aiFeedback": "Làm tốt lắm" })))
    }
}

#[async_trait]
impl LearningApi for FakeApi {
    async fn start_session(&self, kind: PracticeKind) -> Result<StartSessionResponse, ApiError> {
        self.record(format!("start-session {kind}"));
        let mut started = self.sessions_started.lock().unwrap();
        *started += 1;
        let id = SessionId::new(format!("s-{kind}-{started}"));
        self.known_sessions.lock().unwrap().push(id.clone());
        Ok(StartSessionResponse {
            session: SessionRef { id },
            exercise: json!({ "problem": "3 hộp bánh, mỗi hộp 5 cái" }),
            welcome_message: "Chào bạn! Cùng bắt đầu nhé.".into(),
        })
    }

    async fn chat(&self, session: &SessionId, message: &str) -> Result<ChatTurnResponse, ApiError> {
        self.record(format!("chat {session} {message}"));
        self.chat_replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(unavailable()))
    }

    async fn session_messages(&self, session: &SessionId) -> Result<Vec<HistoryMessage>, ApiError> {
        self.record(format!("messages {session}"));
        if !self.known_sessions.lock().unwrap().contains(session) {
            return Err(ApiError::Status {
                status: 404,
                message: Some("Session not found".into()),
            });
        }
        Ok(serde_json::from_value(json!([
            { "id": "h1", "role": "AI", "content": "Chào bạn!", "promptType": "SCAFFOLDING_1" },
            { "id": "h2", "role": "USER", "content": "15" },
            { "id": "h3", "role": "AI", "content": "Bạn làm đúng rồi", "promptType": "SCAFFOLDING_3", "emotion": "happy" }
        ]))
        .unwrap())
    }

    async fn complete_session(&self, session: &SessionId) -> Result<(), ApiError> {
        self.record(format!("complete-session {session}"));
        if *self.fail_complete_session.lock().unwrap() {
            return Err(unavailable());
        }
        Ok(())
    }

    async fn game_feedback(&self, results: &[GameAnswerResult]) -> Result<GameFeedback, ApiError> {
        self.record(format!("game-feedback {}", results.len()));
        self.feedback.lock().unwrap().clone().ok_or_else(unavailable)
    }
}

#[async_trait]
impl PolyaApi for FakeApi {
    async fn start_polya(&self, kind: PracticeKind) -> Result<PolyaStartResponse, ApiError> {
        self.record(format!("start-polya {kind}"));
        let id = SessionId::new(format!("p-{kind}"));
        self.known_sessions.lock().unwrap().push(id.clone());
        Ok(PolyaStartResponse {
            practice_exercise: PolyaExercise {
                id,
                problem: "Lan có 12 cái kẹo...".into(),
                current_polya_step: PolyaStep::Understand,
            },
            welcome_message: "Đọc kỹ đề bài nhé!".into(),
        })
    }

    async fn polya_chat(
        &self,
        exercise: &SessionId,
        message: &str,
    ) -> Result<PolyaTurnResponse, ApiError> {
        self.record(format!("polya-chat {exercise} {message}"));
        self.polya_replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(unavailable()))
    }

    async fn polya_messages(&self, exercise: &SessionId) -> Result<Vec<HistoryMessage>, ApiError> {
        self.record(format!("polya-messages {exercise}"));
        if !self.known_sessions.lock().unwrap().contains(exercise) {
            return Err(unavailable());
        }
        Ok(serde_json::from_value(json!([
            { "role": "AI", "content": "Đọc kỹ đề bài nhé!", "polyaStep": 1 },
            { "role": "USER", "content": "Tìm số kẹo còn lại" },
            { "role": "AI", "content": "Đúng rồi, giờ lập kế hoạch", "polyaStep": 2, "passed": true }
        ]))
        .unwrap())
    }

    async fn complete_polya(&self, exercise: &SessionId) -> Result<(), ApiError> {
        self.record(format!("complete-polya {exercise}"));
        if *self.fail_complete_session.lock().unwrap() {
            return Err(unavailable());
        }
        Ok(())
    }
}

#[async_trait]
impl CatalogApi for FakeApi {
    async fn categories(&self) -> Result<Vec<Category>, ApiError> {
        self.record("categories");
        Ok(Vec::new())
    }

    async fn category_children(&self, id: &CategoryId) -> Result<Vec<Category>, ApiError> {
        self.record(format!("children {id}"));
        Ok(self
            .children
            .lock()
            .unwrap()
            .iter()
            .find(|(parent, _)| parent == id)
            .map(|(_, children)| children.clone())
            .unwrap_or_default())
    }

    async fn category_topics(&self, id: &CategoryId) -> Result<Vec<Topic>, ApiError> {
        self.record(format!("topics {id}"));
        self.topics
            .lock()
            .unwrap()
            .iter()
            .find(|(parent, _)| parent == id)
            .map(|(_, topics)| topics.clone())
            .ok_or_else(unavailable)
    }

    async fn leaderboard(&self, topic: &TopicId) -> Result<Vec<LeaderboardEntry>, ApiError> {
        self.record(format!("leaderboard {topic}"));
        Ok(vec![
            LeaderboardEntry {
                rank: 2,
                user_id: UserId::new("u-2"),
                user_name: "Minh".into(),
                score: 20,
                time_ms: 90_000,
                accuracy: 66.7,
            },
            LeaderboardEntry {
                rank: 1,
                user_id: UserId::new("u-1"),
                user_name: "Lan".into(),
                score: 30,
                time_ms: 80_000,
                accuracy: 100.0,
            },
        ])
    }

    async fn my_rank(&self, topic: &TopicId) -> Result<MyRank, ApiError> {
        self.record(format!("my-rank {topic}"));
        Ok(MyRank {
            rank: Some(1),
            best_score: 30,
            best_time: 80_000,
        })
    }
}
