use std::sync::Arc;

use async_trait::async_trait;
use dioxus::core::NoOpMutations;
use dioxus::prelude::*;
use dioxus_router::{Routable, Router};
use serde_json::json;
use services::api::{
    AuthApi, AuthResponse, CatalogApi, ChatTurnResponse, ExerciseResult, HistoryMessage,
    LearningApi, PolyaApi, PolyaExercise, PolyaStartResponse, PolyaTurnResponse, ProgressApi,
    SessionRef, StartSessionResponse, SubmitAnswerRequest,
};
use services::{ApiError, AppServices};
use storage::{Storage, StorageKey};
use tutor_core::model::{
    AnswerOption, Category, CategoryId, Credentials, Exercise, ExerciseId, ExerciseType,
    GameAnswerResult, GameFeedback, LeaderboardEntry, MyRank, OptionId, PolyaStep, PracticeKind,
    Question, QuestionId, QuestionType, Registration, SessionId, SessionPhase,
    SubmitAnswerResponse, Topic, TopicId, User, UserExercise, UserExerciseId, UserId,
};
use tutor_core::time::fixed_clock;

use crate::context::{ChatStyle, UiApp, build_app_context};
use crate::views::{LearnView, LoginView, MenuView};

fn unavailable() -> ApiError {
    ApiError::Status {
        status: 503,
        message: None,
    }
}

/// Canned backend: one warm-up question, a two-level menu, and tutors that
/// greet but never answer.
#[derive(Default)]
pub struct StubApi {
    pub topics_supported: bool,
}

#[async_trait]
impl AuthApi for StubApi {
    async fn register(&self, _registration: &Registration) -> Result<AuthResponse, ApiError> {
        Err(unavailable())
    }

    async fn login(&self, _credentials: &Credentials) -> Result<AuthResponse, ApiError> {
        Err(unavailable())
    }

    async fn profile(&self) -> Result<User, ApiError> {
        Ok(User {
            id: UserId::new("u-1"),
            email: "hs@example.com".into(),
            name: "Học sinh".into(),
        })
    }
}

#[async_trait]
impl ProgressApi for StubApi {
    async fn start_warmup(&self) -> Result<Vec<UserExercise>, ApiError> {
        let option = |id: &str, content: &str, is_correct: bool| AnswerOption {
            id: OptionId::new(id),
            content: content.into(),
            is_correct,
            error_type: None,
            error_description: None,
        };
        Ok(vec![UserExercise {
            id: UserExerciseId::new("ue-1"),
            exercise_id: ExerciseId::new("ex-1"),
            exercise: Exercise {
                id: ExerciseId::new("ex-1"),
                kind: ExerciseType::Basic,
                scenario: "Lan có 3 túi kẹo".into(),
                time_limit: 0,
                bonus_time: 0,
                questions: vec![Question {
                    id: QuestionId::new("q1"),
                    order_index: 0,
                    content: "3 x 4 = ?".into(),
                    kind: QuestionType::Single,
                    correct_points: 10,
                    wrong_points: 0,
                    bonus_points: 0,
                    options: vec![option("a", "12", true), option("b", "7", false)],
                }],
            },
            phase: 1,
            score: 0,
            status: "IN_PROGRESS".into(),
        }])
    }

    async fn submit_answer(
        &self,
        _request: &SubmitAnswerRequest,
    ) -> Result<SubmitAnswerResponse, ApiError> {
        Err(unavailable())
    }

    async fn complete_exercise(&self, _id: &UserExerciseId) -> Result<(), ApiError> {
        Ok(())
    }

    async fn exercise_result(&self, _id: &UserExerciseId) -> Result<ExerciseResult, ApiError> {
        Err(unavailable())
    }
}

#[async_trait]
impl LearningApi for StubApi {
    async fn start_session(&self, kind: PracticeKind) -> Result<StartSessionResponse, ApiError> {
        Ok(StartSessionResponse {
            session: SessionRef {
                id: SessionId::new(format!("s-{kind}")),
            },
            exercise: json!({ "problem": "2,5 x 4" }),
            welcome_message: "Chào em! Cùng đọc đề nhé.".into(),
        })
    }

    async fn chat(&self, _session: &SessionId, _message: &str) -> Result<ChatTurnResponse, ApiError> {
        Err(unavailable())
    }

    async fn session_messages(&self, _session: &SessionId) -> Result<Vec<HistoryMessage>, ApiError> {
        Err(unavailable())
    }

    async fn complete_session(&self, _session: &SessionId) -> Result<(), ApiError> {
        Ok(())
    }

    async fn game_feedback(&self, _results: &[GameAnswerResult]) -> Result<GameFeedback, ApiError> {
        Err(unavailable())
    }
}

#[async_trait]
impl PolyaApi for StubApi {
    async fn start_polya(&self, kind: PracticeKind) -> Result<PolyaStartResponse, ApiError> {
        Ok(PolyaStartResponse {
            practice_exercise: PolyaExercise {
                id: SessionId::new(format!("p-{kind}")),
                problem: "Một hộp có 24 bút, chia đều cho 6 bạn.".into(),
                current_polya_step: PolyaStep::Understand,
            },
            welcome_message: "Đề bài hỏi gì nhỉ?".into(),
        })
    }

    async fn polya_chat(
        &self,
        _exercise: &SessionId,
        _message: &str,
    ) -> Result<PolyaTurnResponse, ApiError> {
        Err(unavailable())
    }

    async fn polya_messages(&self, _exercise: &SessionId) -> Result<Vec<HistoryMessage>, ApiError> {
        Err(unavailable())
    }

    async fn complete_polya(&self, _exercise: &SessionId) -> Result<(), ApiError> {
        Ok(())
    }
}

#[async_trait]
impl CatalogApi for StubApi {
    async fn categories(&self) -> Result<Vec<Category>, ApiError> {
        Ok(Vec::new())
    }

    async fn category_children(&self, id: &CategoryId) -> Result<Vec<Category>, ApiError> {
        if id.as_str() != "game" {
            return Ok(Vec::new());
        }
        Ok(vec![Category {
            id: CategoryId::new("lop-5"),
            parent_id: Some(id.clone()),
            level: 1,
            name: "Lớp 5".into(),
            sort_order: 0,
            is_active: true,
            children: None,
        }])
    }

    async fn category_topics(&self, id: &CategoryId) -> Result<Vec<Topic>, ApiError> {
        Ok(vec![Topic {
            id: TopicId::new("so-thap-phan"),
            category_id: id.clone(),
            name: "Số thập phân".into(),
            is_game_supported: self.topics_supported,
            sort_order: 0,
            is_active: true,
        }])
    }

    async fn leaderboard(&self, _topic: &TopicId) -> Result<Vec<LeaderboardEntry>, ApiError> {
        Ok(vec![LeaderboardEntry {
            rank: 1,
            user_id: UserId::new("u-9"),
            user_name: "Minh".into(),
            score: 90,
            time_ms: 95_000,
            accuracy: 0.9,
        }])
    }

    async fn my_rank(&self, _topic: &TopicId) -> Result<MyRank, ApiError> {
        Ok(MyRank {
            rank: None,
            best_score: 0,
            best_time: 0,
        })
    }
}

struct TestApp {
    services: AppServices,
    chat_style: ChatStyle,
}

impl UiApp for TestApp {
    fn services(&self) -> AppServices {
        self.services.clone()
    }

    fn chat_style(&self) -> ChatStyle {
        self.chat_style
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
pub enum ViewKind {
    Login,
    Menu,
    Learn,
}

#[derive(Props, Clone)]
struct ViewHarnessProps {
    app: Arc<TestApp>,
    view: ViewKind,
}

impl PartialEq for ViewHarnessProps {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

#[component]
fn ViewRouterHarness(props: ViewHarnessProps) -> Element {
    let app: Arc<dyn UiApp> = props.app.clone();
    use_context_provider(|| build_app_context(&app));
    use_context_provider(|| props.view);
    rsx! { Router::<TestRoute> {} }
}

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum TestRoute {
    #[route("/")]
    Root {},
}

#[component]
fn Root() -> Element {
    match use_context::<ViewKind>() {
        ViewKind::Login => rsx! { LoginView {} },
        ViewKind::Menu => rsx! { MenuView {} },
        ViewKind::Learn => rsx! { LearnView {} },
    }
}

pub struct ViewHarness {
    pub dom: VirtualDom,
}

impl ViewHarness {
    /// Let resources resolve; each pass settles one layer of nested loads.
    pub async fn settle(&mut self) {
        self.dom.rebuild_in_place();
        for _ in 0..6 {
            let _ = tokio::time::timeout(
                std::time::Duration::from_millis(50),
                self.dom.wait_for_work(),
            )
            .await;
            self.dom.render_immediate(&mut NoOpMutations);
            self.dom.process_events();
        }
    }

    pub fn render(&self) -> String {
        dioxus_ssr::render(&self.dom)
    }
}

pub struct HarnessOptions {
    pub view: ViewKind,
    pub phase: Option<SessionPhase>,
    pub chat_style: ChatStyle,
    pub selected_topic: Option<(&'static str, &'static str)>,
    pub topics_supported: bool,
}

impl Default for HarnessOptions {
    fn default() -> Self {
        Self {
            view: ViewKind::Menu,
            phase: None,
            chat_style: ChatStyle::Scaffolding,
            selected_topic: None,
            topics_supported: true,
        }
    }
}

pub async fn setup_view_harness(options: HarnessOptions) -> ViewHarness {
    let storage = Storage::in_memory();
    if let Some(phase) = options.phase {
        storage
            .set_string(StorageKey::LearnGamePhase, phase.as_str())
            .await
            .expect("seed phase");
    }
    if let Some((id, name)) = options.selected_topic {
        storage
            .set_string(StorageKey::SelectedTopicId, id)
            .await
            .expect("seed topic id");
        storage
            .set_string(StorageKey::SelectedTopicName, name)
            .await
            .expect("seed topic name");
    }

    let api = Arc::new(StubApi {
        topics_supported: options.topics_supported,
    });
    let services = AppServices::with_api(storage, api, fixed_clock());
    let app = Arc::new(TestApp {
        services,
        chat_style: options.chat_style,
    });

    let dom = VirtualDom::new_with_props(
        ViewRouterHarness,
        ViewHarnessProps {
            app,
            view: options.view,
        },
    );

    ViewHarness { dom }
}
