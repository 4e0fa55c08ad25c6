use std::sync::Arc;

use storage::Storage;
use tutor_core::model::PracticeKind;

use crate::Clock;
use crate::api::{AuthApi, CatalogApi, HttpApi, LearningApi, PolyaApi, ProgressApi, TutorApi};
use crate::auth_service::AuthService;
use crate::chat::{PolyaChat, ScaffoldingChat};
use crate::config::ApiConfig;
use crate::error::{AppServicesError, QuizError};
use crate::feedback_service::FeedbackService;
use crate::menu_service::{LeaderboardService, MenuNavigator};
use crate::phase_controller::PhaseController;
use crate::quiz_service::WarmupQuiz;

/// Assembles app-facing services and hands out per-screen trackers.
///
/// Trackers are built fresh for each screen so their state lives exactly as
/// long as the screen that owns it.
#[derive(Clone)]
pub struct AppServices {
    clock: Clock,
    storage: Storage,
    progress_api: Arc<dyn ProgressApi>,
    learning_api: Arc<dyn LearningApi>,
    polya_api: Arc<dyn PolyaApi>,
    catalog_api: Arc<dyn CatalogApi>,
    auth: Arc<AuthService>,
    feedback: Arc<FeedbackService>,
    leaderboard: Arc<LeaderboardService>,
}

impl AppServices {
    /// Build services backed by `SQLite` storage and the HTTP API.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if storage or the HTTP client cannot be initialized.
    pub async fn new_sqlite(
        db_url: &str,
        api_config: ApiConfig,
        clock: Clock,
    ) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(db_url).await?;
        let api = Arc::new(HttpApi::new(api_config, storage.clone())?);
        Ok(Self::with_api(storage, api, clock))
    }

    /// Wire every service to one backend implementation.
    #[must_use]
    pub fn with_api<A: TutorApi + 'static>(storage: Storage, api: Arc<A>, clock: Clock) -> Self {
        let auth_api: Arc<dyn AuthApi> = api.clone();
        let progress_api: Arc<dyn ProgressApi> = api.clone();
        let learning_api: Arc<dyn LearningApi> = api.clone();
        let polya_api: Arc<dyn PolyaApi> = api.clone();
        let catalog_api: Arc<dyn CatalogApi> = api;

        Self {
            clock,
            auth: Arc::new(AuthService::new(auth_api, storage.clone())),
            feedback: Arc::new(FeedbackService::new(Arc::clone(&learning_api))),
            leaderboard: Arc::new(LeaderboardService::new(Arc::clone(&catalog_api))),
            storage,
            progress_api,
            learning_api,
            polya_api,
            catalog_api,
        }
    }

    #[must_use]
    pub fn clock(&self) -> Clock {
        self.clock
    }

    #[must_use]
    pub fn storage(&self) -> Storage {
        self.storage.clone()
    }

    #[must_use]
    pub fn auth(&self) -> Arc<AuthService> {
        Arc::clone(&self.auth)
    }

    #[must_use]
    pub fn feedback(&self) -> Arc<FeedbackService> {
        Arc::clone(&self.feedback)
    }

    #[must_use]
    pub fn leaderboard(&self) -> Arc<LeaderboardService> {
        Arc::clone(&self.leaderboard)
    }

    pub async fn phase_controller(&self) -> PhaseController {
        PhaseController::restore(self.storage.clone()).await
    }

    /// # Errors
    ///
    /// Returns `QuizError` if the warm-up cannot be started.
    pub async fn start_warmup(&self) -> Result<WarmupQuiz, QuizError> {
        WarmupQuiz::start(Arc::clone(&self.progress_api), self.clock).await
    }

    #[must_use]
    pub fn scaffolding_chat(&self, kind: PracticeKind) -> ScaffoldingChat {
        ScaffoldingChat::new(kind, Arc::clone(&self.learning_api), self.storage.clone())
    }

    #[must_use]
    pub fn polya_chat(&self, kind: PracticeKind) -> PolyaChat {
        PolyaChat::new(kind, Arc::clone(&self.polya_api), self.storage.clone())
    }

    #[must_use]
    pub fn menu(&self) -> MenuNavigator {
        MenuNavigator::new(Arc::clone(&self.catalog_api), self.storage.clone())
    }
}
