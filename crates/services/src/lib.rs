#![forbid(unsafe_code)]

pub mod api;
pub mod app_services;
pub mod auth_service;
pub mod chat;
pub mod config;
pub mod error;
pub mod feedback_service;
pub mod menu_service;
pub mod phase_controller;
pub mod quiz_service;

pub use tutor_core::Clock;

pub use app_services::AppServices;
pub use auth_service::AuthService;
pub use chat::{PolyaChat, ScaffoldingChat, TurnTicket};
pub use config::ApiConfig;
pub use error::{
    ApiError, AppServicesError, AuthError, ChatError, MenuError, PhaseControllerError, QuizError,
};
pub use feedback_service::FeedbackService;
pub use menu_service::{LeaderboardService, MenuEntries, MenuLevel, MenuNavigator};
pub use phase_controller::PhaseController;
pub use quiz_service::WarmupQuiz;
