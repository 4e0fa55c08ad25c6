//! Shared error types for the services crate.

use thiserror::Error;

use storage::repository::StorageError;
use storage::sqlite::SqliteInitError;
use tutor_core::model::{CredentialsError, PhaseError, QuizProgressError, TopicId};

const GENERIC_FAILURE: &str = "Đã có lỗi xảy ra. Vui lòng thử lại.";

/// Errors emitted by the HTTP API client.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ApiError {
    #[error("request failed with status {status}")]
    Status { status: u16, message: Option<String> },
    #[error("unexpected response: {0}")]
    Decode(String),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl ApiError {
    /// Text suitable for showing inline next to a form.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Status {
                message: Some(message),
                ..
            } if !message.trim().is_empty() => message.clone(),
            _ => GENERIC_FAILURE.to_string(),
        }
    }

    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Status { status: 401, .. })
    }
}

/// Errors emitted by `AuthService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AuthError {
    #[error(transparent)]
    Invalid(#[from] CredentialsError),
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl AuthError {
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            AuthError::Invalid(CredentialsError::EmptyEmail) => "Vui lòng nhập email".into(),
            AuthError::Invalid(CredentialsError::EmptyName) => "Vui lòng nhập họ tên".into(),
            AuthError::Invalid(CredentialsError::PasswordTooShort { min }) => {
                format!("Mật khẩu phải có ít nhất {min} ký tự")
            }
            AuthError::Api(err) => err.user_message(),
            _ => GENERIC_FAILURE.to_string(),
        }
    }
}

/// Errors emitted by `PhaseController`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PhaseControllerError {
    #[error(transparent)]
    Transition(#[from] PhaseError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `WarmupQuiz`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QuizError {
    #[error("a submission is already in flight")]
    Busy,
    #[error(transparent)]
    Progress(#[from] QuizProgressError),
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Errors emitted by the chat trackers.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ChatError {
    #[error("no chat session is active")]
    NoSession,
    #[error("a message is already awaiting a reply")]
    Busy,
    #[error("the exercise is already completed")]
    Completed,
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by the menu navigator and leaderboard.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum MenuError {
    #[error("topic {0} does not support the game")]
    TopicNotSupported(TopicId),
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}
