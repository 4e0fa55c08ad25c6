use dioxus::prelude::*;
use services::{ApiError, ChatError, MenuError, QuizError};
use tutor_core::model::QuizProgressError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViewError {
    Unknown,
    Unavailable,
    SignedOut,
    NothingToPlay,
    TopicNotSupported,
}

impl ViewError {
    #[must_use]
    pub fn message(self) -> &'static str {
        match self {
            ViewError::Unknown => "Đã có lỗi xảy ra. Vui lòng thử lại.",
            ViewError::Unavailable => "Không kết nối được máy chủ. Vui lòng thử lại.",
            ViewError::SignedOut => "Phiên đăng nhập đã hết hạn. Vui lòng đăng nhập lại.",
            ViewError::NothingToPlay => "Chưa có bài khởi động nào cho bạn.",
            ViewError::TopicNotSupported => "Chủ đề này chưa có trò chơi.",
        }
    }
}

impl From<&ApiError> for ViewError {
    fn from(err: &ApiError) -> Self {
        if err.is_unauthorized() {
            ViewError::SignedOut
        } else {
            ViewError::Unavailable
        }
    }
}

impl From<&QuizError> for ViewError {
    fn from(err: &QuizError) -> Self {
        match err {
            QuizError::Api(api) => api.into(),
            QuizError::Progress(QuizProgressError::Empty) => ViewError::NothingToPlay,
            _ => ViewError::Unknown,
        }
    }
}

impl From<&ChatError> for ViewError {
    fn from(err: &ChatError) -> Self {
        match err {
            ChatError::Api(api) => api.into(),
            _ => ViewError::Unknown,
        }
    }
}

impl From<&MenuError> for ViewError {
    fn from(err: &MenuError) -> Self {
        match err {
            MenuError::Api(api) => api.into(),
            MenuError::TopicNotSupported(_) => ViewError::TopicNotSupported,
            _ => ViewError::Unknown,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum ViewState<T> {
    Idle,
    Loading,
    Ready(T),
    Error(ViewError),
}

#[must_use]
pub fn view_state_from_resource<T: Clone>(
    resource: Resource<Result<T, ViewError>>,
) -> ViewState<T> {
    match resource.state().cloned() {
        UseResourceState::Pending => ViewState::Loading,
        UseResourceState::Ready => match resource.value().read().as_ref() {
            Some(Ok(data)) => ViewState::Ready(data.clone()),
            Some(Err(err)) => ViewState::Error(*err),
            None => ViewState::Error(ViewError::Unknown),
        },
        UseResourceState::Paused | UseResourceState::Stopped => ViewState::Idle,
    }
}
