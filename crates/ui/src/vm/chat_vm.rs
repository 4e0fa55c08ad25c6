use tutor_core::model::{ChatMessage, Emotion, PracticeKind, PromptType};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RobotVm {
    pub emotion: Emotion,
    pub emoji: &'static str,
    pub caption: &'static str,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChatBubbleVm {
    pub key: String,
    pub is_user: bool,
    pub content: String,
    pub badge: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChatPanelVm {
    pub title: &'static str,
    pub robot: RobotVm,
    pub bubbles: Vec<ChatBubbleVm>,
    pub loading: bool,
    pub step_complete: bool,
    pub completion_label: &'static str,
}

impl ChatPanelVm {
    /// The composer is replaced by the completion button once a step is done.
    #[must_use]
    pub fn shows_input(&self) -> bool {
        !self.step_complete
    }
}

/// Avatar mood for the latest tutor turn.
///
/// An explicit emotion hint wins; otherwise the teaching stage decides.
#[must_use]
pub fn robot_emotion(messages: &[ChatMessage], loading: bool) -> Emotion {
    if loading {
        return Emotion::Thinking;
    }
    let Some(last_ai) = messages.iter().rev().find(|message| message.is_ai()) else {
        return Emotion::Idle;
    };
    if let Some(emotion) = last_ai.emotion {
        return emotion;
    }
    match last_ai.prompt_type {
        Some(
            PromptType::Feedback
            | PromptType::Scaffolding1
            | PromptType::Scaffolding2
            | PromptType::Scaffolding4,
        ) => Emotion::Happy,
        Some(PromptType::Scaffolding3) => Emotion::Encouraging,
        Some(PromptType::Other(_)) | None => Emotion::Idle,
    }
}

#[must_use]
pub fn robot_vm(emotion: Emotion) -> RobotVm {
    let (emoji, caption) = match emotion {
        Emotion::Thinking => ("🤔", "Đang suy nghĩ..."),
        Emotion::Happy => ("🎉", "Tuyệt vời!"),
        Emotion::Encouraging => ("💪", "Cố lên nào!"),
        Emotion::Celebrating => ("🏆", "Xuất sắc!"),
        Emotion::Idle => ("👋", "Xin chào!"),
    };
    RobotVm {
        emotion,
        emoji,
        caption,
    }
}

#[must_use]
pub fn scaffolding_step_label(prompt_type: &PromptType) -> Option<&'static str> {
    match prompt_type {
        PromptType::Scaffolding1 => Some("Bước 1: Hiểu bài toán"),
        PromptType::Scaffolding2 => Some("Bước 2: Lập kế hoạch"),
        PromptType::Scaffolding3 => Some("Bước 3: Thực hiện"),
        PromptType::Scaffolding4 => Some("Bước 4: Kiểm tra"),
        PromptType::Feedback => Some("🎉 Nhận xét"),
        PromptType::Other(_) => None,
    }
}

#[must_use]
pub fn chat_title(kind: PracticeKind) -> &'static str {
    match kind {
        PracticeKind::Basic => "💪 Luyện tập cơ bản, củng cố",
        PracticeKind::Advanced => "🚀 Luyện tập nâng cao, mở rộng",
        PracticeKind::Application => "🎯 Vận dụng",
    }
}

/// Label of the button that leaves a finished chat phase.
#[must_use]
pub fn completion_label(kind: PracticeKind) -> &'static str {
    match kind {
        PracticeKind::Basic => "Tiếp tục với Luyện tập nâng cao →",
        PracticeKind::Advanced => "Tiếp tục với Vận dụng →",
        PracticeKind::Application => "Hoàn thành bài học! 🎉",
    }
}

pub(crate) fn message_bubble(message: &ChatMessage, badge: Option<String>) -> ChatBubbleVm {
    ChatBubbleVm {
        key: message.id.to_string(),
        is_user: !message.is_ai(),
        content: message.content.clone(),
        badge,
    }
}

#[must_use]
pub fn map_scaffolding_panel(
    kind: PracticeKind,
    messages: &[ChatMessage],
    loading: bool,
    step_complete: bool,
) -> ChatPanelVm {
    let bubbles = messages
        .iter()
        .map(|message| {
            let badge = message
                .is_ai()
                .then(|| message.prompt_type.as_ref().and_then(scaffolding_step_label))
                .flatten()
                .map(str::to_string);
            message_bubble(message, badge)
        })
        .collect();

    ChatPanelVm {
        title: chat_title(kind),
        robot: robot_vm(robot_emotion(messages, loading)),
        bubbles,
        loading,
        step_complete,
        completion_label: completion_label(kind),
    }
}
