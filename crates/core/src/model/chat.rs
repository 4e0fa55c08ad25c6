use serde::{Deserialize, Serialize};

use crate::model::ids::MessageId;
use crate::model::polya::PolyaStep;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChatRole {
    #[serde(rename = "USER", alias = "user")]
    User,
    #[serde(rename = "AI", alias = "model", alias = "ai")]
    Ai,
}

/// Teaching stage an AI turn belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PromptType {
    #[serde(rename = "SCAFFOLDING_1")]
    Scaffolding1,
    #[serde(rename = "SCAFFOLDING_2")]
    Scaffolding2,
    #[serde(rename = "SCAFFOLDING_3")]
    Scaffolding3,
    #[serde(rename = "SCAFFOLDING_4")]
    Scaffolding4,
    #[serde(rename = "FEEDBACK")]
    Feedback,
    #[serde(untagged)]
    Other(String),
}

/// Display hint for the tutor avatar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Emotion {
    Idle,
    Thinking,
    Happy,
    Encouraging,
    Celebrating,
}

impl Emotion {
    /// Lenient parse; unknown hints are dropped.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "idle" => Some(Emotion::Idle),
            "thinking" => Some(Emotion::Thinking),
            "happy" => Some(Emotion::Happy),
            "encouraging" => Some(Emotion::Encouraging),
            "celebrating" => Some(Emotion::Celebrating),
            _ => None,
        }
    }
}

/// One entry in a chat transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub id: MessageId,
    pub role: ChatRole,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt_type: Option<PromptType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emotion: Option<Emotion>,
    /// Explicit server signal that the current step is finished.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step_complete: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step: Option<PolyaStep>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub passed: Option<bool>,
}

impl ChatMessage {
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            id: MessageId::generate(),
            role: ChatRole::User,
            content: content.into(),
            prompt_type: None,
            emotion: None,
            step_complete: None,
            step: None,
            passed: None,
        }
    }

    #[must_use]
    pub fn ai(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Ai,
            ..Self::user(content)
        }
    }

    #[must_use]
    pub fn with_prompt_type(mut self, prompt_type: Option<PromptType>) -> Self {
        self.prompt_type = prompt_type;
        self
    }

    #[must_use]
    pub fn with_emotion(mut self, emotion: Option<Emotion>) -> Self {
        self.emotion = emotion;
        self
    }

    #[must_use]
    pub fn with_step_complete(mut self, complete: Option<bool>) -> Self {
        self.step_complete = complete;
        self
    }

    #[must_use]
    pub fn with_step(mut self, step: Option<PolyaStep>, passed: Option<bool>) -> Self {
        self.step = step;
        self.passed = passed;
        self
    }

    #[must_use]
    pub fn is_ai(&self) -> bool {
        self.role == ChatRole::Ai
    }
}

/// Append-only, chronologically ordered chat history.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Transcript(Vec<ChatMessage>);

impl Transcript {
    #[must_use]
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn push(&mut self, message: ChatMessage) {
        self.0.push(message);
    }

    #[must_use]
    pub fn messages(&self) -> &[ChatMessage] {
        &self.0
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn last(&self) -> Option<&ChatMessage> {
        self.0.last()
    }

    #[must_use]
    pub fn last_ai(&self) -> Option<&ChatMessage> {
        self.0.iter().rev().find(|message| message.is_ai())
    }
}

impl From<Vec<ChatMessage>> for Transcript {
    fn from(messages: Vec<ChatMessage>) -> Self {
        Self(messages)
    }
}
