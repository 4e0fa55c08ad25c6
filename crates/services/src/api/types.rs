//! Wire payloads exchanged with the tutoring backend.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use tutor_core::model::{
    ChatMessage, ChatRole, Emotion, GameAnswerResult, MessageId, OptionId, PolyaStep, PromptType,
    QuestionId, SessionId, User, UserExerciseId,
};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub access_token: String,
    pub user: User,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitAnswerRequest {
    pub user_exercise_id: UserExerciseId,
    pub question_id: QuestionId,
    pub selected_option_ids: Vec<OptionId>,
    pub time_spent: u32,
}

/// Graded exercise summary; only the tutor commentary is interpreted.
#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
#[serde(transparent)]
pub struct ExerciseResult(pub Value);

impl ExerciseResult {
    #[must_use]
    pub fn ai_feedback(&self) -> Option<&str> {
        self.0.get("aiFeedback").and_then(Value::as_str)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRef {
    pub id: SessionId,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartSessionResponse {
    pub session: SessionRef,
    #[serde(default)]
    pub exercise: Value,
    pub welcome_message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatRequest<'a> {
    pub message: &'a str,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatTurnResponse {
    pub ai_response: String,
    #[serde(default)]
    pub prompt_type: Option<PromptType>,
    #[serde(default)]
    pub emotion: Option<String>,
    #[serde(default)]
    pub evaluation: Option<String>,
}

impl ChatTurnResponse {
    /// `Some(true)` only when the server marked the step `complete`; any other
    /// evaluation is left to the keyword check.
    #[must_use]
    pub fn step_complete(&self) -> Option<bool> {
        self.evaluation
            .as_deref()
            .filter(|value| value.trim().eq_ignore_ascii_case("complete"))
            .map(|_| true)
    }

    #[must_use]
    pub fn into_message(self) -> ChatMessage {
        let step_complete = self.step_complete();
        let emotion = self.emotion.as_deref().and_then(Emotion::parse);
        ChatMessage::ai(self.ai_response)
            .with_prompt_type(self.prompt_type)
            .with_emotion(emotion)
            .with_step_complete(step_complete)
    }
}

/// A transcript entry as stored by the server.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryMessage {
    #[serde(default)]
    pub id: Option<MessageId>,
    pub role: ChatRole,
    pub content: String,
    #[serde(default)]
    pub prompt_type: Option<PromptType>,
    #[serde(default)]
    pub emotion: Option<String>,
    #[serde(default, alias = "polyaStep")]
    pub step: Option<PolyaStep>,
    #[serde(default)]
    pub passed: Option<bool>,
}

impl From<HistoryMessage> for ChatMessage {
    fn from(history: HistoryMessage) -> Self {
        let emotion = history.emotion.as_deref().and_then(Emotion::parse);
        let base = match history.role {
            ChatRole::User => ChatMessage::user(history.content),
            ChatRole::Ai => ChatMessage::ai(history.content),
        };
        let mut message = base
            .with_prompt_type(history.prompt_type)
            .with_emotion(emotion)
            .with_step(history.step, history.passed);
        if let Some(id) = history.id {
            message.id = id;
        }
        message
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameFeedbackRequest<'a> {
    pub game_results: &'a [GameAnswerResult],
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PolyaExercise {
    pub id: SessionId,
    #[serde(default)]
    pub problem: String,
    #[serde(default)]
    pub current_polya_step: PolyaStep,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PolyaStartResponse {
    pub practice_exercise: PolyaExercise,
    pub welcome_message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PolyaTurnResponse {
    pub ai_response: String,
    pub current_step: PolyaStep,
    #[serde(default)]
    pub passed: Option<bool>,
    #[serde(default)]
    pub exercise_completed: Option<bool>,
}

impl PolyaTurnResponse {
    #[must_use]
    pub fn is_exercise_completed(&self) -> bool {
        self.exercise_completed == Some(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tutor_core::completion::{CompletionSource, detect_step_completion};
    use tutor_core::model::Transcript;

    #[test]
    fn evaluation_complete_becomes_step_signal() {
        let turn: ChatTurnResponse = serde_json::from_value(json!({
            "aiResponse": "Đúng rồi!",
            "promptType": "SCAFFOLDING_2",
            "emotion": "celebrating",
            "evaluation": "complete"
        }))
        .unwrap();
        let message = turn.into_message();
        assert_eq!(message.step_complete, Some(true));
        assert_eq!(message.prompt_type, Some(PromptType::Scaffolding2));
        assert_eq!(message.emotion, Some(Emotion::Celebrating));
    }

    #[test]
    fn missing_evaluation_leaves_signal_absent() {
        let turn: ChatTurnResponse =
            serde_json::from_value(json!({ "aiResponse": "Thử lại nhé", "emotion": "puzzled" }))
                .unwrap();
        let message = turn.into_message();
        assert_eq!(message.step_complete, None);
        assert_eq!(message.emotion, None);
    }

    #[test]
    fn other_evaluations_defer_to_keywords() {
        let turn: ChatTurnResponse = serde_json::from_value(json!({
            "aiResponse": "Đúng rồi! 🎉 Nhấn tiếp tục nhé.",
            "evaluation": "correct"
        }))
        .unwrap();
        assert_eq!(turn.step_complete(), None);

        let mut transcript = Transcript::new();
        transcript.push(ChatMessage::user("15"));
        transcript.push(turn.into_message());
        let verdict = detect_step_completion(&transcript).unwrap();
        assert!(verdict.complete);
        assert_eq!(verdict.source, CompletionSource::KeywordFallback);
    }

    #[test]
    fn history_keeps_server_ids_and_roles() {
        let history: Vec<HistoryMessage> = serde_json::from_value(json!([
            { "id": "m1", "role": "AI", "content": "Chào bạn", "promptType": "SCAFFOLDING_1" },
            { "id": "m2", "role": "user", "content": "15" }
        ]))
        .unwrap();
        let messages: Vec<ChatMessage> = history.into_iter().map(ChatMessage::from).collect();
        assert_eq!(messages[0].id, MessageId::new("m1"));
        assert!(messages[0].is_ai());
        assert_eq!(messages[1].role, ChatRole::User);
    }

    #[test]
    fn exercise_result_exposes_feedback() {
        let result: ExerciseResult =
            serde_json::from_value(json!({ "score": 20, "aiFeedback": "Tốt lắm" })).unwrap();
        assert_eq!(result.ai_feedback(), Some("Tốt lắm"));
        assert_eq!(ExerciseResult::default().ai_feedback(), None);
    }
}
