use serde::{Deserialize, Serialize};

use crate::model::quiz::ExerciseType;

/// Outcome of one answered warm-up question, sent to the tutor for commentary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameAnswerResult {
    pub exercise_index: usize,
    pub exercise_type: ExerciseType,
    pub question_index: usize,
    pub question_content: String,
    pub selected_option: String,
    pub correct_option: String,
    pub is_correct: bool,
    pub time_spent: u32,
    pub earned_points: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionFeedback {
    pub question_index: usize,
    pub exercise_index: usize,
    pub feedback: String,
}

/// Post-quiz commentary, either from the tutor or synthesized locally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameFeedback {
    pub total_feedback: String,
    #[serde(default)]
    pub question_feedbacks: Vec<QuestionFeedback>,
}

impl GameFeedback {
    /// Generic feedback used when the tutor cannot be reached.
    #[must_use]
    pub fn fallback(total_score: i64, results: &[GameAnswerResult]) -> Self {
        let question_feedbacks = results
            .iter()
            .map(|result| QuestionFeedback {
                question_index: result.question_index,
                exercise_index: result.exercise_index,
                feedback: if result.is_correct {
                    "Chính xác! Bạn làm rất tốt câu này.".to_string()
                } else {
                    format!(
                        "Câu này bạn còn nhầm lẫn. {}",
                        result
                            .error_description
                            .as_deref()
                            .unwrap_or("Hãy xem lại cách làm nhé!")
                    )
                },
            })
            .collect();

        Self {
            total_feedback: format!(
                "Bạn đã hoàn thành trò chơi với {total_score} điểm! Tiếp tục luyện tập để cải thiện nhé!"
            ),
            question_feedbacks,
        }
    }

    #[must_use]
    pub fn for_question(
        &self,
        exercise_index: usize,
        question_index: usize,
    ) -> Option<&QuestionFeedback> {
        self.question_feedbacks.iter().find(|item| {
            item.exercise_index == exercise_index && item.question_index == question_index
        })
    }
}
