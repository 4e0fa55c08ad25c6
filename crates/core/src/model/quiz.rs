use serde::{Deserialize, Serialize};

use crate::model::ids::{ExerciseId, OptionId, QuestionId, UserExerciseId};

/// Difficulty band of an exercise within the warm-up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExerciseType {
    Basic,
    Application,
    ProblemSolving,
}

impl ExerciseType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            ExerciseType::Basic => "BASIC",
            ExerciseType::Application => "APPLICATION",
            ExerciseType::ProblemSolving => "PROBLEM_SOLVING",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QuestionType {
    Single,
    Multiple,
    Text,
}

impl QuestionType {
    /// Whether several options may be selected at once.
    #[must_use]
    pub const fn allows_multiple(self) -> bool {
        matches!(self, QuestionType::Multiple)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerOption {
    pub id: OptionId,
    pub content: String,
    #[serde(default)]
    pub is_correct: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: QuestionId,
    #[serde(default)]
    pub order_index: u32,
    pub content: String,
    #[serde(rename = "type")]
    pub kind: QuestionType,
    #[serde(default)]
    pub correct_points: i64,
    #[serde(default)]
    pub wrong_points: i64,
    #[serde(default)]
    pub bonus_points: i64,
    #[serde(default)]
    pub options: Vec<AnswerOption>,
}

impl Question {
    #[must_use]
    pub fn option(&self, id: &OptionId) -> Option<&AnswerOption> {
        self.options.iter().find(|option| &option.id == id)
    }

    #[must_use]
    pub fn correct_options(&self) -> Vec<&AnswerOption> {
        self.options.iter().filter(|option| option.is_correct).collect()
    }
}

/// A scenario plus an ordered list of graded questions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Exercise {
    pub id: ExerciseId,
    #[serde(rename = "type")]
    pub kind: ExerciseType,
    #[serde(default)]
    pub scenario: String,
    #[serde(default)]
    pub time_limit: u32,
    #[serde(default)]
    pub bonus_time: u32,
    #[serde(default)]
    pub questions: Vec<Question>,
}

/// A learner's attempt at an exercise, as handed out by the warm-up.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserExercise {
    pub id: UserExerciseId,
    pub exercise_id: ExerciseId,
    pub exercise: Exercise,
    #[serde(default)]
    pub phase: u32,
    #[serde(default)]
    pub score: i64,
    #[serde(default)]
    pub status: String,
}

impl UserExercise {
    #[must_use]
    pub fn question_count(&self) -> usize {
        self.exercise.questions.len()
    }
}

/// Grading outcome returned for a single submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitAnswerResponse {
    pub is_correct: bool,
    pub earned_points: i64,
}
