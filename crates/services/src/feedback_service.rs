use std::sync::Arc;

use tutor_core::model::{GameAnswerResult, GameFeedback};

use crate::api::LearningApi;

/// Post-quiz tutor commentary.
#[derive(Clone)]
pub struct FeedbackService {
    api: Arc<dyn LearningApi>,
}

impl FeedbackService {
    #[must_use]
    pub fn new(api: Arc<dyn LearningApi>) -> Self {
        Self { api }
    }

    /// Ask the tutor for feedback, synthesizing a generic one if that fails.
    pub async fn game_feedback(&self, total_score: i64, results: &[GameAnswerResult]) -> GameFeedback {
        match self.api.game_feedback(results).await {
            Ok(feedback) if !feedback.total_feedback.trim().is_empty() => feedback,
            Ok(_) => {
                tracing::warn!("tutor returned empty feedback; using local summary");
                GameFeedback::fallback(total_score, results)
            }
            Err(err) => {
                tracing::warn!(error = %err, "feedback request failed; using local summary");
                GameFeedback::fallback(total_score, results)
            }
        }
    }
}
