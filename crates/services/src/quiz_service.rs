use std::sync::Arc;

use chrono::{DateTime, Utc};

use tutor_core::Clock;
use tutor_core::model::{
    Advance, OptionId, QuestionId, QuizProgress, SubmitAnswerResponse, UserExerciseId,
};

use crate::api::{ExerciseResult, ProgressApi, SubmitAnswerRequest};
use crate::error::{ApiError, QuizError};

/// Drives one warm-up run against the grading API.
///
/// Submissions are split into [`WarmupQuiz::begin_submission`] and
/// [`WarmupQuiz::finish_submission`] so a view can keep rendering while the
/// request is out; [`WarmupQuiz::submit`] does both.
pub struct WarmupQuiz {
    api: Arc<dyn ProgressApi>,
    clock: Clock,
    progress: QuizProgress,
    question_started_at: DateTime<Utc>,
    submitting: bool,
}

impl WarmupQuiz {
    /// Fetch the warm-up exercises and start the clock.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::Api` if the exercises cannot be fetched, or
    /// `QuizError::Progress` if the server handed out nothing to play.
    pub async fn start(api: Arc<dyn ProgressApi>, clock: Clock) -> Result<Self, QuizError> {
        let exercises = api.start_warmup().await?;
        let progress = QuizProgress::new(exercises)?;
        tracing::info!(exercises = progress.exercises().len(), "warm-up started");
        Ok(Self::from_progress(api, clock, progress))
    }

    #[must_use]
    pub fn from_progress(api: Arc<dyn ProgressApi>, clock: Clock, progress: QuizProgress) -> Self {
        Self {
            api,
            clock,
            question_started_at: clock.now(),
            progress,
            submitting: false,
        }
    }

    #[must_use]
    pub fn progress(&self) -> &QuizProgress {
        &self.progress
    }

    #[must_use]
    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// Seconds spent on the question under the cursor.
    #[must_use]
    pub fn elapsed_on_current(&self) -> u32 {
        self.clock.elapsed_secs(self.question_started_at)
    }

    pub fn tick(&mut self, secs: u32) {
        self.progress.tick(secs);
    }

    pub fn select_option(
        &mut self,
        question_id: &QuestionId,
        option_id: &OptionId,
        allow_multiple: bool,
    ) {
        self.progress
            .select_option(question_id, option_id, allow_multiple);
    }

    /// Select on the current question, honouring its single/multiple type.
    ///
    /// # Errors
    ///
    /// Returns `QuizProgressError::Finished` once every exercise is done.
    pub fn select_current(&mut self, option_id: &OptionId) -> Result<(), QuizError> {
        let question = self
            .progress
            .current_question()
            .ok_or(tutor_core::model::QuizProgressError::Finished)?;
        let question_id = question.id.clone();
        let allow_multiple = question.kind.allows_multiple();
        self.progress
            .select_option(&question_id, option_id, allow_multiple);
        Ok(())
    }

    /// Validate a submission locally and raise the loading flag.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::Busy` while another submission is out, or a
    /// `QuizProgressError` for an empty selection or a question that is not current.
    pub fn begin_submission(
        &mut self,
        question_id: &QuestionId,
        elapsed_secs: u32,
    ) -> Result<SubmitAnswerRequest, QuizError> {
        if self.submitting {
            return Err(QuizError::Busy);
        }
        let pending = self.progress.prepare_submission(question_id)?;
        self.submitting = true;
        Ok(SubmitAnswerRequest {
            user_exercise_id: pending.user_exercise_id,
            question_id: pending.question_id,
            selected_option_ids: pending.selected_option_ids,
            time_spent: elapsed_secs,
        })
    }

    /// Apply the grading outcome for a submission started with `begin_submission`.
    ///
    /// On failure nothing is scored and the learner can retry. When an exercise
    /// finishes the server is told so; that notification is best effort.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::Api` with the grading error, or `QuizError::Progress`
    /// if the cursor has already moved past `request.question_id`.
    pub async fn finish_submission(
        &mut self,
        request: SubmitAnswerRequest,
        outcome: Result<SubmitAnswerResponse, ApiError>,
    ) -> Result<Advance, QuizError> {
        self.submitting = false;
        let response = outcome.inspect_err(|err| {
            tracing::warn!(question = %request.question_id, error = %err, "answer submission failed");
        })?;
        let advance =
            self.progress
                .apply_result(&request.question_id, response, request.time_spent)?;

        if let Some(completed) = advance.completed_exercise() {
            self.notify_completed(completed).await;
        }
        self.question_started_at = self.clock.now();
        Ok(advance)
    }

    /// Submit the selection for `question_id` and advance on success.
    ///
    /// # Errors
    ///
    /// See [`WarmupQuiz::begin_submission`] and [`WarmupQuiz::finish_submission`].
    pub async fn submit(
        &mut self,
        question_id: &QuestionId,
        elapsed_secs: u32,
    ) -> Result<Advance, QuizError> {
        let request = self.begin_submission(question_id, elapsed_secs)?;
        let outcome = self.request_grade(&request).await;
        self.finish_submission(request, outcome).await
    }

    /// Send a submission for grading without applying the outcome.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if grading fails.
    pub async fn request_grade(
        &self,
        request: &SubmitAnswerRequest,
    ) -> Result<SubmitAnswerResponse, ApiError> {
        self.api.submit_answer(request).await
    }

    /// Submit the current question using the tracker's own stopwatch.
    ///
    /// # Errors
    ///
    /// See [`WarmupQuiz::submit`].
    pub async fn submit_current(&mut self) -> Result<Advance, QuizError> {
        let question_id = self
            .progress
            .current_question()
            .map(|question| question.id.clone())
            .ok_or(tutor_core::model::QuizProgressError::Finished)?;
        let elapsed = self.elapsed_on_current();
        self.submit(&question_id, elapsed).await
    }

    /// # Errors
    ///
    /// Returns `QuizError::Api` if the result cannot be fetched.
    pub async fn result(&self, id: &UserExerciseId) -> Result<ExerciseResult, QuizError> {
        Ok(self.api.exercise_result(id).await?)
    }

    async fn notify_completed(&self, id: &UserExerciseId) {
        match self.api.complete_exercise(id).await {
            Ok(()) => tracing::info!(exercise = %id, "exercise completed"),
            Err(err) => {
                tracing::warn!(exercise = %id, error = %err, "could not mark exercise complete");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use tutor_core::model::{
        AnswerOption, Exercise, ExerciseId, ExerciseType, Question, QuestionType,
        QuizProgressError, UserExercise,
    };
    use tutor_core::time::fixed_clock;

    #[derive(Default)]
    struct ScriptedProgress {
        submits: Mutex<Vec<SubmitAnswerRequest>>,
        points: i64,
    }

    #[async_trait]
    impl ProgressApi for ScriptedProgress {
        async fn start_warmup(&self) -> Result<Vec<UserExercise>, ApiError> {
            Ok(Vec::new())
        }

        async fn submit_answer(
            &self,
            request: &SubmitAnswerRequest,
        ) -> Result<SubmitAnswerResponse, ApiError> {
            self.submits.lock().unwrap().push(request.clone());
            Ok(SubmitAnswerResponse {
                is_correct: true,
                earned_points: self.points,
            })
        }

        async fn complete_exercise(&self, _id: &UserExerciseId) -> Result<(), ApiError> {
            Ok(())
        }

        async fn exercise_result(&self, _id: &UserExerciseId) -> Result<ExerciseResult, ApiError> {
            Ok(ExerciseResult::default())
        }
    }

    fn one_question(kind: QuestionType) -> QuizProgress {
        let option = |id: &str| AnswerOption {
            id: OptionId::new(id),
            content: id.to_string(),
            is_correct: id == "a",
            error_type: None,
            error_description: None,
        };
        QuizProgress::new(vec![UserExercise {
            id: UserExerciseId::new("ue-1"),
            exercise_id: ExerciseId::new("ex-1"),
            exercise: Exercise {
                id: ExerciseId::new("ex-1"),
                kind: ExerciseType::Basic,
                scenario: String::new(),
                time_limit: 0,
                bonus_time: 0,
                questions: vec![Question {
                    id: QuestionId::new("q1"),
                    order_index: 0,
                    content: "1 + 1".into(),
                    kind,
                    correct_points: 10,
                    wrong_points: 0,
                    bonus_points: 0,
                    options: vec![option("a"), option("b")],
                }],
            },
            phase: 1,
            score: 0,
            status: String::new(),
        }])
        .unwrap()
    }

    #[tokio::test]
    async fn empty_selection_never_reaches_the_network() {
        let api = Arc::new(ScriptedProgress::default());
        let mut quiz = WarmupQuiz::from_progress(api.clone(), fixed_clock(), one_question(QuestionType::Single));

        let err = quiz.submit(&QuestionId::new("q1"), 3).await.unwrap_err();
        assert!(matches!(
            err,
            QuizError::Progress(QuizProgressError::EmptySelection(_))
        ));
        assert!(api.submits.lock().unwrap().is_empty());
        assert_eq!(quiz.progress().total_score(), 0);
        assert!(!quiz.is_submitting());
    }

    #[tokio::test]
    async fn select_current_respects_question_type() {
        let api = Arc::new(ScriptedProgress::default());
        let mut quiz = WarmupQuiz::from_progress(api, fixed_clock(), one_question(QuestionType::Multiple));
        quiz.select_current(&OptionId::new("a")).unwrap();
        quiz.select_current(&OptionId::new("b")).unwrap();
        assert_eq!(quiz.progress().selection(&QuestionId::new("q1")).len(), 2);
    }

    #[tokio::test]
    async fn second_begin_is_refused_while_in_flight() {
        let api = Arc::new(ScriptedProgress::default());
        let mut quiz = WarmupQuiz::from_progress(api, fixed_clock(), one_question(QuestionType::Single));
        let q1 = QuestionId::new("q1");
        quiz.select_current(&OptionId::new("a")).unwrap();

        let request = quiz.begin_submission(&q1, 2).unwrap();
        assert!(quiz.is_submitting());
        assert!(matches!(quiz.begin_submission(&q1, 2), Err(QuizError::Busy)));

        let failed = quiz
            .finish_submission(
                request,
                Err(ApiError::Status {
                    status: 503,
                    message: None,
                }),
            )
            .await;
        assert!(matches!(failed, Err(QuizError::Api(_))));
        assert!(!quiz.is_submitting());
        assert_eq!(quiz.progress().total_score(), 0);
        assert_eq!(quiz.progress().question_index(), 0);
    }

    #[tokio::test]
    async fn submission_carries_selection_and_time() {
        let api = Arc::new(ScriptedProgress {
            points: 10,
            ..ScriptedProgress::default()
        });
        let mut quiz = WarmupQuiz::from_progress(api.clone(), fixed_clock(), one_question(QuestionType::Single));
        quiz.select_current(&OptionId::new("a")).unwrap();

        let advance = quiz.submit(&QuestionId::new("q1"), 12).await.unwrap();
        assert!(matches!(advance, Advance::AllComplete { .. }));

        let sent = api.submits.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].selected_option_ids, vec![OptionId::new("a")]);
        assert_eq!(sent[0].time_spent, 12);
        assert_eq!(quiz.progress().total_score(), 10);
    }
}
