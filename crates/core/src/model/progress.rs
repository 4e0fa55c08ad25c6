use std::collections::{BTreeSet, HashMap};

use thiserror::Error;

use crate::model::feedback::GameAnswerResult;
use crate::model::ids::{OptionId, QuestionId, UserExerciseId};
use crate::model::quiz::{Question, SubmitAnswerResponse, UserExercise};

/// Total time budget for the whole warm-up, in seconds.
pub const WARMUP_TIME_LIMIT_SECS: u32 = 420;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuizProgressError {
    #[error("no exercises to play")]
    Empty,

    #[error("all exercises are already complete")]
    Finished,

    #[error("no option selected for question {0}")]
    EmptySelection(QuestionId),

    #[error("question {got} is not the current question ({expected})")]
    NotCurrent {
        expected: QuestionId,
        got: QuestionId,
    },
}

/// A validated submission, ready to be sent for grading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingSubmission {
    pub user_exercise_id: UserExerciseId,
    pub question_id: QuestionId,
    pub selected_option_ids: Vec<OptionId>,
}

/// Where the cursor moved after a graded answer was applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Advance {
    NextQuestion,
    ExerciseComplete {
        completed: UserExerciseId,
    },
    AllComplete {
        completed: UserExerciseId,
    },
}

impl Advance {
    /// The exercise that just finished, if any.
    #[must_use]
    pub fn completed_exercise(&self) -> Option<&UserExerciseId> {
        match self {
            Advance::NextQuestion => None,
            Advance::ExerciseComplete { completed } | Advance::AllComplete { completed } => {
                Some(completed)
            }
        }
    }
}

/// Client-side mirror of warm-up progress.
///
/// Scores only change through [`QuizProgress::apply_result`], and only for the
/// question under the cursor, so a result can never be counted twice.
#[derive(Debug, Clone, PartialEq)]
pub struct QuizProgress {
    exercises: Vec<UserExercise>,
    exercise_index: usize,
    question_index: usize,
    answers: HashMap<QuestionId, BTreeSet<OptionId>>,
    total_score: i64,
    exercise_scores: Vec<i64>,
    results: Vec<GameAnswerResult>,
    time_remaining_secs: u32,
    finished: bool,
}

impl QuizProgress {
    /// Start tracking the given exercises.
    ///
    /// # Errors
    ///
    /// Returns `QuizProgressError::Empty` if there is nothing to play.
    pub fn new(exercises: Vec<UserExercise>) -> Result<Self, QuizProgressError> {
        if exercises.is_empty() || exercises.iter().all(|ex| ex.question_count() == 0) {
            return Err(QuizProgressError::Empty);
        }
        let exercise_scores = vec![0; exercises.len()];
        let mut progress = Self {
            exercises,
            exercise_index: 0,
            question_index: 0,
            answers: HashMap::new(),
            total_score: 0,
            exercise_scores,
            results: Vec::new(),
            time_remaining_secs: WARMUP_TIME_LIMIT_SECS,
            finished: false,
        };
        progress.skip_empty_exercises();
        Ok(progress)
    }

    #[must_use]
    pub fn exercises(&self) -> &[UserExercise] {
        &self.exercises
    }

    #[must_use]
    pub fn exercise_index(&self) -> usize {
        self.exercise_index
    }

    #[must_use]
    pub fn question_index(&self) -> usize {
        self.question_index
    }

    #[must_use]
    pub fn total_score(&self) -> i64 {
        self.total_score
    }

    #[must_use]
    pub fn exercise_scores(&self) -> &[i64] {
        &self.exercise_scores
    }

    #[must_use]
    pub fn results(&self) -> &[GameAnswerResult] {
        &self.results
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    #[must_use]
    pub fn time_remaining_secs(&self) -> u32 {
        self.time_remaining_secs
    }

    /// Count the warm-up clock down, saturating at zero.
    pub fn tick(&mut self, secs: u32) {
        self.time_remaining_secs = self.time_remaining_secs.saturating_sub(secs);
    }

    #[must_use]
    pub fn is_time_up(&self) -> bool {
        self.time_remaining_secs == 0
    }

    #[must_use]
    pub fn current_exercise(&self) -> Option<&UserExercise> {
        if self.finished {
            return None;
        }
        self.exercises.get(self.exercise_index)
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        self.current_exercise()
            .and_then(|ex| ex.exercise.questions.get(self.question_index))
    }

    #[must_use]
    pub fn is_last_question(&self) -> bool {
        self.current_exercise()
            .is_some_and(|ex| self.question_index + 1 >= ex.question_count())
    }

    #[must_use]
    pub fn is_last_exercise(&self) -> bool {
        self.exercise_index + 1 >= self.exercises.len()
    }

    /// Options currently selected for a question, in id order.
    #[must_use]
    pub fn selection(&self, question_id: &QuestionId) -> Vec<OptionId> {
        self.answers
            .get(question_id)
            .map(|set| set.iter().cloned().collect())
            .unwrap_or_default()
    }

    #[must_use]
    pub fn is_selected(&self, question_id: &QuestionId, option_id: &OptionId) -> bool {
        self.answers
            .get(question_id)
            .is_some_and(|set| set.contains(option_id))
    }

    /// Replace (single choice) or toggle (multiple choice) an option.
    pub fn select_option(
        &mut self,
        question_id: &QuestionId,
        option_id: &OptionId,
        allow_multiple: bool,
    ) {
        let entry = self.answers.entry(question_id.clone()).or_default();
        if allow_multiple {
            if !entry.remove(option_id) {
                entry.insert(option_id.clone());
            }
        } else {
            entry.clear();
            entry.insert(option_id.clone());
        }
    }

    /// Validate that `question_id` can be submitted right now.
    ///
    /// # Errors
    ///
    /// Returns `Finished`, `NotCurrent`, or `EmptySelection`.
    pub fn prepare_submission(
        &self,
        question_id: &QuestionId,
    ) -> Result<PendingSubmission, QuizProgressError> {
        let (exercise, question) = self.current_pair()?;
        if &question.id != question_id {
            return Err(QuizProgressError::NotCurrent {
                expected: question.id.clone(),
                got: question_id.clone(),
            });
        }
        let selected_option_ids = self.selection(question_id);
        if selected_option_ids.is_empty() {
            return Err(QuizProgressError::EmptySelection(question_id.clone()));
        }
        Ok(PendingSubmission {
            user_exercise_id: exercise.id.clone(),
            question_id: question_id.clone(),
            selected_option_ids,
        })
    }

    /// Apply a graded answer for the current question and advance the cursor.
    ///
    /// # Errors
    ///
    /// Returns `Finished` or `NotCurrent` when the result does not belong to the
    /// question under the cursor; nothing is mutated in that case.
    pub fn apply_result(
        &mut self,
        question_id: &QuestionId,
        response: SubmitAnswerResponse,
        time_spent_secs: u32,
    ) -> Result<Advance, QuizProgressError> {
        let result = {
            let (exercise, question) = self.current_pair()?;
            if &question.id != question_id {
                return Err(QuizProgressError::NotCurrent {
                    expected: question.id.clone(),
                    got: question_id.clone(),
                });
            }
            self.answer_result(exercise, question, response, time_spent_secs)
        };

        self.total_score += response.earned_points;
        if let Some(slot) = self.exercise_scores.get_mut(self.exercise_index) {
            *slot += response.earned_points;
        }
        self.results.push(result);

        Ok(self.advance())
    }

    fn current_pair(&self) -> Result<(&UserExercise, &Question), QuizProgressError> {
        let exercise = self.current_exercise().ok_or(QuizProgressError::Finished)?;
        let question = exercise
            .exercise
            .questions
            .get(self.question_index)
            .ok_or(QuizProgressError::Finished)?;
        Ok((exercise, question))
    }

    fn answer_result(
        &self,
        exercise: &UserExercise,
        question: &Question,
        response: SubmitAnswerResponse,
        time_spent: u32,
    ) -> GameAnswerResult {
        let selected = self.answers.get(&question.id);
        let chosen: Vec<_> = question
            .options
            .iter()
            .filter(|option| selected.is_some_and(|set| set.contains(&option.id)))
            .collect();
        let wrong_choice = chosen.iter().find(|option| !option.is_correct);

        GameAnswerResult {
            exercise_index: self.exercise_index,
            exercise_type: exercise.exercise.kind,
            question_index: self.question_index,
            question_content: question.content.clone(),
            selected_option: join_contents(chosen.iter().copied()),
            correct_option: join_contents(question.correct_options()),
            is_correct: response.is_correct,
            time_spent,
            earned_points: response.earned_points,
            error_type: wrong_choice.and_then(|option| option.error_type.clone()),
            error_description: wrong_choice.and_then(|option| option.error_description.clone()),
        }
    }

    fn advance(&mut self) -> Advance {
        if !self.is_last_question() {
            self.question_index += 1;
            return Advance::NextQuestion;
        }

        let completed = self.exercises[self.exercise_index].id.clone();
        if self.is_last_exercise() {
            self.finished = true;
            return Advance::AllComplete { completed };
        }

        self.exercise_index += 1;
        self.question_index = 0;
        self.skip_empty_exercises();
        if self.finished {
            Advance::AllComplete { completed }
        } else {
            Advance::ExerciseComplete { completed }
        }
    }

    fn skip_empty_exercises(&mut self) {
        while self
            .exercises
            .get(self.exercise_index)
            .is_some_and(|ex| ex.question_count() == 0)
        {
            if self.is_last_exercise() {
                self.finished = true;
                return;
            }
            self.exercise_index += 1;
        }
    }
}

fn join_contents<'a>(options: impl IntoIterator<Item = &'a crate::model::quiz::AnswerOption>) -> String {
    options
        .into_iter()
        .map(|option| option.content.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ids::ExerciseId;
    use crate::model::quiz::{AnswerOption, Exercise, ExerciseType, QuestionType};

    fn option(id: &str, correct: bool) -> AnswerOption {
        AnswerOption {
            id: OptionId::new(id),
            content: format!("opt {id}"),
            is_correct: correct,
            error_type: (!correct).then(|| "CALC".to_string()),
            error_description: (!correct).then(|| format!("sai ở {id}")),
        }
    }

    fn question(id: &str, kind: QuestionType) -> Question {
        Question {
            id: QuestionId::new(id),
            order_index: 0,
            content: format!("question {id}"),
            kind,
            correct_points: 10,
            wrong_points: 0,
            bonus_points: 0,
            options: vec![option(&format!("{id}-a"), true), option(&format!("{id}-b"), false)],
        }
    }

    fn exercise(id: &str, questions: Vec<Question>) -> UserExercise {
        UserExercise {
            id: UserExerciseId::new(format!("ue-{id}")),
            exercise_id: ExerciseId::new(format!("ex-{id}")),
            exercise: Exercise {
                id: ExerciseId::new(format!("ex-{id}")),
                kind: ExerciseType::Basic,
                scenario: String::new(),
                time_limit: 60,
                bonus_time: 0,
                questions,
            },
            phase: 1,
            score: 0,
            status: "IN_PROGRESS".into(),
        }
    }

    fn graded(points: i64) -> SubmitAnswerResponse {
        SubmitAnswerResponse {
            is_correct: points > 0,
            earned_points: points,
        }
    }

    #[test]
    fn empty_exercise_list_is_rejected() {
        assert_eq!(QuizProgress::new(Vec::new()).unwrap_err(), QuizProgressError::Empty);
    }

    #[test]
    fn single_choice_keeps_only_latest_option() {
        let mut progress =
            QuizProgress::new(vec![exercise("1", vec![question("q1", QuestionType::Single)])])
                .unwrap();
        let q = QuestionId::new("q1");
        for id in ["a", "b", "b", "c", "a"] {
            progress.select_option(&q, &OptionId::new(id), false);
            assert_eq!(progress.selection(&q), vec![OptionId::new(id)]);
        }
    }

    #[test]
    fn multiple_choice_toggles_membership() {
        let mut progress =
            QuizProgress::new(vec![exercise("1", vec![question("q1", QuestionType::Multiple)])])
                .unwrap();
        let q = QuestionId::new("q1");
        let a = OptionId::new("a");
        let b = OptionId::new("b");

        progress.select_option(&q, &a, true);
        progress.select_option(&q, &b, true);
        assert_eq!(progress.selection(&q), vec![a.clone(), b.clone()]);

        progress.select_option(&q, &a, true);
        assert_eq!(progress.selection(&q), vec![b.clone()]);

        progress.select_option(&q, &b, true);
        assert!(progress.selection(&q).is_empty());
    }

    #[test]
    fn empty_selection_cannot_be_submitted() {
        let progress =
            QuizProgress::new(vec![exercise("1", vec![question("q1", QuestionType::Single)])])
                .unwrap();
        let err = progress.prepare_submission(&QuestionId::new("q1")).unwrap_err();
        assert_eq!(err, QuizProgressError::EmptySelection(QuestionId::new("q1")));
    }

    #[test]
    fn scores_accumulate_per_exercise_and_cursor_advances() {
        let mut progress = QuizProgress::new(vec![
            exercise("1", vec![question("q1", QuestionType::Single), question("q2", QuestionType::Single)]),
            exercise("2", vec![question("q3", QuestionType::Single)]),
        ])
        .unwrap();

        let q1 = QuestionId::new("q1");
        progress.select_option(&q1, &OptionId::new("q1-a"), false);
        assert_eq!(progress.apply_result(&q1, graded(10), 5).unwrap(), Advance::NextQuestion);

        let q2 = QuestionId::new("q2");
        progress.select_option(&q2, &OptionId::new("q2-b"), false);
        assert_eq!(
            progress.apply_result(&q2, graded(0), 7).unwrap(),
            Advance::ExerciseComplete {
                completed: UserExerciseId::new("ue-1")
            }
        );
        assert_eq!(progress.exercise_index(), 1);
        assert_eq!(progress.question_index(), 0);

        let q3 = QuestionId::new("q3");
        progress.select_option(&q3, &OptionId::new("q3-a"), false);
        assert!(matches!(
            progress.apply_result(&q3, graded(15), 3).unwrap(),
            Advance::AllComplete { .. }
        ));

        assert!(progress.is_finished());
        assert_eq!(progress.total_score(), 25);
        assert_eq!(progress.exercise_scores(), &[10, 15]);
        assert_eq!(progress.results().len(), 3);
        let wrong = &progress.results()[1];
        assert_eq!(wrong.selected_option, "opt q2-b");
        assert_eq!(wrong.correct_option, "opt q2-a");
        assert_eq!(wrong.error_description.as_deref(), Some("sai ở q2-b"));
    }

    #[test]
    fn stale_result_is_not_applied_twice() {
        let mut progress = QuizProgress::new(vec![exercise(
            "1",
            vec![question("q1", QuestionType::Single), question("q2", QuestionType::Single)],
        )])
        .unwrap();
        let q1 = QuestionId::new("q1");
        progress.select_option(&q1, &OptionId::new("q1-a"), false);
        progress.apply_result(&q1, graded(10), 1).unwrap();

        let err = progress.apply_result(&q1, graded(10), 1).unwrap_err();
        assert!(matches!(err, QuizProgressError::NotCurrent { .. }));
        assert_eq!(progress.total_score(), 10);
    }

    #[test]
    fn exercises_without_questions_are_skipped() {
        let mut progress = QuizProgress::new(vec![
            exercise("1", Vec::new()),
            exercise("2", vec![question("q1", QuestionType::Single)]),
        ])
        .unwrap();
        assert_eq!(progress.exercise_index(), 1);
        let q1 = QuestionId::new("q1");
        progress.select_option(&q1, &OptionId::new("q1-a"), false);
        assert!(matches!(
            progress.apply_result(&q1, graded(10), 1).unwrap(),
            Advance::AllComplete { .. }
        ));
        assert_eq!(progress.exercise_scores(), &[0, 10]);
    }

    #[test]
    fn timer_saturates_at_zero() {
        let mut progress =
            QuizProgress::new(vec![exercise("1", vec![question("q1", QuestionType::Single)])])
                .unwrap();
        progress.tick(400);
        assert_eq!(progress.time_remaining_secs(), 20);
        progress.tick(400);
        assert_eq!(progress.time_remaining_secs(), 0);
    }
}
