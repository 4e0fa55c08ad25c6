use tutor_core::model::{OptionId, QuestionId, QuizProgress};

use super::time_fmt::format_clock;

/// Seconds left at which the countdown turns red.
const URGENT_SECS: u32 = 60;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuizOptionVm {
    pub id: OptionId,
    pub letter: char,
    pub content: String,
    pub selected: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuizVm {
    pub question_id: QuestionId,
    pub timer_label: String,
    pub timer_urgent: bool,
    pub exercise_label: String,
    pub progress_label: String,
    pub score_label: String,
    pub scenario: String,
    pub question: String,
    pub allows_multiple: bool,
    pub options: Vec<QuizOptionVm>,
    pub can_submit: bool,
    pub submitting: bool,
}

fn option_letter(index: usize) -> char {
    u8::try_from(index)
        .ok()
        .and_then(|offset| b'A'.checked_add(offset))
        .map_or('?', char::from)
}

/// Display data for the question under the cursor; `None` once the run is over.
#[must_use]
pub fn map_quiz(progress: &QuizProgress, submitting: bool) -> Option<QuizVm> {
    let exercise = progress.current_exercise()?;
    let question = progress.current_question()?;
    let options = question
        .options
        .iter()
        .enumerate()
        .map(|(index, option)| QuizOptionVm {
            id: option.id.clone(),
            letter: option_letter(index),
            content: option.content.clone(),
            selected: progress.is_selected(&question.id, &option.id),
        })
        .collect::<Vec<_>>();
    let has_selection = options.iter().any(|option| option.selected);
    let remaining = progress.time_remaining_secs();

    Some(QuizVm {
        question_id: question.id.clone(),
        timer_label: format_clock(remaining),
        timer_urgent: remaining <= URGENT_SECS,
        exercise_label: format!(
            "Bài {}/{}",
            progress.exercise_index() + 1,
            progress.exercises().len()
        ),
        progress_label: format!(
            "Câu {}/{}",
            progress.question_index() + 1,
            exercise.question_count()
        ),
        score_label: format!("{} điểm", progress.total_score()),
        scenario: exercise.exercise.scenario.clone(),
        question: question.content.clone(),
        allows_multiple: question.kind.allows_multiple(),
        options,
        can_submit: has_selection && !submitting && !progress.is_time_up(),
        submitting,
    })
}
