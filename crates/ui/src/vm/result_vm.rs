use tutor_core::model::{GameAnswerResult, GameFeedback};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResultRowVm {
    pub title: String,
    pub question: String,
    pub selected: String,
    pub correct: String,
    pub is_correct: bool,
    pub points_label: String,
    pub feedback: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResultVm {
    pub score_label: String,
    pub accuracy_label: String,
    pub correct_label: String,
    pub summary: Option<String>,
    pub rows: Vec<ResultRowVm>,
}

/// Share of correct answers as a rounded percentage; zero for an empty run.
#[must_use]
pub fn accuracy_percent(results: &[GameAnswerResult]) -> u32 {
    if results.is_empty() {
        return 0;
    }
    let correct = results.iter().filter(|result| result.is_correct).count();
    let rounded = (correct * 200 + results.len()) / (results.len() * 2);
    u32::try_from(rounded).unwrap_or(100)
}

#[must_use]
pub fn map_result(
    total_score: i64,
    results: &[GameAnswerResult],
    feedback: Option<&GameFeedback>,
) -> ResultVm {
    let correct = results.iter().filter(|result| result.is_correct).count();
    let rows = results
        .iter()
        .map(|result| ResultRowVm {
            title: format!(
                "Bài {} · Câu {}",
                result.exercise_index + 1,
                result.question_index + 1
            ),
            question: result.question_content.clone(),
            selected: result.selected_option.clone(),
            correct: result.correct_option.clone(),
            is_correct: result.is_correct,
            points_label: format!("+{}", result.earned_points),
            feedback: feedback
                .and_then(|feedback| {
                    feedback.for_question(result.exercise_index, result.question_index)
                })
                .map(|item| item.feedback.clone()),
        })
        .collect();

    ResultVm {
        score_label: format!("{total_score}"),
        accuracy_label: format!("{}%", accuracy_percent(results)),
        correct_label: format!("{correct}/{}", results.len()),
        summary: feedback.map(|feedback| feedback.total_feedback.clone()),
        rows,
    }
}
