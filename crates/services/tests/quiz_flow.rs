mod common;

use std::sync::Arc;

use common::{FakeApi, single_question_exercise, unavailable};
use services::{AppServices, Clock, PhaseControllerError, QuizError};
use storage::{Storage, StorageKey};
use tutor_core::model::{
    Advance, GameFeedback, OptionId, QuestionId, SessionPhase, SubmitAnswerResponse,
};
use tutor_core::time::fixed_now;

fn graded(points: i64) -> Result<SubmitAnswerResponse, services::ApiError> {
    Ok(SubmitAnswerResponse {
        is_correct: points > 0,
        earned_points: points,
    })
}

fn warmup_api() -> Arc<FakeApi> {
    let api = Arc::new(FakeApi::default());
    *api.warmup.lock().unwrap() = vec![
        single_question_exercise("1"),
        single_question_exercise("2"),
        single_question_exercise("3"),
    ];
    api.grades
        .lock()
        .unwrap()
        .extend([graded(10), graded(10), graded(0)]);
    api
}

#[tokio::test]
async fn three_exercise_warmup_lands_on_result_once() {
    let api = warmup_api();
    let storage = Storage::in_memory();
    let services = AppServices::with_api(storage.clone(), api.clone(), Clock::fixed(fixed_now()));

    let mut phase = services.phase_controller().await;
    assert_eq!(phase.current(), SessionPhase::Game);

    let mut quiz = services.start_warmup().await.unwrap();
    let picks = ["1-a", "2-a", "3-b"];
    let mut transitions = 0;
    for (index, pick) in picks.iter().enumerate() {
        let question = QuestionId::new(format!("q-{}", index + 1));
        quiz.select_option(&question, &OptionId::new(*pick), false);
        let advance = quiz.submit(&question, 4).await.unwrap();
        if matches!(advance, Advance::AllComplete { .. }) {
            phase.complete_warmup().await.unwrap();
            transitions += 1;
        }
    }

    assert_eq!(transitions, 1);
    assert_eq!(phase.current(), SessionPhase::GameResult);
    assert_eq!(quiz.progress().total_score(), 20);
    assert_eq!(quiz.progress().exercise_scores(), &[10, 10, 0]);
    assert!(quiz.progress().is_finished());
    assert_eq!(api.count("complete-exercise"), 3);

    let again = phase.complete_warmup().await;
    assert!(matches!(again, Err(PhaseControllerError::Transition(_))));
    assert_eq!(
        storage.get_string(StorageKey::LearnGamePhase).await.unwrap().as_deref(),
        Some("\"game-result\"")
    );
}

#[tokio::test]
async fn failed_submission_leaves_totals_untouched_and_can_be_retried() {
    let api = Arc::new(FakeApi::default());
    *api.warmup.lock().unwrap() = vec![single_question_exercise("1")];
    api.grades
        .lock()
        .unwrap()
        .extend([Err(unavailable()), graded(10)]);
    let services = AppServices::with_api(Storage::in_memory(), api.clone(), Clock::default());

    let mut quiz = services.start_warmup().await.unwrap();
    let question = QuestionId::new("q-1");
    quiz.select_option(&question, &OptionId::new("1-a"), false);

    let first = quiz.submit(&question, 3).await;
    assert!(matches!(first, Err(QuizError::Api(_))));
    assert_eq!(quiz.progress().total_score(), 0);
    assert_eq!(quiz.progress().exercise_scores(), &[0]);
    assert!(!quiz.is_submitting());

    quiz.submit(&question, 5).await.unwrap();
    assert_eq!(quiz.progress().total_score(), 10);
    assert_eq!(api.count("submit"), 2);
}

#[tokio::test]
async fn exercise_completion_notice_is_best_effort() {
    let api = warmup_api();
    *api.fail_complete_exercise.lock().unwrap() = true;
    let services = AppServices::with_api(Storage::in_memory(), api.clone(), Clock::default());

    let mut quiz = services.start_warmup().await.unwrap();
    let question = QuestionId::new("q-1");
    quiz.select_option(&question, &OptionId::new("1-a"), false);
    let advance = quiz.submit(&question, 2).await.unwrap();

    assert!(matches!(advance, Advance::ExerciseComplete { .. }));
    assert_eq!(quiz.progress().total_score(), 10);
    assert_eq!(quiz.progress().exercise_index(), 1);
}

#[tokio::test]
async fn replaying_an_answered_question_is_rejected() {
    let api = warmup_api();
    let services = AppServices::with_api(Storage::in_memory(), api.clone(), Clock::default());
    let mut quiz = services.start_warmup().await.unwrap();
    let question = QuestionId::new("q-1");
    quiz.select_option(&question, &OptionId::new("1-a"), false);
    quiz.submit(&question, 2).await.unwrap();

    let replay = quiz.submit(&question, 2).await;
    assert!(matches!(replay, Err(QuizError::Progress(_))));
    assert_eq!(quiz.progress().total_score(), 10);
    assert_eq!(api.count("submit"), 1);
}

#[tokio::test]
async fn empty_warmup_is_an_error() {
    let api = Arc::new(FakeApi::default());
    let services = AppServices::with_api(Storage::in_memory(), api, Clock::default());
    assert!(matches!(
        services.start_warmup().await,
        Err(QuizError::Progress(_))
    ));
}

#[tokio::test]
async fn feedback_falls_back_when_tutor_is_unreachable() {
    let api = warmup_api();
    let services = AppServices::with_api(Storage::in_memory(), api.clone(), Clock::default());
    let mut quiz = services.start_warmup().await.unwrap();
    for (index, pick) in ["1-a", "2-a", "3-b"].iter().enumerate() {
        let question = QuestionId::new(format!("q-{}", index + 1));
        quiz.select_option(&question, &OptionId::new(*pick), false);
        quiz.submit(&question, 1).await.unwrap();
    }

    let feedback = services
        .feedback()
        .game_feedback(quiz.progress().total_score(), quiz.progress().results())
        .await;
    assert_eq!(
        feedback,
        GameFeedback::fallback(20, quiz.progress().results())
    );
    assert!(feedback.total_feedback.contains("20"));
    let wrong = feedback.for_question(2, 0).unwrap();
    assert!(wrong.feedback.contains("Nhân sai"));
    assert_eq!(api.count("game-feedback 3"), 1);
}
