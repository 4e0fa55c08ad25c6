use std::time::Duration;

use dioxus::prelude::*;
use services::WarmupQuiz;
use tutor_core::model::OptionId;

use super::GameOutcome;
use crate::context::AppContext;
use crate::views::{ViewError, ViewState, view_state_from_resource};
use crate::vm::{QuizVm, map_quiz};

fn outcome_of(quiz: &WarmupQuiz) -> GameOutcome {
    GameOutcome {
        total_score: quiz.progress().total_score(),
        results: quiz.progress().results().to_vec(),
    }
}

fn option_class(selected: bool) -> &'static str {
    if selected {
        "quiz-option quiz-option--selected"
    } else {
        "quiz-option"
    }
}

fn timer_class(urgent: bool) -> &'static str {
    if urgent {
        "quiz-timer quiz-timer--urgent"
    } else {
        "quiz-timer"
    }
}

#[component]
pub(super) fn QuizPanel(on_finished: EventHandler<GameOutcome>) -> Element {
    let ctx = use_context::<AppContext>();
    let services = ctx.services();
    let quiz = use_signal(|| None::<WarmupQuiz>);
    let snapshot = use_signal(|| None::<QuizVm>);
    let error = use_signal(|| None::<ViewError>);
    // Seconds that elapsed while the tracker was out for grading.
    let missed_ticks = use_signal(|| 0_u32);
    let finished = use_signal(|| false);

    let finish = use_callback(move |result: GameOutcome| {
        let mut finished = finished;
        if finished() {
            return;
        }
        finished.set(true);
        on_finished.call(result);
    });

    let resource = use_resource(move || {
        let services = services.clone();
        let mut quiz = quiz;
        let mut snapshot = snapshot;
        async move {
            let started = services
                .start_warmup()
                .await
                .map_err(|err| ViewError::from(&err))?;
            snapshot.set(map_quiz(started.progress(), false));
            quiz.set(Some(started));
            Ok::<_, ViewError>(())
        }
    });

    use_future(move || {
        let mut quiz = quiz;
        let mut snapshot = snapshot;
        let mut missed_ticks = missed_ticks;
        async move {
            loop {
                tokio::time::sleep(Duration::from_secs(1)).await;
                if quiz.peek().is_none() {
                    if snapshot.peek().as_ref().is_some_and(|vm| vm.submitting) {
                        missed_ticks += 1;
                    }
                    continue;
                }
                let mut guard = quiz.write();
                let Some(current) = guard.as_mut() else {
                    continue;
                };
                current.tick(1);
                snapshot.set(map_quiz(current.progress(), current.is_submitting()));
                if current.progress().is_time_up() {
                    tracing::info!("warm-up time is up");
                    let result = outcome_of(current);
                    drop(guard);
                    finish.call(result);
                    break;
                }
            }
        }
    });

    let select = move |option_id: OptionId| {
        let mut quiz = quiz;
        let mut snapshot = snapshot;
        let mut guard = quiz.write();
        if let Some(current) = guard.as_mut() {
            if current.select_current(&option_id).is_ok() {
                snapshot.set(map_quiz(current.progress(), current.is_submitting()));
            }
        }
    };

    let submit = use_callback(move |()| {
        let mut quiz = quiz;
        let mut snapshot = snapshot;
        let mut error = error;
        let mut missed_ticks = missed_ticks;
        spawn(async move {
            let Some(mut current) = quiz.write().take() else {
                return;
            };
            let Some(question_id) = current
                .progress()
                .current_question()
                .map(|question| question.id.clone())
            else {
                quiz.set(Some(current));
                return;
            };
            let elapsed = current.elapsed_on_current();
            let request = match current.begin_submission(&question_id, elapsed) {
                Ok(request) => request,
                Err(err) => {
                    error.set(Some(ViewError::from(&err)));
                    quiz.set(Some(current));
                    return;
                }
            };
            snapshot.set(map_quiz(current.progress(), true));

            let graded = current.request_grade(&request).await;
            let result = current.finish_submission(request, graded).await;

            current.tick(missed_ticks());
            missed_ticks.set(0);
            snapshot.set(map_quiz(current.progress(), false));
            let done = current.progress().is_finished() || current.progress().is_time_up();
            let summary = outcome_of(&current);
            quiz.set(Some(current));

            match result {
                Ok(_) => error.set(None),
                Err(err) => error.set(Some(ViewError::from(&err))),
            }
            if done {
                finish.call(summary);
            }
        });
    });

    let state = view_state_from_resource(resource);

    rsx! {
        div { class: "quiz-panel",
            match state {
                ViewState::Idle | ViewState::Loading => rsx! {
                    p { "Đang chuẩn bị câu hỏi..." }
                },
                ViewState::Error(err) => rsx! {
                    p { "{err.message()}" }
                    button {
                        class: "btn btn-secondary",
                        r#type: "button",
                        onclick: move |_| {
                            let mut resource = resource;
                            resource.restart();
                        },
                        "Thử lại"
                    }
                },
                ViewState::Ready(()) => match snapshot() {
                    None => rsx! {
                        p { "Đang tổng kết..." }
                    },
                    Some(vm) => rsx! {
                        div { class: "quiz-status",
                            span { class: timer_class(vm.timer_urgent),
                                "⏱ {vm.timer_label}"
                            }
                            span { "{vm.exercise_label}" }
                            span { "{vm.progress_label}" }
                            span { class: "quiz-score", "{vm.score_label}" }
                        }
                        if !vm.scenario.is_empty() {
                            p { class: "quiz-scenario", "{vm.scenario}" }
                        }
                        h3 { class: "quiz-question", "{vm.question}" }
                        if vm.allows_multiple {
                            p { class: "quiz-hint", "Có thể chọn nhiều đáp án." }
                        }
                        div { class: "quiz-options",
                            for option in vm.options.clone() {
                                button {
                                    key: "{option.id}",
                                    class: option_class(option.selected),
                                    r#type: "button",
                                    disabled: vm.submitting,
                                    onclick: {
                                        let option_id = option.id.clone();
                                        move |_| select(option_id.clone())
                                    },
                                    span { class: "quiz-option-letter", "{option.letter}" }
                                    span { "{option.content}" }
                                }
                            }
                        }
                        if let Some(err) = error() {
                            p { class: "form-error", "{err.message()}" }
                        }
                        button {
                            class: "btn btn-primary",
                            r#type: "button",
                            disabled: !vm.can_submit,
                            onclick: move |_| submit.call(()),
                            if vm.submitting { "Đang chấm..." } else { "Trả lời" }
                        }
                    },
                },
            }
        }
    }
}
