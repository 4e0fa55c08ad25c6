//! The learning flow for the selected topic.
//!
//! [`LearnView`] owns the phase controller and swaps one panel per phase:
//! warm-up quiz, its result, the three tutor chats, and the closing summary.

mod chat;
mod completed;
mod polya;
mod quiz;
mod result;
mod widgets;

use dioxus::prelude::*;
use dioxus_router::use_navigator;
use services::PhaseController;
use services::menu_service::selected_topic;
use tutor_core::model::{GameAnswerResult, PhaseAction, PracticeKind, SessionPhase};

use crate::context::{AppContext, ChatStyle};
use crate::routes::Route;
use crate::views::{ViewError, ViewState, view_state_from_resource};

use chat::ScaffoldingPanel;
use completed::CompletedPanel;
use polya::PolyaPanel;
use quiz::QuizPanel;
use result::ResultPanel;

/// What the warm-up produced, kept for the result page.
#[derive(Clone, Debug, PartialEq)]
pub struct GameOutcome {
    pub total_score: i64,
    pub results: Vec<GameAnswerResult>,
}

#[component]
pub fn LearnView() -> Element {
    let ctx = use_context::<AppContext>();
    let navigator = use_navigator();
    let services = ctx.services();
    let chat_style = ctx.chat_style();
    let controller = use_signal(|| None::<PhaseController>);
    let mut phase = use_signal(|| None::<SessionPhase>);
    let mut outcome = use_signal(|| None::<GameOutcome>);
    let error = use_signal(|| None::<ViewError>);

    let resource = use_resource(move || {
        let services = services.clone();
        let mut controller = controller;
        async move {
            let restored = services.phase_controller().await;
            let topic = selected_topic(&services.storage())
                .await
                .map_err(|err| ViewError::from(&err))?
                .map(|(_, name)| name);
            phase.set(Some(restored.current()));
            controller.set(Some(restored));
            Ok::<_, ViewError>(topic)
        }
    });

    let advance = use_callback(move |action: PhaseAction| {
        let mut controller = controller;
        let mut error = error;
        spawn(async move {
            let Some(mut current) = controller.write().take() else {
                return;
            };
            let result = current.apply(action).await;
            let now = current.current();
            controller.set(Some(current));
            match result {
                Ok(_) => error.set(None),
                Err(err) => {
                    tracing::warn!(?action, error = %err, "phase change failed");
                    error.set(Some(ViewError::Unknown));
                }
            }
            if action == PhaseAction::Restart {
                outcome.set(None);
            }
            phase.set(Some(now));
        });
    });

    let state = view_state_from_resource(resource);
    let current_phase = phase();

    rsx! {
        div { class: "page learn-page",
            match state {
                ViewState::Idle | ViewState::Loading => rsx! {
                    p { "Đang tải..." }
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
                ViewState::Ready(topic) => rsx! {
                    header { class: "view-header",
                        h2 { class: "view-title",
                            match topic.as_ref() {
                                Some(name) => rsx! { "{name}" },
                                None => rsx! { "Bài học" },
                            }
                        }
                        if let Some(phase) = current_phase {
                            p { class: "view-subtitle", "{phase_title(phase)}" }
                        }
                    }
                    if let Some(err) = error() {
                        p { class: "form-error", "{err.message()}" }
                    }
                    match current_phase {
                        None => rsx! {
                            p { "Đang tải..." }
                        },
                        Some(SessionPhase::Game) => rsx! {
                            QuizPanel {
                                on_finished: move |finished: GameOutcome| {
                                    outcome.set(Some(finished));
                                    advance.call(PhaseAction::CompleteWarmup);
                                },
                            }
                        },
                        Some(SessionPhase::GameResult) => rsx! {
                            ResultPanel {
                                outcome: outcome(),
                                on_continue: move |()| advance.call(PhaseAction::StartPractice),
                            }
                        },
                        Some(SessionPhase::Completed) => rsx! {
                            CompletedPanel {
                                total_score: outcome().map(|finished| finished.total_score),
                                on_restart: move |()| advance.call(PhaseAction::Restart),
                                on_menu: move |()| {
                                    let _ = navigator.push(Route::Menu {});
                                },
                            }
                        },
                        Some(chat_phase) => match PracticeKind::from_phase(chat_phase) {
                            Some(kind) => chat_panel(chat_style, kind, advance),
                            None => rsx! {},
                        },
                    }
                },
            }
        }
    }
}

fn chat_panel(style: ChatStyle, kind: PracticeKind, advance: Callback<PhaseAction>) -> Element {
    let on_complete = move |()| advance.call(kind.completion_action());
    match style {
        ChatStyle::Scaffolding => rsx! {
            ScaffoldingPanel { key: "{kind}", kind, on_complete }
        },
        ChatStyle::Polya => rsx! {
            PolyaPanel { key: "{kind}", kind, on_complete }
        },
    }
}

fn phase_title(phase: SessionPhase) -> &'static str {
    match phase {
        SessionPhase::Game => "🎮 Khởi động",
        SessionPhase::GameResult => "📊 Kết quả khởi động",
        SessionPhase::PracticeBasic => PracticeKind::Basic.title(),
        SessionPhase::PracticeAdvanced => PracticeKind::Advanced.title(),
        SessionPhase::Application => PracticeKind::Application.title(),
        SessionPhase::Completed => "🏁 Hoàn thành",
    }
}
