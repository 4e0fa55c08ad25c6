use dioxus::prelude::*;
use services::PolyaChat;
use tutor_core::model::PracticeKind;

use super::widgets::{ChatLog, Composer, RobotCard};
use crate::context::AppContext;
use crate::views::{ViewError, ViewState, view_state_from_resource};
use crate::vm::{PolyaPanelVm, map_polya_panel};

fn snapshot_of(chat: &PolyaChat) -> PolyaPanelVm {
    map_polya_panel(
        chat.kind(),
        chat.problem(),
        chat.current_step(),
        chat.messages(),
        chat.is_loading(),
        chat.is_exercise_completed(),
    )
}

#[component]
pub(super) fn PolyaPanel(kind: PracticeKind, on_complete: EventHandler<()>) -> Element {
    let ctx = use_context::<AppContext>();
    let services = ctx.services();
    let chat = use_signal(|| None::<PolyaChat>);
    let panel = use_signal(|| None::<PolyaPanelVm>);
    let error = use_signal(|| None::<ViewError>);
    let completing = use_signal(|| false);

    let resource = use_resource(move || {
        let services = services.clone();
        let mut chat = chat;
        let mut panel = panel;
        async move {
            let mut tracker = services.polya_chat(kind);
            tracker.start().await.map_err(|err| ViewError::from(&err))?;
            panel.set(Some(snapshot_of(&tracker)));
            chat.set(Some(tracker));
            Ok::<_, ViewError>(())
        }
    });

    let send = use_callback(move |text: String| {
        let mut chat = chat;
        let mut panel = panel;
        let mut error = error;
        spawn(async move {
            let Some(mut tracker) = chat.write().take() else {
                return;
            };
            let result = match tracker.begin_turn(&text) {
                Ok(Some(ticket)) => {
                    panel.set(Some(snapshot_of(&tracker)));
                    let reply = tracker.request_reply(&ticket).await;
                    tracker.finish_turn(ticket, reply).await.map(|_| ())
                }
                Ok(None) => Ok(()),
                Err(err) => Err(err),
            };
            panel.set(Some(snapshot_of(&tracker)));
            chat.set(Some(tracker));
            match result {
                Ok(()) => error.set(None),
                Err(err) => error.set(Some(ViewError::from(&err))),
            }
        });
    });

    let complete = use_callback(move |()| {
        let mut chat = chat;
        let mut completing = completing;
        if completing() {
            return;
        }
        completing.set(true);
        spawn(async move {
            let taken = chat.write().take();
            if let Some(mut tracker) = taken {
                if let Err(err) = tracker.complete().await {
                    tracing::warn!(%kind, error = %err, "closing the polya exercise failed");
                }
            }
            on_complete.call(());
        });
    });

    let state = view_state_from_resource(resource);

    rsx! {
        div { class: "chat-panel chat-panel--polya",
            match state {
                ViewState::Idle | ViewState::Loading => rsx! {
                    p { "Đang chuẩn bị bài toán..." }
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
                ViewState::Ready(()) => match panel() {
                    None => rsx! {},
                    Some(vm) => rsx! {
                        aside { class: "chat-side",
                            RobotCard { robot: vm.robot.clone(), loading: vm.loading }
                            h4 { "📚 4 Bước Polya" }
                            ol { class: "polya-steps",
                                for step in vm.steps.iter() {
                                    li { key: "{step.number}", class: step.state.class(),
                                        span { class: "polya-step-number", "{step.number}" }
                                        span { "{step.label}" }
                                    }
                                }
                            }
                            if let Some(problem) = vm.problem.as_ref() {
                                div { class: "polya-problem",
                                    strong { "Bài toán" }
                                    p { "{problem}" }
                                }
                            }
                        }
                        section { class: "chat-main",
                            div { class: "chat-header",
                                h3 { class: "chat-title", "{vm.title}" }
                                span { class: "polya-counter", "{vm.counter_label}" }
                            }
                            ChatLog { bubbles: vm.bubbles.clone(), loading: vm.loading }
                            if let Some(err) = error() {
                                p { class: "form-error", "{err.message()}" }
                            }
                            if vm.exercise_completed {
                                button {
                                    class: "btn btn-primary chat-complete",
                                    r#type: "button",
                                    disabled: completing(),
                                    onclick: move |_| complete.call(()),
                                    "{vm.completion_label}"
                                }
                            } else {
                                Composer {
                                    disabled: vm.loading,
                                    on_send: move |text: String| send.call(text),
                                }
                            }
                        }
                    },
                },
            }
        }
    }
}
