use dioxus::prelude::*;

use crate::vm::{ChatBubbleVm, RobotVm};

#[component]
pub(super) fn RobotCard(robot: RobotVm, loading: bool) -> Element {
    let status = if loading { "robot-status robot-status--busy" } else { "robot-status" };
    rsx! {
        div { class: "robot-card",
            div { class: "robot-face", "{robot.emoji}" }
            div { class: "robot-caption",
                span { class: status }
                span { "{robot.caption}" }
            }
        }
    }
}

fn row_class(is_user: bool) -> &'static str {
    if is_user { "chat-row chat-row--user" } else { "chat-row" }
}

#[component]
pub(super) fn ChatLog(bubbles: Vec<ChatBubbleVm>, loading: bool) -> Element {
    rsx! {
        div { class: "chat-log",
            for bubble in bubbles {
                div {
                    key: "{bubble.key}",
                    class: row_class(bubble.is_user),
                    if let Some(badge) = bubble.badge.as_ref() {
                        span { class: "chat-badge", "{badge}" }
                    }
                    div { class: "chat-bubble", "{bubble.content}" }
                }
            }
            if loading {
                div { class: "chat-row",
                    div { class: "chat-bubble chat-typing",
                        span {}
                        span {}
                        span {}
                    }
                }
            }
        }
    }
}

/// Message box; Enter sends, Shift+Enter inserts a newline.
#[component]
pub(super) fn Composer(disabled: bool, on_send: EventHandler<String>) -> Element {
    let mut draft = use_signal(String::new);
    let mut send = move || {
        let text = draft().trim().to_string();
        if text.is_empty() || disabled {
            return;
        }
        draft.set(String::new());
        on_send.call(text);
    };

    rsx! {
        div { class: "chat-composer",
            textarea {
                rows: 2,
                value: "{draft}",
                placeholder: "Nhập câu trả lời của bạn...",
                oninput: move |evt| draft.set(evt.value()),
                onkeydown: move |evt: KeyboardEvent| {
                    if evt.key() == Key::Enter && !evt.modifiers().contains(Modifiers::SHIFT) {
                        evt.prevent_default();
                        send();
                    }
                },
            }
            button {
                class: "btn btn-primary",
                r#type: "button",
                disabled: disabled || draft().trim().is_empty(),
                onclick: move |_| send(),
                "Gửi"
            }
        }
    }
}
