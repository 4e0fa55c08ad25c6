use dioxus::prelude::*;
use tutor_core::model::PracticeKind;

#[component]
pub(super) fn CompletedPanel(
    total_score: Option<i64>,
    on_restart: EventHandler<()>,
    on_menu: EventHandler<()>,
) -> Element {
    rsx! {
        div { class: "completed-panel",
            h3 { "🎉 Chúc mừng! Bạn đã hoàn thành bài học." }
            ul { class: "completed-list",
                match total_score {
                    Some(score) => rsx! {
                        li { "✅ Hoàn thành phần Khởi động với {score} điểm" }
                    },
                    None => rsx! {
                        li { "✅ Hoàn thành phần Khởi động" }
                    },
                }
                for kind in PracticeKind::ALL {
                    li { key: "{kind}", "✅ Hoàn thành {kind.title()}" }
                }
            }
            div { class: "completed-actions",
                button {
                    class: "btn btn-secondary",
                    r#type: "button",
                    onclick: move |_| on_restart.call(()),
                    "Học lại từ đầu"
                }
                button {
                    class: "btn btn-primary",
                    r#type: "button",
                    onclick: move |_| on_menu.call(()),
                    "Chọn chủ đề khác"
                }
            }
        }
    }
}
