use dioxus::prelude::*;

use super::GameOutcome;
use crate::context::AppContext;
use crate::vm::map_result;

fn row_class(is_correct: bool) -> &'static str {
    if is_correct {
        "result-row result-row--correct"
    } else {
        "result-row result-row--wrong"
    }
}

#[component]
pub(super) fn ResultPanel(outcome: Option<GameOutcome>, on_continue: EventHandler<()>) -> Element {
    let ctx = use_context::<AppContext>();
    let feedback_service = ctx.feedback();
    let outcome = outcome.unwrap_or(GameOutcome {
        total_score: 0,
        results: Vec::new(),
    });

    let feedback = {
        let outcome = outcome.clone();
        use_resource(move || {
            let feedback_service = feedback_service.clone();
            let outcome = outcome.clone();
            async move {
                feedback_service
                    .game_feedback(outcome.total_score, &outcome.results)
                    .await
            }
        })
    };

    let loaded = feedback.value().read().clone();
    let vm = map_result(outcome.total_score, &outcome.results, loaded.as_ref());

    rsx! {
        div { class: "result-panel",
            div { class: "result-stats",
                div { class: "result-stat",
                    strong { "{vm.score_label}" }
                    span { "Điểm" }
                }
                div { class: "result-stat",
                    strong { "{vm.accuracy_label}" }
                    span { "Độ chính xác" }
                }
                div { class: "result-stat",
                    strong { "{vm.correct_label}" }
                    span { "Câu đúng" }
                }
            }
            match vm.summary.as_ref() {
                Some(summary) => rsx! {
                    p { class: "result-summary", "🤖 {summary}" }
                },
                None => rsx! {
                    p { class: "result-summary", "Đang nhận xét bài làm..." }
                },
            }
            if vm.rows.is_empty() {
                p { "Kết quả khởi động không còn lưu trên máy này." }
            }
            ul { class: "result-list",
                for row in vm.rows.iter() {
                    li { class: row_class(row.is_correct),
                        div { class: "result-row-head",
                            strong { "{row.title}" }
                            span { "{row.points_label}" }
                        }
                        p { strong { "Câu hỏi: " } "{row.question}" }
                        p { "Bạn chọn: {row.selected}" }
                        if !row.is_correct {
                            p { "Đáp án đúng: {row.correct}" }
                        }
                        if let Some(text) = row.feedback.as_ref() {
                            p { class: "result-feedback", "{text}" }
                        }
                    }
                }
            }
            button {
                class: "btn btn-primary",
                r#type: "button",
                onclick: move |_| on_continue.call(()),
                "Bắt đầu luyện tập →"
            }
        }
    }
}
