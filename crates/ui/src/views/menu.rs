use dioxus::prelude::*;
use dioxus_router::use_navigator;
use services::MenuNavigator;
use services::menu_service::selected_topic;
use tutor_core::model::{Category, Topic};

use crate::context::AppContext;
use crate::routes::Route;
use crate::views::{ViewError, ViewState, view_state_from_resource};
use crate::vm::{LeaderboardRowVm, map_leaderboard, my_rank_label};

#[derive(Clone, Debug, PartialEq)]
struct LeaderboardData {
    topic_name: String,
    rows: Vec<LeaderboardRowVm>,
    my_rank: Option<String>,
}

#[derive(Clone, Debug)]
enum MenuIntent {
    Enter(Category),
    Back,
    Select(Topic),
}

fn topic_class(game_supported: bool) -> &'static str {
    if game_supported {
        "menu-card menu-card--topic"
    } else {
        "menu-card menu-card--disabled"
    }
}

#[component]
pub fn MenuView() -> Element {
    let ctx = use_context::<AppContext>();
    let navigator = use_navigator();
    let services = ctx.services();
    let menu = use_signal(|| None::<MenuNavigator>);
    let error = use_signal(|| None::<ViewError>);

    let resource = use_resource(move || {
        let services = services.clone();
        let mut menu = menu;
        async move {
            let mut navigator = services.menu();
            navigator
                .load_current()
                .await
                .map_err(|err| ViewError::from(&err))?;
            menu.set(Some(navigator));
            Ok::<_, ViewError>(())
        }
    });

    let storage = ctx.storage();
    let leaderboard = ctx.leaderboard();
    let board = use_resource(move || {
        let storage = storage.clone();
        let leaderboard = leaderboard.clone();
        async move {
            let Some((topic_id, topic_name)) = selected_topic(&storage)
                .await
                .map_err(|err| ViewError::from(&err))?
            else {
                return Ok::<_, ViewError>(None);
            };
            let entries = leaderboard
                .top(&topic_id)
                .await
                .map_err(|err| ViewError::from(&err))?;
            // The learner's own rank is optional decoration.
            let my_rank = leaderboard
                .my_rank(&topic_id)
                .await
                .ok()
                .map(|rank| my_rank_label(&rank));
            Ok(Some(LeaderboardData {
                topic_name,
                rows: map_leaderboard(&entries),
                my_rank,
            }))
        }
    });

    let dispatch = use_callback(move |intent: MenuIntent| {
        let mut menu = menu;
        let mut error = error;
        spawn(async move {
            let Some(mut current) = menu.write().take() else {
                return;
            };
            let outcome = match &intent {
                MenuIntent::Enter(category) => current.enter(category).await,
                MenuIntent::Back => {
                    current.back();
                    Ok(())
                }
                MenuIntent::Select(topic) => current.select_topic(topic).await,
            };
            menu.set(Some(current));
            match outcome {
                Ok(()) => {
                    error.set(None);
                    if matches!(intent, MenuIntent::Select(_)) {
                        let _ = navigator.push(Route::Learn {});
                    }
                }
                Err(err) => error.set(Some(ViewError::from(&err))),
            }
        });
    });

    let state = view_state_from_resource(resource);
    let board_state = view_state_from_resource(board);

    rsx! {
        div { class: "page menu-page",
            header { class: "view-header",
                h2 { class: "view-title", "Chọn chủ đề" }
                p { class: "view-subtitle", "Chọn một chủ đề để bắt đầu trò chơi khởi động." }
            }
            div { class: "view-divider" }
            if let Some(err) = error() {
                p { class: "form-error", "{err.message()}" }
            }
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
                ViewState::Ready(()) => match menu.read().as_ref() {
                    None => rsx! {
                        p { "Đang tải..." }
                    },
                    Some(current) => {
                        let level = current.current();
                        let categories = level.categories().to_vec();
                        let topics = level.topics().to_vec();
                        let breadcrumb = current.breadcrumb();
                        let is_root = current.is_root();
                        let is_empty = level.is_loaded() && categories.is_empty() && topics.is_empty();
                        rsx! {
                            nav { class: "menu-breadcrumb",
                                if !is_root {
                                    button {
                                        class: "btn btn-ghost",
                                        r#type: "button",
                                        onclick: move |_| dispatch.call(MenuIntent::Back),
                                        "← Quay lại"
                                    }
                                }
                                span { "{breadcrumb}" }
                            }
                            if is_empty {
                                p { class: "menu-empty", "Chưa có nội dung nào ở mục này." }
                            }
                            div { class: "menu-grid",
                                for category in categories {
                                    button {
                                        key: "{category.id}",
                                        class: "menu-card",
                                        r#type: "button",
                                        onclick: {
                                            let category = category.clone();
                                            move |_| dispatch.call(MenuIntent::Enter(category.clone()))
                                        },
                                        span { class: "menu-card-title", "{category.name}" }
                                    }
                                }
                                for topic in topics {
                                    button {
                                        key: "{topic.id}",
                                        class: topic_class(topic.is_game_supported),
                                        r#type: "button",
                                        disabled: !topic.is_game_supported,
                                        onclick: {
                                            let topic = topic.clone();
                                            move |_| dispatch.call(MenuIntent::Select(topic.clone()))
                                        },
                                        span { class: "menu-card-title", "{topic.name}" }
                                        if !topic.is_game_supported {
                                            span { class: "menu-card-note", "Sắp ra mắt" }
                                        }
                                    }
                                }
                            }
                        }
                    }
                },
            }
            section { class: "leaderboard",
                match board_state {
                    ViewState::Ready(Some(data)) => rsx! {
                        h3 { "🏆 Bảng xếp hạng · {data.topic_name}" }
                        button {
                            class: "btn btn-primary",
                            r#type: "button",
                            onclick: move |_| {
                                let _ = navigator.push(Route::Learn {});
                            },
                            "Tiếp tục học"
                        }
                        if let Some(label) = data.my_rank.as_ref() {
                            p { class: "leaderboard-me", "{label}" }
                        }
                        if data.rows.is_empty() {
                            p { "Chưa có ai trên bảng xếp hạng." }
                        }
                        ol { class: "leaderboard-list",
                            for row in data.rows.iter() {
                                li { class: "leaderboard-row",
                                    span { class: "leaderboard-rank", "{row.rank_label}" }
                                    span { class: "leaderboard-name", "{row.name}" }
                                    span { "{row.score_label}" }
                                    span { "{row.time_label}" }
                                    span { "{row.accuracy_label}" }
                                }
                            }
                        }
                    },
                    ViewState::Error(err) => rsx! {
                        p { class: "leaderboard-error", "{err.message()}" }
                    },
                    _ => rsx! {},
                }
            }
        }
    }
}
