use dioxus::prelude::*;
use dioxus_router::{Link, Outlet, Routable, use_navigator};

use crate::context::AppContext;
use crate::views::{
    LearnView, LoginView, MenuView, RegisterView, ViewError, ViewState, view_state_from_resource,
};

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
pub enum Route {
    #[route("/login", LoginView)] Login {},
    #[route("/register", RegisterView)] Register {},
    #[layout(Layout)]
        #[route("/", MenuView)] Menu {},
        #[route("/learn", LearnView)] Learn {},
}

/// Signed-in shell; sends anonymous visitors to the login page.
#[component]
fn Layout() -> Element {
    let ctx = use_context::<AppContext>();
    let navigator = use_navigator();
    let auth = ctx.auth();
    let resource = use_resource(move || {
        let auth = auth.clone();
        async move {
            auth.load_user()
                .await
                .map(|user| user.map(|user| user.name))
                .map_err(|_| ViewError::Unknown)
        }
    });

    use_effect(move || {
        if matches!(resource.value().read().as_ref(), Some(Ok(None))) {
            let _ = navigator.replace(Route::Login {});
        }
    });

    match view_state_from_resource(resource) {
        ViewState::Ready(Some(name)) => rsx! {
            div { class: "app",
                Sidebar { user_name: name }
                main { class: "content",
                    Outlet::<Route> {}
                }
            }
        },
        ViewState::Error(err) => rsx! {
            div { class: "page",
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
            }
        },
        _ => rsx! {
            div { class: "page", p { "Đang tải..." } }
        },
    }
}

#[component]
fn Sidebar(user_name: String) -> Element {
    let ctx = use_context::<AppContext>();
    let navigator = use_navigator();
    let on_logout = move |_| {
        let auth = ctx.auth();
        spawn(async move {
            if let Err(err) = auth.logout().await {
                tracing::warn!(error = %err, "sign-out failed");
            }
            let _ = navigator.replace(Route::Login {});
        });
    };

    rsx! {
        nav { class: "sidebar",
            h1 { "Tutor" }
            p { class: "sidebar-user", "👤 {user_name}" }
            ul {
                li { Link { to: Route::Menu {}, "Chủ đề" } }
                li { Link { to: Route::Learn {}, "Bài học" } }
            }
            button {
                class: "btn btn-ghost sidebar-logout",
                r#type: "button",
                onclick: on_logout,
                "Đăng xuất"
            }
        }
    }
}
