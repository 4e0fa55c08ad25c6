use dioxus::prelude::*;
use dioxus_router::{Link, use_navigator};

use crate::context::AppContext;
use crate::routes::Route;

#[component]
pub fn LoginView() -> Element {
    let ctx = use_context::<AppContext>();
    let navigator = use_navigator();
    let mut email = use_signal(String::new);
    let mut password = use_signal(String::new);
    let mut error = use_signal(|| None::<String>);
    let mut submitting = use_signal(|| false);

    let on_submit = move |evt: FormEvent| {
        evt.prevent_default();
        if submitting() {
            return;
        }
        let auth = ctx.auth();
        let (email, password) = (email(), password());
        submitting.set(true);
        spawn(async move {
            let result = auth.login(&email, &password).await;
            submitting.set(false);
            match result {
                Ok(_) => {
                    error.set(None);
                    let _ = navigator.replace(Route::Menu {});
                }
                Err(err) => error.set(Some(err.user_message())),
            }
        });
    };

    rsx! {
        div { class: "page auth-page",
            form { class: "auth-card", onsubmit: on_submit,
                h2 { class: "view-title", "Đăng nhập" }
                p { class: "view-subtitle", "Chào mừng bạn quay lại!" }
                label { class: "field",
                    span { "Email" }
                    input {
                        r#type: "email",
                        value: "{email}",
                        placeholder: "email@example.com",
                        oninput: move |evt| email.set(evt.value()),
                    }
                }
                label { class: "field",
                    span { "Mật khẩu" }
                    input {
                        r#type: "password",
                        value: "{password}",
                        oninput: move |evt| password.set(evt.value()),
                    }
                }
                if let Some(message) = error() {
                    p { class: "form-error", "{message}" }
                }
                button {
                    class: "btn btn-primary",
                    r#type: "submit",
                    disabled: submitting(),
                    if submitting() { "Đang đăng nhập..." } else { "Đăng nhập" }
                }
                p { class: "auth-switch",
                    "Chưa có tài khoản? "
                    Link { to: Route::Register {}, "Đăng ký" }
                }
            }
        }
    }
}
