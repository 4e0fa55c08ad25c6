use dioxus::prelude::*;
use dioxus_router::{Link, use_navigator};
use tutor_core::model::MIN_PASSWORD_LEN;

use crate::context::AppContext;
use crate::routes::Route;

#[component]
pub fn RegisterView() -> Element {
    let ctx = use_context::<AppContext>();
    let navigator = use_navigator();
    let mut name = use_signal(String::new);
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
        let (name, email, password) = (name(), email(), password());
        submitting.set(true);
        spawn(async move {
            let result = auth.register(&email, &password, &name).await;
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
                h2 { class: "view-title", "Đăng ký" }
                p { class: "view-subtitle", "Tạo tài khoản để bắt đầu học." }
                label { class: "field",
                    span { "Họ tên" }
                    input {
                        r#type: "text",
                        value: "{name}",
                        oninput: move |evt| name.set(evt.value()),
                    }
                }
                label { class: "field",
                    span { "Email" }
                    input {
                        r#type: "email",
                        value: "{email}",
                        oninput: move |evt| email.set(evt.value()),
                    }
                }
                label { class: "field",
                    span { "Mật khẩu" }
                    input {
                        r#type: "password",
                        value: "{password}",
                        placeholder: "Ít nhất {MIN_PASSWORD_LEN} ký tự",
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
                    if submitting() { "Đang tạo tài khoản..." } else { "Đăng ký" }
                }
                p { class: "auth-switch",
                    "Đã có tài khoản? "
                    Link { to: Route::Login {}, "Đăng nhập" }
                }
            }
        }
    }
}
