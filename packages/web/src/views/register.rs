//! Patient registration page view.

use api::validation::{validate_email, validate_password, validate_required};
use api::RegisterRequest;
use dioxus::prelude::*;
use ui::{use_anonymous_api, use_session};

use super::login::use_redirect_when_logged_in;
use crate::Route;

/// Register page component.
#[component]
pub fn Register() -> Element {
    let session = use_session();
    let api = use_anonymous_api();
    let mut name = use_signal(String::new);
    let mut email = use_signal(String::new);
    let mut phone = use_signal(String::new);
    let mut password = use_signal(String::new);
    let mut confirm_password = use_signal(String::new);
    let mut error = use_signal(|| Option::<String>::None);
    let mut loading = use_signal(|| false);

    use_redirect_when_logged_in();

    let handle_register = move |evt: FormEvent| {
        evt.prevent_default();
        let api = api.clone();
        let mut session = session.clone();
        spawn(async move {
            error.set(None);

            let n = name().trim().to_string();
            let e = email().trim().to_string();
            let ph = phone().trim().to_string();
            let p = password();
            let cp = confirm_password();

            let checks = validate_required(&n, "Name is required")
                .and_then(|_| validate_email(&e))
                .and_then(|_| validate_password(&p));
            if let Err(msg) = checks {
                error.set(Some(msg.to_string()));
                return;
            }
            if p != cp {
                error.set(Some("Passwords do not match".to_string()));
                return;
            }

            let client = match api {
                Ok(client) => client,
                Err(err) => {
                    error.set(Some(err.to_string()));
                    return;
                }
            };

            let request = RegisterRequest {
                name: n,
                email: e,
                password: p,
                phone: (!ph.is_empty()).then_some(ph),
            };

            loading.set(true);
            let result = client.register(&request).await;
            loading.set(false);

            match result {
                Ok(response) => {
                    if let Err(err) = session.login(response) {
                        tracing::error!(error = %err, "could not keep session after registration");
                        error.set(Some(
                            "Account created, but this browser could not save your session. \
                             Please sign in."
                                .to_string(),
                        ));
                    }
                }
                Err(err) => error.set(Some(err.to_string())),
            }
        });
    };

    rsx! {
        div {
            class: "auth-page",

            h1 { "Create Account" }
            p { class: "auth-page__subtitle", "Start tracking your pregnancy" }

            form {
                onsubmit: handle_register,
                class: "auth-form",

                if let Some(err) = error() {
                    div { class: "form-error", "{err}" }
                }

                input {
                    r#type: "text",
                    placeholder: "Full name",
                    value: name(),
                    oninput: move |evt: FormEvent| name.set(evt.value()),
                }
                input {
                    r#type: "email",
                    placeholder: "Email",
                    value: email(),
                    oninput: move |evt: FormEvent| email.set(evt.value()),
                }
                input {
                    r#type: "tel",
                    placeholder: "Phone (optional)",
                    value: phone(),
                    oninput: move |evt: FormEvent| phone.set(evt.value()),
                }
                input {
                    r#type: "password",
                    placeholder: "Password (min 8 characters)",
                    value: password(),
                    oninput: move |evt: FormEvent| password.set(evt.value()),
                }
                input {
                    r#type: "password",
                    placeholder: "Confirm password",
                    value: confirm_password(),
                    oninput: move |evt: FormEvent| confirm_password.set(evt.value()),
                }

                button {
                    class: "btn btn-primary",
                    r#type: "submit",
                    disabled: loading(),
                    if loading() { "Creating account..." } else { "Sign up" }
                }
            }

            p {
                class: "auth-page__footer",
                "Already have an account? "
                Link { to: Route::Login {}, "Sign in" }
                " · Are you a doctor? "
                Link { to: Route::RegisterDoctor {}, "Register here" }
            }
        }
    }
}
