//! Login page view with email/password form.

use api::validation::{validate_email, validate_required};
use dioxus::prelude::*;
use ui::{use_anonymous_api, use_session};

use crate::Route;

/// Send an already logged-in visitor to their dashboard.
///
/// Also fires right after a successful login or registration, since those
/// update the shared session.
pub(crate) fn use_redirect_when_logged_in() {
    let session = use_session();
    let nav = use_navigator();
    use_effect(move || {
        if let Some(user) = session.current_user() {
            nav.replace(Route::dashboard_for(user.role));
        }
    });
}

/// Login page component.
#[component]
pub fn Login() -> Element {
    let session = use_session();
    let api = use_anonymous_api();
    let mut email = use_signal(String::new);
    let mut password = use_signal(String::new);
    let mut error = use_signal(|| Option::<String>::None);
    let mut loading = use_signal(|| false);

    use_redirect_when_logged_in();

    let handle_login = move |evt: FormEvent| {
        evt.prevent_default();
        let api = api.clone();
        let mut session = session.clone();
        spawn(async move {
            error.set(None);

            let e = email().trim().to_string();
            let p = password();

            if let Err(msg) = validate_email(&e) {
                error.set(Some(msg.to_string()));
                return;
            }
            if let Err(msg) = validate_required(&p, "Password is required") {
                error.set(Some(msg.to_string()));
                return;
            }

            let client = match api {
                Ok(client) => client,
                Err(err) => {
                    error.set(Some(err.to_string()));
                    return;
                }
            };

            loading.set(true);
            let result = client.login(&e, &p).await;
            loading.set(false);

            match result {
                Ok(response) => {
                    if let Err(err) = session.login(response) {
                        tracing::error!(error = %err, "could not keep session");
                        error.set(Some(
                            "Signed in, but this browser could not save your session. \
                             Check your storage settings."
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

            h1 { "Welcome back" }
            p { class: "auth-page__subtitle", "Sign in to continue" }

            form {
                onsubmit: handle_login,
                class: "auth-form",

                if let Some(err) = error() {
                    div { class: "form-error", "{err}" }
                }

                input {
                    r#type: "email",
                    placeholder: "Email",
                    value: email(),
                    oninput: move |evt: FormEvent| email.set(evt.value()),
                }

                input {
                    r#type: "password",
                    placeholder: "Password",
                    value: password(),
                    oninput: move |evt: FormEvent| password.set(evt.value()),
                }

                button {
                    class: "btn btn-primary",
                    r#type: "submit",
                    disabled: loading(),
                    if loading() { "Signing in..." } else { "Sign in" }
                }
            }

            p {
                class: "auth-page__footer",
                "No account yet? "
                Link { to: Route::Register {}, "Create one" }
            }
        }
    }
}
