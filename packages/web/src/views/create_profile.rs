//! Pregnancy profile creation.
//!
//! Patients without a profile land here from the access guard. The page is
//! deliberately outside the guarded layout so it cannot redirect to itself.

use api::validation::validate_required;
use api::NewPregnancyProfile;
use dioxus::prelude::*;
use ui::{use_api, use_session};

use crate::Route;

#[component]
pub fn CreateProfile() -> Element {
    let session = use_session();
    let api = use_api();
    let nav = use_navigator();
    let mut last_period_date = use_signal(String::new);
    let mut age = use_signal(String::new);
    let mut blood_type = use_signal(String::new);
    let mut medical_history = use_signal(String::new);
    let mut error = use_signal(|| Option::<String>::None);
    let mut saving = use_signal(|| false);

    if session.is_loading() {
        return rsx! {
            div { class: "guard-placeholder", "Loading..." }
        };
    }
    let Some(user) = session.current_user() else {
        return rsx! {
            div {
                class: "notice",
                p { "Sign in to set up your pregnancy profile." }
                Link { to: Route::Login {}, "Sign in" }
            }
        };
    };
    if !user.role.is_patient() {
        return rsx! {
            div {
                class: "notice",
                p { "Pregnancy profiles are only for patient accounts." }
            }
        };
    }

    let handle_submit = move |evt: FormEvent| {
        evt.prevent_default();
        let api = api.clone();
        spawn(async move {
            error.set(None);

            let date = last_period_date().trim().to_string();
            if let Err(msg) = validate_required(&date, "Last period date is required") {
                error.set(Some(msg.to_string()));
                return;
            }
            let age = match age().trim() {
                "" => None,
                raw => match raw.parse::<u32>() {
                    Ok(n) => Some(n),
                    Err(_) => {
                        error.set(Some("Age must be a whole number".to_string()));
                        return;
                    }
                },
            };
            let optional = |s: String| {
                let s = s.trim().to_string();
                (!s.is_empty()).then_some(s)
            };

            let client = match api {
                Ok(client) => client,
                Err(err) => {
                    error.set(Some(err.to_string()));
                    return;
                }
            };

            let profile = NewPregnancyProfile {
                last_period_date: date,
                age,
                blood_type: optional(blood_type()),
                medical_history: optional(medical_history()),
            };

            saving.set(true);
            let result = client.create_pregnancy_profile(&profile).await;
            saving.set(false);

            match result {
                Ok(_) => {
                    nav.replace(Route::UserDashboard {});
                }
                Err(err) => {
                    tracing::warn!(error = %err, "creating pregnancy profile failed");
                    error.set(Some(err.to_string()));
                }
            }
        });
    };

    rsx! {
        div {
            class: "auth-page",

            h1 { "Your pregnancy profile" }
            p { class: "auth-page__subtitle", "A few details so we can follow your journey" }

            form {
                onsubmit: handle_submit,
                class: "auth-form",

                if let Some(err) = error() {
                    div { class: "form-error", "{err}" }
                }

                label { "First day of last period" }
                input {
                    r#type: "date",
                    value: last_period_date(),
                    oninput: move |evt: FormEvent| last_period_date.set(evt.value()),
                }
                input {
                    r#type: "number",
                    min: "0",
                    placeholder: "Age",
                    value: age(),
                    oninput: move |evt: FormEvent| age.set(evt.value()),
                }
                input {
                    r#type: "text",
                    placeholder: "Blood type",
                    value: blood_type(),
                    oninput: move |evt: FormEvent| blood_type.set(evt.value()),
                }
                textarea {
                    placeholder: "Medical history",
                    value: medical_history(),
                    oninput: move |evt: FormEvent| medical_history.set(evt.value()),
                }

                button {
                    class: "btn btn-primary",
                    r#type: "submit",
                    disabled: saving(),
                    if saving() { "Saving..." } else { "Save profile" }
                }
            }
        }
    }
}
