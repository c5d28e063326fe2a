//! Doctor registration page view.
//!
//! Doctors sign up with a license document (required) and an optional
//! photo; both go to the backend as one multipart request.

use api::validation::{validate_email, validate_password, validate_required};
use api::{DoctorRegistration, FileUpload};
use dioxus::prelude::*;
use ui::{use_anonymous_api, use_session};

use super::login::use_redirect_when_logged_in;
use crate::Route;

/// Read the first file picked in an `<input type="file">`.
async fn read_picked_file(evt: &FormEvent) -> Result<Option<FileUpload>, String> {
    let Some(file) = evt.files().into_iter().next() else {
        return Ok(None);
    };
    let bytes = file
        .read_bytes()
        .await
        .map_err(|e| format!("Could not read {}: {e}", file.name()))?;
    Ok(Some(FileUpload {
        file_name: file.name(),
        mime_type: file
            .content_type()
            .unwrap_or_else(|| "application/octet-stream".to_string()),
        bytes: bytes.to_vec(),
    }))
}

/// Doctor registration page component.
#[component]
pub fn RegisterDoctor() -> Element {
    let session = use_session();
    let api = use_anonymous_api();
    let mut name = use_signal(String::new);
    let mut email = use_signal(String::new);
    let mut password = use_signal(String::new);
    let mut specialization = use_signal(String::new);
    let mut license_number = use_signal(String::new);
    let mut license_document = use_signal(|| Option::<FileUpload>::None);
    let mut photo = use_signal(|| Option::<FileUpload>::None);
    let mut error = use_signal(|| Option::<String>::None);
    let mut loading = use_signal(|| false);

    use_redirect_when_logged_in();

    let pick_license = move |evt: FormEvent| {
        spawn(async move {
            match read_picked_file(&evt).await {
                Ok(file) => license_document.set(file),
                Err(msg) => error.set(Some(msg)),
            }
        });
    };

    let pick_photo = move |evt: FormEvent| {
        spawn(async move {
            match read_picked_file(&evt).await {
                Ok(file) => photo.set(file),
                Err(msg) => error.set(Some(msg)),
            }
        });
    };

    let handle_register = move |evt: FormEvent| {
        evt.prevent_default();
        let api = api.clone();
        let mut session = session.clone();
        spawn(async move {
            error.set(None);

            let n = name().trim().to_string();
            let e = email().trim().to_string();
            let p = password();
            let s = specialization().trim().to_string();
            let l = license_number().trim().to_string();

            let checks = validate_required(&n, "Name is required")
                .and_then(|_| validate_email(&e))
                .and_then(|_| validate_password(&p))
                .and_then(|_| validate_required(&s, "Specialization is required"))
                .and_then(|_| validate_required(&l, "License number is required"));
            if let Err(msg) = checks {
                error.set(Some(msg.to_string()));
                return;
            }
            let Some(document) = license_document() else {
                error.set(Some("Please attach your license document".to_string()));
                return;
            };

            let client = match api {
                Ok(client) => client,
                Err(err) => {
                    error.set(Some(err.to_string()));
                    return;
                }
            };

            let registration = DoctorRegistration {
                name: n,
                email: e,
                password: p,
                specialization: s,
                license_number: l,
                license_document: document,
                photo: photo(),
            };

            loading.set(true);
            let result = client.register_doctor(registration).await;
            loading.set(false);

            match result {
                Ok(response) => {
                    if let Err(err) = session.login(response) {
                        tracing::error!(error = %err, "could not keep doctor session");
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

    let license_label = license_document()
        .map(|f| f.file_name)
        .unwrap_or_else(|| "No file chosen".to_string());

    rsx! {
        div {
            class: "auth-page",

            h1 { "Doctor Registration" }
            p { class: "auth-page__subtitle", "Join Materna to support expecting mothers" }

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
                    r#type: "password",
                    placeholder: "Password (min 8 characters)",
                    value: password(),
                    oninput: move |evt: FormEvent| password.set(evt.value()),
                }
                input {
                    r#type: "text",
                    placeholder: "Specialization",
                    value: specialization(),
                    oninput: move |evt: FormEvent| specialization.set(evt.value()),
                }
                input {
                    r#type: "text",
                    placeholder: "License number",
                    value: license_number(),
                    oninput: move |evt: FormEvent| license_number.set(evt.value()),
                }

                label {
                    class: "file-field",
                    span { "License document" }
                    input {
                        r#type: "file",
                        accept: ".pdf,image/*",
                        onchange: pick_license,
                    }
                    span { class: "file-field__name", "{license_label}" }
                }

                label {
                    class: "file-field",
                    span { "Photo (optional)" }
                    input {
                        r#type: "file",
                        accept: "image/*",
                        onchange: pick_photo,
                    }
                }

                button {
                    class: "btn btn-primary",
                    r#type: "submit",
                    disabled: loading(),
                    if loading() { "Submitting..." } else { "Register" }
                }
            }

            p {
                class: "auth-page__footer",
                "Already registered? "
                Link { to: Route::Login {}, "Sign in" }
            }
        }
    }
}
