use dioxus::prelude::*;
use ui::use_session;

#[component]
pub fn Consultation() -> Element {
    rsx! {
        section {
            class: "dashboard",
            h1 { "Consultations" }
            p { "Talk to a doctor about your pregnancy. Booking opens here soon." }
        }
    }
}

/// Shared space for patients, doctors and admins.
#[component]
pub fn Community() -> Element {
    let role = use_session()
        .current_user()
        .map(|u| u.role.to_string())
        .unwrap_or_default();

    rsx! {
        section {
            class: "dashboard",
            h1 { "Community" }
            p { class: "muted", "Posting as {role}" }
            p { "Share experiences and questions with other members." }
        }
    }
}
