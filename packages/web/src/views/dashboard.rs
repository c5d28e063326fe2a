//! Role dashboards. Each sits behind the access guard, so the session is
//! known to hold the right role by the time these render.

use dioxus::prelude::*;
use ui::{use_api, use_session};

use crate::Route;

fn use_display_name() -> String {
    use_session()
        .current_user()
        .map(|u| u.display_name().to_string())
        .unwrap_or_default()
}

#[component]
pub fn AdminDashboard() -> Element {
    let name = use_display_name();

    rsx! {
        section {
            class: "dashboard",
            h1 { "Admin dashboard" }
            p { "Signed in as {name}." }
            ul {
                class: "dashboard__links",
                li { Link { to: Route::Community {}, "Moderate the community" } }
                li { Link { to: Route::Shop {}, "Browse the shop" } }
            }
        }
    }
}

#[component]
pub fn DoctorDashboard() -> Element {
    let name = use_display_name();

    rsx! {
        section {
            class: "dashboard",
            h1 { "Welcome, Dr. {name}" }
            ul {
                class: "dashboard__links",
                li { Link { to: Route::Community {}, "Answer community questions" } }
            }
        }
    }
}

/// Patient dashboard with the current pregnancy week.
#[component]
pub fn UserDashboard() -> Element {
    let name = use_display_name();
    let api = use_api();

    let profile = use_resource(move || {
        let api = api.clone();
        async move {
            let result = match api {
                Ok(client) => client.pregnancy_profile().await,
                Err(e) => Err(e),
            };
            if let Err(err) = &result {
                tracing::warn!(error = %err, "loading pregnancy profile failed");
            }
            result
        }
    });

    let week = match &*profile.read() {
        None => rsx! { p { class: "muted", "Loading your profile..." } },
        Some(Ok(Some(p))) => {
            let week = p
                .current_week
                .map(|w| format!("Week {w}"))
                .unwrap_or_else(|| "Week not set".to_string());
            let due = p.due_date.clone().unwrap_or_default();
            rsx! {
                div {
                    class: "dashboard__card",
                    h2 { "{week}" }
                    if !due.is_empty() {
                        p { "Due date: {due}" }
                    }
                }
            }
        }
        Some(Ok(None)) => rsx! {
            p {
                "No pregnancy profile yet. "
                Link { to: Route::CreateProfile {}, "Create one" }
            }
        },
        Some(Err(_)) => rsx! {
            p { class: "form-error", "Could not load your profile right now." }
        },
    };

    rsx! {
        section {
            class: "dashboard",
            h1 { "Hello, {name}" }
            {week}
            ul {
                class: "dashboard__links",
                li { Link { to: Route::Consultation {}, "Book a consultation" } }
                li { Link { to: Route::Community {}, "Community" } }
                li { Link { to: Route::Shop {}, "Shop essentials" } }
            }
        }
    }
}
