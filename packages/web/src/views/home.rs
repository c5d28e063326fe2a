use dioxus::prelude::*;
use ui::use_session;

use crate::Route;

#[component]
pub fn Home() -> Element {
    let session = use_session();
    let dashboard = session.current_user().map(|u| Route::dashboard_for(u.role));

    rsx! {
        section {
            class: "hero",
            h1 { "Care for every step of your pregnancy" }
            p {
                "Track your pregnancy week by week, talk to a doctor, and find "
                "everything you need for you and your baby."
            }
            div {
                class: "hero__actions",
                if let Some(dashboard) = dashboard {
                    Link { class: "btn btn-primary", to: dashboard, "Go to your dashboard" }
                } else {
                    Link { class: "btn btn-primary", to: Route::Register {}, "Get started" }
                    Link { class: "btn", to: Route::RegisterDoctor {}, "Join as a doctor" }
                }
                Link { class: "btn", to: Route::Shop {}, "Visit the shop" }
            }
        }
    }
}

/// Shown to visitors without a session or without the required role.
#[component]
pub fn Unauthorized() -> Element {
    let session = use_session();
    let logged_in = session.current_user().is_some();

    rsx! {
        section {
            class: "notice",
            h1 { "Access denied" }
            p { "You don't have permission to view that page." }
            if logged_in {
                Link { class: "btn", to: Route::Home {}, "Back to home" }
            } else {
                Link { class: "btn btn-primary", to: Route::Login {}, "Sign in" }
            }
        }
    }
}

#[component]
pub fn NotFound(segments: Vec<String>) -> Element {
    let path = segments.join("/");
    rsx! {
        section {
            class: "notice",
            h1 { "Page not found" }
            p { "Nothing lives at /{path}." }
            Link { class: "btn", to: Route::Home {}, "Back to home" }
        }
    }
}
