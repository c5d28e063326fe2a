use dioxus::prelude::*;
use ui::{use_session, AccessGuard, AccessPolicy, CartBadge, GuardRedirect, LogoutButton, Navbar};

use crate::Route;

/// Public shell: navigation bar plus the routed page.
#[component]
pub fn AppLayout() -> Element {
    let session = use_session();
    let nav = use_navigator();
    let user = session.current_user();
    let user_name = user
        .as_ref()
        .map(|u| u.display_name().to_string())
        .unwrap_or_default();
    let dashboard = user.map(|u| Route::dashboard_for(u.role));

    rsx! {
        Navbar {
            Link { class: "navbar__brand", to: Route::Home {}, "Materna" }
            Link { to: Route::Shop {}, "Shop" }
            Link { to: Route::Community {}, "Community" }
            Link { to: Route::Cart {}, CartBadge {} }

            if let Some(dashboard) = dashboard {
                Link { to: dashboard, "Dashboard" }
                span { class: "navbar__user", "{user_name}" }
                LogoutButton {
                    class: "navbar__logout",
                    on_logged_out: move |_| {
                        nav.replace(Route::Home {});
                    },
                }
            } else {
                Link { to: Route::Login {}, "Sign in" }
                Link { to: Route::Register {}, "Sign up" }
            }
        }

        main {
            class: "page",
            Outlet::<Route> {}
        }
    }
}

/// The single gate for protected routes.
///
/// Looks the current path up in the [`AccessPolicy`] table and wraps the
/// outlet in an [`AccessGuard`] for the matching rule. The guard is keyed by
/// rule so moving between differently-gated sections re-runs it from scratch.
/// A path with no rule is denied to everyone.
#[component]
pub fn GuardedLayout() -> Element {
    let route = use_route::<Route>();
    let nav = use_navigator();
    let policy = use_hook(AccessPolicy::default);

    let path = route.to_string();
    let (key, allowed) = match policy.rule_for(&path) {
        Some(rule) => (rule.prefix.clone(), rule.allowed.clone()),
        None => {
            tracing::warn!(%path, "guarded route has no access rule; denying");
            (path, Vec::new())
        }
    };

    let on_redirect = move |target: GuardRedirect| {
        let to = match target {
            GuardRedirect::Unauthorized => Route::Unauthorized {},
            GuardRedirect::CreateProfile => Route::CreateProfile {},
        };
        nav.replace(to);
    };

    rsx! {
        AccessGuard {
            key: "{key}",
            allowed,
            on_redirect,
            Outlet::<Route> {}
        }
    }
}
