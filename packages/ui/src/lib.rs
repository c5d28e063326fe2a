//! This crate contains all shared UI for the workspace.

use dioxus::prelude::*;

// Re-export icon library
pub use dioxus_free_icons::Icon;
pub mod icons {
    pub use dioxus_free_icons::icons::fa_solid_icons::*;
}

pub mod access;
pub use access::{AccessGuard, AccessPolicy, GuardRedirect, ProfileFailurePolicy};

mod storage;
pub use storage::{make_storage, AppStorage};

mod session;
pub use session::{use_session, LogoutButton, SessionHandle, SessionProvider};

mod cart;
pub use cart::{use_cart, CartHandle, CartProvider};

mod client;
pub use client::{use_anonymous_api, use_api, ApiProvider};

mod navbar;
pub use navbar::{CartBadge, Navbar};

/// Wraps the app in every provider it needs, outermost first.
#[component]
pub fn AppProviders(config: api::ApiConfig, children: Element) -> Element {
    rsx! {
        SessionProvider {
            ApiProvider {
                config,
                CartProvider {
                    {children}
                }
            }
        }
    }
}
