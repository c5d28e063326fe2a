use dioxus::prelude::*;

use store::Role;
use ui::AppProviders;
use views::{
    AdminDashboard, AppLayout, Cart, Community, Consultation, CreateProfile, DoctorDashboard,
    GuardedLayout, Home, Login, NotFound, Register, RegisterDoctor, Shop, Unauthorized,
    UserDashboard,
};

mod views;

#[derive(Debug, Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum Route {
    #[layout(AppLayout)]
        #[route("/")]
        Home {},
        #[route("/login")]
        Login {},
        #[route("/register")]
        Register {},
        #[route("/register-doctor")]
        RegisterDoctor {},
        #[route("/unauthorized")]
        Unauthorized {},
        #[route("/create-profile")]
        CreateProfile {},
        #[route("/shop")]
        Shop {},
        #[route("/cart")]
        Cart {},
        #[layout(GuardedLayout)]
            #[route("/dashboard/admin")]
            AdminDashboard {},
            #[route("/dashboard/doctor")]
            DoctorDashboard {},
            #[route("/dashboard/user")]
            UserDashboard {},
            #[route("/consultation")]
            Consultation {},
            #[route("/community")]
            Community {},
        #[end_layout]
    #[end_layout]
    #[route("/:..segments")]
    NotFound { segments: Vec<String> },
}

impl Route {
    /// Landing page for a freshly logged-in account.
    fn dashboard_for(role: Role) -> Self {
        match role {
            Role::Admin => Route::AdminDashboard {},
            Role::Doctor => Route::DoctorDashboard {},
            Role::User => Route::UserDashboard {},
        }
    }
}

const MAIN_CSS: Asset = asset!("/assets/main.css");

/// Deployment settings for the backend client, baked in at build time.
const API_TOML: &str = include_str!("../api.toml");

fn main() {
    // `launch` installs the default tracing logger for the platform
    dioxus::launch(App);
}

#[component]
fn App() -> Element {
    let config = use_hook(|| api::ApiConfig::load(API_TOML));

    rsx! {
        document::Link { rel: "stylesheet", href: MAIN_CSS }

        AppProviders {
            config,
            Router::<Route> {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ui::AccessPolicy;

    #[test]
    fn test_every_guarded_route_has_a_rule() {
        let policy = AccessPolicy::default();
        let guarded = [
            Route::AdminDashboard {},
            Route::DoctorDashboard {},
            Route::UserDashboard {},
            Route::Consultation {},
            Route::Community {},
        ];

        for route in guarded {
            let path = route.to_string();
            let rule = policy.rule_for(&path);
            assert!(rule.is_some(), "{path} has no access rule");
            assert!(!rule.unwrap().allowed.is_empty(), "{path} admits nobody");
        }
    }

    #[test]
    fn test_public_routes_have_no_rule() {
        let policy = AccessPolicy::default();
        let public = [
            Route::Home {},
            Route::Login {},
            Route::Register {},
            Route::RegisterDoctor {},
            Route::Unauthorized {},
            Route::CreateProfile {},
            Route::Shop {},
            Route::Cart {},
        ];

        for route in public {
            let path = route.to_string();
            assert!(policy.rule_for(&path).is_none(), "{path} is gated");
        }
    }

    #[test]
    fn test_dashboard_matches_role() {
        let policy = AccessPolicy::default();
        for role in [Role::Admin, Role::Doctor, Role::User] {
            let path = Route::dashboard_for(role).to_string();
            let rule = policy.rule_for(&path).unwrap();
            assert_eq!(rule.allowed, vec![role], "{path}");
        }
    }
}
