use std::cell::RefCell;
use std::rc::Rc;

use dioxus::prelude::*;
use store::Role;

use super::machine::{
    decide, run_guard, GuardMachine, GuardRedirect, GuardState, ProfileFailurePolicy,
};
use crate::client::{authorize, use_anonymous_api};
use crate::session::{use_session, SessionHandle};

/// Renders `children` only for sessions whose role is in `allowed`.
///
/// Patients additionally need a pregnancy profile; the check runs once per
/// session change and its result is ignored if the guard has moved on.
/// Visitors who may not see the content get exactly one `on_redirect` call
/// and never a frame of the protected subtree.
#[component]
pub fn AccessGuard(
    allowed: Vec<Role>,
    #[props(default)] failure_policy: ProfileFailurePolicy,
    on_redirect: EventHandler<GuardRedirect>,
    children: Element,
) -> Element {
    let session = use_session();
    let base_api = use_anonymous_api();
    let machine = use_hook(|| Rc::new(RefCell::new(GuardMachine::new(failure_policy))));

    let mut check = use_resource({
        let session = session.clone();
        let machine = machine.clone();
        let allowed = allowed.clone();
        move || {
            let snapshot = session.snapshot();
            let client = base_api
                .clone()
                .map(|c| authorize(c, snapshot.token().map(str::to_string)));
            let machine = machine.clone();
            let allowed = allowed.clone();
            async move { run_guard(&machine, &snapshot, &allowed, &client).await }
        }
    });

    {
        let machine = machine.clone();
        use_drop(move || machine.borrow_mut().cancel());
    }

    let mut redirected = use_signal(|| None::<GuardRedirect>);
    use_effect({
        let session = session.clone();
        let machine = machine.clone();
        let allowed = allowed.clone();
        move || {
            let state = current_state(&session, &allowed, &machine, &check);
            let Some(target) = state.redirect() else {
                return;
            };
            if redirected.peek().is_none() {
                tracing::info!(?state, to = target.path(), "access guard redirect");
                redirected.set(Some(target));
                on_redirect.call(target);
            }
        }
    });

    let state = current_state(&session, &allowed, &machine, &check);
    if state.renders_children() {
        return rsx! {
            {children}
        };
    }
    if state.is_pending() {
        return rsx! {
            div { class: "guard-placeholder", "Loading..." }
        };
    }
    if let GuardState::ProfileCheckFailed(error) = state {
        let detail = error.to_string();
        let retry = error.is_transient();
        return rsx! {
            div {
                class: "guard-error",
                p { "We couldn't verify your pregnancy profile right now." }
                p { class: "guard-error__detail", "{detail}" }
                if retry {
                    button {
                        onclick: move |_| check.restart(),
                        "Try again"
                    }
                }
            }
        };
    }
    rsx! {}
}

fn current_state(
    session: &SessionHandle,
    allowed: &[Role],
    machine: &RefCell<GuardMachine>,
    check: &Resource<Option<GuardState>>,
) -> GuardState {
    let snapshot = session.snapshot();
    match decide(&snapshot, allowed) {
        GuardState::CheckingProfile => {
            // Subscribe to the check so its completion re-renders
            let _pending = check.read().is_none();
            machine
                .borrow()
                .state_for(&snapshot)
                .cloned()
                .unwrap_or(GuardState::CheckingProfile)
        }
        decided => decided,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use api::ApiConfig;
    use store::{SessionStore, SessionUser};

    use crate::client::ApiProvider;
    use crate::session::use_session_provider;
    use crate::storage::make_storage;

    #[derive(Clone, Copy, Debug, PartialEq)]
    enum Visitor {
        Hydrating,
        Anonymous,
        SignedIn(Role),
    }

    #[component]
    fn Harness(
        visitor: Visitor,
        allowed: Vec<Role>,
        redirects: Rc<RefCell<Vec<GuardRedirect>>>,
    ) -> Element {
        let store = use_hook(|| {
            let store = SessionStore::new(make_storage());
            match visitor {
                Visitor::Hydrating => {}
                Visitor::Anonymous => {
                    store.hydrate();
                }
                Visitor::SignedIn(role) => {
                    let user = SessionUser::new("u1", "u1@example.com", role);
                    store.login("tok-1", user).unwrap();
                }
            }
            store
        });
        use_session_provider(store);

        rsx! {
            ApiProvider {
                config: ApiConfig::default(),
                AccessGuard {
                    allowed,
                    on_redirect: move |to| redirects.borrow_mut().push(to),
                    p { "protected content" }
                }
            }
        }
    }

    /// Mount the guard, let effects and tasks settle, and return the
    /// rendered HTML with every redirect it asked for.
    async fn mount(visitor: Visitor, allowed: &[Role]) -> (String, Vec<GuardRedirect>) {
        let redirects = Rc::new(RefCell::new(Vec::new()));
        let mut dom = VirtualDom::new_with_props(
            Harness,
            HarnessProps {
                visitor,
                allowed: allowed.to_vec(),
                redirects: redirects.clone(),
            },
        );
        dom.rebuild_in_place();
        for _ in 0..4 {
            let _ = tokio::time::timeout(Duration::from_millis(20), dom.wait_for_work()).await;
            dom.render_immediate_to_vec();
        }

        let html = dioxus::ssr::render(&dom);
        let seen = redirects.borrow().clone();
        (html, seen)
    }

    #[tokio::test]
    async fn test_placeholder_while_hydrating() {
        let (html, redirects) = mount(Visitor::Hydrating, &[Role::Admin]).await;

        assert!(html.contains("Loading..."), "{html}");
        assert!(!html.contains("protected content"), "{html}");
        assert!(redirects.is_empty());
    }

    #[tokio::test]
    async fn test_anonymous_visitor_redirected_once() {
        let (html, redirects) = mount(Visitor::Anonymous, &[Role::Admin]).await;

        assert!(!html.contains("protected content"), "{html}");
        assert_eq!(redirects, vec![GuardRedirect::Unauthorized]);
    }

    #[tokio::test]
    async fn test_wrong_role_redirected_once() {
        let (html, redirects) = mount(Visitor::SignedIn(Role::Doctor), &[Role::Admin]).await;

        assert!(!html.contains("protected content"), "{html}");
        assert_eq!(redirects, vec![GuardRedirect::Unauthorized]);
    }

    #[tokio::test]
    async fn test_empty_allow_list_denies_everyone() {
        let (html, redirects) = mount(Visitor::SignedIn(Role::Admin), &[]).await;

        assert!(!html.contains("protected content"), "{html}");
        assert_eq!(redirects, vec![GuardRedirect::Unauthorized]);
    }

    #[tokio::test]
    async fn test_allowed_role_sees_children() {
        let (html, redirects) = mount(Visitor::SignedIn(Role::Admin), &[Role::Admin]).await;

        assert!(html.contains("protected content"), "{html}");
        assert!(redirects.is_empty());
    }
}
