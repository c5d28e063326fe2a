//! Session context and hooks for the UI.

use api::AuthResponse;
use dioxus::prelude::*;
use store::{Session, SessionSnapshot, SessionStore, SessionUser, StorageError};

use crate::storage::{make_storage, AppStorage};

/// Handle to the shared session, obtained with [`use_session`].
///
/// Reading through the handle subscribes the component, so views re-render
/// on login, logout and hydration.
#[derive(Clone)]
pub struct SessionHandle {
    store: SessionStore<AppStorage>,
    state: Signal<SessionSnapshot>,
}

impl SessionHandle {
    pub fn snapshot(&self) -> SessionSnapshot {
        (self.state)()
    }

    pub fn current_user(&self) -> Option<SessionUser> {
        self.state.read().user().cloned()
    }

    pub fn token(&self) -> Option<String> {
        self.state.read().token().map(str::to_string)
    }

    pub fn is_loading(&self) -> bool {
        self.state.read().loading
    }

    /// Persist the session from a successful login or registration.
    pub fn login(&mut self, response: AuthResponse) -> Result<Session, StorageError> {
        let session = self.store.login(&response.token, response.user)?;
        self.state.set(self.store.snapshot());
        Ok(session)
    }

    /// Load the persisted session; later calls are no-ops.
    pub fn hydrate(&mut self) {
        self.state.set(self.store.hydrate());
    }

    pub fn logout(&mut self) {
        self.store.logout();
        self.state.set(self.store.snapshot());
    }
}

/// Get the shared session handle.
pub fn use_session() -> SessionHandle {
    use_context::<SessionHandle>()
}

/// Provider component that owns the session store.
///
/// Mount it once around the router. The store is hydrated from storage after
/// the first render; until then every consumer sees `loading == true`.
#[component]
pub fn SessionProvider(children: Element) -> Element {
    let store = use_hook(|| SessionStore::new(make_storage()));
    let mut session = use_session_provider(store);

    use_effect(move || session.hydrate());

    rsx! {
        {children}
    }
}

/// Share `store` with descendants, seeded with its current snapshot.
pub(crate) fn use_session_provider(store: SessionStore<AppStorage>) -> SessionHandle {
    let state = use_signal(|| store.snapshot());
    use_context_provider(|| SessionHandle { store, state })
}

/// Button to log out the current user.
#[component]
pub fn LogoutButton(
    #[props(default = "Logout".to_string())] label: String,
    #[props(default = "".to_string())] class: String,
    /// Called after the session is cleared; typically navigates home.
    on_logged_out: EventHandler<()>,
) -> Element {
    let mut session = use_session();

    let onclick = move |_| {
        session.logout();
        on_logged_out.call(());
    };

    rsx! {
        button {
            class: "{class}",
            onclick: onclick,
            "{label}"
        }
    }
}
