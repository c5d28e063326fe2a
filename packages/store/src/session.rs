//! # Session store: who is logged in
//!
//! [`SessionStore`] is the single source of truth for the authenticated
//! identity. It pairs a bearer token with its [`SessionUser`], keeps both in a
//! [`KeyValueStore`] so they survive reloads, and mirrors them in memory for
//! cheap reads.
//!
//! ## Lifecycle
//!
//! 1. Constructed once at app bootstrap and shared through context. Clones
//!    share state, so every consumer sees the same hydration result.
//! 2. [`hydrate`](SessionStore::hydrate) reads the persisted pair exactly once.
//!    Until then [`is_loading`](SessionStore::is_loading) is `true`.
//! 3. [`login`](SessionStore::login) / [`logout`](SessionStore::logout) write
//!    through to storage and memory.
//!
//! ## Pairing
//!
//! Token and user are written and cleared together. `login` writes the token
//! first and rolls it back if the user write fails. `hydrate` discards a
//! stray half of a pair it finds in storage.
//!
//! ## Failure semantics
//!
//! Reads never fail: unavailable storage, corrupt JSON or an unknown schema
//! version all hydrate as "no session". Only `login` reports a
//! [`StorageError`], because the caller has to know the session was not kept.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::kv::{KeyValueStore, StorageError, TOKEN_KEY, USER_KEY};
use crate::models::{Session, SessionUser};
use crate::versioned;

/// Point-in-time view of the session.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSnapshot {
    pub session: Option<Session>,
    pub loading: bool,
}

impl SessionSnapshot {
    /// The initial state before hydration.
    pub fn loading() -> Self {
        Self {
            session: None,
            loading: true,
        }
    }

    pub fn user(&self) -> Option<&SessionUser> {
        self.session.as_ref().map(|s| &s.user)
    }

    pub fn token(&self) -> Option<&str> {
        self.session.as_ref().map(|s| s.token.as_str())
    }
}

impl Default for SessionSnapshot {
    fn default() -> Self {
        Self::loading()
    }
}

#[derive(Debug)]
struct State {
    snapshot: SessionSnapshot,
    hydrated: bool,
}

/// Persisted, shareable session state.
#[derive(Clone, Debug)]
pub struct SessionStore<S> {
    storage: S,
    state: Arc<Mutex<State>>,
}

impl<S: KeyValueStore> SessionStore<S> {
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            state: Arc::new(Mutex::new(State {
                snapshot: SessionSnapshot::loading(),
                hydrated: false,
            })),
        }
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Load the persisted session into memory.
    ///
    /// Only the first call per store (and its clones) touches storage; later
    /// calls return the same snapshot. Always leaves `loading == false`.
    pub fn hydrate(&self) -> SessionSnapshot {
        let mut state = self.state();
        if state.hydrated {
            return state.snapshot.clone();
        }

        let session = self.read_persisted();
        tracing::debug!(logged_in = session.is_some(), "session hydrated");

        state.snapshot = SessionSnapshot {
            session,
            loading: false,
        };
        state.hydrated = true;
        state.snapshot.clone()
    }

    fn read_persisted(&self) -> Option<Session> {
        let token = match self.storage.get(TOKEN_KEY) {
            Ok(token) => token.filter(|t| !t.is_empty()),
            Err(e) => {
                tracing::warn!(error = %e, "session token unreadable; starting logged out");
                return None;
            }
        };

        // A user record from a newer schema is not ours to delete
        let mut keep_user = false;
        let user = match versioned::load::<SessionUser, _>(&self.storage, USER_KEY) {
            Ok(user) => user,
            Err(StorageError::Unavailable(reason)) => {
                tracing::warn!(%reason, "session user unreadable; starting logged out");
                return None;
            }
            Err(e @ StorageError::UnsupportedVersion { .. }) => {
                tracing::warn!(error = %e, "ignoring session user from a newer schema");
                keep_user = true;
                None
            }
            Err(e) => {
                tracing::warn!(error = %e, "discarding unusable session user");
                None
            }
        };

        match (token, user) {
            (Some(token), Some(user)) => Some(Session { token, user }),
            (None, None) => None,
            _ => {
                tracing::warn!("discarding half-persisted session");
                if keep_user {
                    self.remove_keys(&[TOKEN_KEY]);
                } else {
                    self.remove_keys(&[TOKEN_KEY, USER_KEY]);
                }
                None
            }
        }
    }

    /// Persist a fresh session and make it current.
    ///
    /// Either both token and user end up stored, or storage is left as it
    /// was and the error is returned.
    pub fn login(&self, token: &str, user: SessionUser) -> Result<Session, StorageError> {
        let previous_token = self.storage.get(TOKEN_KEY).ok().flatten();

        self.storage.set(TOKEN_KEY, token)?;

        if let Err(e) = versioned::save(&self.storage, USER_KEY, &user) {
            let rollback = match &previous_token {
                Some(previous) => self.storage.set(TOKEN_KEY, previous),
                None => self.storage.remove(TOKEN_KEY),
            };
            if let Err(rollback_err) = rollback {
                tracing::warn!(error = %rollback_err, "failed to roll back session token");
            }
            tracing::warn!(error = %e, "failed to persist session user");
            return Err(e);
        }

        let session = Session {
            token: token.to_string(),
            user,
        };
        tracing::info!(user_id = %session.user.id, role = %session.user.role, "logged in");

        let mut state = self.state();
        state.snapshot = SessionSnapshot {
            session: Some(session.clone()),
            loading: false,
        };
        state.hydrated = true;
        Ok(session)
    }

    /// Forget the session in storage and memory.
    pub fn logout(&self) {
        self.remove_keys(&[TOKEN_KEY, USER_KEY]);

        let mut state = self.state();
        if let Some(session) = &state.snapshot.session {
            tracing::info!(user_id = %session.user.id, "logged out");
        }
        state.snapshot = SessionSnapshot {
            session: None,
            loading: false,
        };
        state.hydrated = true;
    }

    fn remove_keys(&self, keys: &[&str]) {
        for &key in keys {
            if let Err(e) = self.storage.remove(key) {
                tracing::warn!(key, error = %e, "failed to clear session key");
            }
        }
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.state().snapshot.clone()
    }

    pub fn session(&self) -> Option<Session> {
        self.state().snapshot.session.clone()
    }

    pub fn current_user(&self) -> Option<SessionUser> {
        self.state().snapshot.user().cloned()
    }

    pub fn token(&self) -> Option<String> {
        self.state().snapshot.token().map(str::to_string)
    }

    pub fn is_loading(&self) -> bool {
        self.state().snapshot.loading
    }

    /// Return to the pre-hydration state without touching storage.
    pub fn reset(&self) {
        let mut state = self.state();
        state.snapshot = SessionSnapshot::loading();
        state.hydrated = false;
    }
}
