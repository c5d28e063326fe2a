//! # Guard state machine
//!
//! The decision logic behind [`AccessGuard`](super::AccessGuard), kept free
//! of any rendering so it can be driven directly from tests.
//!
//! ```text
//! Loading ──► Unauthenticated                      (redirect /unauthorized)
//!         ──► RoleMismatch                         (redirect /unauthorized)
//!         ──► Authorized                           (render children)
//!         ──► CheckingProfile ──► Authorized
//!                             ──► NeedsProfile       (redirect /create-profile)
//!                             ──► ProfileCheckFailed (ProfileFailurePolicy::Surface)
//! ```
//!
//! Role checks always complete before the profile check is issued, so a
//! wrongly-roled visitor never causes a network call.
//!
//! [`GuardMachine`] adds generation tracking for one mounted guard: every
//! profile check carries a [`CheckTicket`], a ticket is good for one result,
//! and a result whose ticket is no longer current is dropped. The machine
//! also remembers which session it evaluated, so a state is never reported
//! for a session it was not computed from.

use std::cell::RefCell;

use api::{ApiError, ProfileCheck};
use store::{Role, SessionSnapshot};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GuardState {
    Loading,
    Unauthenticated,
    RoleMismatch,
    CheckingProfile,
    NeedsProfile,
    ProfileCheckFailed(ApiError),
    Authorized,
}

/// Where a terminal guard state sends the visitor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GuardRedirect {
    Unauthorized,
    CreateProfile,
}

impl GuardRedirect {
    pub fn path(self) -> &'static str {
        match self {
            GuardRedirect::Unauthorized => "/unauthorized",
            GuardRedirect::CreateProfile => "/create-profile",
        }
    }
}

impl GuardState {
    pub fn redirect(&self) -> Option<GuardRedirect> {
        match self {
            GuardState::Unauthenticated | GuardState::RoleMismatch => {
                Some(GuardRedirect::Unauthorized)
            }
            GuardState::NeedsProfile => Some(GuardRedirect::CreateProfile),
            _ => None,
        }
    }

    pub fn renders_children(&self) -> bool {
        matches!(self, GuardState::Authorized)
    }

    /// Still waiting on hydration or the profile check.
    pub fn is_pending(&self) -> bool {
        matches!(self, GuardState::Loading | GuardState::CheckingProfile)
    }
}

/// What to do when the profile check itself fails (network, 5xx).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ProfileFailurePolicy {
    /// Same as a confirmed missing profile: send the patient to profile
    /// creation. Never grants access on failure.
    #[default]
    TreatAsMissing,
    /// Stop in [`GuardState::ProfileCheckFailed`] and let the page decide.
    Surface,
}

/// The synchronous part of the guard: everything up to the profile check.
pub fn decide(snapshot: &SessionSnapshot, allowed: &[Role]) -> GuardState {
    if snapshot.loading {
        return GuardState::Loading;
    }
    let Some(user) = snapshot.user() else {
        return GuardState::Unauthenticated;
    };
    if !allowed.contains(&user.role) {
        return GuardState::RoleMismatch;
    }
    if user.role.is_patient() {
        return GuardState::CheckingProfile;
    }
    GuardState::Authorized
}

/// Map the outcome of the profile check.
pub fn resolve_profile(
    result: Result<bool, ApiError>,
    policy: ProfileFailurePolicy,
) -> GuardState {
    match result {
        Ok(true) => GuardState::Authorized,
        Ok(false) => GuardState::NeedsProfile,
        Err(e) => match policy {
            ProfileFailurePolicy::TreatAsMissing => {
                tracing::warn!(error = %e, "profile check failed; treating profile as missing");
                GuardState::NeedsProfile
            }
            ProfileFailurePolicy::Surface => GuardState::ProfileCheckFailed(e),
        },
    }
}

/// One full evaluation on a mounted guard's machine: the role checks, then
/// the profile check for patients.
///
/// Returns `None` when a newer evaluation (or unmount) superseded this one
/// while the check was in flight.
pub async fn run_guard<P: ProfileCheck>(
    machine: &RefCell<GuardMachine>,
    snapshot: &SessionSnapshot,
    allowed: &[Role],
    checker: &P,
) -> Option<GuardState> {
    let ticket = machine.borrow_mut().begin(snapshot, allowed);
    let Some(ticket) = ticket else {
        return machine.borrow().state_for(snapshot).cloned();
    };
    let result = checker.has_profile().await;
    machine.borrow_mut().complete(ticket, result)
}

/// Proof that a profile check was issued by the current evaluation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CheckTicket {
    generation: u64,
}

/// Guard state for one mount, with stale-result protection.
#[derive(Clone, Debug)]
pub struct GuardMachine {
    generation: u64,
    pending: Option<u64>,
    evaluated: Option<SessionSnapshot>,
    state: GuardState,
    policy: ProfileFailurePolicy,
}

impl GuardMachine {
    pub fn new(policy: ProfileFailurePolicy) -> Self {
        Self {
            generation: 0,
            pending: None,
            evaluated: None,
            state: GuardState::Loading,
            policy,
        }
    }

    /// The current state, if it was computed from `snapshot`.
    pub fn state_for(&self, snapshot: &SessionSnapshot) -> Option<&GuardState> {
        (self.evaluated.as_ref() == Some(snapshot)).then_some(&self.state)
    }

    /// Start a new evaluation, invalidating any check still in flight.
    ///
    /// Returns a ticket when the caller must now run the profile check.
    pub fn begin(&mut self, snapshot: &SessionSnapshot, allowed: &[Role]) -> Option<CheckTicket> {
        self.generation += 1;
        self.evaluated = Some(snapshot.clone());
        self.state = decide(snapshot, allowed);
        self.pending = (self.state == GuardState::CheckingProfile).then_some(self.generation);
        self.pending.map(|generation| CheckTicket { generation })
    }

    /// Apply a profile check result. Returns `None` and changes nothing if
    /// the ticket has been superseded or already used.
    pub fn complete(
        &mut self,
        ticket: CheckTicket,
        result: Result<bool, ApiError>,
    ) -> Option<GuardState> {
        if self.pending != Some(ticket.generation) {
            tracing::debug!(
                ticket = ticket.generation,
                current = self.generation,
                "discarding stale profile check"
            );
            return None;
        }
        self.pending = None;
        self.state = resolve_profile(result, self.policy);
        Some(self.state.clone())
    }

    /// Invalidate any check in flight (the guard is going away).
    pub fn cancel(&mut self) {
        self.generation += 1;
        self.pending = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use store::{Session, SessionUser};

    struct ScriptedCheck {
        answer: Result<bool, ApiError>,
        calls: Cell<usize>,
    }

    impl ScriptedCheck {
        fn new(answer: Result<bool, ApiError>) -> Self {
            Self {
                answer,
                calls: Cell::new(0),
            }
        }
    }

    impl ProfileCheck for ScriptedCheck {
        async fn has_profile(&self) -> Result<bool, ApiError> {
            self.calls.set(self.calls.get() + 1);
            // Resolve on a later poll, like a real request
            tokio::task::yield_now().await;
            self.answer.clone()
        }
    }

    fn logged_in(id: &str, role: Role) -> SessionSnapshot {
        SessionSnapshot {
            session: Some(Session {
                token: format!("token-{id}"),
                user: SessionUser::new(id, format!("{id}@example.com"), role),
            }),
            loading: false,
        }
    }

    fn logged_out() -> SessionSnapshot {
        SessionSnapshot {
            session: None,
            loading: false,
        }
    }

    fn outage() -> ApiError {
        ApiError::Status {
            status: 503,
            message: "unavailable".into(),
        }
    }

    /// Evaluate on a fresh machine, the way a newly mounted guard does.
    async fn evaluate(
        snapshot: &SessionSnapshot,
        allowed: &[Role],
        check: &ScriptedCheck,
        policy: ProfileFailurePolicy,
    ) -> GuardState {
        let machine = RefCell::new(GuardMachine::new(policy));
        let state = run_guard(&machine, snapshot, allowed, check).await;
        assert_eq!(machine.borrow().state_for(snapshot), state.as_ref());
        state.unwrap()
    }

    #[test]
    fn test_loading_never_redirects() {
        let state = decide(&SessionSnapshot::loading(), &[Role::Admin]);
        assert_eq!(state, GuardState::Loading);
        assert!(state.redirect().is_none());
        assert!(!state.renders_children());
        assert!(state.is_pending());
    }

    #[tokio::test]
    async fn test_admin_on_admin_page() {
        let check = ScriptedCheck::new(Ok(false));
        let snapshot = logged_in("u1", Role::Admin);
        let state = evaluate(&snapshot, &[Role::Admin], &check, Default::default()).await;

        assert_eq!(state, GuardState::Authorized);
        assert!(state.redirect().is_none());
        assert_eq!(check.calls.get(), 0);
    }

    #[tokio::test]
    async fn test_wrong_role_redirects_without_profile_call() {
        let check = ScriptedCheck::new(Ok(true));
        let snapshot = logged_in("u2", Role::User);
        let state = evaluate(&snapshot, &[Role::Admin], &check, Default::default()).await;

        assert_eq!(state, GuardState::RoleMismatch);
        assert_eq!(state.redirect(), Some(GuardRedirect::Unauthorized));
        assert_eq!(state.redirect().map(GuardRedirect::path), Some("/unauthorized"));
        assert_eq!(check.calls.get(), 0);
    }

    #[tokio::test]
    async fn test_no_session_redirects() {
        let check = ScriptedCheck::new(Ok(true));
        let state = evaluate(&logged_out(), &[Role::User], &check, Default::default()).await;

        assert_eq!(state, GuardState::Unauthenticated);
        assert_eq!(state.redirect(), Some(GuardRedirect::Unauthorized));
        assert_eq!(check.calls.get(), 0);
    }

    #[tokio::test]
    async fn test_patient_without_profile() {
        let check = ScriptedCheck::new(Ok(false));
        let snapshot = logged_in("u3", Role::User);
        let state = evaluate(&snapshot, &[Role::User], &check, Default::default()).await;

        assert_eq!(state, GuardState::NeedsProfile);
        assert_eq!(state.redirect().map(GuardRedirect::path), Some("/create-profile"));
        assert_eq!(check.calls.get(), 1);
    }

    #[tokio::test]
    async fn test_patient_with_profile() {
        let check = ScriptedCheck::new(Ok(true));
        let snapshot = logged_in("u3", Role::User);
        let state = evaluate(&snapshot, &[Role::User], &check, Default::default()).await;
        assert_eq!(state, GuardState::Authorized);
    }

    #[tokio::test]
    async fn test_profile_failure_fails_closed_by_default() {
        let check = ScriptedCheck::new(Err(outage()));
        let snapshot = logged_in("u3", Role::User);
        let state = evaluate(
            &snapshot,
            &[Role::User],
            &check,
            ProfileFailurePolicy::TreatAsMissing,
        )
        .await;
        assert_eq!(state, GuardState::NeedsProfile);
        assert!(!state.renders_children());
    }

    #[tokio::test]
    async fn test_profile_failure_can_be_surfaced() {
        let offline = ApiError::Network("offline".into());
        let check = ScriptedCheck::new(Err(offline.clone()));
        let snapshot = logged_in("u3", Role::User);
        let state = evaluate(&snapshot, &[Role::User], &check, ProfileFailurePolicy::Surface).await;

        assert_eq!(state, GuardState::ProfileCheckFailed(offline));
        assert!(state.redirect().is_none());
        assert!(!state.renders_children());
    }

    #[tokio::test]
    async fn test_children_render_iff_role_allowed_and_profile_ok() {
        for role in Role::ALL {
            for allowed in [
                vec![],
                vec![Role::User],
                vec![Role::Admin, Role::Doctor],
                Role::ALL.to_vec(),
            ] {
                for has_profile in [true, false] {
                    let check = ScriptedCheck::new(Ok(has_profile));
                    let snapshot = logged_in("u", role);
                    let state = evaluate(&snapshot, &allowed, &check, Default::default()).await;

                    let expected = allowed.contains(&role) && (!role.is_patient() || has_profile);
                    assert_eq!(state.renders_children(), expected, "{role} in {allowed:?}");
                    assert_eq!(state.redirect().is_none(), expected, "{role} in {allowed:?}");
                }
            }
        }
    }

    #[tokio::test]
    async fn test_superseded_run_reports_nothing() {
        let machine = RefCell::new(GuardMachine::new(ProfileFailurePolicy::default()));
        let snapshot = logged_in("u3", Role::User);
        let check = ScriptedCheck::new(Ok(true));

        let first = run_guard(&machine, &snapshot, &[Role::User], &check);
        let second = run_guard(&machine, &snapshot, &[Role::User], &check);
        // Both checks are issued before either result lands; only the newer counts
        let (first, second) = tokio::join!(first, second);

        assert_eq!(first, None);
        assert_eq!(second, Some(GuardState::Authorized));
    }

    #[test]
    fn test_machine_issues_ticket_only_for_patients() {
        let mut machine = GuardMachine::new(ProfileFailurePolicy::default());
        let doctor = logged_in("d1", Role::Doctor);
        let patient = logged_in("u3", Role::User);
        assert_eq!(machine.state_for(&doctor), None);

        assert!(machine.begin(&doctor, &[Role::Doctor]).is_none());
        assert_eq!(machine.state_for(&doctor), Some(&GuardState::Authorized));

        assert!(machine.begin(&patient, &[Role::User]).is_some());
        assert_eq!(machine.state_for(&patient), Some(&GuardState::CheckingProfile));
    }

    #[test]
    fn test_state_is_only_reported_for_its_session() {
        let mut machine = GuardMachine::new(ProfileFailurePolicy::default());
        let first = logged_in("u3", Role::User);
        let ticket = machine.begin(&first, &[Role::User]).unwrap();
        machine.complete(ticket, Ok(true));
        assert_eq!(machine.state_for(&first), Some(&GuardState::Authorized));

        // A different patient logged in; the old Authorized must not leak
        assert_eq!(machine.state_for(&logged_in("u4", Role::User)), None);
        assert_eq!(machine.state_for(&logged_out()), None);
    }

    #[test]
    fn test_machine_applies_current_ticket() {
        let mut machine = GuardMachine::new(ProfileFailurePolicy::default());
        let patient = logged_in("u3", Role::User);
        let ticket = machine.begin(&patient, &[Role::User]).unwrap();

        assert_eq!(machine.complete(ticket, Ok(false)), Some(GuardState::NeedsProfile));
        assert_eq!(machine.state_for(&patient), Some(&GuardState::NeedsProfile));
    }

    #[test]
    fn test_ticket_is_used_once() {
        let mut machine = GuardMachine::new(ProfileFailurePolicy::default());
        let patient = logged_in("u3", Role::User);
        let ticket = machine.begin(&patient, &[Role::User]).unwrap();

        assert_eq!(machine.complete(ticket, Ok(false)), Some(GuardState::NeedsProfile));
        assert_eq!(machine.complete(ticket, Ok(true)), None);
        assert_eq!(machine.state_for(&patient), Some(&GuardState::NeedsProfile));
    }

    #[test]
    fn test_stale_result_cannot_overwrite_redirect() {
        let mut machine = GuardMachine::new(ProfileFailurePolicy::default());
        let patient = logged_in("u3", Role::User);
        let first = machine.begin(&patient, &[Role::User]).unwrap();
        let second = machine.begin(&patient, &[Role::User]).unwrap();

        // The newer check resolves first and redirects
        assert_eq!(machine.complete(second, Ok(false)), Some(GuardState::NeedsProfile));
        // The older one resolving later is ignored
        assert_eq!(machine.complete(first, Ok(true)), None);
        assert_eq!(machine.state_for(&patient), Some(&GuardState::NeedsProfile));
    }

    #[test]
    fn test_cancel_drops_in_flight_check() {
        let mut machine = GuardMachine::new(ProfileFailurePolicy::default());
        let patient = logged_in("u3", Role::User);
        let ticket = machine.begin(&patient, &[Role::User]).unwrap();

        machine.cancel();

        assert_eq!(machine.complete(ticket, Ok(true)), None);
        assert_eq!(machine.state_for(&patient), Some(&GuardState::CheckingProfile));
    }
}
