//! Role-gated access: the policy table, the guard state machine, and the
//! [`AccessGuard`] component that applies them.

mod component;
pub mod machine;
pub mod policy;

pub use component::AccessGuard;
pub use machine::{
    decide, resolve_profile, run_guard, CheckTicket, GuardMachine, GuardRedirect, GuardState,
    ProfileFailurePolicy,
};
pub use policy::{AccessPolicy, AccessRule};
