//! Route guards.
//!
//! # Data Flow
//! ```text
//! SubdomainState (controller) ─┐
//! AuthContext (bearer/cookie) ─┼→ workspace_guard.rs → WorkspaceView
//! Membership (membership.rs) ──┴→ dashboard_guard.rs → DashboardDecision
//! ```
//!
//! # Design Decisions
//! - Guards are pure functions of their inputs: same input, same decision
//! - Guards return decisions, rendering is the caller's business
//! - Error views offer recovery actions, never an automatic redirect loop

pub mod dashboard_guard;
pub mod membership;
pub mod workspace_guard;

pub use dashboard_guard::{dashboard_guard, DashboardDecision};
pub use membership::{HttpMembershipSource, Membership, MembershipSource};
pub use workspace_guard::{workspace_guard, RecoveryAction, WorkspaceView};

/// Whether the caller presented a credential.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthContext {
    pub token: Option<String>,
}

impl AuthContext {
    pub fn new(token: Option<String>) -> Self {
        Self { token }
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.as_deref().is_some_and(|t| !t.is_empty())
    }
}
