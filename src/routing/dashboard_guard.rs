//! Guard for the protected dashboard on the root domain.

use serde::Serialize;

use crate::controller::{DomainEnvironment, SubdomainState};
use crate::observability::metrics;
use crate::routing::membership::Membership;
use crate::routing::AuthContext;

/// Navigation outcome for a dashboard request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum DashboardDecision {
    /// The dashboard is not served on workspace hosts. Offers both ways out
    /// instead of redirecting on its own.
    Restricted {
        subdomain: String,
        workspace_url: String,
        main_url: String,
    },
    RedirectToWorkspace {
        url: String,
    },
    RenderDashboard,
}

impl DashboardDecision {
    pub fn kind(&self) -> &'static str {
        match self {
            DashboardDecision::Restricted { .. } => "restricted",
            DashboardDecision::RedirectToWorkspace { .. } => "redirect",
            DashboardDecision::RenderDashboard => "render",
        }
    }
}

pub fn dashboard_guard(
    state: &SubdomainState,
    auth: &AuthContext,
    membership: &Membership,
    env: &DomainEnvironment,
    host: &str,
) -> DashboardDecision {
    let decision = decide(state, auth, membership, env, host);
    metrics::record_guard_decision("dashboard", decision.kind());
    decision
}

fn decide(
    state: &SubdomainState,
    auth: &AuthContext,
    membership: &Membership,
    env: &DomainEnvironment,
    host: &str,
) -> DashboardDecision {
    if let Some(subdomain) = &state.subdomain {
        return DashboardDecision::Restricted {
            subdomain: subdomain.clone(),
            workspace_url: env.workspace_url(subdomain, host),
            main_url: env.main_domain_url(host),
        };
    }

    if auth.is_authenticated() {
        if let Some(current) = membership.current_member_workspace() {
            return DashboardDecision::RedirectToWorkspace {
                url: env.workspace_url(&current.subdomain, host),
            };
        }
    }

    DashboardDecision::RenderDashboard
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workspace::types::fixtures;

    fn member_of_acme() -> Membership {
        Membership {
            workspace_ids: vec!["w1".into()],
            current: Some(fixtures::workspace("w1", "acme")),
        }
    }

    fn signed_in() -> AuthContext {
        AuthContext::new(Some("tok".into()))
    }

    #[test]
    fn test_restricted_on_subdomain() {
        let state = SubdomainState::resolved("acme".into(), fixtures::workspace("w1", "acme"));
        let decision = dashboard_guard(
            &state,
            &signed_in(),
            &member_of_acme(),
            &DomainEnvironment::default(),
            "acme.uproom.com",
        );
        assert_eq!(
            decision,
            DashboardDecision::Restricted {
                subdomain: "acme".into(),
                workspace_url: "https://acme.uproom.com".into(),
                main_url: "https://uproom.com".into(),
            }
        );
    }

    #[test]
    fn test_restricted_even_when_lookup_failed() {
        let state = SubdomainState::invalid_format("a".into(), "too short");
        let decision = dashboard_guard(
            &state,
            &AuthContext::default(),
            &Membership::default(),
            &DomainEnvironment::default(),
            "a.localhost:8080",
        );
        assert_eq!(decision.kind(), "restricted");
    }

    #[test]
    fn test_member_redirects_to_workspace() {
        let decision = dashboard_guard(
            &SubdomainState::no_workspace(),
            &signed_in(),
            &member_of_acme(),
            &DomainEnvironment::default(),
            "localhost:8080",
        );
        assert_eq!(
            decision,
            DashboardDecision::RedirectToWorkspace {
                url: "http://acme.localhost:8080".into()
            }
        );
    }

    #[test]
    fn test_non_member_renders_dashboard() {
        let membership = Membership {
            workspace_ids: vec!["w2".into()],
            current: Some(fixtures::workspace("w1", "acme")),
        };
        let decision = dashboard_guard(
            &SubdomainState::no_workspace(),
            &signed_in(),
            &membership,
            &DomainEnvironment::default(),
            "uproom.com",
        );
        assert_eq!(decision, DashboardDecision::RenderDashboard);
    }

    #[test]
    fn test_anonymous_renders_dashboard() {
        let decision = dashboard_guard(
            &SubdomainState::no_workspace(),
            &AuthContext::default(),
            &member_of_acme(),
            &DomainEnvironment::default(),
            "uproom.com",
        );
        assert_eq!(decision, DashboardDecision::RenderDashboard);
    }

    #[test]
    fn test_decision_is_idempotent() {
        let state = SubdomainState::no_workspace();
        let auth = signed_in();
        let membership = member_of_acme();
        let env = DomainEnvironment::default();

        let first = dashboard_guard(&state, &auth, &membership, &env, "uproom.com");
        let second = dashboard_guard(&state, &auth, &membership, &env, "uproom.com");
        assert_eq!(first, second);
    }
}
