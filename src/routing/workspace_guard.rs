//! Guard for pages served on a workspace subdomain.

use serde::Serialize;

use crate::controller::{DomainEnvironment, SubdomainState};
use crate::observability::metrics;
use crate::routing::AuthContext;

/// Manual ways out of an error view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum RecoveryAction {
    GoToMainSite { url: String },
    /// Reload the page; detection runs again from scratch.
    Retry,
}

/// What to show for the current subdomain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "view", rename_all = "snake_case")]
pub enum WorkspaceView {
    Loading,
    /// Not on a workspace host; render the normal app.
    PassThrough,
    NotFound {
        subdomain: Option<String>,
        error: String,
        actions: Vec<RecoveryAction>,
    },
    Workspace {
        workspace_id: String,
        subdomain: String,
    },
    /// Sign-in scoped to the workspace, in place, so the URL survives.
    SignIn {
        workspace_id: String,
        subdomain: String,
    },
}

impl WorkspaceView {
    pub fn kind(&self) -> &'static str {
        match self {
            WorkspaceView::Loading => "loading",
            WorkspaceView::PassThrough => "pass_through",
            WorkspaceView::NotFound { .. } => "not_found",
            WorkspaceView::Workspace { .. } => "workspace",
            WorkspaceView::SignIn { .. } => "sign_in",
        }
    }
}

pub fn workspace_guard(
    state: &SubdomainState,
    auth: &AuthContext,
    env: &DomainEnvironment,
    host: &str,
) -> WorkspaceView {
    let view = decide(state, auth, env, host);
    metrics::record_guard_decision("workspace", view.kind());
    view
}

fn decide(
    state: &SubdomainState,
    auth: &AuthContext,
    env: &DomainEnvironment,
    host: &str,
) -> WorkspaceView {
    if state.is_loading {
        return WorkspaceView::Loading;
    }

    let Some(subdomain) = &state.subdomain else {
        return WorkspaceView::PassThrough;
    };

    let workspace = match &state.workspace {
        Some(ws) if state.error.is_none() && state.is_valid_workspace => ws,
        _ => {
            return WorkspaceView::NotFound {
                subdomain: Some(subdomain.clone()),
                error: state
                    .error
                    .clone()
                    .unwrap_or_else(|| "Workspace not found".to_string()),
                actions: vec![
                    RecoveryAction::GoToMainSite {
                        url: env.main_domain_url(host),
                    },
                    RecoveryAction::Retry,
                ],
            };
        }
    };

    if auth.is_authenticated() {
        WorkspaceView::Workspace {
            workspace_id: workspace.id.clone(),
            subdomain: subdomain.clone(),
        }
    } else {
        WorkspaceView::SignIn {
            workspace_id: workspace.id.clone(),
            subdomain: subdomain.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::DetectionPhase;
    use crate::workspace::types::fixtures;

    const HOST: &str = "acme.uproom.com";

    fn env() -> DomainEnvironment {
        DomainEnvironment::default()
    }

    fn signed_in() -> AuthContext {
        AuthContext::new(Some("tok".into()))
    }

    #[test]
    fn test_loading() {
        let view = workspace_guard(&SubdomainState::loading(), &signed_in(), &env(), HOST);
        assert_eq!(view, WorkspaceView::Loading);
    }

    #[test]
    fn test_root_passes_through() {
        let view = workspace_guard(&SubdomainState::no_workspace(), &signed_in(), &env(), "uproom.com");
        assert_eq!(view, WorkspaceView::PassThrough);
    }

    #[test]
    fn test_error_offers_actions() {
        let state = SubdomainState::failed(
            Some("ghost".into()),
            DetectionPhase::NotFound,
            "Workspace not found".into(),
        );
        let view = workspace_guard(&state, &signed_in(), &env(), "ghost.uproom.com");
        assert_eq!(
            view,
            WorkspaceView::NotFound {
                subdomain: Some("ghost".into()),
                error: "Workspace not found".into(),
                actions: vec![
                    RecoveryAction::GoToMainSite {
                        url: "https://uproom.com".into()
                    },
                    RecoveryAction::Retry,
                ],
            }
        );
    }

    #[test]
    fn test_invalid_format_is_not_found_view() {
        let state = SubdomainState::invalid_format("a".into(), "Subdomain must be at least 2 characters");
        let view = workspace_guard(&state, &AuthContext::default(), &env(), "a.uproom.com");
        assert_eq!(view.kind(), "not_found");
    }

    #[test]
    fn test_authenticated_gets_workspace() {
        let state = SubdomainState::resolved("acme".into(), fixtures::workspace("w1", "acme"));
        let view = workspace_guard(&state, &signed_in(), &env(), HOST);
        assert_eq!(
            view,
            WorkspaceView::Workspace {
                workspace_id: "w1".into(),
                subdomain: "acme".into()
            }
        );
    }

    #[test]
    fn test_anonymous_gets_scoped_sign_in() {
        let state = SubdomainState::resolved("acme".into(), fixtures::workspace("w1", "acme"));
        let view = workspace_guard(&state, &AuthContext::new(Some(String::new())), &env(), HOST);
        assert_eq!(
            view,
            WorkspaceView::SignIn {
                workspace_id: "w1".into(),
                subdomain: "acme".into()
            }
        );
    }

    #[test]
    fn test_view_json_tag() {
        let json = serde_json::to_value(WorkspaceView::PassThrough).unwrap();
        assert_eq!(json, serde_json::json!({ "view": "pass_through" }));
    }
}
