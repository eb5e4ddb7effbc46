//! Detection state exposed to callers.

use serde::Serialize;

use crate::workspace::Workspace;

/// Error shown when the detection sequence itself blows up.
pub const DETECTION_FAILED: &str = "Failed to detect workspace";

/// Where a controller is in its run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DetectionPhase {
    Idle,
    Loading,
    NoWorkspace,
    InvalidFormat,
    NotFound,
    LoadFailed,
    UnexpectedFailure,
    Resolved,
}

impl DetectionPhase {
    pub fn is_terminal(self) -> bool {
        !matches!(self, DetectionPhase::Idle | DetectionPhase::Loading)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DetectionPhase::Idle => "idle",
            DetectionPhase::Loading => "loading",
            DetectionPhase::NoWorkspace => "no_workspace",
            DetectionPhase::InvalidFormat => "invalid_format",
            DetectionPhase::NotFound => "not_found",
            DetectionPhase::LoadFailed => "load_failed",
            DetectionPhase::UnexpectedFailure => "unexpected_failure",
            DetectionPhase::Resolved => "resolved",
        }
    }
}

/// Snapshot of what a controller knows about the current host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubdomainState {
    pub subdomain: Option<String>,
    pub workspace: Option<Workspace>,
    pub is_loading: bool,
    pub error: Option<String>,
    pub is_valid_workspace: bool,
    pub phase: DetectionPhase,
}

impl SubdomainState {
    pub fn idle() -> Self {
        Self {
            subdomain: None,
            workspace: None,
            is_loading: false,
            error: None,
            is_valid_workspace: false,
            phase: DetectionPhase::Idle,
        }
    }

    pub fn loading() -> Self {
        Self {
            is_loading: true,
            phase: DetectionPhase::Loading,
            ..Self::idle()
        }
    }

    pub fn no_workspace() -> Self {
        Self {
            phase: DetectionPhase::NoWorkspace,
            ..Self::idle()
        }
    }

    pub fn invalid_format(subdomain: String, message: &str) -> Self {
        Self {
            subdomain: Some(subdomain),
            error: Some(format!("Invalid subdomain format: {}", message)),
            phase: DetectionPhase::InvalidFormat,
            ..Self::idle()
        }
    }

    pub fn failed(subdomain: Option<String>, phase: DetectionPhase, error: String) -> Self {
        Self {
            subdomain,
            error: Some(error),
            phase,
            ..Self::idle()
        }
    }

    pub fn resolved(subdomain: String, workspace: Workspace) -> Self {
        Self {
            subdomain: Some(subdomain),
            workspace: Some(workspace),
            is_valid_workspace: true,
            phase: DetectionPhase::Resolved,
            ..Self::idle()
        }
    }
}

impl Default for SubdomainState {
    fn default() -> Self {
        Self::idle()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workspace::types::fixtures;

    #[test]
    fn test_json_shape() {
        let state = SubdomainState::resolved("acme".into(), fixtures::workspace("w1", "acme"));
        let json = serde_json::to_value(&state).unwrap();
        assert_eq!(json["subdomain"], "acme");
        assert_eq!(json["workspace"]["id"], "w1");
        assert_eq!(json["isLoading"], false);
        assert_eq!(json["isValidWorkspace"], true);
        assert!(json["error"].is_null());
        assert_eq!(json["phase"], "resolved");
    }

    #[test]
    fn test_invalid_format_message() {
        let state = SubdomainState::invalid_format("a".into(), "Subdomain must be at least 2 characters");
        assert_eq!(
            state.error.as_deref(),
            Some("Invalid subdomain format: Subdomain must be at least 2 characters")
        );
        assert!(!state.is_valid_workspace);
    }

    #[test]
    fn test_terminal_phases() {
        assert!(!DetectionPhase::Idle.is_terminal());
        assert!(!DetectionPhase::Loading.is_terminal());
        assert!(DetectionPhase::NoWorkspace.is_terminal());
        assert!(DetectionPhase::Resolved.is_terminal());
    }
}
