//! Workspace memberships of the signed-in principal.

use async_trait::async_trait;

use crate::workspace::types::{CompanyListEnvelope, Workspace};

/// Workspaces a principal belongs to, plus the one they last used.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Membership {
    pub workspace_ids: Vec<String>,
    pub current: Option<Workspace>,
}

impl Membership {
    /// Entries equal to `workspace_id`. Duplicates count separately.
    pub fn match_count(&self, workspace_id: &str) -> usize {
        self.workspace_ids
            .iter()
            .filter(|id| id.as_str() == workspace_id)
            .count()
    }

    /// The current workspace, if the principal is a member of it.
    pub fn current_member_workspace(&self) -> Option<&Workspace> {
        self.current
            .as_ref()
            .filter(|ws| self.match_count(&ws.id) > 0)
    }
}

impl From<CompanyListEnvelope> for Membership {
    fn from(envelope: CompanyListEnvelope) -> Self {
        let current = envelope.current_company_id.as_deref().and_then(|id| {
            envelope
                .companies
                .iter()
                .find(|c| c.id == id)
                .cloned()
        });
        Self {
            workspace_ids: envelope.companies.into_iter().map(|c| c.id).collect(),
            current,
        }
    }
}

/// Supplies memberships for a bearer token.
#[async_trait]
pub trait MembershipSource: Send + Sync + std::fmt::Debug {
    /// Never fails: an unreachable source reads as "no memberships".
    async fn memberships(&self, token: &str) -> Membership;
}

/// Reads memberships from `GET {base}/companies/mine`.
#[derive(Debug, Clone)]
pub struct HttpMembershipSource {
    client: reqwest::Client,
    base_url: String,
}

impl HttpMembershipSource {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl MembershipSource for HttpMembershipSource {
    async fn memberships(&self, token: &str) -> Membership {
        let url = format!("{}/companies/mine", self.base_url);
        let response = match self.client.get(&url).bearer_auth(token).send().await {
            Ok(r) if r.status().is_success() => r,
            Ok(r) => {
                tracing::warn!(status = %r.status(), "Membership lookup returned error status");
                return Membership::default();
            }
            Err(e) => {
                tracing::warn!(error = %e, "Membership lookup failed");
                return Membership::default();
            }
        };

        match response.json::<CompanyListEnvelope>().await {
            Ok(envelope) => envelope.into(),
            Err(e) => {
                tracing::warn!(error = %e, "Malformed membership body");
                Membership::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workspace::types::fixtures;

    #[test]
    fn test_duplicates_are_kept() {
        let m = Membership {
            workspace_ids: vec!["w1".into(), "w1".into(), "w2".into()],
            current: Some(fixtures::workspace("w1", "acme")),
        };
        assert_eq!(m.match_count("w1"), 2);
        assert_eq!(m.current_member_workspace().map(|w| w.id.as_str()), Some("w1"));
    }

    #[test]
    fn test_current_without_membership() {
        let m = Membership {
            workspace_ids: vec!["w2".into()],
            current: Some(fixtures::workspace("w1", "acme")),
        };
        assert_eq!(m.match_count("w1"), 0);
        assert!(m.current_member_workspace().is_none());
    }

    #[test]
    fn test_from_envelope_picks_current() {
        let envelope = CompanyListEnvelope {
            companies: vec![fixtures::workspace("w1", "acme"), fixtures::workspace("w2", "beta")],
            current_company_id: Some("w2".into()),
        };
        let m = Membership::from(envelope);
        assert_eq!(m.workspace_ids, vec!["w1".to_string(), "w2".to_string()]);
        assert_eq!(m.current.map(|w| w.subdomain), Some("beta".to_string()));
    }

    #[test]
    fn test_from_envelope_unknown_current() {
        let envelope = CompanyListEnvelope {
            companies: vec![fixtures::workspace("w1", "acme")],
            current_company_id: Some("w9".into()),
        };
        assert!(Membership::from(envelope).current.is_none());
    }
}
