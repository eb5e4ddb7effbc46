//! Environment-aware URLs for workspaces and the main site.
//!
//! # Design Decisions
//! - Main-site precedence: hosted preview, then local dev, then production
//! - Workspace URLs use the dev root on local hosts and production otherwise;
//!   preview deployments cannot host wildcard subdomains

use crate::config::DomainConfig;
use crate::workspace::strip_port;

/// Root domains for each environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainEnvironment {
    pub dev_root: String,
    pub preview_suffix: String,
    pub production_root: String,
}

impl From<&DomainConfig> for DomainEnvironment {
    fn from(config: &DomainConfig) -> Self {
        Self {
            dev_root: config.dev_root.clone(),
            preview_suffix: config.preview_suffix.clone(),
            production_root: config.production_root.clone(),
        }
    }
}

impl Default for DomainEnvironment {
    fn default() -> Self {
        Self::from(&DomainConfig::default())
    }
}

impl DomainEnvironment {
    pub fn is_preview(&self, host: &str) -> bool {
        !self.preview_suffix.is_empty() && strip_port(host).ends_with(&self.preview_suffix)
    }

    pub fn is_dev(&self, host: &str) -> bool {
        host.contains("localhost")
    }

    /// URL of `identifier`'s workspace as seen from `current_host`.
    pub fn workspace_url(&self, identifier: &str, current_host: &str) -> String {
        if self.is_dev(current_host) {
            format!("http://{}.{}", identifier, self.dev_root)
        } else {
            format!("https://{}.{}", identifier, self.production_root)
        }
    }

    /// URL of the bare root domain. First matching environment wins.
    pub fn main_domain_url(&self, current_host: &str) -> String {
        if self.is_preview(current_host) {
            format!("https://{}", strip_port(current_host))
        } else if self.is_dev(current_host) {
            format!("http://{}", self.dev_root)
        } else {
            format!("https://{}", self.production_root)
        }
    }
}

/// Performs a top-level navigation.
pub trait Navigator: Send + Sync + std::fmt::Debug {
    fn navigate(&self, url: &str);
}

/// Navigator for contexts that hand the URL back instead (HTTP redirects).
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopNavigator;

impl Navigator for NoopNavigator {
    fn navigate(&self, url: &str) {
        tracing::debug!(url = %url, "Navigation requested");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_workspace_url() {
        let env = DomainEnvironment::default();
        assert_eq!(env.workspace_url("acme", "localhost:8080"), "http://acme.localhost:8080");
        assert_eq!(env.workspace_url("acme", "uproom.com"), "https://acme.uproom.com");
        assert_eq!(env.workspace_url("acme", "demo.lovable.app"), "https://acme.uproom.com");
    }

    #[test]
    fn test_main_domain_precedence() {
        let env = DomainEnvironment::default();
        assert_eq!(env.main_domain_url("demo.lovable.app"), "https://demo.lovable.app");
        assert_eq!(env.main_domain_url("acme.localhost:8080"), "http://localhost:8080");
        assert_eq!(env.main_domain_url("acme.uproom.com"), "https://uproom.com");
    }

    #[test]
    fn test_preview_checked_before_localhost() {
        let env = DomainEnvironment {
            preview_suffix: "localhost.preview".into(),
            ..DomainEnvironment::default()
        };
        assert_eq!(
            env.main_domain_url("x.localhost.preview"),
            "https://x.localhost.preview"
        );
    }

    #[test]
    fn test_empty_preview_suffix_never_matches() {
        let env = DomainEnvironment {
            preview_suffix: String::new(),
            ..DomainEnvironment::default()
        };
        assert!(!env.is_preview("anything.com"));
    }
}
