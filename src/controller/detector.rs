//! The subdomain controller: runs detection and owns its state.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::watch;

use crate::controller::navigation::{DomainEnvironment, Navigator, NoopNavigator};
use crate::controller::state::{DetectionPhase, SubdomainState, DETECTION_FAILED};
use crate::observability::metrics;
use crate::workspace::{extract_subdomain, validate_subdomain, ResolveError, WorkspaceResolver};

/// Sequences extraction, validation, and resolution for one page's host.
#[derive(Debug)]
pub struct SubdomainController {
    hostname: String,
    resolver: Arc<dyn WorkspaceResolver>,
    navigator: Arc<dyn Navigator>,
    environment: DomainEnvironment,
    state: watch::Sender<SubdomainState>,
    mounted: AtomicBool,
}

impl SubdomainController {
    pub fn new(
        hostname: impl Into<String>,
        resolver: Arc<dyn WorkspaceResolver>,
        environment: DomainEnvironment,
    ) -> Self {
        let (state, _) = watch::channel(SubdomainState::idle());
        Self {
            hostname: hostname.into(),
            resolver,
            navigator: Arc::new(NoopNavigator),
            environment,
            state,
            mounted: AtomicBool::new(true),
        }
    }

    pub fn with_navigator(mut self, navigator: Arc<dyn Navigator>) -> Self {
        self.navigator = navigator;
        self
    }

    /// Observe state changes.
    pub fn subscribe(&self) -> watch::Receiver<SubdomainState> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> SubdomainState {
        self.state.borrow().clone()
    }

    /// Detach from observers. An in-flight detection still completes but
    /// its result is no longer published.
    pub fn unmount(&self) {
        self.mounted.store(false, Ordering::SeqCst);
    }

    fn publish(&self, state: SubdomainState) {
        if self.mounted.load(Ordering::SeqCst) {
            self.state.send_replace(state);
        } else {
            tracing::debug!(host = %self.hostname, phase = state.phase.as_str(), "Dropping state after unmount");
        }
    }

    /// Run the detection sequence once and return its terminal state.
    pub async fn detect(&self) -> SubdomainState {
        self.publish(SubdomainState::loading());

        let next = self.run_sequence().await;
        debug_assert!(next.phase.is_terminal());

        tracing::debug!(
            host = %self.hostname,
            subdomain = ?next.subdomain,
            phase = next.phase.as_str(),
            "Workspace detection finished"
        );
        metrics::record_detection(next.phase.as_str());
        self.publish(next.clone());
        next
    }

    async fn run_sequence(&self) -> SubdomainState {
        let Some(subdomain) = extract_subdomain(&self.hostname) else {
            return SubdomainState::no_workspace();
        };

        let validation = validate_subdomain(&subdomain);
        if !validation.is_valid {
            return SubdomainState::invalid_format(subdomain, &validation.message);
        }

        // Spawned so that a panicking resolver lands in the catch-all branch
        let resolver = self.resolver.clone();
        let identifier = subdomain.clone();
        let lookup = tokio::spawn(async move { resolver.resolve(&identifier).await });

        match lookup.await {
            Ok(Ok(workspace)) => SubdomainState::resolved(subdomain, workspace),
            Ok(Err(e @ ResolveError::NotFound)) => {
                SubdomainState::failed(Some(subdomain), DetectionPhase::NotFound, e.to_string())
            }
            Ok(Err(e @ ResolveError::LoadFailed)) => {
                SubdomainState::failed(Some(subdomain), DetectionPhase::LoadFailed, e.to_string())
            }
            Err(e) => {
                tracing::error!(host = %self.hostname, error = %e, "Workspace detection crashed");
                SubdomainState::failed(
                    Some(subdomain),
                    DetectionPhase::UnexpectedFailure,
                    DETECTION_FAILED.to_string(),
                )
            }
        }
    }

    /// Navigate to `identifier`'s workspace and return the URL used.
    pub fn redirect_to_workspace(&self, identifier: &str) -> String {
        let url = self.environment.workspace_url(identifier, &self.hostname);
        self.navigator.navigate(&url);
        url
    }

    /// Navigate to the bare root domain and return the URL used.
    pub fn redirect_to_main_domain(&self) -> String {
        let url = self.environment.main_domain_url(&self.hostname);
        self.navigator.navigate(&url);
        url
    }
}
