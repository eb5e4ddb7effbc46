//! Auth token propagation across the root domain and its subdomains.

use std::sync::Arc;

use crate::clock::{Clock, SystemClock};
use crate::config::{DomainConfig, SessionConfig};
use crate::session::clear::CrossDomainClearer;
use crate::session::cookie::{self, CookieJar};
use crate::session::storage::TokenStore;
use crate::workspace::{is_subdomain_host, strip_port};

/// Where the current page lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageLocation {
    /// Host including optional port.
    pub hostname: String,

    /// Served over https.
    pub secure: bool,
}

impl PageLocation {
    pub fn new(hostname: impl Into<String>, secure: bool) -> Self {
        Self {
            hostname: hostname.into(),
            secure,
        }
    }

    fn protocol(&self) -> &'static str {
        if self.secure {
            "https"
        } else {
            "http"
        }
    }
}

/// Keeps the auth token in per-origin storage and a parent-domain cookie.
///
/// None of the operations fail: storage and cookie errors are logged and
/// the caller's login/logout flow carries on.
#[derive(Debug)]
pub struct SessionPropagator {
    store: Arc<dyn TokenStore>,
    jar: Arc<dyn CookieJar>,
    clearer: Arc<dyn CrossDomainClearer>,
    clock: Arc<dyn Clock>,
    location: PageLocation,
    settings: SessionConfig,
    production_root: String,
}

impl SessionPropagator {
    pub fn new(
        store: Arc<dyn TokenStore>,
        jar: Arc<dyn CookieJar>,
        clearer: Arc<dyn CrossDomainClearer>,
        location: PageLocation,
        settings: SessionConfig,
    ) -> Self {
        Self {
            store,
            jar,
            clearer,
            clock: Arc::new(SystemClock),
            location,
            settings,
            production_root: DomainConfig::default().production_root,
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Root domain that production hosts share their cookie under.
    pub fn with_production_root(mut self, production_root: impl Into<String>) -> Self {
        self.production_root = production_root.into();
        self
    }

    fn root(&self) -> String {
        cookie::root_domain(&self.location.hostname, &self.production_root)
    }

    /// True when the page sits below its cookie root, so the root's own
    /// storage is out of reach and has to be cleared by a request.
    fn below_root(&self) -> bool {
        is_subdomain_host(&self.location.hostname)
            && strip_port(&self.location.hostname) != self.root()
    }

    /// Store the token locally and in a cookie every subdomain can read.
    ///
    /// Idempotent; calling it again repairs a half-applied earlier call.
    pub fn set_token(&self, token: &str) {
        if let Err(e) = self.store.set(&self.settings.cookie_name, token) {
            tracing::warn!(error = %e, "Failed to store auth token locally");
        }

        let expires = self.clock.now() + chrono::Duration::days(self.settings.max_age_days);
        let set_cookie = cookie::build_cookie(
            &self.settings.cookie_name,
            token,
            &cookie::format_http_date(expires),
            &self.root(),
            self.location.secure,
        );
        if let Err(e) = self.jar.write(&set_cookie) {
            tracing::warn!(error = %e, "Failed to set cross-domain auth cookie");
        }
    }

    /// Local store first, then the cookie. A cookie hit is copied into the
    /// local store so both agree afterwards.
    pub fn get_token(&self) -> Option<String> {
        match self.store.get(&self.settings.cookie_name) {
            Ok(Some(token)) => return Some(token),
            Ok(None) => {}
            Err(e) => tracing::warn!(error = %e, "Failed to read local auth token"),
        }

        let token = cookie::read_cookie(&self.jar.read(), &self.settings.cookie_name)?;
        if let Err(e) = self.store.set(&self.settings.cookie_name, &token) {
            tracing::warn!(error = %e, "Failed to backfill auth token from cookie");
        }
        Some(token)
    }

    /// Remove the token everywhere this origin can reach, and ask the root
    /// domain to do the same when running on a subdomain.
    ///
    /// On the root itself nothing further is notified, so the root's clear
    /// page never calls back into itself.
    pub fn clear_token(&self) {
        if let Err(e) = self.store.remove(&self.settings.cookie_name) {
            tracing::warn!(error = %e, "Failed to remove local auth token");
        }

        let set_cookie = cookie::build_cookie(
            &self.settings.cookie_name,
            "",
            cookie::EXPIRED_DATE,
            &self.root(),
            self.location.secure,
        );
        if let Err(e) = self.jar.write(&set_cookie) {
            tracing::warn!(error = %e, "Failed to expire auth cookie");
        }

        if self.below_root() {
            let url = format!(
                "{}://{}{}",
                self.location.protocol(),
                self.root(),
                self.settings.clear_path
            );
            tracing::debug!(url = %url, "Clearing session on root domain");
            self.clearer.trigger(&url);
        }
    }
}
