//! Out-of-band session clear on the root domain.
//!
//! A subdomain cannot touch the root origin's storage directly, so logout
//! asks the root's clear-session page to do it. The request is detached and
//! bounded by a timeout; nobody waits for or learns its result beyond a log
//! line. Reliable logout would need server-side session invalidation.

use std::time::Duration;

/// Fire-and-forget trigger for the root domain's clear-session page.
pub trait CrossDomainClearer: Send + Sync + std::fmt::Debug {
    fn trigger(&self, clear_url: &str);
}

/// Issues a detached GET against the clear-session URL.
#[derive(Debug, Clone)]
pub struct HttpCrossDomainClearer {
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpCrossDomainClearer {
    pub fn new(client: reqwest::Client, timeout: Duration) -> Self {
        Self { client, timeout }
    }
}

impl CrossDomainClearer for HttpCrossDomainClearer {
    fn trigger(&self, clear_url: &str) {
        let handle = match tokio::runtime::Handle::try_current() {
            Ok(h) => h,
            Err(_) => {
                tracing::warn!(url = %clear_url, "No async runtime, skipping cross-domain clear");
                return;
            }
        };

        let request = self.client.get(clear_url).send();
        let timeout = self.timeout;
        let url = clear_url.to_string();

        handle.spawn(async move {
            match tokio::time::timeout(timeout, request).await {
                Ok(Ok(response)) => {
                    tracing::debug!(url = %url, status = %response.status(), "Cross-domain clear sent");
                }
                Ok(Err(e)) => {
                    tracing::warn!(url = %url, error = %e, "Cross-domain clear failed");
                }
                Err(_) => {
                    tracing::debug!(url = %url, ?timeout, "Cross-domain clear abandoned after timeout");
                }
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trigger_outside_runtime_is_noop() {
        let clearer = HttpCrossDomainClearer::new(reqwest::Client::new(), Duration::from_secs(1));
        clearer.trigger("http://uproom.invalid/auth/clear");
    }
}
