//! Subdomain extraction from hostnames.
//!
//! # Rules
//! - Development hosts (containing `localhost`): `<label>.localhost[:port]`
//!   yields `<label>` unless the label is `localhost` or `www`.
//! - Production hosts: three or more labels yield the first label unless it
//!   is `www`. Two labels (the bare root) yield nothing.
//!
//! Hosts with more than three labels are not special-cased: the first label
//! is always the candidate, so `a.b.uproom.com` resolves to `a`.

/// Strip an optional `:port` suffix from a host.
pub fn strip_port(host: &str) -> &str {
    match host.rsplit_once(':') {
        Some((name, port)) if !port.is_empty() && port.bytes().all(|b| b.is_ascii_digit()) => name,
        _ => host,
    }
}

/// Map a hostname to the workspace label it addresses, if any.
pub fn extract_subdomain(hostname: &str) -> Option<String> {
    let host = strip_port(hostname);

    if hostname.contains("localhost") {
        let parts: Vec<&str> = host.split('.').collect();
        if parts.len() >= 2 && parts[1] == "localhost" {
            let candidate = parts[0];
            if candidate != "localhost" && candidate != "www" {
                return Some(candidate.to_string());
            }
        }
        return None;
    }

    let parts: Vec<&str> = host.split('.').collect();
    if parts.len() >= 3 {
        if parts[0] == "www" {
            return None;
        }
        return Some(parts[0].to_string());
    }

    None
}

/// A page is on a subdomain when its host has a dot and is not a dev host.
///
/// This is the coarse check used for session propagation, not the extractor.
pub fn is_subdomain_host(hostname: &str) -> bool {
    hostname.contains('.') && !hostname.contains("localhost")
}
