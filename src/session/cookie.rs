//! Auth cookie formatting, parsing, and cookie jars.
//!
//! Cookie layout:
//! `auth_token=<token>; expires=<RFC 1123 date>; domain=.<root>; path=/; secure; samesite=lax`
//!
//! `secure` is written only when the page is served over https. The
//! `domain` attribute is omitted when the root has no dot (`localhost`),
//! which leaves a host-only cookie.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use axum::http::{header, HeaderMap};
use chrono::{DateTime, Utc};

use crate::clock::Clock;
use crate::session::storage::StorageError;

/// Expiry used to delete a cookie.
pub const EXPIRED_DATE: &str = "Thu, 01 Jan 1970 00:00:00 GMT";

/// Format a timestamp as an RFC 1123 HTTP date.
pub fn format_http_date(at: DateTime<Utc>) -> String {
    at.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

/// Parent domain shared by a host and all of its subdomains.
///
/// Hosts under `production_root` share `production_root` itself, however
/// many labels either has (`acme.uproom.co.uk` → `uproom.co.uk`). Any
/// development host maps to `localhost`. Other hosts keep their last two
/// labels.
pub fn root_domain(hostname: &str, production_root: &str) -> String {
    let host = crate::workspace::strip_port(hostname);
    if host.contains("localhost") {
        return "localhost".to_string();
    }

    let production_root = production_root.trim_start_matches('.');
    if !production_root.is_empty()
        && (host == production_root
            || host
                .strip_suffix(production_root)
                .is_some_and(|prefix| prefix.ends_with('.')))
    {
        return production_root.to_string();
    }

    let labels: Vec<&str> = host.split('.').collect();
    if labels.len() <= 2 {
        return host.to_string();
    }
    labels[labels.len() - 2..].join(".")
}

/// Build the `Set-Cookie` string for the auth token.
pub fn build_cookie(
    name: &str,
    value: &str,
    expires: &str,
    root: &str,
    secure: bool,
) -> String {
    let mut cookie = format!("{}={}; expires={}", name, value, expires);
    if root.contains('.') {
        cookie.push_str(&format!("; domain=.{}", root));
    }
    cookie.push_str("; path=/");
    if secure {
        cookie.push_str("; secure");
    }
    cookie.push_str("; samesite=lax");
    cookie
}

/// Find `name` in a `Cookie`-header style string (`a=1; b=2`).
pub fn read_cookie(cookies: &str, name: &str) -> Option<String> {
    cookies
        .split(';')
        .map(str::trim)
        .filter_map(|pair| pair.strip_prefix(name)?.strip_prefix('='))
        .find(|value| !value.is_empty())
        .map(str::to_string)
}

/// A parsed `Set-Cookie` string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetCookie {
    pub name: String,
    pub value: String,
    pub expires: Option<DateTime<Utc>>,
    pub domain: Option<String>,
    pub path: Option<String>,
    pub secure: bool,
}

impl SetCookie {
    pub fn parse(raw: &str) -> Option<Self> {
        let mut parts = raw.split(';').map(str::trim);
        let (name, value) = parts.next()?.split_once('=')?;
        if name.is_empty() {
            return None;
        }

        let mut cookie = SetCookie {
            name: name.to_string(),
            value: value.to_string(),
            expires: None,
            domain: None,
            path: None,
            secure: false,
        };

        for attr in parts {
            let (key, val) = attr.split_once('=').unwrap_or((attr, ""));
            match key.to_ascii_lowercase().as_str() {
                "expires" => {
                    cookie.expires = DateTime::parse_from_rfc2822(val)
                        .ok()
                        .map(|d| d.with_timezone(&Utc));
                }
                "domain" => cookie.domain = Some(val.to_string()),
                "path" => cookie.path = Some(val.to_string()),
                "secure" => cookie.secure = true,
                _ => {}
            }
        }

        Some(cookie)
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires.is_some_and(|at| at <= now)
    }
}

/// Cookie access for the current origin, shaped like `document.cookie`.
pub trait CookieJar: Send + Sync + std::fmt::Debug {
    /// Live cookies as `name=value` pairs joined by `; `.
    fn read(&self) -> String;

    /// Apply one `Set-Cookie` string.
    fn write(&self, set_cookie: &str) -> Result<(), StorageError>;
}

/// Browser-like jar that honours expiry.
#[derive(Debug)]
pub struct MemoryCookieJar {
    clock: Arc<dyn Clock>,
    cookies: Mutex<BTreeMap<String, SetCookie>>,
}

impl MemoryCookieJar {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            cookies: Mutex::new(BTreeMap::new()),
        }
    }

    /// Last written attributes for `name`, expired or not.
    pub fn raw(&self, name: &str) -> Option<SetCookie> {
        self.cookies
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(name)
            .cloned()
    }
}

impl CookieJar for MemoryCookieJar {
    fn read(&self) -> String {
        let now = self.clock.now();
        self.cookies
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .values()
            .filter(|c| !c.is_expired(now))
            .map(|c| format!("{}={}", c.name, c.value))
            .collect::<Vec<_>>()
            .join("; ")
    }

    fn write(&self, set_cookie: &str) -> Result<(), StorageError> {
        let cookie = SetCookie::parse(set_cookie)
            .ok_or_else(|| StorageError::Unavailable("malformed cookie".to_string()))?;
        self.cookies
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(cookie.name.clone(), cookie);
        Ok(())
    }
}

/// Jar over one HTTP exchange: reads the request `Cookie` headers and
/// collects writes as `Set-Cookie` values for the response.
#[derive(Debug, Default)]
pub struct HeaderCookieJar {
    incoming: String,
    outgoing: Mutex<Vec<String>>,
}

impl HeaderCookieJar {
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let incoming = headers
            .get_all(header::COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .collect::<Vec<_>>()
            .join("; ");
        Self {
            incoming,
            outgoing: Mutex::new(Vec::new()),
        }
    }

    /// Drain the `Set-Cookie` values written so far.
    pub fn take_set_cookies(&self) -> Vec<String> {
        std::mem::take(&mut *self.outgoing.lock().unwrap_or_else(|e| e.into_inner()))
    }
}

impl CookieJar for HeaderCookieJar {
    fn read(&self) -> String {
        self.incoming.clone()
    }

    fn write(&self, set_cookie: &str) -> Result<(), StorageError> {
        self.outgoing
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(set_cookie.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use axum::http::HeaderValue;
    use chrono::TimeZone;

    fn clock() -> Arc<ManualClock> {
        Arc::new(ManualClock::new(Utc.with_ymd_and_hms(2024, 5, 6, 7, 8, 9).unwrap()))
    }

    #[test]
    fn test_http_date() {
        let at = Utc.with_ymd_and_hms(2024, 5, 6, 7, 8, 9).unwrap();
        assert_eq!(format_http_date(at), "Mon, 06 May 2024 07:08:09 GMT");
    }

    #[test]
    fn test_root_domain() {
        assert_eq!(root_domain("acme.uproom.com", "uproom.com"), "uproom.com");
        assert_eq!(root_domain("a.b.uproom.com", "uproom.com"), "uproom.com");
        assert_eq!(root_domain("uproom.com:443", "uproom.com"), "uproom.com");
        assert_eq!(root_domain("acme.localhost:8080", "uproom.com"), "localhost");
        assert_eq!(root_domain("localhost:8080", "uproom.com"), "localhost");
        assert_eq!(root_domain("acme-app.lovable.app", "uproom.com"), "lovable.app");
    }

    #[test]
    fn test_root_domain_multi_label_suffix() {
        assert_eq!(root_domain("acme.uproom.co.uk", "uproom.co.uk"), "uproom.co.uk");
        assert_eq!(root_domain("uproom.co.uk", "uproom.co.uk"), "uproom.co.uk");
        // Suffix match has to fall on a label boundary
        assert_eq!(root_domain("notuproom.com", "uproom.com"), "notuproom.com");
    }

    #[test]
    fn test_build_cookie_layout() {
        let cookie = build_cookie("auth_token", "abc", EXPIRED_DATE, "uproom.com", true);
        assert_eq!(
            cookie,
            "auth_token=abc; expires=Thu, 01 Jan 1970 00:00:00 GMT; domain=.uproom.com; path=/; secure; samesite=lax"
        );

        let cookie = build_cookie("auth_token", "abc", EXPIRED_DATE, "localhost", false);
        assert_eq!(
            cookie,
            "auth_token=abc; expires=Thu, 01 Jan 1970 00:00:00 GMT; path=/; samesite=lax"
        );
    }

    #[test]
    fn test_read_cookie() {
        let jar = "theme=dark; auth_token=abc123; other=1";
        assert_eq!(read_cookie(jar, "auth_token").as_deref(), Some("abc123"));
        assert_eq!(read_cookie(jar, "missing"), None);
        // Prefix of another cookie's name must not match
        assert_eq!(read_cookie("auth_token_old=x", "auth_token"), None);
        assert_eq!(read_cookie("auth_token=", "auth_token"), None);
    }

    #[test]
    fn test_set_cookie_parse() {
        let parsed = SetCookie::parse(
            "auth_token=abc; expires=Thu, 01 Jan 1970 00:00:00 GMT; domain=.uproom.com; path=/; secure; samesite=lax",
        )
        .unwrap();
        assert_eq!(parsed.name, "auth_token");
        assert_eq!(parsed.value, "abc");
        assert_eq!(parsed.expires, Some(Utc.timestamp_opt(0, 0).unwrap()));
        assert_eq!(parsed.domain.as_deref(), Some(".uproom.com"));
        assert_eq!(parsed.path.as_deref(), Some("/"));
        assert!(parsed.secure);

        assert!(SetCookie::parse("novalue").is_none());
    }

    #[test]
    fn test_memory_jar_drops_expired() {
        let clock = clock();
        let jar = MemoryCookieJar::new(clock.clone());
        jar.write("a=1; expires=Tue, 07 May 2024 00:00:00 GMT").unwrap();
        jar.write("b=2").unwrap();
        assert_eq!(jar.read(), "a=1; b=2");

        clock.advance(std::time::Duration::from_secs(86_400));
        assert_eq!(jar.read(), "b=2");
        assert!(jar.raw("a").is_some());
    }

    #[test]
    fn test_header_jar() {
        let mut headers = HeaderMap::new();
        headers.append(header::COOKIE, HeaderValue::from_static("a=1"));
        headers.append(header::COOKIE, HeaderValue::from_static("auth_token=xyz"));
        let jar = HeaderCookieJar::from_headers(&headers);
        assert_eq!(read_cookie(&jar.read(), "auth_token").as_deref(), Some("xyz"));

        jar.write("auth_token=new; path=/").unwrap();
        assert_eq!(jar.take_set_cookies(), vec!["auth_token=new; path=/".to_string()]);
        assert!(jar.take_set_cookies().is_empty());
    }
}
