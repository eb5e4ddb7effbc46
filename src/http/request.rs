//! Request inspection helpers.
//!
//! # Responsibilities
//! - Work out which host the browser addressed
//! - Work out whether the browser used https
//! - Find the caller's auth token (bearer header, else cookie)
//!
//! # Design Decisions
//! - `X-Forwarded-*` headers win, the gateway usually sits behind a proxy
//! - Hosts are lowercased (case-insensitive per HTTP)

use axum::http::{header, HeaderMap, Uri};

use crate::session::cookie::read_cookie;

pub const X_REQUEST_ID: &str = "x-request-id";

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

/// Host the client addressed, including any port.
pub fn request_host(headers: &HeaderMap, uri: &Uri) -> Option<String> {
    header_str(headers, "x-forwarded-host")
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .or_else(|| header_str(headers, header::HOST.as_str()))
        .or_else(|| uri.authority().map(|a| a.as_str()))
        .map(str::to_ascii_lowercase)
}

pub fn is_secure(headers: &HeaderMap, uri: &Uri) -> bool {
    match header_str(headers, "x-forwarded-proto") {
        Some(proto) => proto.eq_ignore_ascii_case("https"),
        None => uri.scheme_str() == Some("https"),
    }
}

/// Bearer token from `Authorization`, else the auth cookie.
pub fn request_token(headers: &HeaderMap, cookie_name: &str) -> Option<String> {
    if let Some(token) = header_str(headers, header::AUTHORIZATION.as_str())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
    {
        return Some(token.to_string());
    }

    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find_map(|cookies| read_cookie(cookies, cookie_name))
}

pub fn request_id(headers: &HeaderMap) -> &str {
    header_str(headers, X_REQUEST_ID).unwrap_or("unknown")
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(pairs: &[(&'static str, &'static str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (k, v) in pairs {
            map.append(*k, HeaderValue::from_static(*v));
        }
        map
    }

    #[test]
    fn test_host_sources() {
        let uri: Uri = "/workspace".parse().unwrap();
        assert_eq!(
            request_host(&headers(&[("host", "ACME.uproom.com")]), &uri).as_deref(),
            Some("acme.uproom.com")
        );
        assert_eq!(
            request_host(
                &headers(&[("host", "gateway:8080"), ("x-forwarded-host", "acme.uproom.com")]),
                &uri
            )
            .as_deref(),
            Some("acme.uproom.com")
        );
        assert_eq!(request_host(&HeaderMap::new(), &uri), None);

        let absolute: Uri = "http://beta.localhost:8080/workspace".parse().unwrap();
        assert_eq!(
            request_host(&HeaderMap::new(), &absolute).as_deref(),
            Some("beta.localhost:8080")
        );
    }

    #[test]
    fn test_is_secure() {
        let uri: Uri = "/".parse().unwrap();
        assert!(is_secure(&headers(&[("x-forwarded-proto", "https")]), &uri));
        assert!(!is_secure(&headers(&[("x-forwarded-proto", "http")]), &uri));
        assert!(!is_secure(&HeaderMap::new(), &uri));
    }

    #[test]
    fn test_token_from_bearer_then_cookie() {
        let h = headers(&[("authorization", "Bearer abc"), ("cookie", "auth_token=zzz")]);
        assert_eq!(request_token(&h, "auth_token").as_deref(), Some("abc"));

        let h = headers(&[("cookie", "theme=dark; auth_token=zzz")]);
        assert_eq!(request_token(&h, "auth_token").as_deref(), Some("zzz"));

        let h = headers(&[("authorization", "Basic Zm9v")]);
        assert_eq!(request_token(&h, "auth_token"), None);
    }
}
