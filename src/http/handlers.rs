//! Request handlers.

use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, HeaderMap, HeaderValue, StatusCode, Uri},
    response::{Html, IntoResponse, Redirect, Response},
    Json,
};
use serde::Deserialize;

use crate::controller::{SubdomainController, SubdomainState};
use crate::http::error::ApiError;
use crate::http::request::{is_secure, request_host, request_id, request_token};
use crate::http::server::AppState;
use crate::routing::{
    dashboard_guard, workspace_guard, AuthContext, DashboardDecision, Membership,
};
use crate::session::{HeaderCookieJar, NoLocalStore, PageLocation, SessionPropagator};

/// Body of `POST /auth/session`.
#[derive(Debug, Deserialize)]
pub struct SessionRequest {
    pub token: String,
}

pub async fn health() -> &'static str {
    "ok"
}

/// Fresh controller run for `host`; nothing is shared between requests.
async fn detect(state: &AppState, host: &str) -> SubdomainState {
    SubdomainController::new(host, state.resolver.clone(), state.environment.clone())
        .detect()
        .await
}

fn host_of(headers: &HeaderMap, uri: &Uri) -> Result<String, ApiError> {
    request_host(headers, uri).ok_or(ApiError::MissingHost)
}

/// `GET /workspace`: detection state for the addressed host.
pub async fn get_workspace(
    State(state): State<AppState>,
    headers: HeaderMap,
    uri: Uri,
) -> Result<Json<SubdomainState>, ApiError> {
    let host = host_of(&headers, &uri)?;
    tracing::debug!(request_id = %request_id(&headers), host = %host, "Detecting workspace");
    Ok(Json(detect(&state, &host).await))
}

/// `GET /workspace/view`: workspace-side guard decision.
pub async fn get_workspace_view(
    State(state): State<AppState>,
    headers: HeaderMap,
    uri: Uri,
) -> Result<Response, ApiError> {
    let host = host_of(&headers, &uri)?;
    let subdomain_state = detect(&state, &host).await;
    let auth = AuthContext::new(request_token(&headers, &state.config.session.cookie_name));

    let view = workspace_guard(&subdomain_state, &auth, &state.environment, &host);
    tracing::debug!(request_id = %request_id(&headers), host = %host, view = view.kind(), "Workspace guard");
    Ok(Json(view).into_response())
}

/// `GET /dashboard`: main-side guard decision. Redirects become `303`.
pub async fn get_dashboard(
    State(state): State<AppState>,
    headers: HeaderMap,
    uri: Uri,
) -> Result<Response, ApiError> {
    let host = host_of(&headers, &uri)?;
    let subdomain_state = detect(&state, &host).await;
    let auth = AuthContext::new(request_token(&headers, &state.config.session.cookie_name));

    let membership = match (&subdomain_state.subdomain, auth.token.as_deref()) {
        (None, Some(token)) if auth.is_authenticated() => {
            state.memberships.memberships(token).await
        }
        _ => Membership::default(),
    };

    let decision = dashboard_guard(&subdomain_state, &auth, &membership, &state.environment, &host);
    tracing::debug!(
        request_id = %request_id(&headers),
        host = %host,
        decision = decision.kind(),
        "Dashboard guard"
    );

    Ok(match decision {
        DashboardDecision::RedirectToWorkspace { url } => Redirect::to(&url).into_response(),
        other => Json(other).into_response(),
    })
}

fn propagator_for(
    state: &AppState,
    headers: &HeaderMap,
    uri: &Uri,
    host: &str,
) -> (SessionPropagator, Arc<HeaderCookieJar>) {
    let jar = Arc::new(HeaderCookieJar::from_headers(headers));
    let propagator = SessionPropagator::new(
        Arc::new(NoLocalStore),
        jar.clone(),
        state.clearer.clone(),
        PageLocation::new(host, is_secure(headers, uri)),
        state.config.session.clone(),
    )
    .with_production_root(&state.config.domains.production_root);
    (propagator, jar)
}

fn set_cookie_headers(cookies: Vec<String>) -> HeaderMap {
    let mut headers = HeaderMap::new();
    for cookie in cookies {
        match HeaderValue::from_str(&cookie) {
            Ok(v) => {
                headers.append(header::SET_COOKIE, v);
            }
            Err(e) => tracing::warn!(error = %e, "Dropping unencodable Set-Cookie value"),
        }
    }
    headers
}

/// `POST /auth/session`: hand back the parent-domain auth cookie.
pub async fn create_session(
    State(state): State<AppState>,
    headers: HeaderMap,
    uri: Uri,
    Json(body): Json<SessionRequest>,
) -> Result<Response, ApiError> {
    let token = body.token.trim();
    if token.is_empty() {
        return Err(ApiError::EmptyToken);
    }
    let host = host_of(&headers, &uri)?;

    let (propagator, jar) = propagator_for(&state, &headers, &uri, &host);
    propagator.set_token(token);

    tracing::info!(request_id = %request_id(&headers), host = %host, "Session cookie issued");
    Ok((StatusCode::NO_CONTENT, set_cookie_headers(jar.take_set_cookies())).into_response())
}

/// `GET /auth/clear`: expire the auth cookie and drop the local copy.
///
/// Loaded by subdomains in the background during logout. Served on the
/// root it only expires; a hit on a subdomain host still notifies the root.
pub async fn clear_session(
    State(state): State<AppState>,
    headers: HeaderMap,
    uri: Uri,
) -> Result<Response, ApiError> {
    let host = host_of(&headers, &uri)?;

    let (propagator, jar) = propagator_for(&state, &headers, &uri, &host);
    propagator.clear_token();

    tracing::info!(request_id = %request_id(&headers), host = %host, "Session cleared");
    let page = clear_page(&state.config.session.cookie_name);
    Ok((set_cookie_headers(jar.take_set_cookies()), Html(page)).into_response())
}

fn clear_page(cookie_name: &str) -> String {
    let key = serde_json::to_string(cookie_name).unwrap_or_else(|_| "\"auth_token\"".to_string());
    format!(
        "<!doctype html><html><head><meta charset=\"utf-8\"><title>Signed out</title></head>\
         <body><script>try {{ localStorage.removeItem({key}); }} catch (e) {{}}</script></body></html>"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clear_page_escapes_key() {
        let page = clear_page("auth_token");
        assert!(page.contains("localStorage.removeItem(\"auth_token\")"));
    }

    #[test]
    fn test_set_cookie_headers_skips_invalid() {
        let headers = set_cookie_headers(vec!["a=1".into(), "b=\n2".into()]);
        assert_eq!(headers.get_all(header::SET_COOKIE).iter().count(), 1);
    }
}
