//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (tracing, timeout, request ID, rate limit)
//! - Build shared collaborators (resolver, membership source, clearer)
//! - Bind server to listener and shut down gracefully

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::GatewayConfig;
use crate::controller::DomainEnvironment;
use crate::http::error::ServerError;
use crate::http::handlers;
use crate::routing::{HttpMembershipSource, MembershipSource};
use crate::security::{rate_limit_middleware, RateLimiter};
use crate::session::{CrossDomainClearer, HttpCrossDomainClearer};
use crate::workspace::{HttpWorkspaceResolver, WorkspaceResolver};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<GatewayConfig>,
    pub environment: DomainEnvironment,
    pub resolver: Arc<dyn WorkspaceResolver>,
    pub memberships: Arc<dyn MembershipSource>,
    pub clearer: Arc<dyn CrossDomainClearer>,
}

impl AppState {
    /// State backed by the configured REST API.
    pub fn from_config(config: GatewayConfig) -> Result<Self, ServerError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.api.timeout_secs))
            .build()?;

        let resolver = HttpWorkspaceResolver::with_client(client.clone(), &config.api.base_url);
        let memberships = HttpMembershipSource::new(client.clone(), &config.api.base_url);
        let clearer = HttpCrossDomainClearer::new(
            client,
            Duration::from_millis(config.session.clear_timeout_ms),
        );

        Ok(Self {
            environment: DomainEnvironment::from(&config.domains),
            config: Arc::new(config),
            resolver: Arc::new(resolver),
            memberships: Arc::new(memberships),
            clearer: Arc::new(clearer),
        })
    }
}

/// HTTP server for the workspace gateway.
pub struct HttpServer {
    router: Router,
    config: Arc<GatewayConfig>,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: GatewayConfig) -> Result<Self, ServerError> {
        Ok(Self::with_state(AppState::from_config(config)?))
    }

    /// Create a server around prepared state (custom collaborators).
    pub fn with_state(state: AppState) -> Self {
        let config = state.config.clone();
        let router = Self::build_router(&config, state);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &GatewayConfig, state: AppState) -> Router {
        let api = Router::new()
            .route("/workspace", get(handlers::get_workspace))
            .route("/workspace/view", get(handlers::get_workspace_view))
            .route("/dashboard", get(handlers::get_dashboard))
            .route("/auth/session", post(handlers::create_session))
            .route(&config.session.clear_path, get(handlers::clear_session))
            .with_state(state);

        let api = if config.rate_limit.enabled {
            let limiter = Arc::new(RateLimiter::new(&config.rate_limit));
            api.layer(middleware::from_fn_with_state(limiter, rate_limit_middleware))
        } else {
            api
        };

        Router::new()
            .route("/health", get(handlers::health))
            .merge(api)
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
    }

    /// The assembled router, for in-process testing.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), ServerError> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            production_root = %self.config.domains.production_root,
            "HTTP server starting"
        );

        let app = self.router.into_make_service_with_connect_info::<SocketAddr>();

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }
}
