//! Workspace gateway.
//!
//! Resolves company workspaces from the subdomain a request addresses,
//! propagates the auth token across the root domain and its subdomains, and
//! decides where workspace and dashboard requests should land.
//!
//! # Architecture Overview
//!
//! ```text
//!   Host header ─▶ workspace::extractor ─▶ workspace::validator ─▶ workspace::resolver
//!                                   \________________ controller ________________/
//!                                                      │ SubdomainState
//!                                                      ▼
//!   bearer / cookie ─────────────────────────▶ routing guards ─▶ view / redirect
//!
//!   login / logout ─▶ session::propagator ─▶ token store + .<root> cookie
//!                                        └─▶ <root>/auth/clear (background)
//! ```

// Core subsystems
pub mod controller;
pub mod routing;
pub mod session;
pub mod workspace;

// Surface
pub mod http;

// Cross-cutting concerns
pub mod clock;
pub mod config;
pub mod lifecycle;
pub mod observability;
pub mod security;

pub use config::GatewayConfig;
pub use controller::{SubdomainController, SubdomainState};
pub use http::HttpServer;
pub use lifecycle::Shutdown;
