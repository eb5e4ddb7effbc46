//! HTTP surface.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware stack)
//!     → request.rs (host, scheme, token, request ID)
//!     → handlers.rs
//!         /workspace       → controller → SubdomainState
//!         /workspace/view  → controller → workspace guard
//!         /dashboard       → controller + memberships → dashboard guard
//!         /auth/session    → session propagator (issue cookie)
//!         /auth/clear      → session propagator (expire cookie)
//!     → error.rs (4xx bodies)
//! ```

pub mod error;
pub mod handlers;
pub mod request;
pub mod server;

pub use error::{ApiError, ServerError};
pub use request::X_REQUEST_ID;
pub use server::{AppState, HttpServer};
