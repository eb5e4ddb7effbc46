//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request:
//!     → rate_limit.rs (per-client token bucket)
//!     → Pass to handlers
//! ```
//!
//! # Design Decisions
//! - Limiter state is an explicit struct with an injected clock
//! - Clients are keyed by first `X-Forwarded-For` hop, else peer IP

pub mod rate_limit;

pub use rate_limit::{rate_limit_middleware, RateLimiter};
