//! Subdomain detection state machine.
//!
//! # Data Flow
//! ```text
//! detect(hostname)
//!     Idle → Loading
//!     → extractor   (None        → NoWorkspace)
//!     → validator   (invalid     → InvalidFormat)
//!     → resolver    (404 / other → NotFound / LoadFailed)
//!                   (panic       → UnexpectedFailure)
//!     → Resolved
//! ```
//!
//! # Design Decisions
//! - One controller owns one `SubdomainState`; nothing else mutates it
//! - State is published through a `watch` channel for observers
//! - No deduplication between controllers, no retry, no abort on unmount
//! - Results arriving after `unmount` are dropped

pub mod detector;
pub mod navigation;
pub mod state;

pub use detector::SubdomainController;
pub use navigation::{DomainEnvironment, Navigator, NoopNavigator};
pub use state::{DetectionPhase, SubdomainState};
