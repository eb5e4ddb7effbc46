//! Workspace identification subsystem.
//!
//! # Data Flow
//! ```text
//! Hostname ("acme.localhost:8080", "acme.uproom.com")
//!     → extractor.rs (pick candidate subdomain label)
//!     → validator.rs (syntactic checks on the label)
//!     → resolver.rs (remote lookup of workspace metadata)
//!     → Workspace (types.rs)
//! ```
//!
//! # Design Decisions
//! - Extractor and validator are pure functions, usable outside any server
//! - Resolver sits behind a trait so the controller can be tested offline
//! - Only "not found" is distinguished from every other lookup failure

pub mod extractor;
pub mod resolver;
pub mod types;
pub mod validator;

pub use extractor::{extract_subdomain, is_subdomain_host, strip_port};
pub use resolver::{HttpWorkspaceResolver, ResolveError, ResolveOutcome, WorkspaceResolver};
pub use types::Workspace;
pub use validator::{validate_subdomain, ValidationOutcome};
