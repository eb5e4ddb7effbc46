//! Cross-domain session propagation.
//!
//! # Data Flow
//! ```text
//! login  → propagator.set_token
//!            → storage.rs (per-origin store)
//!            → cookie.rs  (cookie on .<root>, visible to every subdomain)
//! read   → propagator.get_token
//!            → storage.rs, else cookie.rs (+ backfill storage)
//! logout → propagator.clear_token
//!            → storage.rs remove, cookie.rs expire
//!            → on a subdomain: clear.rs hits <root>/auth/clear in the background
//! ```
//!
//! # Design Decisions
//! - Propagation is advisory: write failures are logged, never returned
//! - Store and cookie are written independently; reads reconcile them
//! - The cross-domain clear is fire-and-forget with a bounded timeout

pub mod clear;
pub mod cookie;
pub mod propagator;
pub mod storage;

pub use clear::{CrossDomainClearer, HttpCrossDomainClearer};
pub use cookie::{CookieJar, HeaderCookieJar, MemoryCookieJar};
pub use propagator::{PageLocation, SessionPropagator};
pub use storage::{MemoryTokenStore, NoLocalStore, StorageError, TokenStore};
