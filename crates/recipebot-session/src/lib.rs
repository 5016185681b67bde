//! Per-user dialogue sessions with automatic expiry.
//!
//! # Main types
//!
//! - [`Session`]: Where a user stands in the URL → title → tag → confirm flow.
//! - [`SessionStore`]: Trait over get/put/remove/expire.
//! - [`TtlSessionStore`]: In-memory store dropping entries after a fixed TTL.
//! - [`Clock`]: Time source, swappable for [`ManualClock`] in tests.

/// Time sources.
pub mod clock;
/// Background expiry task.
pub mod reaper;
/// Session state.
pub mod session;
/// Session storage.
pub mod store;

pub use clock::{Clock, ManualClock, SystemClock};
pub use reaper::spawn_reaper;
pub use session::{Session, Step};
pub use store::{SessionStore, TtlSessionStore};
