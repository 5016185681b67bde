//! Sender authorization for recipebot.
//!
//! The bot serves a fixed set of users. Every inbound event is checked
//! against an [`Allowlist`] before any session is read or written.

/// Static allow-list of user identities.
pub mod allowlist;

pub use allowlist::Allowlist;
