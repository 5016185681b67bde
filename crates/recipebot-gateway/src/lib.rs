//! Dispatch of inbound chat events to the dialogue engine.
//!
//! The [`Gateway`] takes events from a channel's receiver, handles each one
//! on its own Tokio task, sends the replies back through the channel and
//! acknowledges button presses.

/// Event dispatch loop.
pub mod dispatcher;

pub use dispatcher::Gateway;
