//! Chat transport abstraction.
//!
//! Provides the [`Channel`] trait the gateway talks to, and the Telegram Bot
//! API implementation.
//!
//! # Main types
//!
//! - [`Channel`]: Sends messages and acknowledges button presses.
//! - [`ChannelEvent`]: An inbound event plus what is needed to acknowledge it.
//! - [`TelegramChannel`]: Telegram Bot API adapter (long-polling).

/// Core channel trait and event type.
pub mod channel;
/// Telegram channel integration.
pub mod telegram;

pub use channel::{Channel, ChannelEvent};
pub use telegram::TelegramChannel;
