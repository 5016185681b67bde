//! The recipe submission dialogue.
//!
//! A user sends a URL, then a title, picks a tag, and confirms. The
//! [`transition`] function decides what each event does to the user's
//! session; the [`DialogueEngine`] applies that decision against the
//! session store and the recipe repository.
//!
//! # Main types
//!
//! - [`DialogueEngine`]: Authorizes, transitions, persists, replies.
//! - [`Transition`]: Outcome of one event on one session.
//! - [`Replies`]: Every text the bot sends.

/// Engine applying transitions to the stores.
pub mod engine;
/// User-facing texts.
pub mod replies;
/// The pure state machine.
pub mod transition;

pub use engine::DialogueEngine;
pub use replies::Replies;
pub use transition::{transition, Transition};
