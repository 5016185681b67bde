//! Core types and error definitions for recipebot.
//!
//! This crate provides the foundational types shared across all recipebot
//! crates: the error taxonomy, user identities, the fixed tag vocabulary,
//! the persisted recipe record and the transport-neutral message types.
//!
//! # Main types
//!
//! - [`BotError`]: Unified error enum for all recipebot subsystems.
//! - [`BotResult`]: Convenience alias for `Result<T, BotError>`.
//! - [`UserId`]: Numeric identity of a chat user.
//! - [`Tag`]: One of the five predefined recipe tags.
//! - [`Action`]: A button press (tag choice, validate, cancel).
//! - [`Recipe`]: One persisted recipe entry.
//! - [`InboundEvent`] / [`OutboundMessage`]: What flows in and out of the bot.

/// Error taxonomy.
pub mod error;
/// Inbound events and outbound messages.
pub mod message;

pub use error::{BotError, BotResult};
pub use message::{Command, EventKind, InboundEvent, Keyboard, OutboundMessage, TextFormat};

use serde::{Deserialize, Serialize};
use std::fmt;

// --- Identity ---

/// Numeric identity of a chat user, as assigned by the transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub i64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for UserId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

// --- Tags & actions ---

/// The closed vocabulary of recipe tags offered to users.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tag {
    /// "Plat principal"
    MainCourse,
    /// "Dessert"
    Dessert,
    /// "Gouter"
    Snack,
    /// "Accompagnement"
    SideDish,
    /// "Entrée"
    Starter,
}

impl Tag {
    /// All tags, in keyboard order.
    pub const ALL: [Tag; 5] = [
        Tag::MainCourse,
        Tag::Dessert,
        Tag::Snack,
        Tag::SideDish,
        Tag::Starter,
    ];

    /// The label shown on the keyboard and stored in the record.
    pub fn label(self) -> &'static str {
        match self {
            Tag::MainCourse => "Plat principal",
            Tag::Dessert => "Dessert",
            Tag::Snack => "Gouter",
            Tag::SideDish => "Accompagnement",
            Tag::Starter => "Entrée",
        }
    }

    /// Wire identifier (`tag1`..`tag5`).
    pub fn action_id(self) -> &'static str {
        match self {
            Tag::MainCourse => "tag1",
            Tag::Dessert => "tag2",
            Tag::Snack => "tag3",
            Tag::SideDish => "tag4",
            Tag::Starter => "tag5",
        }
    }

    /// Looks up a tag by its exact label.
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.label() == label)
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A button-press style event, distinct from free text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// One of the five tag buttons.
    Tag(Tag),
    /// Confirm and persist the recipe.
    Validate,
    /// Abandon the current dialogue.
    Cancel,
}

impl Action {
    /// Wire identifier of this action.
    pub fn id(self) -> &'static str {
        match self {
            Action::Tag(tag) => tag.action_id(),
            Action::Validate => "validate",
            Action::Cancel => "cancel",
        }
    }

    /// Parses a wire identifier (`tag1`..`tag5`, `validate`, `cancel`).
    pub fn from_id(id: &str) -> Option<Self> {
        match id {
            "validate" => Some(Action::Validate),
            "cancel" => Some(Action::Cancel),
            other => Tag::ALL
                .into_iter()
                .find(|t| t.action_id() == other)
                .map(Action::Tag),
        }
    }
}

// --- Persisted record ---

/// One persisted recipe entry.
///
/// `sub_title`, `filename` and `tags` are optional so that records written by
/// other tools without them round-trip unchanged. Unknown fields are kept in
/// `extra` and written back after the known ones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    /// Recipe title.
    #[serde(default)]
    pub title: String,
    /// Secondary title; left empty by the bot.
    #[serde(rename = "subTitle", default, skip_serializing_if = "Option::is_none")]
    pub sub_title: Option<String>,
    /// Source URL.
    #[serde(default)]
    pub url: String,
    /// Attached file name; left empty by the bot.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    /// Tag labels.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    /// Fields this crate does not know about.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Recipe {
    /// Builds the record produced by a completed dialogue.
    pub fn new(url: impl Into<String>, title: impl Into<String>, tag: Tag) -> Self {
        Self {
            title: title.into(),
            sub_title: Some(String::new()),
            url: url.into(),
            filename: Some(String::new()),
            tags: Some(vec![tag.label().to_string()]),
            extra: serde_json::Map::new(),
        }
    }

    /// Tag labels, empty when the field is absent.
    pub fn tag_labels(&self) -> &[String] {
        self.tags.as_deref().unwrap_or_default()
    }
}
