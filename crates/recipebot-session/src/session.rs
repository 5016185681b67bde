use recipebot_core::{Recipe, Tag};
use serde::{Deserialize, Serialize};

/// Position of a session in the dialogue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    /// URL received, waiting for a title.
    AwaitingTitle,
    /// Title received, waiting for a tag.
    AwaitingTag,
    /// Tag received, waiting for validate or cancel.
    AwaitingConfirmation,
}

/// An in-progress dialogue. Each variant holds exactly the fields collected
/// so far; "no session" is the absence of an entry in the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum Session {
    /// URL received, waiting for a title.
    AwaitingTitle {
        /// Submitted URL.
        url: String,
    },
    /// Title received, waiting for a tag.
    AwaitingTag {
        /// Submitted URL.
        url: String,
        /// Submitted title.
        title: String,
    },
    /// Tag received, waiting for validate or cancel.
    AwaitingConfirmation {
        /// Submitted URL.
        url: String,
        /// Submitted title.
        title: String,
        /// Chosen tag.
        tag: Tag,
    },
}

impl Session {
    /// Starts a dialogue from a submitted URL.
    pub fn start(url: impl Into<String>) -> Self {
        Session::AwaitingTitle { url: url.into() }
    }

    /// The current step.
    pub fn step(&self) -> Step {
        match self {
            Session::AwaitingTitle { .. } => Step::AwaitingTitle,
            Session::AwaitingTag { .. } => Step::AwaitingTag,
            Session::AwaitingConfirmation { .. } => Step::AwaitingConfirmation,
        }
    }

    /// The submitted URL; every step has one.
    pub fn url(&self) -> &str {
        match self {
            Session::AwaitingTitle { url }
            | Session::AwaitingTag { url, .. }
            | Session::AwaitingConfirmation { url, .. } => url,
        }
    }

    /// The submitted title, once past `AwaitingTitle`.
    pub fn title(&self) -> Option<&str> {
        match self {
            Session::AwaitingTitle { .. } => None,
            Session::AwaitingTag { title, .. } | Session::AwaitingConfirmation { title, .. } => {
                Some(title)
            }
        }
    }

    /// The chosen tag, once confirmed.
    pub fn tag(&self) -> Option<Tag> {
        match self {
            Session::AwaitingConfirmation { tag, .. } => Some(*tag),
            _ => None,
        }
    }

    /// The record a validated session produces. `None` before confirmation.
    pub fn to_recipe(&self) -> Option<Recipe> {
        match self {
            Session::AwaitingConfirmation { url, title, tag } => {
                Some(Recipe::new(url.as_str(), title.as_str(), *tag))
            }
            _ => None,
        }
    }
}
