use crate::{Action, UserId};
use serde::{Deserialize, Serialize};

/// Slash commands understood by the bot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// `/start`: sends the initial prompt, resets nothing.
    Start,
}

/// What an inbound event carries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventKind {
    /// Free text typed by the user.
    Text(String),
    /// A button press.
    Action(Action),
    /// A slash command.
    Command(Command),
}

/// An event delivered by the chat transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundEvent {
    /// Who sent it.
    pub sender: UserId,
    /// What was sent.
    pub kind: EventKind,
}

impl InboundEvent {
    /// A free-text event.
    pub fn text(sender: impl Into<UserId>, text: impl Into<String>) -> Self {
        Self {
            sender: sender.into(),
            kind: EventKind::Text(text.into()),
        }
    }

    /// A button-press event.
    pub fn action(sender: impl Into<UserId>, action: Action) -> Self {
        Self {
            sender: sender.into(),
            kind: EventKind::Action(action),
        }
    }

    /// A slash-command event.
    pub fn command(sender: impl Into<UserId>, command: Command) -> Self {
        Self {
            sender: sender.into(),
            kind: EventKind::Command(command),
        }
    }

    /// Whether this is a button press (and must therefore be acknowledged).
    pub fn is_action(&self) -> bool {
        matches!(self.kind, EventKind::Action(_))
    }
}

/// Text formatting requested for an outbound message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextFormat {
    /// Telegram MarkdownV2.
    MarkdownV2,
}

/// Keyboards the bot can attach to a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keyboard {
    /// Reply keyboard listing the five tags, one per row, one-time and resized.
    TagMenu,
    /// Inline keyboard with a cancel and a confirm button.
    Confirm,
}

/// A message the bot sends back to the user who triggered an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundMessage {
    /// Message body.
    pub text: String,
    /// Optional formatting mode.
    pub format: Option<TextFormat>,
    /// Optional keyboard.
    pub keyboard: Option<Keyboard>,
}

impl OutboundMessage {
    /// Plain text message without keyboard.
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            format: None,
            keyboard: None,
        }
    }

    /// MarkdownV2 formatted message without keyboard.
    pub fn markdown(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            format: Some(TextFormat::MarkdownV2),
            keyboard: None,
        }
    }

    /// Attaches a keyboard.
    pub fn with_keyboard(mut self, keyboard: Keyboard) -> Self {
        self.keyboard = Some(keyboard);
        self
    }
}
