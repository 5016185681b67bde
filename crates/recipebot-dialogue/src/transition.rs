use crate::replies::Replies;
use recipebot_core::{Action, Command, EventKind, OutboundMessage, Recipe};
use recipebot_session::Session;

/// What one event does to one user's session.
#[derive(Debug, Clone, PartialEq)]
pub enum Transition {
    /// Nothing happens and nothing is sent.
    Ignore,
    /// The session is left as is; send the replies.
    Reply(Vec<OutboundMessage>),
    /// Store the new session in place of the old one; send the replies.
    Advance(Session, Vec<OutboundMessage>),
    /// Delete the session; send the replies.
    End(Vec<OutboundMessage>),
    /// Persist the recipe. The session is deleted only if that succeeds.
    Commit(Recipe),
}

/// Computes the effect of `event` on the session `current` (`None` when the
/// user has no session). Authorization is checked by the caller.
pub fn transition(current: Option<&Session>, event: &EventKind, replies: &Replies) -> Transition {
    match event {
        EventKind::Command(Command::Start) => Transition::Reply(vec![replies.begin()]),
        EventKind::Text(text) => on_text(current, text, replies),
        EventKind::Action(action) => on_action(current, *action, replies),
    }
}

fn on_text(current: Option<&Session>, text: &str, replies: &Replies) -> Transition {
    match current {
        None => Transition::Advance(Session::start(text), replies.url_received(text)),
        Some(Session::AwaitingTitle { url }) => Transition::Advance(
            Session::AwaitingTag {
                url: url.clone(),
                title: text.to_string(),
            },
            replies.title_received(url, text),
        ),
        Some(Session::AwaitingTag { .. } | Session::AwaitingConfirmation { .. }) => {
            Transition::Ignore
        }
    }
}

fn on_action(current: Option<&Session>, action: Action, replies: &Replies) -> Transition {
    match (current, action) {
        // Cancel works from anywhere so that repeating it is harmless.
        (_, Action::Cancel) => Transition::End(vec![replies.cancelled()]),
        (None, _) => Transition::Reply(vec![replies.session_not_found()]),
        (Some(Session::AwaitingTag { url, title }), Action::Tag(tag)) => Transition::Advance(
            Session::AwaitingConfirmation {
                url: url.clone(),
                title: title.clone(),
                tag,
            },
            replies.tag_received(url, title, tag),
        ),
        // Tag buttons come in as plain text; a title typed as a tag label is still a title.
        (Some(session @ Session::AwaitingTitle { .. }), Action::Tag(tag)) => {
            on_text(Some(session), tag.label(), replies)
        }
        (Some(session @ Session::AwaitingConfirmation { .. }), Action::Validate) => {
            match session.to_recipe() {
                Some(recipe) => Transition::Commit(recipe),
                None => Transition::Ignore,
            }
        }
        (Some(_), _) => Transition::Ignore,
    }
}
