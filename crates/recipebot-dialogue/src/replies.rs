use recipebot_core::{BotError, Keyboard, OutboundMessage, Tag, UserId};

/// Builds every message the bot sends.
///
/// Submitted values are echoed inside MarkdownV2 code spans, where only `\`
/// and `` ` `` need escaping.
#[derive(Debug, Clone)]
pub struct Replies {
    operator: String,
}

impl Replies {
    /// `operator` is the person users are told to contact on errors.
    pub fn new(operator: impl Into<String>) -> Self {
        Self {
            operator: operator.into(),
        }
    }

    /// Prompt sent by `/start` and whenever there is nothing to continue.
    pub fn begin(&self) -> OutboundMessage {
        OutboundMessage::plain("Please send an url to begin")
    }

    /// Reply to an action arriving with no session.
    pub fn session_not_found(&self) -> OutboundMessage {
        OutboundMessage::plain("There was an error. Please send an url to begin")
    }

    /// Reply to a sender outside the allow-list.
    pub fn unauthorized(&self, user: UserId) -> OutboundMessage {
        OutboundMessage::plain(format!(
            "There was an error with your id ({user}). Please contact {}",
            self.operator
        ))
    }

    /// Echo of a fresh URL followed by the title prompt.
    pub fn url_received(&self, url: &str) -> Vec<OutboundMessage> {
        vec![
            OutboundMessage::markdown(format!("*Url* : `{}`", escape_code(url))),
            OutboundMessage::plain("Please send a title..."),
        ]
    }

    /// Echo of URL and title followed by the tag menu.
    pub fn title_received(&self, url: &str, title: &str) -> Vec<OutboundMessage> {
        vec![
            OutboundMessage::markdown(format!(
                "*Url* : `{}`\n*Title* : `{}`",
                escape_code(url),
                escape_code(title)
            )),
            OutboundMessage::plain("Please choose a tag...").with_keyboard(Keyboard::TagMenu),
        ]
    }

    /// Summary of the pending recipe with the confirm/cancel buttons.
    pub fn tag_received(&self, url: &str, title: &str, tag: Tag) -> Vec<OutboundMessage> {
        vec![OutboundMessage::markdown(format!(
            "*Url* : `{}`\n*Title* : `{}`\n*Tag* : `{}`",
            escape_code(url),
            escape_code(title),
            escape_code(tag.label())
        ))
        .with_keyboard(Keyboard::Confirm)]
    }

    /// Reply to Cancel.
    pub fn cancelled(&self) -> OutboundMessage {
        OutboundMessage::plain("Ok, please send another url to start again")
    }

    /// Reply to a successful Validate.
    pub fn saved(&self) -> OutboundMessage {
        OutboundMessage::plain("Ok, new entry added")
    }

    /// Reply to a failed Validate.
    pub fn persistence_failed(&self, error: &BotError) -> OutboundMessage {
        let what = match error {
            BotError::PersistenceWrite { .. } => "file writing",
            _ => "file opening",
        };
        OutboundMessage::plain(format!(
            "There was an error with {what}. Please contact {}",
            self.operator
        ))
    }
}

impl Default for Replies {
    fn default() -> Self {
        Self::new("the operator")
    }
}

/// Escapes text for a MarkdownV2 code span.
pub fn escape_code(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if c == '\\' || c == '`' {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_escape_code() {
        assert_eq!(escape_code("http://x.com/a_b"), "http://x.com/a_b");
        assert_eq!(escape_code("a`b\\c"), "a\\`b\\\\c");
    }

    #[test]
    fn test_unauthorized_names_user_and_operator() {
        let replies = Replies::new("gp");
        let msg = replies.unauthorized(UserId(99));
        assert_eq!(
            msg.text,
            "There was an error with your id (99). Please contact gp"
        );
    }

    #[test]
    fn test_persistence_failure_wording() {
        let replies = Replies::new("gp");
        let write = BotError::PersistenceWrite {
            path: PathBuf::from("r.json"),
            source: std::io::Error::other("disk full"),
        };
        assert!(replies.persistence_failed(&write).text.contains("file writing"));
        let read = BotError::PersistenceRead {
            path: PathBuf::from("r.json"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(replies.persistence_failed(&read).text.contains("file opening"));
    }

    #[test]
    fn test_title_prompt_carries_tag_menu() {
        let msgs = Replies::default().title_received("u", "t");
        assert_eq!(msgs.len(), 2);
        assert_eq!(msgs[1].keyboard, Some(Keyboard::TagMenu));
    }
}
