use crate::channel::{Channel, ChannelEvent};
use async_trait::async_trait;
use recipebot_core::{
    Action, BotError, BotResult, Command, EventKind, InboundEvent, Keyboard, OutboundMessage,
    Tag, TextFormat, UserId,
};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, warn};

const TELEGRAM_API_BASE: &str = "https://api.telegram.org";
const DEFAULT_POLL_TIMEOUT: Duration = Duration::from_secs(10);
const POLL_RETRY_DELAY: Duration = Duration::from_secs(5);

/// Telegram Bot API channel adapter.
///
/// Uses the Telegram Bot HTTP API for sending messages and long-polling
/// (`getUpdates`) for receiving them. Incoming messages and callback queries
/// are forwarded through a `tokio::sync::mpsc` channel as [`ChannelEvent`]s.
pub struct TelegramChannel {
    bot_token: String,
    api_base: String,
    poll_timeout: Duration,
    client: reqwest::Client,
    event_tx: mpsc::Sender<ChannelEvent>,
    event_rx: Option<mpsc::Receiver<ChannelEvent>>,
}

// ── Telegram API response types ─────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct TelegramResponse<T> {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
    result: Option<T>,
}

#[derive(Debug, Deserialize)]
struct TelegramUpdate {
    update_id: i64,
    message: Option<TelegramMessagePayload>,
    callback_query: Option<TelegramCallbackQuery>,
}

#[derive(Debug, Deserialize)]
struct TelegramMessagePayload {
    from: Option<TelegramUser>,
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TelegramCallbackQuery {
    id: String,
    from: TelegramUser,
    data: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TelegramUser {
    id: i64,
}

// ── Telegram API request types ──────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct SendMessageRequest<'a> {
    chat_id: i64,
    text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    parse_mode: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    reply_markup: Option<ReplyMarkup>,
}

#[derive(Debug, Serialize)]
struct AnswerCallbackQueryRequest<'a> {
    callback_query_id: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum ReplyMarkup {
    Keyboard {
        keyboard: Vec<Vec<KeyboardButton>>,
        resize_keyboard: bool,
        one_time_keyboard: bool,
    },
    Inline {
        inline_keyboard: Vec<Vec<InlineKeyboardButton>>,
    },
}

#[derive(Debug, Serialize)]
struct KeyboardButton {
    text: &'static str,
}

#[derive(Debug, Serialize)]
struct InlineKeyboardButton {
    text: &'static str,
    callback_data: &'static str,
}

impl From<Keyboard> for ReplyMarkup {
    fn from(keyboard: Keyboard) -> Self {
        match keyboard {
            Keyboard::TagMenu => ReplyMarkup::Keyboard {
                keyboard: Tag::ALL
                    .into_iter()
                    .map(|tag| vec![KeyboardButton { text: tag.label() }])
                    .collect(),
                resize_keyboard: true,
                one_time_keyboard: true,
            },
            Keyboard::Confirm => ReplyMarkup::Inline {
                inline_keyboard: vec![vec![
                    InlineKeyboardButton {
                        text: "🚫",
                        callback_data: Action::Cancel.id(),
                    },
                    InlineKeyboardButton {
                        text: "👍",
                        callback_data: Action::Validate.id(),
                    },
                ]],
            },
        }
    }
}

fn parse_mode(format: TextFormat) -> &'static str {
    match format {
        TextFormat::MarkdownV2 => "MarkdownV2",
    }
}

// ── Update decoding ─────────────────────────────────────────────────────────

/// Maps message text to an event kind. Reply-keyboard taps arrive as their
/// label, so a text equal to a tag label is a tag action.
fn classify_text(text: String) -> EventKind {
    let command = text.split_whitespace().next().unwrap_or_default();
    if command == "/start" || command.starts_with("/start@") {
        return EventKind::Command(Command::Start);
    }
    match Tag::from_label(&text) {
        Some(tag) => EventKind::Action(Action::Tag(tag)),
        None => EventKind::Text(text),
    }
}

/// Decodes callback data. Older keyboards prefixed it with `\f` and a
/// `unique|` part.
fn classify_callback(data: &str) -> Option<Action> {
    let data = data.strip_prefix('\u{c}').unwrap_or(data);
    let id = data.split('|').next().unwrap_or(data);
    Action::from_id(id)
}

enum Decoded {
    Event(ChannelEvent),
    UnknownCallback(String),
    Skip,
}

fn decode_update(update: TelegramUpdate) -> Decoded {
    if let Some(query) = update.callback_query {
        return match query.data.as_deref().and_then(classify_callback) {
            Some(action) => Decoded::Event(ChannelEvent::with_callback(
                InboundEvent::action(query.from.id, action),
                query.id,
            )),
            None => Decoded::UnknownCallback(query.id),
        };
    }

    match update.message {
        Some(TelegramMessagePayload {
            from: Some(user),
            text: Some(text),
        }) => Decoded::Event(ChannelEvent::new(InboundEvent {
            sender: UserId(user.id),
            kind: classify_text(text),
        })),
        _ => Decoded::Skip,
    }
}

// ── Implementation ──────────────────────────────────────────────────────────

impl TelegramChannel {
    /// Create a new `TelegramChannel`.
    ///
    /// * `bot_token`: The bot token obtained from @BotFather.
    /// * `event_buffer`: Capacity of the internal mpsc event buffer.
    pub fn new(bot_token: impl Into<String>, event_buffer: usize) -> Self {
        let (event_tx, event_rx) = mpsc::channel(event_buffer);
        Self {
            bot_token: bot_token.into(),
            api_base: TELEGRAM_API_BASE.to_string(),
            poll_timeout: DEFAULT_POLL_TIMEOUT,
            client: reqwest::Client::new(),
            event_tx,
            event_rx: Some(event_rx),
        }
    }

    /// Point the adapter at another Bot API server (tests, local API server).
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }

    /// Long-poll timeout passed to `getUpdates`.
    pub fn with_poll_timeout(mut self, timeout: Duration) -> Self {
        self.poll_timeout = timeout;
        self
    }

    /// Take the receiving half of the event channel.
    ///
    /// This can only be called once; subsequent calls return `None`.
    pub fn take_event_receiver(&mut self) -> Option<mpsc::Receiver<ChannelEvent>> {
        self.event_rx.take()
    }

    /// Fetch one batch of updates starting at `offset`.
    ///
    /// Returns the decoded events and the offset to use for the next call.
    /// Callback queries with unknown data are answered here so the user's
    /// button does not keep spinning.
    pub async fn poll_once(
        &self,
        offset: Option<i64>,
    ) -> BotResult<(Vec<ChannelEvent>, Option<i64>)> {
        let url = self.api_url("getUpdates");

        let mut params: Vec<(&str, String)> = vec![
            ("timeout", self.poll_timeout.as_secs().to_string()),
            (
                "allowed_updates",
                r#"["message","callback_query"]"#.to_string(),
            ),
        ];
        if let Some(off) = offset {
            params.push(("offset", off.to_string()));
        }

        let response = self
            .client
            .get(&url)
            .query(&params)
            .send()
            .await
            .map_err(|e| BotError::Channel(format!("Telegram poll error: {e}")))?;

        let body: TelegramResponse<Vec<TelegramUpdate>> = response
            .json()
            .await
            .map_err(|e| BotError::Channel(format!("Telegram parse error: {e}")))?;

        if !body.ok {
            return Err(BotError::Channel(format!(
                "Telegram API error: {}",
                body.description.unwrap_or_default()
            )));
        }

        let mut next_offset = offset;
        let mut events = Vec::new();
        for update in body.result.unwrap_or_default() {
            // Advance the offset so we do not receive this update again.
            next_offset = Some(update.update_id + 1);
            match decode_update(update) {
                Decoded::Event(event) => events.push(event),
                Decoded::UnknownCallback(id) => {
                    warn!(callback_id = %id, "Answering callback with unknown data");
                    // Stale queries are rejected forever; the offset must still move on.
                    if let Err(e) = self.answer_callback(&id).await {
                        warn!(callback_id = %id, error = %e, "Failed to answer unknown callback");
                    }
                }
                Decoded::Skip => {}
            }
        }

        Ok((events, next_offset))
    }

    /// Start long-polling the Telegram `getUpdates` endpoint.
    ///
    /// This method runs until the event receiver is dropped, forwarding every
    /// decoded update through the mpsc channel. Poll failures are logged and
    /// retried after a short delay. It should be spawned onto a Tokio task.
    pub async fn poll_updates(&self) -> BotResult<()> {
        let mut offset: Option<i64> = None;

        loop {
            let events = match self.poll_once(offset).await {
                Ok((events, next)) => {
                    offset = next;
                    events
                }
                Err(e) => {
                    warn!(error = %e, "Telegram poll failed, retrying");
                    tokio::time::sleep(POLL_RETRY_DELAY).await;
                    continue;
                }
            };

            for event in events {
                // Best-effort send; if the receiver is dropped we stop.
                if self.event_tx.send(event).await.is_err() {
                    debug!("Event receiver dropped, stopping Telegram poll");
                    return Ok(());
                }
            }
        }
    }

    // ── Helpers ──────────────────────────────────────────────────────────

    fn api_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", self.api_base, self.bot_token, method)
    }

    async fn call<T: Serialize + ?Sized>(&self, method: &str, payload: &T) -> BotResult<()> {
        let response = self
            .client
            .post(self.api_url(method))
            .json(payload)
            .send()
            .await
            .map_err(|e| BotError::Channel(format!("Telegram {method} error: {e}")))?;

        let body: TelegramResponse<serde_json::Value> = response
            .json()
            .await
            .map_err(|e| BotError::Channel(format!("Telegram parse error: {e}")))?;

        if !body.ok {
            return Err(BotError::Channel(format!(
                "Telegram {method} failed: {}",
                body.description.unwrap_or_default()
            )));
        }

        Ok(())
    }

    async fn answer_callback(&self, callback_id: &str) -> BotResult<()> {
        self.call(
            "answerCallbackQuery",
            &AnswerCallbackQueryRequest {
                callback_query_id: callback_id,
            },
        )
        .await
    }
}

#[async_trait]
impl Channel for TelegramChannel {
    fn name(&self) -> &str {
        "telegram"
    }

    async fn send(&self, to: UserId, message: &OutboundMessage) -> BotResult<()> {
        let payload = SendMessageRequest {
            chat_id: to.0,
            text: &message.text,
            parse_mode: message.format.map(parse_mode),
            reply_markup: message.keyboard.map(ReplyMarkup::from),
        };
        self.call("sendMessage", &payload).await
    }

    async fn acknowledge(&self, event: &ChannelEvent) -> BotResult<()> {
        match &event.callback_id {
            Some(id) => self.answer_callback(id).await,
            // Reply-keyboard taps are plain messages; nothing is pending.
            None => Ok(()),
        }
    }
}
