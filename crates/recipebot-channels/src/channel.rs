use async_trait::async_trait;
use recipebot_core::{BotResult, InboundEvent, OutboundMessage, UserId};

/// An inbound event as delivered by a channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelEvent {
    /// The transport-neutral event.
    pub event: InboundEvent,
    /// Transport handle used to clear the sender's pending-button indicator,
    /// when the transport has one for this event.
    pub callback_id: Option<String>,
}

impl ChannelEvent {
    /// An event with nothing to acknowledge.
    pub fn new(event: InboundEvent) -> Self {
        Self {
            event,
            callback_id: None,
        }
    }

    /// An event carrying a callback handle.
    pub fn with_callback(event: InboundEvent, callback_id: impl Into<String>) -> Self {
        Self {
            event,
            callback_id: Some(callback_id.into()),
        }
    }
}

#[async_trait]
pub trait Channel: Send + Sync {
    fn name(&self) -> &str;
    /// Sends `message` to `to`.
    async fn send(&self, to: UserId, message: &OutboundMessage) -> BotResult<()>;
    /// Acknowledges a button press. Called exactly once per action event.
    async fn acknowledge(&self, event: &ChannelEvent) -> BotResult<()>;
}
