use recipebot_channels::{Channel, ChannelEvent};
use recipebot_dialogue::DialogueEngine;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

/// Connects one channel to the dialogue engine.
pub struct Gateway {
    engine: Arc<DialogueEngine>,
    channel: Arc<dyn Channel>,
}

impl Gateway {
    /// Dispatches events to `engine` and answers through `channel`.
    pub fn new(engine: Arc<DialogueEngine>, channel: Arc<dyn Channel>) -> Self {
        Self { engine, channel }
    }

    /// Handles one event to completion: runs the dialogue, acknowledges the
    /// button press if it was one, then sends the replies in order.
    ///
    /// Delivery failures are logged and do not stop the remaining replies.
    pub async fn dispatch(&self, event: ChannelEvent) {
        let user = event.event.sender;
        let replies = self.engine.handle(&event.event).await;

        if event.event.is_action() {
            if let Err(e) = self.channel.acknowledge(&event).await {
                warn!(channel = %self.channel.name(), user = %user, error = %e, "Acknowledge failed");
            }
        }

        for reply in &replies {
            if let Err(e) = self.channel.send(user, reply).await {
                warn!(channel = %self.channel.name(), user = %user, error = %e, "Reply delivery failed");
            }
        }
        debug!(user = %user, replies = replies.len(), "Event dispatched");
    }

    /// Consumes events until the sender side closes, handling each on its
    /// own task so a slow event never delays other users. Waits for the
    /// in-flight events before returning.
    pub async fn run(self: Arc<Self>, events: mpsc::Receiver<ChannelEvent>) {
        self.run_until(events, std::future::pending()).await;
    }

    /// Like [`run`](Self::run), but also stops taking events once `shutdown`
    /// completes. Events already dispatched still run to completion.
    pub async fn run_until<F>(
        self: Arc<Self>,
        mut events: mpsc::Receiver<ChannelEvent>,
        shutdown: F,
    ) where
        F: Future<Output = ()>,
    {
        info!(channel = %self.channel.name(), "Gateway started");
        let mut tasks = JoinSet::new();
        tokio::pin!(shutdown);

        loop {
            let event = tokio::select! {
                event = events.recv() => match event {
                    Some(event) => event,
                    None => break,
                },
                () = &mut shutdown => {
                    events.close();
                    info!(
                        in_flight = tasks.len(),
                        "Shutdown requested, draining in-flight events"
                    );
                    break;
                }
            };

            let gateway = self.clone();
            tasks.spawn(async move { gateway.dispatch(event).await });

            // Reap finished tasks so the set does not grow without bound.
            while let Some(res) = tasks.try_join_next() {
                if let Err(e) = res {
                    warn!(error = %e, "Dispatch task failed");
                }
            }
        }

        while let Some(res) = tasks.join_next().await {
            if let Err(e) = res {
                warn!(error = %e, "Dispatch task failed");
            }
        }
        info!(channel = %self.channel.name(), "Gateway stopped");
    }
}
