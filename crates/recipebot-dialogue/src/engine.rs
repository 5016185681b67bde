use crate::replies::Replies;
use crate::transition::{transition, Transition};
use recipebot_core::{InboundEvent, OutboundMessage};
use recipebot_security::Allowlist;
use recipebot_session::SessionStore;
use recipebot_store::RecordRepository;
use std::sync::Arc;
use tracing::{debug, error, info};

/// Drives the dialogue of every authorized user.
///
/// The engine holds no per-event state and is shared behind an `Arc`; the
/// gateway may call [`handle`](Self::handle) concurrently, even for the same
/// user.
pub struct DialogueEngine {
    allowlist: Allowlist,
    sessions: Arc<dyn SessionStore>,
    recipes: Arc<dyn RecordRepository>,
    replies: Replies,
}

impl DialogueEngine {
    /// Wires the engine to its stores.
    pub fn new(
        allowlist: Allowlist,
        sessions: Arc<dyn SessionStore>,
        recipes: Arc<dyn RecordRepository>,
        replies: Replies,
    ) -> Self {
        Self {
            allowlist,
            sessions,
            recipes,
            replies,
        }
    }

    /// The session store backing this engine.
    pub fn sessions(&self) -> &Arc<dyn SessionStore> {
        &self.sessions
    }

    /// Processes one inbound event and returns the messages to send back to
    /// its sender, in order.
    ///
    /// Errors never escape: unauthorized senders and storage failures become
    /// replies. On a failed commit the session is kept so the user can
    /// validate again.
    pub async fn handle(&self, event: &InboundEvent) -> Vec<OutboundMessage> {
        let user = event.sender;
        if self.allowlist.authorize(user).is_err() {
            return vec![self.replies.unauthorized(user)];
        }

        let current = self.sessions.get(user);
        let step = current.as_ref().map(recipebot_session::Session::step);

        match transition(current.as_ref(), &event.kind, &self.replies) {
            Transition::Ignore => {
                debug!(user = %user, step = ?step, event = ?event.kind, "Event ignored in current step");
                Vec::new()
            }
            Transition::Reply(replies) => replies,
            Transition::Advance(next, replies) => {
                debug!(user = %user, from = ?step, to = ?next.step(), "Session advanced");
                self.sessions.put(user, next);
                replies
            }
            Transition::End(replies) => {
                debug!(user = %user, step = ?step, "Session ended");
                self.sessions.remove(user);
                replies
            }
            Transition::Commit(recipe) => {
                let title = recipe.title.clone();
                match self.recipes.append(recipe).await {
                    Ok(()) => {
                        self.sessions.remove(user);
                        info!(user = %user, title = %title, "Recipe saved");
                        vec![self.replies.saved()]
                    }
                    Err(e) => {
                        error!(
                            user = %user,
                            persistence = e.is_persistence(),
                            error = %e,
                            "Failed to save recipe, session kept"
                        );
                        vec![self.replies.persistence_failed(&e)]
                    }
                }
            }
        }
    }
}
