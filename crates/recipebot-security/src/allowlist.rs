use recipebot_core::{BotError, BotResult, UserId};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::warn;

/// The set of user identities allowed to talk to the bot.
///
/// An empty allow-list rejects everyone; the CLI refuses to start with one.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Allowlist {
    ids: HashSet<UserId>,
}

impl Allowlist {
    /// Builds an allow-list from raw identities.
    pub fn new(ids: impl IntoIterator<Item = i64>) -> Self {
        Self {
            ids: ids.into_iter().map(UserId).collect(),
        }
    }

    /// Parses a whitespace-separated list of integers, e.g. `"123 456"`.
    pub fn parse(raw: &str) -> BotResult<Self> {
        let ids = raw
            .split_whitespace()
            .map(|part| {
                part.parse::<i64>().map_err(|e| {
                    BotError::Config(format!("Invalid user id '{part}' in allow-list: {e}"))
                })
            })
            .collect::<BotResult<Vec<_>>>()?;
        Ok(Self::new(ids))
    }

    /// Whether `user` may use the bot.
    pub fn contains(&self, user: UserId) -> bool {
        self.ids.contains(&user)
    }

    /// Returns `Err(BotError::Unauthorized)` for senders outside the list.
    pub fn authorize(&self, user: UserId) -> BotResult<()> {
        if self.contains(user) {
            Ok(())
        } else {
            warn!(user = %user, "Rejected event from unauthorized sender");
            Err(BotError::Unauthorized(user))
        }
    }

    /// Number of authorized users.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Whether no user is authorized.
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}
