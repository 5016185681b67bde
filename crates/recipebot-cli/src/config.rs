//! Bot configuration.
//!
//! Values come from an optional `recipebot.toml`, then from the environment
//! variables the bot has always been deployed with (`IDS`, `TOKEN`, `FILE`).

use recipebot_core::{BotError, BotResult};
use recipebot_security::Allowlist;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Longest accepted session TTL (one year).
const MAX_SESSION_TTL_SECS: u64 = 365 * 24 * 60 * 60;

/// Everything the bot needs to run.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BotConfig {
    /// Users allowed to talk to the bot.
    pub authorized_ids: Allowlist,
    /// The JSON recipe document.
    pub recipes_file: PathBuf,
    /// Refuse to create the document when it does not exist yet.
    pub require_existing_file: bool,
    /// Who users are told to contact when something fails.
    pub operator: String,
    /// Bot API access.
    pub telegram: TelegramConfig,
    /// Dialogue expiry.
    pub session: SessionConfig,
}

/// The `[telegram]` table.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TelegramConfig {
    /// Token issued by @BotFather.
    pub token: String,
    /// Long-poll timeout of `getUpdates`, in seconds.
    pub poll_timeout_secs: u64,
    /// Alternative Bot API server.
    pub api_base_url: Option<String>,
}

/// The `[session]` table.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Inactivity window after which a dialogue is dropped.
    pub ttl_secs: u64,
    /// How often expired dialogues are reclaimed.
    pub purge_interval_secs: u64,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            authorized_ids: Allowlist::default(),
            recipes_file: PathBuf::from("recipes.json"),
            require_existing_file: false,
            operator: "the operator".to_string(),
            telegram: TelegramConfig::default(),
            session: SessionConfig::default(),
        }
    }
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            token: String::new(),
            poll_timeout_secs: 10,
            api_base_url: None,
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            ttl_secs: 30 * 60,
            purge_interval_secs: 60,
        }
    }
}

impl BotConfig {
    /// Reads `path` if it exists, otherwise starts from defaults.
    pub fn load(path: &Path) -> BotResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(path).map_err(|e| {
            BotError::Config(format!(
                "Failed to read config file '{}': {e}",
                path.display()
            ))
        })?;
        toml::from_str(&raw).map_err(|e| {
            BotError::Config(format!("Invalid config file '{}': {e}", path.display()))
        })
    }

    /// Applies `IDS`, `TOKEN` and `FILE` overrides read through `lookup`.
    pub fn apply_env<F>(&mut self, lookup: F) -> BotResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(ids) = lookup("IDS") {
            self.authorized_ids = Allowlist::parse(&ids)?;
        }
        if let Some(token) = lookup("TOKEN") {
            self.telegram.token = token;
        }
        if let Some(file) = lookup("FILE") {
            self.recipes_file = PathBuf::from(file);
        }
        Ok(())
    }

    /// Checks everything `serve` needs.
    pub fn validate(&self) -> BotResult<()> {
        if self.authorized_ids.is_empty() {
            return Err(BotError::Config(
                "No authorized user ids. Set `authorized_ids` or the IDS environment variable."
                    .to_string(),
            ));
        }
        if self.telegram.token.trim().is_empty() {
            return Err(BotError::Config(
                "Telegram token not found. Set `telegram.token` or the TOKEN environment variable."
                    .to_string(),
            ));
        }
        if self.session.ttl_secs == 0 {
            return Err(BotError::Config("session.ttl_secs must be positive".to_string()));
        }
        if self.session.ttl_secs > MAX_SESSION_TTL_SECS {
            return Err(BotError::Config(format!(
                "session.ttl_secs must not exceed {MAX_SESSION_TTL_SECS} (one year)"
            )));
        }
        Ok(())
    }

    /// Session time-to-live.
    pub fn session_ttl(&self) -> Duration {
        Duration::from_secs(self.session.ttl_secs)
    }

    /// Reaper period, at least one second.
    pub fn purge_interval(&self) -> Duration {
        Duration::from_secs(self.session.purge_interval_secs.max(1))
    }
}
