mod config;

use clap::{Parser, Subcommand};
use config::BotConfig;
use recipebot_channels::TelegramChannel;
use recipebot_dialogue::{DialogueEngine, Replies};
use recipebot_gateway::Gateway;
use recipebot_session::{spawn_reaper, SessionStore, TtlSessionStore};
use recipebot_store::{JsonRecordRepository, RecordRepository};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

const EVENT_BUFFER: usize = 256;

#[derive(Parser)]
#[command(name = "recipebot", about = "recipebot - collects recipes over Telegram")]
struct Cli {
    /// Path to config file (optional; env vars IDS, TOKEN, FILE override it)
    #[arg(short, long, default_value = "recipebot.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the bot
    Serve,
    /// Print the recipes stored in the collection
    List,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .init();

    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    let mut config = BotConfig::load(&cli.config)?;
    config.apply_env(|key| std::env::var(key).ok())?;

    let repository = Arc::new(
        JsonRecordRepository::new(config.recipes_file.clone())
            .require_existing(config.require_existing_file),
    );

    match cli.command {
        Commands::Serve => serve(config, repository).await?,
        Commands::List => {
            let book = repository.load().await?;
            if book.is_empty() {
                println!("No recipes in {}.", config.recipes_file.display());
            } else {
                for recipe in &book.recipes {
                    println!(
                        "  {} - {} [{}]",
                        recipe.title,
                        recipe.url,
                        recipe.tag_labels().join(", ")
                    );
                }
                println!("\nTotal: {} recipe(s)", book.len());
            }
        }
    }

    Ok(())
}

async fn serve(config: BotConfig, repository: Arc<JsonRecordRepository>) -> anyhow::Result<()> {
    config.validate()?;

    let store = TtlSessionStore::new(config.session_ttl());
    info!(
        users = config.authorized_ids.len(),
        file = %config.recipes_file.display(),
        ttl = ?store.ttl(),
        "Starting recipebot"
    );
    let sessions: Arc<dyn SessionStore> = Arc::new(store);
    let reaper = spawn_reaper(sessions.clone(), config.purge_interval());

    let engine = Arc::new(DialogueEngine::new(
        config.authorized_ids.clone(),
        sessions,
        repository,
        Replies::new(config.operator.clone()),
    ));

    let mut telegram = TelegramChannel::new(config.telegram.token.clone(), EVENT_BUFFER)
        .with_poll_timeout(Duration::from_secs(config.telegram.poll_timeout_secs));
    if let Some(base) = &config.telegram.api_base_url {
        telegram = telegram.with_api_base(base.clone());
    }
    let events = telegram
        .take_event_receiver()
        .ok_or_else(|| anyhow::anyhow!("Telegram event receiver already taken"))?;
    let telegram = Arc::new(telegram);

    let poller = {
        let telegram = telegram.clone();
        tokio::spawn(async move {
            if let Err(e) = telegram.poll_updates().await {
                error!(error = %e, "Telegram polling stopped");
            }
        })
    };

    let gateway = Arc::new(Gateway::new(engine, telegram));
    let shutdown = async {
        match tokio::signal::ctrl_c().await {
            Ok(()) => info!("Shutdown requested"),
            Err(e) => {
                error!(error = %e, "Cannot listen for Ctrl-C, shutdown signal disabled");
                std::future::pending::<()>().await;
            }
        }
    };
    // Stops taking updates on Ctrl-C but lets in-flight events finish.
    gateway.run_until(events, shutdown).await;

    poller.abort();
    reaper.abort();
    info!("recipebot stopped");
    Ok(())
}
