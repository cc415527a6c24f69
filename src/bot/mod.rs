//! Bot layer - Discord-specific interface and command handlers
//!
//! This module wires the soundboard core to Discord: slash commands, autocomplete,
//! button presses, voice playback, and the shared state they all read.

/// Discord command implementations (soundboard, sounds, groups, general)
pub mod commands;
/// Discord interaction handlers (autocomplete, buttons, framework hooks)
pub mod handlers;
/// Multi-page delivery with cancellation and expiry
pub mod pages;
/// Reply helpers shared by commands
pub mod replies;
/// Voice connections and session tokens
pub mod voice;

use crate::{
    config::AppConfig,
    core::{fetch::Fetcher, sound::UploadLimits, storage::FsStorage},
    errors::Result,
};
use poise::serenity_prelude as serenity;
use songbird::SerenityInit;
use std::sync::Arc;
use tracing::{error, info, instrument};
use voice::VoiceSessions;

/// Shared data available to all bot commands.
pub struct BotData {
    /// Application settings
    pub config: Arc<AppConfig>,
    /// HTTP client for attachment downloads
    pub fetcher: Fetcher,
    /// Voice sessions per community
    pub voice: Arc<VoiceSessions>,
}

impl BotData {
    /// Builds the shared state from the loaded configuration.
    pub fn new(config: Arc<AppConfig>) -> Result<Self> {
        let fetcher = Fetcher::new(config.fetch_timeout)?;
        Ok(Self {
            config,
            fetcher,
            voice: Arc::new(VoiceSessions::new()),
        })
    }

    /// The community's library, without touching the filesystem.
    #[must_use]
    pub fn storage_for(&self, guild_id: serenity::GuildId) -> FsStorage {
        FsStorage::for_community(&self.config.sounds_directory, guild_id.get())
    }

    /// The community's library, creating its root if this is the first interaction.
    pub async fn library(&self, guild_id: serenity::GuildId) -> Result<FsStorage> {
        let storage = self.storage_for(guild_id);
        storage
            .ensure_root()
            .await
            .inspect_err(|e| error!("Failed to prepare library for guild {}: {}", guild_id, e))?;
        Ok(storage)
    }

    /// Upload limits from configuration.
    #[must_use]
    pub fn upload_limits(&self) -> UploadLimits {
        UploadLimits {
            max_file_size: self.config.max_file_size,
        }
    }
}

/// Connects to Discord and runs until the client stops.
#[instrument(skip(config))]
pub async fn run_bot(config: Arc<AppConfig>) -> Result<()> {
    let setup_config = Arc::clone(&config);

    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: commands::all(),
            on_error: |error| Box::pin(handlers::on_error(error)),
            event_handler: |ctx, event, framework, data| {
                Box::pin(handlers::event_handler(ctx, event, framework, data))
            },
            ..Default::default()
        })
        .setup(move |ctx, ready, framework| {
            Box::pin(async move {
                info!("Logged in as {}", ready.user.name);
                let commands = &framework.options().commands;
                if let Some(guild_id) = setup_config.dev_guild_id {
                    let guild_id = serenity::GuildId::new(guild_id);
                    poise::builtins::register_in_guild(ctx, commands, guild_id).await?;
                    info!("Registered commands in guild {}", guild_id);
                } else {
                    poise::builtins::register_globally(ctx, commands).await?;
                    info!("Registered commands globally");
                }
                BotData::new(setup_config)
            })
        })
        .build();

    let intents = serenity::GatewayIntents::GUILDS | serenity::GatewayIntents::GUILD_VOICE_STATES;

    info!("Setting up Serenity client for Poise framework...");
    let mut client = serenity::Client::builder(&config.discord_token, intents)
        .framework(framework)
        .register_songbird()
        .await
        .inspect_err(|e| error!("Error creating client: {:?}", e))?;

    info!("Starting bot client...");
    client
        .start()
        .await
        .inspect_err(|e| error!("Client error: {:?}", e))?;
    Ok(())
}
