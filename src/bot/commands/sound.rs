//! Sound commands - `addsound` and `removesound`.
//!
//! Both defer privately, reply to the invoker with the outcome, and post a public
//! notice when the soundboard changed.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{
            BotData,
            handlers::autocomplete,
            replies::{announce, guild_of, report_failure, reply_private},
        },
        core::{
            group,
            sound::{self, Upload},
        },
        errors::{Error, Result},
    };
    use poise::serenity_prelude as serenity;
    use tracing::{info, warn};

    /// Adds an MP3 file to the soundboard.
    ///
    /// Size, format and name are checked before the attachment is downloaded, and the
    /// file is only written if nothing else claimed the name in the meantime.
    #[poise::command(slash_command, guild_only)]
    pub async fn addsound(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "The MP3 file for the sound"] mp3_file: serenity::Attachment,
        #[description = "The name of the sound"]
        #[max_length = 50]
        name: String,
        #[description = "Optional group to add the sound to"]
        #[autocomplete = "autocomplete::autocomplete_group"]
        group: Option<String>,
    ) -> Result<()> {
        ctx.defer_ephemeral().await?;
        let guild_id = guild_of(ctx)?;
        let data = ctx.data();
        let storage = data.library(guild_id).await?;
        let limits = data.upload_limits();
        let upload = Upload {
            name: &name,
            content_type: mp3_file.content_type.as_deref(),
            declared_size: u64::from(mp3_file.size),
        };

        let prechecked = async {
            sound::check_upload(&upload, limits)?;
            if let Some(group) = group.as_deref() {
                group::ensure_group_exists(&storage, group).await?;
            }
            sound::ensure_name_available(&storage, &name).await
        }
        .await;
        if let Err(e) = prechecked {
            return report_failure(ctx, e).await;
        }

        let stored = async {
            let bytes = data.fetcher.fetch(&mp3_file.url, limits.max_file_size).await?;
            sound::add_sound(&storage, &upload, bytes, limits).await
        }
        .await;
        if let Err(e) = stored {
            return report_failure(ctx, e).await;
        }
        info!("Added sound `{}` in guild {}", name, guild_id);

        let mut reply =
            format!("`{name}` successfully added. Call /sounds again to see the updated soundboard!");
        if let Some(group) = group.as_deref() {
            match group::add_membership(&storage, &name, group).await {
                Ok(()) => reply.push_str(&format!(" It is also in group `{group}`.")),
                Err(e) => {
                    warn!("Could not add `{}` to group `{}`: {}", name, group, e);
                    reply.push_str(&format!(
                        " It could not be added to group `{group}`: {}",
                        e.user_message()
                    ));
                }
            }
        }

        reply_private(ctx, reply).await?;
        announce(
            ctx,
            format!("🔊 A new sound has been added to the soundboard: `{name}`"),
        )
        .await
    }

    /// Removes a sound from the soundboard and from every group it belongs to.
    #[poise::command(slash_command, guild_only)]
    pub async fn removesound(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "The name of the sound to remove"]
        #[autocomplete = "autocomplete::autocomplete_sound"]
        name: String,
    ) -> Result<()> {
        ctx.defer_ephemeral().await?;
        let guild_id = guild_of(ctx)?;
        let storage = ctx.data().library(guild_id).await?;

        match sound::remove_sound(&storage, &name).await {
            Ok(()) => {
                info!("Removed sound `{}` in guild {}", name, guild_id);
                reply_private(
                    ctx,
                    format!("`{name}` successfully removed. Call /sounds again to see the updated soundboard!"),
                )
                .await?;
                announce(
                    ctx,
                    format!("🔇 A sound has been removed from the soundboard: `{name}`"),
                )
                .await
            }
            Err(Error::SoundNotFound { .. }) => {
                reply_private(
                    ctx,
                    format!("This sound (`{name}`) does not exist, and therefore cannot be removed."),
                )
                .await
            }
            Err(e) => report_failure(ctx, e).await,
        }
    }
}

// Re-export all commands
pub use inner::*;
