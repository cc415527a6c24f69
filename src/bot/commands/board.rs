//! Soundboard commands - `sounds`, `groups` and `stopsounds`.
//!
//! Members in a voice channel get a playable button grid; everyone else gets a
//! listing embed. Grids are bound to the voice session and expire when it ends.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{
            BotData,
            handlers::autocomplete,
            pages::{self, PageTarget},
            replies::{announce, author_voice_channel, guild_of, report_failure, reply_private},
        },
        core::{
            action, group,
            layout::{self, BUTTONS_PER_ROW, Button, Layout, ROWS_PER_GRID},
            sound,
        },
        errors::{Error, Result},
    };

    const EMPTY_SOUNDBOARD: &str = "Your soundboard is empty! Get it started with /addsound.";
    const NO_GROUPS: &str = "No groups exist yet! Create one with /addgroup.";

    fn empty_message(group: Option<&str>) -> String {
        group.map_or_else(
            || EMPTY_SOUNDBOARD.to_string(),
            |group| format!("The group `{group}` has no sounds."),
        )
    }

    /// Joins the invoker's voice channel and sends the button grid.
    async fn show_grid(
        ctx: poise::Context<'_, BotData, Error>,
        channel_id: poise::serenity_prelude::ChannelId,
        buttons: Vec<Button>,
        scope: Option<&str>,
        empty: &str,
    ) -> Result<()> {
        let guild_id = guild_of(ctx)?;
        ctx.defer_ephemeral().await?;
        let cancel = ctx
            .data()
            .voice
            .join(ctx.serenity_context(), guild_id, channel_id)
            .await?;

        match layout::layout(buttons, BUTTONS_PER_ROW, ROWS_PER_GRID, scope) {
            Layout::Empty => reply_private(ctx, empty).await,
            Layout::Pages(pages) => pages::deliver(PageTarget::Command(ctx), &pages, cancel).await,
        }
    }

    /// Shows the soundboard, or the sounds of one group.
    ///
    /// In a voice channel the bot joins and sends buttons that play each sound;
    /// otherwise it sends a list of the sound names.
    #[poise::command(slash_command, guild_only)]
    pub async fn sounds(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Optional group to show (shows all sounds if not specified)"]
        #[autocomplete = "autocomplete::autocomplete_group"]
        group: Option<String>,
    ) -> Result<()> {
        let guild_id = guild_of(ctx)?;
        let storage = ctx.data().library(guild_id).await?;
        let group = group.as_deref();

        let sounds = match sound::list_sounds(&storage, group).await {
            Ok(sounds) => sounds,
            Err(e) => return report_failure(ctx, e).await,
        };

        if let Some(channel_id) = author_voice_channel(ctx) {
            return show_grid(
                ctx,
                channel_id,
                action::sound_buttons(&sounds),
                group,
                &empty_message(group),
            )
            .await;
        }

        if sounds.is_empty() {
            return reply_private(ctx, empty_message(group)).await;
        }
        let names: Vec<&str> = sounds.iter().map(|s| s.name.as_str()).collect();
        let description = group.map_or_else(
            || "Join a voice channel and use /sounds again to play them.".to_string(),
            |group| format!("Sounds in `{group}`. Join a voice channel and use /sounds again to play them."),
        );
        let embed = pages::listing_embed("Soundboard", &description, "Sounds", &names);
        ctx.send(poise::CreateReply::default().embed(embed).ephemeral(true))
            .await?;
        Ok(())
    }

    /// Shows the sound groups.
    ///
    /// In a voice channel each group is a button that opens that group's soundboard.
    #[poise::command(slash_command, guild_only)]
    pub async fn groups(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let guild_id = guild_of(ctx)?;
        let storage = ctx.data().library(guild_id).await?;
        let groups = group::list_groups(&storage).await?;

        if let Some(channel_id) = author_voice_channel(ctx) {
            return show_grid(
                ctx,
                channel_id,
                action::group_buttons(&groups),
                None,
                NO_GROUPS,
            )
            .await;
        }

        if groups.is_empty() {
            return reply_private(ctx, NO_GROUPS).await;
        }
        let names: Vec<&str> = groups.iter().map(String::as_str).collect();
        let embed = pages::listing_embed(
            "Sound Groups",
            "Join a voice channel and use /groups again to browse them.",
            "Groups",
            &names,
        );
        ctx.send(poise::CreateReply::default().embed(embed).ephemeral(true))
            .await?;
        Ok(())
    }

    /// Disconnects the soundboard from voice.
    #[poise::command(slash_command, guild_only)]
    pub async fn stopsounds(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let guild_id = guild_of(ctx)?;
        if ctx.data().voice.stop(ctx.serenity_context(), guild_id).await? {
            announce(ctx, "🤫 Soundboard session ended.").await
        } else {
            reply_private(
                ctx,
                "The soundboard is not currently active. There is nothing to stop!",
            )
            .await
        }
    }
}

// Re-export all commands
pub use inner::*;
