//! Group commands - `addgroup`, `removegroup`, `groupsound` and `ungroupsound`.
//!
//! Groups are directories inside the community's library; membership is a link to
//! the sound's file, so grouping never copies audio.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{
            BotData,
            handlers::autocomplete,
            replies::{announce, guild_of, report_failure, reply_private},
        },
        core::group,
        errors::{Error, Result},
    };
    use tracing::info;

    /// Creates a new, empty sound group.
    #[poise::command(slash_command, guild_only)]
    pub async fn addgroup(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "The name of the group"]
        #[max_length = 50]
        name: String,
    ) -> Result<()> {
        ctx.defer_ephemeral().await?;
        let guild_id = guild_of(ctx)?;
        let storage = ctx.data().library(guild_id).await?;

        match group::create_group(&storage, &name).await {
            Ok(()) => {
                info!("Created group `{}` in guild {}", name, guild_id);
                reply_private(ctx, format!("Group `{name}` successfully created!")).await?;
                announce(ctx, format!("📁 A new group has been created: `{name}`")).await
            }
            Err(e) => report_failure(ctx, e).await,
        }
    }

    /// Deletes a group. The sounds in it stay on the soundboard.
    #[poise::command(slash_command, guild_only)]
    pub async fn removegroup(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "The name of the group to delete"]
        #[autocomplete = "autocomplete::autocomplete_group"]
        name: String,
    ) -> Result<()> {
        ctx.defer_ephemeral().await?;
        let guild_id = guild_of(ctx)?;
        let storage = ctx.data().library(guild_id).await?;

        match group::delete_group(&storage, &name).await {
            Ok(()) => {
                info!("Deleted group `{}` in guild {}", name, guild_id);
                reply_private(ctx, format!("Group `{name}` successfully deleted!")).await?;
                announce(ctx, format!("📁 A group has been deleted: `{name}`")).await
            }
            Err(e) => report_failure(ctx, e).await,
        }
    }

    /// Adds an existing sound to a group.
    #[poise::command(slash_command, guild_only)]
    pub async fn groupsound(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "The sound to add"]
        #[autocomplete = "autocomplete::autocomplete_sound_outside_group"]
        sound: String,
        #[description = "The group to add it to"]
        #[autocomplete = "autocomplete::autocomplete_group_without_sound"]
        group: String,
    ) -> Result<()> {
        ctx.defer_ephemeral().await?;
        let guild_id = guild_of(ctx)?;
        let storage = ctx.data().library(guild_id).await?;

        match group::add_membership(&storage, &sound, &group).await {
            Ok(()) => {
                info!("Added `{}` to group `{}` in guild {}", sound, group, guild_id);
                reply_private(ctx, format!("`{sound}` successfully added to group `{group}`!")).await?;
                announce(
                    ctx,
                    format!("🔗 Sound `{sound}` has been added to group `{group}`"),
                )
                .await
            }
            Err(e) => report_failure(ctx, e).await,
        }
    }

    /// Removes a sound from a group without deleting the sound.
    #[poise::command(slash_command, guild_only)]
    pub async fn ungroupsound(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "The sound to remove"]
        #[autocomplete = "autocomplete::autocomplete_grouped_sound"]
        sound: String,
        #[description = "The group to remove it from"]
        #[autocomplete = "autocomplete::autocomplete_group_with_sound"]
        group: String,
    ) -> Result<()> {
        ctx.defer_ephemeral().await?;
        let guild_id = guild_of(ctx)?;
        let storage = ctx.data().library(guild_id).await?;

        match group::remove_membership(&storage, &sound, &group).await {
            Ok(()) => {
                info!("Removed `{}` from group `{}` in guild {}", sound, group, guild_id);
                reply_private(ctx, format!("`{sound}` successfully removed from group `{group}`!"))
                    .await?;
                announce(
                    ctx,
                    format!("🔗 Sound `{sound}` has been removed from group `{group}`"),
                )
                .await
            }
            Err(e) => report_failure(ctx, e).await,
        }
    }
}

// Re-export all commands
pub use inner::*;
