//! Autocomplete handlers for slash command parameters.
//!
//! Suggestions are computed by listing the community's library on every keystroke.
//! Failures are logged and produce an empty list rather than an error reply.

use crate::{
    bot::{BotData, replies::option_value},
    core::{
        search::{self, GroupFilter, SoundFilter},
        storage::FsStorage,
    },
    errors::{Error, Result},
};
use tracing::warn;

fn library(ctx: poise::Context<'_, BotData, Error>) -> Option<FsStorage> {
    ctx.guild_id().map(|guild_id| ctx.data().storage_for(guild_id))
}

fn or_empty(result: Result<Vec<String>>) -> Vec<String> {
    result.unwrap_or_else(|e| {
        warn!("Autocomplete failed: {}", e);
        Vec::new()
    })
}

async fn sounds(ctx: poise::Context<'_, BotData, Error>, partial: &str, filter: SoundFilter<'_>) -> Vec<String> {
    let Some(storage) = library(ctx) else {
        return Vec::new();
    };
    or_empty(search::search_sounds(&storage, partial, filter).await)
}

async fn groups(ctx: poise::Context<'_, BotData, Error>, partial: &str, filter: GroupFilter<'_>) -> Vec<String> {
    let Some(storage) = library(ctx) else {
        return Vec::new();
    };
    or_empty(search::search_groups(&storage, partial, filter).await)
}

/// Suggests every sound in the community.
pub async fn autocomplete_sound(ctx: poise::Context<'_, BotData, Error>, partial: &str) -> Vec<String> {
    sounds(ctx, partial, SoundFilter::All).await
}

/// Suggests sounds that are not yet in the already-entered `group` option.
///
/// Falls back to every sound until a group has been typed.
pub async fn autocomplete_sound_outside_group(
    ctx: poise::Context<'_, BotData, Error>,
    partial: &str,
) -> Vec<String> {
    let group = option_value(ctx, "group");
    sounds(ctx, partial, SoundFilter::outside_group(group.as_deref())).await
}

/// Suggests sounds that belong to at least one group.
pub async fn autocomplete_grouped_sound(
    ctx: poise::Context<'_, BotData, Error>,
    partial: &str,
) -> Vec<String> {
    sounds(ctx, partial, SoundFilter::InAnyGroup).await
}

/// Suggests every group in the community.
pub async fn autocomplete_group(ctx: poise::Context<'_, BotData, Error>, partial: &str) -> Vec<String> {
    groups(ctx, partial, GroupFilter::All).await
}

/// Suggests groups the already-entered `sound` option could be added to.
pub async fn autocomplete_group_without_sound(
    ctx: poise::Context<'_, BotData, Error>,
    partial: &str,
) -> Vec<String> {
    match option_value(ctx, "sound") {
        Some(sound) => groups(ctx, partial, GroupFilter::NotContaining(&sound)).await,
        None => groups(ctx, partial, GroupFilter::All).await,
    }
}

/// Suggests groups that contain the already-entered `sound` option.
pub async fn autocomplete_group_with_sound(
    ctx: poise::Context<'_, BotData, Error>,
    partial: &str,
) -> Vec<String> {
    match option_value(ctx, "sound") {
        Some(sound) => groups(ctx, partial, GroupFilter::Containing(&sound)).await,
        None => groups(ctx, partial, GroupFilter::All).await,
    }
}
