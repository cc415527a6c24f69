//! Reply and lookup helpers shared by the slash commands.

use crate::{
    bot::BotData,
    errors::{Error, Result},
};
use poise::serenity_prelude as serenity;
use tracing::debug;

/// The guild a command was invoked in.
pub fn guild_of(ctx: poise::Context<'_, BotData, Error>) -> Result<serenity::GuildId> {
    ctx.guild_id().ok_or(Error::GuildOnly)
}

/// The voice channel the invoking member is currently connected to, if any.
#[must_use]
pub fn author_voice_channel(ctx: poise::Context<'_, BotData, Error>) -> Option<serenity::ChannelId> {
    let guild = ctx.guild()?;
    guild
        .voice_states
        .get(&ctx.author().id)
        .and_then(|state| state.channel_id)
}

/// Replies to the invoker only.
pub async fn reply_private(ctx: poise::Context<'_, BotData, Error>, content: impl Into<String>) -> Result<()> {
    ctx.send(
        poise::CreateReply::default()
            .content(content)
            .ephemeral(true),
    )
    .await?;
    Ok(())
}

/// Posts a notice everyone in the channel can see.
pub async fn announce(ctx: poise::Context<'_, BotData, Error>, content: impl Into<String>) -> Result<()> {
    ctx.send(
        poise::CreateReply::default()
            .content(content)
            .ephemeral(false),
    )
    .await?;
    Ok(())
}

/// Tells the invoker what went wrong when the error is theirs to fix, and hands
/// everything else to the framework error hook.
pub async fn report_failure(ctx: poise::Context<'_, BotData, Error>, error: Error) -> Result<()> {
    if error.is_user_facing() {
        debug!("Command `{}` rejected: {}", ctx.command().name, error);
        reply_private(ctx, error.user_message()).await
    } else {
        Err(error)
    }
}

/// The current value of another option of the command being autocompleted.
#[must_use]
pub fn option_value(ctx: poise::Context<'_, BotData, Error>, name: &str) -> Option<String> {
    let poise::Context::Application(app) = ctx else {
        return None;
    };
    app.args
        .iter()
        .find(|option| option.name == name)
        .and_then(|option| match &option.value {
            serenity::ResolvedValue::String(value) => Some((*value).to_string()),
            serenity::ResolvedValue::Autocomplete { value, .. } => Some((*value).to_string()),
            _ => None,
        })
        .filter(|value| !value.is_empty())
}
