//! Soundboard button presses.

use crate::{
    bot::{
        BotData,
        pages::{self, PageTarget},
    },
    core::{
        action::{self, ActionToken},
        layout::{self, BUTTONS_PER_ROW, Layout, ROWS_PER_GRID},
        sound,
    },
    errors::{ErrorKind, Result},
};
use poise::serenity_prelude as serenity;
use tracing::{error, info, warn};

/// Reply for presses that cannot produce audio.
pub const UNABLE_TO_PLAY: &str = "Sorry, I am unable to play that sound.";

/// Routes a button press to playback or group browsing.
pub async fn handle_component(
    ctx: &serenity::Context,
    interaction: &serenity::ComponentInteraction,
    data: &BotData,
) -> Result<()> {
    let custom_id = &interaction.data.custom_id;
    let Some(guild_id) = interaction.guild_id else {
        return respond_private(ctx, interaction, UNABLE_TO_PLAY).await;
    };

    match ActionToken::parse(custom_id) {
        Some(ActionToken::Sound(name)) => play_sound(ctx, interaction, data, guild_id, &name).await,
        Some(ActionToken::Group(name)) => show_group(ctx, interaction, data, guild_id, &name).await,
        None => {
            warn!("Ignoring unknown component id `{}`", custom_id);
            respond_private(ctx, interaction, "Sorry, I don't recognise that button.").await
        }
    }
}

async fn play_sound(
    ctx: &serenity::Context,
    interaction: &serenity::ComponentInteraction,
    data: &BotData,
    guild_id: serenity::GuildId,
    name: &str,
) -> Result<()> {
    let storage = data.library(guild_id).await?;
    let sound = match sound::find_sound(&storage, name).await {
        Ok(sound) => sound,
        Err(e) if matches!(e.kind(), ErrorKind::NotFound | ErrorKind::Validation) => {
            error!("Attempted to play missing sound `{}` in guild {}: {}", name, guild_id, e);
            return respond_private(ctx, interaction, UNABLE_TO_PLAY).await;
        }
        Err(e) => return Err(e),
    };

    if data.voice.play(ctx, guild_id, &sound.location).await? {
        info!("Playing `{}` in guild {}", sound.name, guild_id);
        interaction
            .create_response(&ctx.http, serenity::CreateInteractionResponse::Acknowledge)
            .await?;
        Ok(())
    } else {
        respond_private(ctx, interaction, UNABLE_TO_PLAY).await
    }
}

async fn show_group(
    ctx: &serenity::Context,
    interaction: &serenity::ComponentInteraction,
    data: &BotData,
    guild_id: serenity::GuildId,
    group: &str,
) -> Result<()> {
    let storage = data.library(guild_id).await?;
    let sounds = match sound::list_sounds(&storage, Some(group)).await {
        Ok(sounds) => sounds,
        Err(e) if e.is_user_facing() => {
            return respond_private(ctx, interaction, &e.user_message()).await;
        }
        Err(e) => return Err(e),
    };

    let target = PageTarget::Component { ctx, interaction };
    match layout::layout(
        action::sound_buttons(&sounds),
        BUTTONS_PER_ROW,
        ROWS_PER_GRID,
        Some(group),
    ) {
        Layout::Empty => target.notice(&format!("The group `{group}` has no sounds.")).await,
        Layout::Pages(pages) => {
            // Without a voice session the pages only expire with the interaction token.
            let cancel = data
                .voice
                .current_token(guild_id)
                .await
                .unwrap_or_default();
            pages::deliver(target, &pages, cancel).await
        }
    }
}

/// Answers a button press privately, falling back to a follow-up if it was already answered.
pub async fn respond_private(
    ctx: &serenity::Context,
    interaction: &serenity::ComponentInteraction,
    content: &str,
) -> Result<()> {
    let message = serenity::CreateInteractionResponseMessage::new()
        .content(content)
        .ephemeral(true);
    if interaction
        .create_response(&ctx.http, serenity::CreateInteractionResponse::Message(message))
        .await
        .is_err()
    {
        interaction
            .create_followup(
                &ctx.http,
                serenity::CreateInteractionResponseFollowup::new()
                    .content(content)
                    .ephemeral(true),
            )
            .await?;
    }
    Ok(())
}
