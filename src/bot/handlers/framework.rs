//! Framework-level hooks: command errors and raw gateway events.

use crate::{
    bot::{BotData, handlers::buttons},
    errors::Error,
};
use poise::serenity_prelude as serenity;
use tracing::{error, info};

/// Logs a failed command and sends the invoker exactly one private reply.
pub async fn on_error(error: poise::FrameworkError<'_, BotData, Error>) {
    match error {
        poise::FrameworkError::Setup { error, .. } => {
            error!("Failed to start bot: {:?}", error);
        }
        poise::FrameworkError::Command { error, ctx, .. } => {
            error!("Error in command `{}`: {:?}", ctx.command().name, error);
            let reply = poise::CreateReply::default()
                .content(error.user_message())
                .ephemeral(true);
            if let Err(e) = ctx.send(reply).await {
                error!("Failed to send error message: {}", e);
            }
        }
        error => {
            if let Err(e) = poise::builtins::on_error(error).await {
                error!("Error while handling error: {}", e);
            }
        }
    }
}

/// Handles gateway events that are not slash commands.
pub async fn event_handler(
    ctx: &serenity::Context,
    event: &serenity::FullEvent,
    _framework: poise::FrameworkContext<'_, BotData, Error>,
    data: &BotData,
) -> Result<(), Error> {
    match event {
        serenity::FullEvent::Ready { data_about_bot } => {
            info!("{} is connected to {} guild(s)", data_about_bot.user.name, data_about_bot.guilds.len());
        }
        serenity::FullEvent::InteractionCreate {
            interaction: serenity::Interaction::Component(component),
        } => {
            if let Err(e) = buttons::handle_component(ctx, component, data).await {
                error!(
                    "Error handling button `{}`: {:?}",
                    component.data.custom_id, e
                );
                if let Err(why) = buttons::respond_private(ctx, component, &e.user_message()).await {
                    error!("Failed to send error message: {}", why);
                }
            }
        }
        _ => {}
    }
    Ok(())
}
