//! General Discord commands - help.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{BotData, replies::reply_private},
        errors::{Error, Result},
    };

    /// Displays help information about available commands.
    #[poise::command(slash_command)]
    pub async fn help(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let help_text = "**Soundboard Help**\n\
        Here is a summary of all available commands.\n\n\
        **Playing Sounds**\n\
        • `/sounds [group]` - Shows the soundboard. Join a voice channel first to get playable buttons.\n\
        • `/groups` - Shows the sound groups as buttons that open each group's soundboard.\n\
        • `/stopsounds` - Disconnects the soundboard from voice.\n\n\
        **Managing Sounds**\n\
        • `/addsound <mp3_file> <name> [group]` - Uploads an MP3 (up to the configured size limit).\n\
        • `/removesound <name>` - Deletes a sound and removes it from every group.\n\n\
        **Managing Groups**\n\
        • `/addgroup <name>` - Creates an empty group.\n\
        • `/removegroup <name>` - Deletes a group. Its sounds stay on the soundboard.\n\
        • `/groupsound <sound> <group>` - Adds a sound to a group.\n\
        • `/ungroupsound <sound> <group>` - Removes a sound from a group.\n\n\
        • `/help` - Shows this help message.";

        reply_private(ctx, help_text).await
    }
}

// Re-export all commands
pub use inner::*;
