//! Discord command implementations organized by category.

#![allow(clippy::too_long_first_doc_paragraph)]

use crate::{bot::BotData, errors::Error};

/// Soundboard browsing and voice commands
pub mod board;

/// General utility commands
pub mod general;

/// Group management commands
pub mod group;

/// Sound upload and removal commands
pub mod sound;

// Export commands
pub use board::*;
pub use general::*;
pub use group::*;
pub use sound::*;

/// Every slash command the bot registers.
#[must_use]
pub fn all() -> Vec<poise::Command<BotData, Error>> {
    vec![
        sounds(),
        groups(),
        stopsounds(),
        addsound(),
        removesound(),
        addgroup(),
        removegroup(),
        groupsound(),
        ungroupsound(),
        help(),
    ]
}
