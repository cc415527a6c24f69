//! Action tokens carried by soundboard buttons.
//!
//! A token is `<kind>:<name>`. Only the first `:` is a delimiter, so names that
//! contain `:` themselves round-trip unchanged.

use crate::core::{layout::Button, sound::Sound};
use std::fmt;

const DELIMITER: char = ':';
const SOUND_KIND: &str = "sound";
const GROUP_KIND: &str = "group";

/// What a pressed button asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionToken {
    /// Play the named sound.
    Sound(String),
    /// Show the sounds of the named group.
    Group(String),
}

impl ActionToken {
    /// Parses a button's custom id. Returns `None` for ids this bot did not create.
    #[must_use]
    pub fn parse(custom_id: &str) -> Option<Self> {
        let (kind, name) = custom_id.split_once(DELIMITER)?;
        if name.is_empty() {
            return None;
        }
        match kind {
            SOUND_KIND => Some(Self::Sound(name.to_string())),
            GROUP_KIND => Some(Self::Group(name.to_string())),
            _ => None,
        }
    }
}

impl fmt::Display for ActionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sound(name) => write!(f, "{SOUND_KIND}{DELIMITER}{name}"),
            Self::Group(name) => write!(f, "{GROUP_KIND}{DELIMITER}{name}"),
        }
    }
}

/// One play button per sound, labelled with the sound name.
#[must_use]
pub fn sound_buttons(sounds: &[Sound]) -> Vec<Button> {
    sounds
        .iter()
        .map(|sound| Button {
            label: sound.name.clone(),
            token: ActionToken::Sound(sound.name.clone()).to_string(),
        })
        .collect()
}

/// One browse button per group.
#[must_use]
pub fn group_buttons(groups: &[String]) -> Vec<Button> {
    groups
        .iter()
        .map(|group| Button {
            label: group.clone(),
            token: ActionToken::Group(group.clone()).to_string(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_names_with_delimiters_round_trip() {
        for name in ["airhorn", "dj:intro", "a:b:c", ":", "sound:x", "-dash-"] {
            let sound = ActionToken::Sound(name.to_string());
            assert_eq!(ActionToken::parse(&sound.to_string()), Some(sound));

            let group = ActionToken::Group(name.to_string());
            assert_eq!(ActionToken::parse(&group.to_string()), Some(group));
        }
    }

    #[test]
    fn test_foreign_ids_are_ignored() {
        assert_eq!(ActionToken::parse("sounds-airhorn.mp3"), None);
        assert_eq!(ActionToken::parse("persona:chef"), None);
        assert_eq!(ActionToken::parse("sound:"), None);
        assert_eq!(ActionToken::parse(""), None);
    }

    #[test]
    fn test_buttons_carry_tokens() {
        let sounds = vec![Sound {
            name: "dj:intro".to_string(),
            location: PathBuf::from("/tmp/dj:intro.mp3"),
            size: 1,
        }];
        let buttons = sound_buttons(&sounds);
        assert_eq!(buttons[0].label, "dj:intro");
        assert_eq!(
            ActionToken::parse(&buttons[0].token),
            Some(ActionToken::Sound("dj:intro".to_string()))
        );

        let buttons = group_buttons(&["memes".to_string()]);
        assert_eq!(buttons[0].token, "group:memes");
    }
}
