//! Autocomplete queries over sounds and groups.
//!
//! Results are computed from fresh listings on every keystroke; there is no index.

use crate::{
    core::storage::SoundStorage,
    errors::Result,
};

/// Discord autocomplete limit.
pub const MAX_SUGGESTIONS: usize = 25;

/// Restricts which sounds are suggested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundFilter<'a> {
    /// Every sound in the community root.
    All,
    /// Sounds that belong to at least one group.
    InAnyGroup,
    /// Root sounds that are not yet members of the given group.
    NotInGroup(&'a str),
}

impl<'a> SoundFilter<'a> {
    /// Sounds that could still be added to `group`, or every sound while no group is known.
    #[must_use]
    pub const fn outside_group(group: Option<&'a str>) -> Self {
        match group {
            Some(group) => Self::NotInGroup(group),
            None => Self::All,
        }
    }
}

/// Restricts which groups are suggested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupFilter<'a> {
    /// Every group.
    All,
    /// Groups that contain the given sound.
    Containing(&'a str),
    /// Groups that do not contain the given sound.
    NotContaining(&'a str),
}

fn matches_partial(name: &str, partial_lower: &str) -> bool {
    name.to_lowercase().contains(partial_lower)
}

fn finish(mut names: Vec<String>) -> Vec<String> {
    names.sort();
    names.dedup();
    names.truncate(MAX_SUGGESTIONS);
    names
}

/// Whether `sound` is in `group`, treating names the storage cannot resolve as absent.
async fn member_or_false<S: SoundStorage>(storage: &S, sound: &str, group: &str) -> bool {
    storage.is_member(sound, group).await.unwrap_or(false)
}

/// Sound names containing `partial` (case-insensitive), narrowed by `filter`.
pub async fn search_sounds<S: SoundStorage>(
    storage: &S,
    partial: &str,
    filter: SoundFilter<'_>,
) -> Result<Vec<String>> {
    let partial_lower = partial.to_lowercase();

    let candidates: Vec<String> = match filter {
        SoundFilter::All => storage
            .list_sounds(None)
            .await?
            .into_iter()
            .map(|sound| sound.name)
            .collect(),
        SoundFilter::InAnyGroup => {
            let mut names = Vec::new();
            for group in storage.list_groups().await? {
                // An unreadable group contributes nothing
                if let Ok(sounds) = storage.list_sounds(Some(&group)).await {
                    names.extend(sounds.into_iter().map(|sound| sound.name));
                }
            }
            names
        }
        SoundFilter::NotInGroup(group) => {
            let mut names = Vec::new();
            for sound in storage.list_sounds(None).await? {
                if !member_or_false(storage, &sound.name, group).await {
                    names.push(sound.name);
                }
            }
            names
        }
    };

    Ok(finish(
        candidates
            .into_iter()
            .filter(|name| matches_partial(name, &partial_lower))
            .collect(),
    ))
}

/// Group names containing `partial` (case-insensitive), narrowed by `filter`.
pub async fn search_groups<S: SoundStorage>(
    storage: &S,
    partial: &str,
    filter: GroupFilter<'_>,
) -> Result<Vec<String>> {
    let partial_lower = partial.to_lowercase();

    let mut names = Vec::new();
    for group in storage.list_groups().await? {
        if !matches_partial(&group, &partial_lower) {
            continue;
        }
        let keep = match filter {
            GroupFilter::All => true,
            GroupFilter::Containing(sound) => member_or_false(storage, sound, &group).await,
            GroupFilter::NotContaining(sound) => !member_or_false(storage, sound, &group).await,
        };
        if keep {
            names.push(group);
        }
    }

    Ok(finish(names))
}
