//! Group business logic - creation, deletion and sound membership.
//!
//! A group never owns sounds; it only references them. Deleting a group drops its
//! memberships and leaves every canonical sound in place.

use crate::{
    core::{sound::validate_sound_name, storage::SoundStorage},
    errors::{Error, Result},
};
use tracing::info;

/// Longest accepted group name, in characters.
pub const MAX_GROUP_NAME_LEN: usize = 50;

/// Checks the shape of a group name. Path safety is enforced by the storage.
pub fn validate_group_name(name: &str) -> Result<()> {
    let reason = if name.trim().is_empty() {
        "name cannot be empty".to_string()
    } else if name.chars().count() > MAX_GROUP_NAME_LEN {
        format!("name cannot be longer than {MAX_GROUP_NAME_LEN} characters")
    } else if name.chars().any(char::is_control) {
        "name cannot contain control characters".to_string()
    } else {
        return Ok(());
    };

    Err(Error::InvalidName {
        name: name.to_string(),
        reason,
    })
}

/// Creates a new, empty group.
pub async fn create_group<S: SoundStorage>(storage: &S, name: &str) -> Result<()> {
    validate_group_name(name)?;
    storage.create_group(name).await?;
    info!("Added new group: {}", name);
    Ok(())
}

/// Deletes a group and its memberships. The sounds themselves are kept.
pub async fn delete_group<S: SoundStorage>(storage: &S, name: &str) -> Result<()> {
    validate_group_name(name)?;
    storage.delete_group(name).await?;
    info!("Removed group: {}", name);
    Ok(())
}

/// Lists every group in the community.
pub async fn list_groups<S: SoundStorage>(storage: &S) -> Result<Vec<String>> {
    storage.list_groups().await
}

/// Fails with [`Error::GroupNotFound`] unless `name` is an existing group.
pub async fn ensure_group_exists<S: SoundStorage>(storage: &S, name: &str) -> Result<()> {
    validate_group_name(name)?;
    if !storage.group_exists(name).await? {
        return Err(Error::GroupNotFound {
            name: name.to_string(),
        });
    }
    Ok(())
}

/// Adds `sound` to `group` by linking the group entry to the canonical file.
///
/// # Arguments
/// * `storage` - The community's library
/// * `sound` - Name of an existing sound
/// * `group` - Name of an existing group
///
/// # Errors
/// Checked in order: [`Error::SoundNotFound`], [`Error::GroupNotFound`], then
/// [`Error::AlreadyMember`].
pub async fn add_membership<S: SoundStorage>(storage: &S, sound: &str, group: &str) -> Result<()> {
    validate_sound_name(sound)?;
    validate_group_name(group)?;

    if !storage.sound_exists(sound).await? {
        return Err(Error::SoundNotFound {
            name: sound.to_string(),
        });
    }
    ensure_group_exists(storage, group).await?;
    if storage.is_member(sound, group).await? {
        return Err(Error::AlreadyMember {
            sound: sound.to_string(),
            group: group.to_string(),
        });
    }

    storage.link(sound, group).await?;
    info!("Added sound `{}` to group `{}`", sound, group);
    Ok(())
}

/// Removes `sound` from `group`, leaving the sound itself in place.
///
/// Fails with [`Error::GroupNotFound`] before [`Error::NotAMember`].
pub async fn remove_membership<S: SoundStorage>(
    storage: &S,
    sound: &str,
    group: &str,
) -> Result<()> {
    validate_sound_name(sound)?;
    ensure_group_exists(storage, group).await?;

    if !storage.is_member(sound, group).await? {
        return Err(Error::NotAMember {
            sound: sound.to_string(),
            group: group.to_string(),
        });
    }

    storage.unlink(sound, group).await?;
    info!("Removed sound `{}` from group `{}`", sound, group);
    Ok(())
}
