//! Sound business logic - upload validation, listing and removal.
//!
//! Functions are generic over [`SoundStorage`] so the same rules apply to any
//! backend. Removal cascades through every group before the canonical entry is
//! deleted.

use crate::{
    core::storage::SoundStorage,
    errors::{Error, Result},
};
use std::path::PathBuf;
use tracing::{info, warn};

/// File extension of every stored sound.
pub const SOUND_EXTENSION: &str = "mp3";

/// The only accepted upload content type.
pub const SOUND_CONTENT_TYPE: &str = "audio/mpeg";

/// Longest accepted sound name, in characters.
pub const MAX_SOUND_NAME_LEN: usize = 50;

/// A stored, playable sound.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sound {
    /// Name without extension
    pub name: String,
    /// Location of the entry this sound was listed from
    pub location: PathBuf,
    /// Size in bytes
    pub size: u64,
}

/// Metadata declared for an upload before its bytes are fetched.
#[derive(Debug, Clone, Copy)]
pub struct Upload<'a> {
    /// Requested sound name
    pub name: &'a str,
    /// Content type reported by the uploader
    pub content_type: Option<&'a str>,
    /// Size reported by the uploader, in bytes
    pub declared_size: u64,
}

/// Limits applied to uploads.
#[derive(Debug, Clone, Copy)]
pub struct UploadLimits {
    /// Largest accepted file, in bytes
    pub max_file_size: u64,
}

fn invalid(name: &str, reason: &str) -> Error {
    Error::InvalidName {
        name: name.to_string(),
        reason: reason.to_string(),
    }
}

/// Checks the shape of a sound name. Path safety is enforced again by the storage.
pub fn validate_sound_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(invalid(name, "name cannot be empty"));
    }
    if name.chars().count() > MAX_SOUND_NAME_LEN {
        return Err(invalid(
            name,
            &format!("name cannot be longer than {MAX_SOUND_NAME_LEN} characters"),
        ));
    }
    if name.chars().any(char::is_control) {
        return Err(invalid(name, "name cannot contain control characters"));
    }
    if name
        .to_ascii_lowercase()
        .ends_with(&format!(".{SOUND_EXTENSION}"))
    {
        return Err(invalid(name, "leave off the file extension"));
    }
    Ok(())
}

/// Validates everything known about an upload before any bytes are fetched.
///
/// Checks run in the order users see them reported: the name, then the declared size,
/// then the content type. Nothing here touches storage, so a failing upload costs no
/// download and no disk access.
///
/// # Arguments
/// * `upload` - Name, content type and size as declared by the uploader
/// * `limits` - Configured upload limits
///
/// # Errors
/// [`Error::InvalidName`], [`Error::FileTooLarge`] or [`Error::UnsupportedFormat`],
/// whichever check fails first.
pub fn check_upload(upload: &Upload<'_>, limits: UploadLimits) -> Result<()> {
    validate_sound_name(upload.name)?;

    if upload.declared_size > limits.max_file_size {
        return Err(Error::FileTooLarge {
            size: upload.declared_size,
            max: limits.max_file_size,
        });
    }

    if upload.content_type != Some(SOUND_CONTENT_TYPE) {
        return Err(Error::UnsupportedFormat {
            content_type: upload.content_type.map(str::to_string),
        });
    }

    Ok(())
}

/// Fails with [`Error::NameTaken`] if a sound called `name` is already stored.
pub async fn ensure_name_available<S: SoundStorage>(storage: &S, name: &str) -> Result<()> {
    if storage.sound_exists(name).await? {
        return Err(Error::NameTaken {
            name: name.to_string(),
        });
    }
    Ok(())
}

/// Lists sounds in the community root, or the members of `group`.
pub async fn list_sounds<S: SoundStorage>(storage: &S, group: Option<&str>) -> Result<Vec<Sound>> {
    storage.list_sounds(group).await
}

/// Looks up a stored sound by name.
pub async fn find_sound<S: SoundStorage>(storage: &S, name: &str) -> Result<Sound> {
    validate_sound_name(name)?;
    storage
        .list_sounds(None)
        .await?
        .into_iter()
        .find(|sound| sound.name == name)
        .ok_or_else(|| Error::SoundNotFound {
            name: name.to_string(),
        })
}

/// Validates and stores a new sound, returning its location.
///
/// All checks happen before anything is written. The declared size was already checked
/// by [`check_upload`]; the size of the downloaded bytes is checked again here because
/// the declaration cannot be trusted. The write itself never replaces an existing
/// sound: a concurrent upload of the same name loses with [`Error::NameTaken`].
///
/// # Arguments
/// * `storage` - The community's library
/// * `upload` - Metadata declared for the upload
/// * `bytes` - The downloaded file contents
/// * `limits` - Configured upload limits
///
/// # Returns
/// The path of the stored `.mp3` file
pub async fn add_sound<S: SoundStorage>(
    storage: &S,
    upload: &Upload<'_>,
    bytes: Vec<u8>,
    limits: UploadLimits,
) -> Result<PathBuf> {
    check_upload(upload, limits)?;

    let actual_size = bytes.len() as u64;
    if actual_size > limits.max_file_size {
        return Err(Error::FileTooLarge {
            size: actual_size,
            max: limits.max_file_size,
        });
    }

    ensure_name_available(storage, upload.name).await?;

    let location = storage.put_sound(upload.name, bytes).await?;
    info!("Added new sound: {:?}", location);
    Ok(location)
}

/// Removes a sound and every group membership pointing at it.
///
/// Every group is checked for a membership link to `name`, and each one found is
/// unlinked. Membership cleanup is best effort: a failing group listing, membership
/// check or unlink is logged at `warn` and skipped, and the canonical entry is deleted
/// regardless. Only a failure of that final delete is returned.
///
/// # Arguments
/// * `storage` - The community's library
/// * `name` - Name of the sound, without extension
///
/// # Errors
/// [`Error::SoundNotFound`] if no such sound exists, or [`Error::DeleteFailed`] if the
/// canonical file could not be removed.
pub async fn remove_sound<S: SoundStorage>(storage: &S, name: &str) -> Result<()> {
    validate_sound_name(name)?;

    if !storage.sound_exists(name).await? {
        return Err(Error::SoundNotFound {
            name: name.to_string(),
        });
    }

    match storage.list_groups().await {
        Ok(groups) => {
            for group in groups {
                match storage.is_member(name, &group).await {
                    Ok(true) => match storage.unlink(name, &group).await {
                        Ok(()) => info!("Removed `{}` from group `{}`", name, group),
                        Err(e) => warn!("Error removing `{}` from group `{}`: {}", name, group, e),
                    },
                    Ok(false) => {}
                    Err(e) => warn!("Error checking group `{}` for `{}`: {}", group, name, e),
                }
            }
        }
        Err(e) => warn!(
            "Error listing groups while removing `{}`, continuing with deletion: {}",
            name, e
        ),
    }

    storage.delete_sound(name).await?;
    info!("Removed sound: {}", name);
    Ok(())
}
