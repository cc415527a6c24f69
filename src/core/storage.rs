//! Storage capability for one community's sound library, and its filesystem backend.
//!
//! [`SoundStorage`] is the seam between the sound/group logic and persistence. The
//! filesystem backend keeps every canonical sound directly under the community root as
//! `<name>.mp3`, and every group as a subdirectory holding relative symlinks back to
//! those canonical files.

use crate::{
    config::storage::ensure_dir,
    core::{
        path,
        sound::{SOUND_EXTENSION, Sound},
    },
    errors::{Error, Result},
};
use std::{
    future::Future,
    io::{ErrorKind, Write},
    path::{Path, PathBuf},
};
use tokio::fs;
use tracing::{debug, info};

/// Persistence operations for a single community.
///
/// Names passed in are raw user input; implementations are responsible for keeping
/// every resolved location inside the community root.
pub trait SoundStorage: Send + Sync {
    /// Lists the playable sounds directly in the root, or in `group` when given.
    fn list_sounds(&self, group: Option<&str>) -> impl Future<Output = Result<Vec<Sound>>> + Send;

    /// Whether the canonical entry for `name` exists.
    fn sound_exists(&self, name: &str) -> impl Future<Output = Result<bool>> + Send;

    /// Where the canonical entry for `name` lives (or would live).
    fn sound_location(&self, name: &str) -> Result<PathBuf>;

    /// Stores `bytes` as the canonical entry for `name`, failing with
    /// [`Error::NameTaken`] instead of overwriting.
    fn put_sound(&self, name: &str, bytes: Vec<u8>)
    -> impl Future<Output = Result<PathBuf>> + Send;

    /// Deletes the canonical entry for `name`.
    fn delete_sound(&self, name: &str) -> impl Future<Output = Result<()>> + Send;

    /// Lists group names.
    fn list_groups(&self) -> impl Future<Output = Result<Vec<String>>> + Send;

    /// Whether group `name` exists.
    fn group_exists(&self, name: &str) -> impl Future<Output = Result<bool>> + Send;

    /// Creates group `name`, failing with [`Error::GroupAlreadyExists`] if present.
    fn create_group(&self, name: &str) -> impl Future<Output = Result<()>> + Send;

    /// Removes group `name` and every membership it holds.
    fn delete_group(&self, name: &str) -> impl Future<Output = Result<()>> + Send;

    /// Records `sound` as a member of `group`.
    fn link(&self, sound: &str, group: &str) -> impl Future<Output = Result<()>> + Send;

    /// Removes the membership of `sound` in `group`.
    fn unlink(&self, sound: &str, group: &str) -> impl Future<Output = Result<()>> + Send;

    /// Whether `sound` is a member of `group`.
    fn is_member(&self, sound: &str, group: &str) -> impl Future<Output = Result<bool>> + Send;
}

fn sound_file_name(name: &str) -> String {
    format!("{name}.{SOUND_EXTENSION}")
}

/// Filesystem-backed library rooted at one community directory.
#[derive(Debug, Clone)]
pub struct FsStorage {
    root: PathBuf,
}

impl FsStorage {
    /// Creates a library rooted at `root`. Nothing is created on disk yet.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The library for `community_id` under the shared sounds directory.
    #[must_use]
    pub fn for_community(sounds_directory: &Path, community_id: u64) -> Self {
        Self::new(sounds_directory.join(community_id.to_string()))
    }

    /// The community root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Creates the community root if it does not exist yet.
    pub async fn ensure_root(&self) -> Result<()> {
        ensure_dir(&self.root).await
    }

    fn group_path(&self, group: &str) -> Result<PathBuf> {
        Ok(path::validate(group, &self.root)?)
    }

    fn link_path(&self, sound: &str, group: &str) -> Result<PathBuf> {
        let group_path = self.group_path(group)?;
        Ok(path::validate(&sound_file_name(sound), &group_path)?)
    }

    async fn is_dir(path: &Path) -> Result<bool> {
        match fs::metadata(path).await {
            Ok(meta) => Ok(meta.is_dir()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    async fn is_symlink(path: &Path) -> Result<bool> {
        match fs::symlink_metadata(path).await {
            Ok(meta) => Ok(meta.file_type().is_symlink()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(unix)]
async fn create_link(target: &Path, link: &Path) -> std::io::Result<()> {
    fs::symlink(target, link).await
}

#[cfg(windows)]
async fn create_link(target: &Path, link: &Path) -> std::io::Result<()> {
    fs::symlink_file(target, link).await
}

impl SoundStorage for FsStorage {
    async fn list_sounds(&self, group: Option<&str>) -> Result<Vec<Sound>> {
        let members_only = group.is_some();
        let dir = match group {
            Some(group) => {
                let dir = self.group_path(group)?;
                if !Self::is_dir(&dir).await? {
                    return Err(Error::GroupNotFound {
                        name: group.to_string(),
                    });
                }
                dir
            }
            None => self.root.clone(),
        };

        let mut entries = match fs::read_dir(&dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let suffix = format!(".{SOUND_EXTENSION}");
        let mut sounds = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let file_name = entry.file_name();
            let Some(name) = file_name.to_str().and_then(|n| n.strip_suffix(&suffix)) else {
                continue;
            };
            if name.is_empty() {
                continue;
            }
            // Inside a group only links are memberships.
            if members_only && !entry.file_type().await?.is_symlink() {
                debug!("Skipping non-link entry {:?} in group", entry.path());
                continue;
            }

            // Follows membership links; a dangling link is not a playable sound.
            let location = entry.path();
            let Ok(meta) = fs::metadata(&location).await else {
                debug!("Skipping unreadable entry {:?}", location);
                continue;
            };
            if !meta.is_file() {
                continue;
            }

            sounds.push(Sound {
                name: name.to_string(),
                location,
                size: meta.len(),
            });
        }
        Ok(sounds)
    }

    async fn sound_exists(&self, name: &str) -> Result<bool> {
        let location = self.sound_location(name)?;
        match fs::metadata(&location).await {
            Ok(meta) => Ok(meta.is_file()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    fn sound_location(&self, name: &str) -> Result<PathBuf> {
        Ok(path::validate(&sound_file_name(name), &self.root)?)
    }

    async fn put_sound(&self, name: &str, bytes: Vec<u8>) -> Result<PathBuf> {
        let destination = self.sound_location(name)?;
        self.ensure_root().await?;

        let root = self.root.clone();
        let target = destination.clone();
        let owned_name = name.to_string();
        // Write to an anonymous temp file in the same directory, then link it into place
        // without clobbering. The temp name has no `.mp3` suffix, so a half-written file
        // never shows up in a listing.
        tokio::task::spawn_blocking(move || -> Result<()> {
            let mut temp = tempfile::NamedTempFile::new_in(&root)?;
            temp.write_all(&bytes)?;
            temp.as_file().sync_all()?;
            temp.persist_noclobber(&target).map_err(|e| {
                if e.error.kind() == ErrorKind::AlreadyExists {
                    Error::NameTaken { name: owned_name }
                } else {
                    Error::Io(e.error)
                }
            })?;
            Ok(())
        })
        .await
        .map_err(|e| Error::Io(std::io::Error::other(e)))??;

        info!("Stored sound {:?}", destination);
        Ok(destination)
    }

    async fn delete_sound(&self, name: &str) -> Result<()> {
        let location = self.sound_location(name)?;
        match fs::remove_file(&location).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(Error::SoundNotFound {
                name: name.to_string(),
            }),
            Err(source) => Err(Error::DeleteFailed {
                name: name.to_string(),
                source,
            }),
        }
    }

    async fn list_groups(&self) -> Result<Vec<String>> {
        let mut entries = match fs::read_dir(&self.root).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut groups = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            if !entry.file_type().await?.is_dir() {
                continue;
            }
            if let Some(name) = entry.file_name().to_str() {
                groups.push(name.to_string());
            }
        }
        Ok(groups)
    }

    async fn group_exists(&self, name: &str) -> Result<bool> {
        Self::is_dir(&self.group_path(name)?).await
    }

    async fn create_group(&self, name: &str) -> Result<()> {
        let group_path = self.group_path(name)?;
        self.ensure_root().await?;
        match fs::create_dir(&group_path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::AlreadyExists => Err(Error::GroupAlreadyExists {
                name: name.to_string(),
            }),
            Err(e) => Err(e.into()),
        }
    }

    async fn delete_group(&self, name: &str) -> Result<()> {
        let group_path = self.group_path(name)?;
        if !Self::is_dir(&group_path).await? {
            return Err(Error::GroupNotFound {
                name: name.to_string(),
            });
        }
        // remove_dir_all removes symlinks themselves, never their targets.
        fs::remove_dir_all(&group_path).await?;
        Ok(())
    }

    async fn link(&self, sound: &str, group: &str) -> Result<()> {
        if !self.group_exists(group).await? {
            return Err(Error::GroupNotFound {
                name: group.to_string(),
            });
        }
        if !self.sound_exists(sound).await? {
            return Err(Error::SoundNotFound {
                name: sound.to_string(),
            });
        }

        let link = self.link_path(sound, group)?;
        let target = Path::new("..").join(sound_file_name(sound));
        match create_link(&target, &link).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::AlreadyExists => Err(Error::AlreadyMember {
                sound: sound.to_string(),
                group: group.to_string(),
            }),
            Err(e) => Err(e.into()),
        }
    }

    async fn unlink(&self, sound: &str, group: &str) -> Result<()> {
        let link = self.link_path(sound, group)?;
        // Only links are removed here; a regular file in a group is never a membership.
        if !Self::is_symlink(&link).await? {
            return Err(Error::NotAMember {
                sound: sound.to_string(),
                group: group.to_string(),
            });
        }
        fs::remove_file(&link).await?;
        Ok(())
    }

    async fn is_member(&self, sound: &str, group: &str) -> Result<bool> {
        Self::is_symlink(&self.link_path(sound, group)?).await
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::{SAMPLE_MP3, setup_test_library};

    #[tokio::test]
    async fn test_put_sound_is_listed_with_size() -> Result<()> {
        let (_dir, storage) = setup_test_library().await?;

        let location = storage.put_sound("airhorn", SAMPLE_MP3.to_vec()).await?;
        assert_eq!(location, storage.root().join("airhorn.mp3"));

        let sounds = storage.list_sounds(None).await?;
        assert_eq!(sounds.len(), 1);
        assert_eq!(sounds[0].name, "airhorn");
        assert_eq!(sounds[0].size, SAMPLE_MP3.len() as u64);
        Ok(())
    }

    #[tokio::test]
    async fn test_put_sound_never_clobbers() -> Result<()> {
        let (_dir, storage) = setup_test_library().await?;
        storage.put_sound("airhorn", b"first".to_vec()).await?;

        let result = storage.put_sound("airhorn", b"second".to_vec()).await;
        assert!(matches!(result, Err(Error::NameTaken { .. })));

        let bytes = fs::read(storage.root().join("airhorn.mp3")).await?;
        assert_eq!(bytes, b"first");

        // No leftover temp files from the failed write
        let mut entries = fs::read_dir(storage.root()).await?;
        let mut count = 0;
        while entries.next_entry().await?.is_some() {
            count += 1;
        }
        assert_eq!(count, 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_listing_ignores_other_files_and_directories() -> Result<()> {
        let (_dir, storage) = setup_test_library().await?;
        storage.put_sound("airhorn", SAMPLE_MP3.to_vec()).await?;
        storage.create_group("dj").await?;
        fs::write(storage.root().join("notes.txt"), b"hi").await?;
        fs::write(storage.root().join(".mp3"), b"nameless").await?;
        fs::create_dir(storage.root().join("folder.mp3")).await?;

        let names: Vec<String> = storage
            .list_sounds(None)
            .await?
            .into_iter()
            .map(|s| s.name)
            .collect();
        assert_eq!(names, vec!["airhorn".to_string()]);

        let mut groups = storage.list_groups().await?;
        groups.sort();
        assert_eq!(groups, vec!["dj".to_string(), "folder.mp3".to_string()]);
        Ok(())
    }

    #[tokio::test]
    async fn test_link_is_relative_and_resolves() -> Result<()> {
        let (_dir, storage) = setup_test_library().await?;
        storage.put_sound("airhorn", SAMPLE_MP3.to_vec()).await?;
        storage.create_group("dj").await?;
        storage.link("airhorn", "dj").await?;

        let link = storage.root().join("dj").join("airhorn.mp3");
        let target = fs::read_link(&link).await?;
        assert!(target.is_relative());
        assert_eq!(target, Path::new("..").join("airhorn.mp3"));

        let in_group = storage.list_sounds(Some("dj")).await?;
        assert_eq!(in_group.len(), 1);
        assert_eq!(in_group[0].name, "airhorn");
        assert_eq!(in_group[0].size, SAMPLE_MP3.len() as u64);
        assert!(storage.is_member("airhorn", "dj").await?);
        Ok(())
    }

    #[tokio::test]
    async fn test_dangling_links_are_not_listed() -> Result<()> {
        let (_dir, storage) = setup_test_library().await?;
        storage.put_sound("airhorn", SAMPLE_MP3.to_vec()).await?;
        storage.create_group("dj").await?;
        storage.link("airhorn", "dj").await?;
        fs::remove_file(storage.root().join("airhorn.mp3")).await?;

        assert!(storage.list_sounds(Some("dj")).await?.is_empty());
        // The link itself is still a membership until it is removed
        assert!(storage.is_member("airhorn", "dj").await?);
        Ok(())
    }

    #[tokio::test]
    async fn test_group_listing_only_counts_links() -> Result<()> {
        let (_dir, storage) = setup_test_library().await?;
        storage.put_sound("airhorn", SAMPLE_MP3.to_vec()).await?;
        storage.create_group("dj").await?;
        storage.link("airhorn", "dj").await?;
        fs::write(storage.root().join("dj").join("stray.mp3"), b"data").await?;

        let names: Vec<String> = storage
            .list_sounds(Some("dj"))
            .await?
            .into_iter()
            .map(|s| s.name)
            .collect();
        assert_eq!(names, vec!["airhorn".to_string()]);
        assert!(!storage.is_member("stray", "dj").await?);
        Ok(())
    }

    #[tokio::test]
    async fn test_unlink_refuses_regular_files() -> Result<()> {
        let (_dir, storage) = setup_test_library().await?;
        storage.create_group("dj").await?;
        fs::write(storage.root().join("dj").join("stray.mp3"), b"data").await?;

        let result = storage.unlink("stray", "dj").await;
        assert!(matches!(result, Err(Error::NotAMember { .. })));
        assert!(fs::try_exists(storage.root().join("dj").join("stray.mp3")).await?);
        Ok(())
    }

    #[tokio::test]
    async fn test_group_paths_are_validated() -> Result<()> {
        let (_dir, storage) = setup_test_library().await?;
        for name in ["..", "a/b", "."] {
            let result = storage.create_group(name).await;
            assert!(matches!(result, Err(Error::InvalidPath(_))), "{name}");
        }
        Ok(())
    }

    #[tokio::test]
    async fn test_missing_root_lists_nothing() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let storage = FsStorage::for_community(dir.path(), 42);
        assert!(storage.list_sounds(None).await?.is_empty());
        assert!(storage.list_groups().await?.is_empty());
        assert!(!fs::try_exists(storage.root()).await?);
        Ok(())
    }
}
