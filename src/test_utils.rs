//! Shared test utilities for the soundboard.
//!
//! This module provides helpers for setting up throwaway community libraries and
//! populating them with sounds.

use crate::{
    core::{
        sound::{SOUND_CONTENT_TYPE, Upload},
        storage::{FsStorage, SoundStorage},
    },
    errors::Result,
};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A few bytes that start like an MPEG audio frame. Nothing decodes them in tests.
pub const SAMPLE_MP3: &[u8] = &[0xFF, 0xFB, 0x90, 0x64, 0x00, 0x0F, 0xF0, 0x00];

/// Creates a temporary sounds directory and a prepared library for community 1234.
/// Keep the returned [`TempDir`] alive for the duration of the test.
pub async fn setup_test_library() -> Result<(TempDir, FsStorage)> {
    let dir = tempfile::tempdir()?;
    let storage = FsStorage::for_community(dir.path(), 1234);
    storage.ensure_root().await?;
    Ok((dir, storage))
}

/// Stores [`SAMPLE_MP3`] under `name`.
pub async fn add_test_sound(storage: &FsStorage, name: &str) -> Result<PathBuf> {
    storage.put_sound(name, SAMPLE_MP3.to_vec()).await
}

/// An upload declaration with the mp3 content type.
#[must_use]
pub const fn mp3_upload(name: &str, declared_size: u64) -> Upload<'_> {
    Upload {
        name,
        content_type: Some(SOUND_CONTENT_TYPE),
        declared_size,
    }
}

/// Every entry below `root` as `(relative path, kind)`, sorted, where kind is
/// `dir`, `file` or `link -> target`.
pub async fn directory_snapshot(root: &Path) -> Result<Vec<(PathBuf, String)>> {
    let mut out = Vec::new();
    let mut pending = vec![root.to_path_buf()];
    while let Some(dir) = pending.pop() {
        let mut entries = tokio::fs::read_dir(&dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            let relative = path.strip_prefix(root).map_or_else(|_| path.clone(), Path::to_path_buf);
            let file_type = entry.file_type().await?;
            let kind = if file_type.is_symlink() {
                format!("link -> {}", tokio::fs::read_link(&path).await?.display())
            } else if file_type.is_dir() {
                pending.push(path);
                "dir".to_string()
            } else {
                "file".to_string()
            };
            out.push((relative, kind));
        }
    }
    out.sort();
    Ok(out)
}
