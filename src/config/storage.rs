//! Storage directory preparation.
//!
//! The sounds directory holds one subdirectory per community, created lazily the
//! first time a community interacts with the bot.

use crate::errors::Result;
use std::path::Path;
use tracing::{error, info};

/// Creates `path` and any missing parents.
///
/// Safe to call concurrently: a directory that appears between the check and the
/// creation is not an error.
pub async fn ensure_dir(path: &Path) -> Result<()> {
    if tokio::fs::metadata(path).await.is_ok_and(|m| m.is_dir()) {
        return Ok(());
    }

    tokio::fs::create_dir_all(path)
        .await
        .inspect(|()| info!("Created directory {:?}", path))
        .inspect_err(|e| error!("Error creating directory {:?}: {}", path, e))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_ensure_dir_creates_nested_directories() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let target = dir.path().join("sounds").join("1234");

        ensure_dir(&target).await?;
        assert!(tokio::fs::metadata(&target).await?.is_dir());

        // Second call is a no-op
        ensure_dir(&target).await?;
        Ok(())
    }

    #[tokio::test]
    async fn test_concurrent_ensure_dir_never_errors() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let target = dir.path().join("sounds").join("1234");

        let (a, b, c) = tokio::join!(ensure_dir(&target), ensure_dir(&target), ensure_dir(&target));
        a?;
        b?;
        c?;

        let mut entries = tokio::fs::read_dir(dir.path().join("sounds")).await?;
        let mut count = 0;
        while entries.next_entry().await?.is_some() {
            count += 1;
        }
        assert_eq!(count, 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_ensure_dir_fails_when_a_file_is_in_the_way() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let target = dir.path().join("occupied");
        tokio::fs::write(&target, b"not a directory").await?;

        assert!(ensure_dir(&target).await.is_err());
        Ok(())
    }
}
