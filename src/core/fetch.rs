//! Downloads uploaded attachments.
//!
//! Every request is bounded by the configured timeout so a slow CDN cannot keep a
//! command hanging.

use crate::errors::{Error, Result};
use std::time::Duration;
use tracing::{debug, error};

/// HTTP client for fetching attachment bytes.
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: reqwest::Client,
}

impl Fetcher {
    /// Builds a client whose requests give up after `timeout`.
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Config {
                message: format!("Failed to build HTTP client: {e}"),
            })?;
        Ok(Self { client })
    }

    /// Downloads `url`, refusing bodies larger than `max_size` bytes.
    ///
    /// A declared `Content-Length` over the limit fails before the body is read;
    /// otherwise the body is read in chunks and abandoned as soon as it passes the limit.
    ///
    /// # Errors
    /// [`Error::FetchFailed`] for transport failures and non-success statuses,
    /// [`Error::FileTooLarge`] for oversized bodies.
    pub async fn fetch(&self, url: &str, max_size: u64) -> Result<Vec<u8>> {
        debug!("Downloading {}", url);

        let mut response = self.client.get(url).send().await.map_err(|e| {
            error!("Error downloading file: {}", e);
            Error::FetchFailed {
                message: e.to_string(),
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            error!("Download of {} returned {}", url, status);
            return Err(Error::FetchFailed {
                message: format!("server responded with {status}"),
            });
        }

        if let Some(length) = response.content_length().filter(|&len| len > max_size) {
            return Err(Error::FileTooLarge {
                size: length,
                max: max_size,
            });
        }

        let mut body = Vec::new();
        while let Some(chunk) = response.chunk().await.map_err(|e| {
            error!("Error reading downloaded file: {}", e);
            Error::FetchFailed {
                message: e.to_string(),
            }
        })? {
            append_bounded(&mut body, &chunk, max_size)?;
        }
        Ok(body)
    }
}

/// Appends `chunk` to `body`, failing once the total would exceed `max_size` bytes.
///
/// Servers that omit `Content-Length` are cut off here instead of being buffered in full.
fn append_bounded(body: &mut Vec<u8>, chunk: &[u8], max_size: u64) -> Result<()> {
    let total = (body.len() + chunk.len()) as u64;
    if total > max_size {
        return Err(Error::FileTooLarge {
            size: total,
            max: max_size,
        });
    }
    body.extend_from_slice(chunk);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_body_without_length_is_capped() -> Result<()> {
        let mut body = Vec::new();
        append_bounded(&mut body, &[0; 600], 1_000)?;
        append_bounded(&mut body, &[0; 400], 1_000)?;
        assert_eq!(body.len(), 1_000);

        let result = append_bounded(&mut body, &[0; 1], 1_000);
        assert!(matches!(
            result,
            Err(Error::FileTooLarge {
                size: 1_001,
                max: 1_000
            })
        ));
        assert_eq!(body.len(), 1_000);
        Ok(())
    }

    #[tokio::test]
    async fn test_invalid_url_is_fetch_failure() -> Result<()> {
        let fetcher = Fetcher::new(Duration::from_secs(1))?;
        let result = fetcher.fetch("not a url", 1_000).await;
        assert!(matches!(result, Err(Error::FetchFailed { .. })));
        Ok(())
    }

    #[tokio::test]
    async fn test_unsupported_scheme_is_fetch_failure() -> Result<()> {
        let fetcher = Fetcher::new(Duration::from_secs(1))?;
        let result = fetcher.fetch("ftp://example.invalid/a.mp3", 1_000).await;
        assert!(matches!(result, Err(Error::FetchFailed { .. })));
        Ok(())
    }
}
