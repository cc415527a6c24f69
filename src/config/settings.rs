//! Application settings loaded once at startup.
//!
//! Settings are layered: built-in defaults, then an optional `config.toml`, then
//! environment variables (which `main` may have populated from `.env`). The result is
//! an immutable [`AppConfig`] handed to the bot; nothing below `main` reads the
//! environment.

use crate::errors::{Error, Result};
use serde::Deserialize;
use std::{fmt, path::Path, path::PathBuf, time::Duration};

/// Default upload ceiling in bytes.
pub const DEFAULT_MAX_FILE_SIZE: u64 = 500_000;

/// Default time budget for downloading an uploaded attachment.
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 15;

/// Default location of the optional TOML settings file.
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// Optional settings read from `config.toml`. Every field may be omitted.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    /// Directory holding one subdirectory per community
    pub sounds_directory: Option<PathBuf>,
    /// Upload ceiling in bytes
    pub max_file_size: Option<u64>,
    /// Download timeout in seconds
    pub fetch_timeout_secs: Option<u64>,
    /// Guild to register commands in during development
    pub dev_guild_id: Option<u64>,
}

/// Immutable application configuration.
#[derive(Clone)]
pub struct AppConfig {
    /// Directory holding one subdirectory per community
    pub sounds_directory: PathBuf,
    /// Upload ceiling in bytes
    pub max_file_size: u64,
    /// Download timeout for uploaded attachments
    pub fetch_timeout: Duration,
    /// When set, commands are registered in this guild instead of globally
    pub dev_guild_id: Option<u64>,
    /// Discord bot token
    pub discord_token: String,
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("sounds_directory", &self.sounds_directory)
            .field("max_file_size", &self.max_file_size)
            .field("fetch_timeout", &self.fetch_timeout)
            .field("dev_guild_id", &self.dev_guild_id)
            .field("discord_token", &"<redacted>")
            .finish()
    }
}

/// Parses a `config.toml` document.
pub fn parse_file_config(contents: &str) -> Result<FileConfig> {
    toml::from_str(contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config file: {e}"),
    })
}

/// Reads the TOML settings file at `path`, treating a missing file as empty.
pub fn read_file_config<P: AsRef<Path>>(path: P) -> Result<FileConfig> {
    let path = path.as_ref();
    match std::fs::read_to_string(path) {
        Ok(contents) => parse_file_config(&contents),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config file at {:?}, using defaults", path);
            Ok(FileConfig::default())
        }
        Err(e) => Err(Error::Config {
            message: format!("Failed to read config file {path:?}: {e}"),
        }),
    }
}

fn parse_number(key: &str, value: &str) -> Result<u64> {
    value.trim().parse().map_err(|e| Error::Config {
        message: format!("{key} must be a non-negative integer (got `{value}`): {e}"),
    })
}

impl AppConfig {
    /// Builds the configuration from file settings overlaid with `env`.
    ///
    /// Environment values win over the file, and the file wins over built-in defaults.
    /// `env` is a lookup function so callers and tests decide where variables come from.
    ///
    /// # Arguments
    /// * `file` - Settings read from `config.toml`, possibly all empty
    /// * `env` - Variable lookup, usually [`std::env::var`]
    ///
    /// # Errors
    /// [`Error::Config`] when `DISCORD_BOT_TOKEN` is missing, or a value does not parse or is
    /// out of range.
    pub fn from_sources<F>(file: FileConfig, env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let sounds_directory = env("MP3_DIRECTORY")
            .map(PathBuf::from)
            .or(file.sounds_directory)
            .ok_or_else(|| Error::Config {
                message: "MP3_DIRECTORY is not set and config file has no sounds_directory"
                    .to_string(),
            })?;

        let max_file_size = match env("MAX_FILE_SIZE") {
            Some(value) => parse_number("MAX_FILE_SIZE", &value)?,
            None => file.max_file_size.unwrap_or(DEFAULT_MAX_FILE_SIZE),
        };

        let fetch_timeout_secs = match env("FETCH_TIMEOUT_SECS") {
            Some(value) => parse_number("FETCH_TIMEOUT_SECS", &value)?,
            None => file
                .fetch_timeout_secs
                .unwrap_or(DEFAULT_FETCH_TIMEOUT_SECS),
        };
        if fetch_timeout_secs == 0 {
            return Err(Error::Config {
                message: "fetch timeout must be at least one second".to_string(),
            });
        }

        let dev_guild_id = match env("DEV_GUILD_ID") {
            Some(value) => Some(parse_number("DEV_GUILD_ID", &value)?),
            None => file.dev_guild_id,
        };
        if dev_guild_id == Some(0) {
            return Err(Error::Config {
                message: "DEV_GUILD_ID must not be 0".to_string(),
            });
        }

        let discord_token = env("DISCORD_BOT_TOKEN").ok_or_else(|| Error::Config {
            message: "DISCORD_BOT_TOKEN is not set".to_string(),
        })?;

        Ok(Self {
            sounds_directory,
            max_file_size,
            fetch_timeout: Duration::from_secs(fetch_timeout_secs),
            dev_guild_id,
            discord_token,
        })
    }

    /// Loads the configuration from `CONFIG_PATH` (or `config.toml`) and the process environment.
    pub fn load() -> Result<Self> {
        let config_path =
            std::env::var("CONFIG_PATH").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        let file = read_file_config(&config_path)?;
        Self::from_sources(file, |key| std::env::var(key).ok())
            .inspect(|config| tracing::debug!("Loaded configuration: {:?}", config))
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use std::collections::HashMap;

    fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_apply_when_only_required_keys_are_set() -> Result<()> {
        let env = env_from(&[("MP3_DIRECTORY", "/srv/sounds"), ("DISCORD_BOT_TOKEN", "t")]);
        let config = AppConfig::from_sources(FileConfig::default(), env)?;

        assert_eq!(config.sounds_directory, PathBuf::from("/srv/sounds"));
        assert_eq!(config.max_file_size, DEFAULT_MAX_FILE_SIZE);
        assert_eq!(
            config.fetch_timeout,
            Duration::from_secs(DEFAULT_FETCH_TIMEOUT_SECS)
        );
        assert_eq!(config.dev_guild_id, None);
        Ok(())
    }

    #[test]
    fn test_environment_overrides_file() -> Result<()> {
        let file = parse_file_config(
            r#"
            sounds_directory = "/from/file"
            max_file_size = 1000
            dev_guild_id = 7
            "#,
        )?;
        let env = env_from(&[
            ("MAX_FILE_SIZE", "2000"),
            ("DISCORD_BOT_TOKEN", "t"),
            ("FETCH_TIMEOUT_SECS", "3"),
        ]);
        let config = AppConfig::from_sources(file, env)?;

        assert_eq!(config.sounds_directory, PathBuf::from("/from/file"));
        assert_eq!(config.max_file_size, 2000);
        assert_eq!(config.fetch_timeout, Duration::from_secs(3));
        assert_eq!(config.dev_guild_id, Some(7));
        Ok(())
    }

    #[test]
    fn test_missing_required_keys_are_reported() {
        let result = AppConfig::from_sources(FileConfig::default(), env_from(&[]));
        assert!(matches!(result, Err(Error::Config { .. })));

        let result = AppConfig::from_sources(
            FileConfig::default(),
            env_from(&[("MP3_DIRECTORY", "/srv/sounds")]),
        );
        assert!(matches!(result, Err(Error::Config { message }) if message.contains("DISCORD_BOT_TOKEN")));
    }

    #[test]
    fn test_invalid_numbers_are_rejected() {
        let env = env_from(&[
            ("MP3_DIRECTORY", "/srv/sounds"),
            ("DISCORD_BOT_TOKEN", "t"),
            ("MAX_FILE_SIZE", "thirty"),
        ]);
        let result = AppConfig::from_sources(FileConfig::default(), env);
        assert!(matches!(result, Err(Error::Config { message }) if message.contains("MAX_FILE_SIZE")));

        let env = env_from(&[
            ("MP3_DIRECTORY", "/srv/sounds"),
            ("DISCORD_BOT_TOKEN", "t"),
            ("FETCH_TIMEOUT_SECS", "0"),
        ]);
        assert!(AppConfig::from_sources(FileConfig::default(), env).is_err());
    }

    #[test]
    fn test_unknown_file_keys_are_rejected() {
        assert!(parse_file_config("token = \"oops\"").is_err());
    }

    #[test]
    fn test_missing_config_file_is_empty() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let file = read_file_config(dir.path().join("absent.toml"))?;
        assert!(file.sounds_directory.is_none());
        Ok(())
    }

    #[test]
    fn test_debug_output_redacts_token() -> Result<()> {
        let env = env_from(&[
            ("MP3_DIRECTORY", "/srv/sounds"),
            ("DISCORD_BOT_TOKEN", "super-secret"),
        ]);
        let config = AppConfig::from_sources(FileConfig::default(), env)?;
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("super-secret"));
        assert!(rendered.contains("<redacted>"));
        Ok(())
    }
}
