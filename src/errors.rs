//! Unified error types and result handling.
//!
//! Every fallible operation in the crate returns [`Result`]. Variants are grouped by
//! how they reach the user: validation, not-found and conflict errors are shown
//! verbatim, IO and internal errors are logged and replaced with a generic apology.

use crate::core::path::PathError;
use thiserror::Error;

/// Message shown to the invoker when an operation fails for an internal reason.
pub const GENERIC_FAILURE: &str = "Sorry, there was an error processing this command :(";

#[derive(Debug, Error)]
pub enum Error {
    #[error("{0}")]
    InvalidPath(#[from] PathError),

    #[error("Invalid name `{name}`: {reason}")]
    InvalidName { name: String, reason: String },

    #[error(
        "File is too large ({:.1}KB). Please limit file to {:.0}KB.",
        kilobytes(.size),
        kilobytes(.max)
    )]
    FileTooLarge { size: u64, max: u64 },

    #[error("Unable to add this file - Only MP3 files are supported.")]
    UnsupportedFormat { content_type: Option<String> },

    #[error("This command can only be used in a server.")]
    GuildOnly,

    #[error("Sound `{name}` does not exist.")]
    SoundNotFound { name: String },

    #[error("Group `{name}` does not exist.")]
    GroupNotFound { name: String },

    #[error("This name (`{name}`) is already taken. Please choose another name.")]
    NameTaken { name: String },

    #[error("This group (`{name}`) already exists.")]
    GroupAlreadyExists { name: String },

    #[error("Sound `{sound}` is already in group `{group}`.")]
    AlreadyMember { sound: String, group: String },

    #[error("Sound `{sound}` is not in group `{group}`.")]
    NotAMember { sound: String, group: String },

    #[error("File upload failed: {message}")]
    FetchFailed { message: String },

    #[error("Failed to delete sound `{name}`: {source}")]
    DeleteFailed {
        name: String,
        #[source]
        source: std::io::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Voice error: {message}")]
    Voice { message: String },

    #[error("Serenity/Poise framework error: {0}")]
    #[allow(clippy::enum_variant_names)]
    FrameworkError(Box<poise::serenity_prelude::Error>),
}

#[allow(clippy::cast_precision_loss)] // upload sizes are far below 2^52
fn kilobytes(bytes: &u64) -> f64 {
    *bytes as f64 / 1000.0
}

/// Coarse classification of an [`Error`], used to decide how it is surfaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad input from the user. Never retried.
    Validation,
    /// The referenced sound or group is absent.
    NotFound,
    /// The operation collides with existing state.
    Conflict,
    /// Disk write, delete or link failure.
    Io,
    /// Downloading the uploaded content failed.
    Upstream,
    /// Anything else: configuration, framework or voice failures.
    Internal,
}

impl Error {
    /// Classifies this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidPath(_)
            | Self::InvalidName { .. }
            | Self::FileTooLarge { .. }
            | Self::UnsupportedFormat { .. }
            | Self::GuildOnly => ErrorKind::Validation,
            Self::SoundNotFound { .. } | Self::GroupNotFound { .. } => ErrorKind::NotFound,
            Self::NameTaken { .. }
            | Self::GroupAlreadyExists { .. }
            | Self::AlreadyMember { .. }
            | Self::NotAMember { .. } => ErrorKind::Conflict,
            Self::DeleteFailed { .. } | Self::Io(_) => ErrorKind::Io,
            Self::FetchFailed { .. } => ErrorKind::Upstream,
            Self::Config { .. } | Self::Voice { .. } | Self::FrameworkError(_) => ErrorKind::Internal,
        }
    }

    /// Whether the error message is meant to be shown to the invoker as-is.
    #[must_use]
    pub const fn is_user_facing(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::Validation | ErrorKind::NotFound | ErrorKind::Conflict | ErrorKind::Upstream
        )
    }

    /// The text to reply with when this error ends a command.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self.kind() {
            ErrorKind::Upstream => "File upload failed.".to_string(),
            ErrorKind::Io if matches!(self, Self::DeleteFailed { .. }) => {
                "File deletion failed.".to_string()
            }
            ErrorKind::Io | ErrorKind::Internal => GENERIC_FAILURE.to_string(),
            ErrorKind::Validation | ErrorKind::NotFound | ErrorKind::Conflict => self.to_string(),
        }
    }
}

impl From<poise::serenity_prelude::Error> for Error {
    fn from(value: poise::serenity_prelude::Error) -> Self {
        Self::FrameworkError(Box::new(value))
    }
}

// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
