//! Voice connections and the session tokens that outlive them.
//!
//! Each community has at most one voice session. A session owns a
//! [`CancellationToken`]; page deliveries started while the session is live hold a
//! clone of it, and the token is cancelled when the bot leaves or is disconnected.

use crate::errors::{Error, Result};
use poise::serenity_prelude as serenity;
use songbird::{CoreEvent, Event, EventContext, EventHandler, Songbird};
use std::{collections::HashMap, path::Path, sync::Arc};
use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Per-community voice session registry.
#[derive(Debug, Default)]
pub struct VoiceSessions {
    tokens: RwLock<HashMap<serenity::GuildId, CancellationToken>>,
}

impl VoiceSessions {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The live token for `guild_id`, starting a new one if the previous session ended.
    pub async fn session_token(&self, guild_id: serenity::GuildId) -> CancellationToken {
        let mut tokens = self.tokens.write().await;
        let token = tokens.entry(guild_id).or_default();
        if token.is_cancelled() {
            *token = CancellationToken::new();
        }
        token.clone()
    }

    /// The token of the live session for `guild_id`, without starting one.
    pub async fn current_token(&self, guild_id: serenity::GuildId) -> Option<CancellationToken> {
        self.tokens
            .read()
            .await
            .get(&guild_id)
            .filter(|token| !token.is_cancelled())
            .cloned()
    }

    /// Cancels and forgets the session for `guild_id`. Returns whether one existed.
    pub async fn end_session(&self, guild_id: serenity::GuildId) -> bool {
        let Some(token) = self.tokens.write().await.remove(&guild_id) else {
            return false;
        };
        token.cancel();
        true
    }

    /// Joins `channel_id` and returns the session token deliveries should watch.
    pub async fn join(
        self: &Arc<Self>,
        ctx: &serenity::Context,
        guild_id: serenity::GuildId,
        channel_id: serenity::ChannelId,
    ) -> Result<CancellationToken> {
        let manager = manager(ctx).await?;
        let fresh = manager.get(guild_id).is_none();

        let call = manager.join(guild_id, channel_id).await.map_err(|e| Error::Voice {
            message: format!("failed to join channel {channel_id} in guild {guild_id}: {e}"),
        })?;

        if fresh {
            call.lock().await.add_global_event(
                Event::Core(CoreEvent::DriverDisconnect),
                DisconnectNotifier {
                    guild_id,
                    sessions: Arc::clone(self),
                },
            );
            info!("Joined voice channel {} in guild {}", channel_id, guild_id);
        }

        Ok(self.session_token(guild_id).await)
    }

    /// Plays the file at `path` on the guild's current connection.
    ///
    /// Returns `false` when the bot is not connected in that guild.
    pub async fn play(
        &self,
        ctx: &serenity::Context,
        guild_id: serenity::GuildId,
        path: &Path,
    ) -> Result<bool> {
        let manager = manager(ctx).await?;
        let Some(call) = manager.get(guild_id) else {
            debug!("No voice connection in guild {}", guild_id);
            return Ok(false);
        };

        let input: songbird::input::Input = songbird::input::File::new(path.to_path_buf()).into();
        call.lock().await.play_input(input);
        Ok(true)
    }

    /// Leaves voice in `guild_id` and ends its session. Returns whether a session existed.
    pub async fn stop(&self, ctx: &serenity::Context, guild_id: serenity::GuildId) -> Result<bool> {
        let manager = manager(ctx).await?;
        let connected = manager.get(guild_id).is_some();
        if connected {
            manager.remove(guild_id).await.map_err(|e| Error::Voice {
                message: format!("failed to leave voice in guild {guild_id}: {e}"),
            })?;
            info!("Left voice in guild {}", guild_id);
        }
        let ended = self.end_session(guild_id).await;
        Ok(connected || ended)
    }
}

async fn manager(ctx: &serenity::Context) -> Result<Arc<Songbird>> {
    songbird::get(ctx).await.ok_or_else(|| Error::Voice {
        message: "songbird voice client is not registered".to_string(),
    })
}

/// Ends the session when the voice driver drops its connection.
struct DisconnectNotifier {
    guild_id: serenity::GuildId,
    sessions: Arc<VoiceSessions>,
}

#[::serenity::async_trait]
impl EventHandler for DisconnectNotifier {
    async fn act(&self, _ctx: &EventContext<'_>) -> Option<Event> {
        if self.sessions.end_session(self.guild_id).await {
            warn!("Voice connection in guild {} was lost", self.guild_id);
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GUILD: serenity::GuildId = serenity::GuildId::new(1234);

    #[tokio::test]
    async fn test_tokens_are_shared_within_a_session() {
        let sessions = VoiceSessions::new();
        let first = sessions.session_token(GUILD).await;
        let second = sessions.session_token(GUILD).await;

        assert!(sessions.end_session(GUILD).await);
        assert!(first.is_cancelled());
        assert!(second.is_cancelled());
    }

    #[tokio::test]
    async fn test_new_session_after_end() {
        let sessions = VoiceSessions::new();
        let old = sessions.session_token(GUILD).await;
        sessions.end_session(GUILD).await;

        let new = sessions.session_token(GUILD).await;
        assert!(old.is_cancelled());
        assert!(!new.is_cancelled());
    }

    #[tokio::test]
    async fn test_lookup_does_not_start_a_session() {
        let sessions = VoiceSessions::new();
        assert!(sessions.current_token(GUILD).await.is_none());
        assert!(!sessions.end_session(GUILD).await);

        let live = sessions.session_token(GUILD).await;
        let found = sessions.current_token(GUILD).await;
        assert!(found.is_some());

        sessions.end_session(GUILD).await;
        assert!(live.is_cancelled());
        assert!(sessions.current_token(GUILD).await.is_none());
    }

    #[tokio::test]
    async fn test_ending_unknown_session() {
        let sessions = VoiceSessions::new();
        assert!(!sessions.end_session(GUILD).await);
    }

    #[tokio::test]
    async fn test_sessions_are_per_guild() {
        let sessions = VoiceSessions::new();
        let other = serenity::GuildId::new(5678);
        let a = sessions.session_token(GUILD).await;
        let b = sessions.session_token(other).await;

        sessions.end_session(GUILD).await;
        assert!(a.is_cancelled());
        assert!(!b.is_cancelled());
    }
}
