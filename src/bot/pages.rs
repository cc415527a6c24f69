//! Delivery of soundboard pages to Discord.
//!
//! The first page answers the interaction, later pages are follow-ups. Delivery stops
//! as soon as the voice session's token is cancelled, and a background watcher blanks
//! every delivered page once that happens.

use crate::{
    bot::BotData,
    core::layout::{Grid, Page},
    errors::{Error, Result},
};
use poise::serenity_prelude as serenity;
use std::{sync::Arc, time::Duration};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Text that replaces a page once its session has ended.
pub const EXPIRED_NOTICE: &str = "This request has expired.";

/// How long Discord lets us edit interaction responses.
pub const INTERACTION_LIFETIME: Duration = Duration::from_secs(15 * 60);

/// Discord's limit on the value of a single embed field.
pub const EMBED_FIELD_LIMIT: usize = 1024;

/// Discord allows 6000 characters per embed; titles and descriptions need some of them.
const EMBED_LISTING_BUDGET: usize = 5000;

/// Converts a grid into action rows of primary buttons.
#[must_use]
pub fn action_rows(grid: &Grid) -> Vec<serenity::CreateActionRow> {
    grid.rows
        .iter()
        .map(|row| {
            serenity::CreateActionRow::Buttons(
                row.iter()
                    .map(|button| {
                        serenity::CreateButton::new(button.token.clone())
                            .label(button.label.clone())
                            .style(serenity::ButtonStyle::Primary)
                    })
                    .collect(),
            )
        })
        .collect()
}

/// Splits a numbered listing of `names` into `(name, value, inline)` embed fields.
///
/// No field value exceeds [`EMBED_FIELD_LIMIT`]. Entries that would push the embed
/// past its size budget are summarised in a final "and N more" line.
#[must_use]
pub fn listing_fields(title: &str, names: &[&str]) -> Vec<(String, String, bool)> {
    let mut fields: Vec<(String, String, bool)> = Vec::new();
    let mut current = String::new();
    let mut used = 0;

    for (index, name) in names.iter().enumerate() {
        let line = format!("{}) {}\n", index + 1, name);
        if used + line.len() > EMBED_LISTING_BUDGET {
            let remaining = names.len() - index;
            let more = format!("…and {remaining} more");
            if current.len() + more.len() > EMBED_FIELD_LIMIT {
                push_field(&mut fields, title, std::mem::take(&mut current));
            }
            current.push_str(&more);
            break;
        }
        if current.len() + line.len() > EMBED_FIELD_LIMIT {
            push_field(&mut fields, title, std::mem::take(&mut current));
        }
        used += line.len();
        current.push_str(&line);
    }
    push_field(&mut fields, title, current);
    fields
}

fn push_field(fields: &mut Vec<(String, String, bool)>, title: &str, value: String) {
    let value = value.trim_end().to_string();
    if value.is_empty() {
        return;
    }
    let name = if fields.is_empty() {
        title.to_string()
    } else {
        format!("{title} (cont.)")
    };
    fields.push((name, value, false));
}

/// Builds the embed sent to members who are not in a voice channel.
#[must_use]
pub fn listing_embed(title: &str, description: &str, field: &str, names: &[&str]) -> serenity::CreateEmbed {
    serenity::CreateEmbed::default()
        .title(title)
        .description(description)
        .fields(listing_fields(field, names))
        .color(0x0058_65F2)
}

/// Where pages go.
#[derive(Clone, Copy)]
pub enum PageTarget<'a> {
    /// A slash command invocation.
    Command(poise::Context<'a, BotData, Error>),
    /// A button press.
    Component {
        /// Serenity context of the event
        ctx: &'a serenity::Context,
        /// The pressed button's interaction
        interaction: &'a serenity::ComponentInteraction,
    },
}

impl PageTarget<'_> {
    /// Sends a private text-only answer.
    pub async fn notice(self, content: &str) -> Result<()> {
        match self {
            Self::Command(ctx) => {
                ctx.send(
                    poise::CreateReply::default()
                        .content(content)
                        .ephemeral(true),
                )
                .await?;
            }
            Self::Component { ctx, interaction } => {
                let message = serenity::CreateInteractionResponseMessage::new()
                    .content(content)
                    .ephemeral(true);
                interaction
                    .create_response(&ctx.http, serenity::CreateInteractionResponse::Message(message))
                    .await?;
            }
        }
        Ok(())
    }

    /// Sends one page. Follow-ups return the id of the message they created.
    async fn send(self, page: &Page, first: bool) -> Result<Option<serenity::MessageId>> {
        let components = action_rows(&page.grid);
        match self {
            Self::Command(ctx) => {
                let mut reply = poise::CreateReply::default()
                    .components(components)
                    .ephemeral(true);
                if let Some(header) = &page.header {
                    reply = reply.content(header.clone());
                }
                let handle = ctx.send(reply).await?;
                if first {
                    Ok(None)
                } else {
                    Ok(Some(handle.message().await?.id))
                }
            }
            Self::Component { ctx, interaction } if first => {
                let mut message = serenity::CreateInteractionResponseMessage::new()
                    .components(components)
                    .ephemeral(true);
                if let Some(header) = &page.header {
                    message = message.content(header.clone());
                }
                interaction
                    .create_response(&ctx.http, serenity::CreateInteractionResponse::Message(message))
                    .await?;
                Ok(None)
            }
            Self::Component { ctx, interaction } => {
                let mut followup = serenity::CreateInteractionResponseFollowup::new()
                    .components(components)
                    .ephemeral(true);
                if let Some(header) = &page.header {
                    followup = followup.content(header.clone());
                }
                let message = interaction.create_followup(&ctx.http, followup).await?;
                Ok(Some(message.id))
            }
        }
    }

    fn expiry(self, followups: Vec<serenity::MessageId>) -> Option<PageExpiry> {
        match self {
            Self::Command(ctx) => {
                let poise::Context::Application(app) = ctx else {
                    return None;
                };
                Some(PageExpiry {
                    http: Arc::clone(&ctx.serenity_context().http),
                    interaction: Interaction::Command(app.interaction.clone()),
                    followups,
                })
            }
            Self::Component { ctx, interaction } => Some(PageExpiry {
                http: Arc::clone(&ctx.http),
                interaction: Interaction::Component(interaction.clone()),
                followups,
            }),
        }
    }
}

enum Interaction {
    Command(serenity::CommandInteraction),
    Component(serenity::ComponentInteraction),
}

/// Everything needed to blank delivered pages after the interaction has returned.
struct PageExpiry {
    http: Arc<serenity::Http>,
    interaction: Interaction,
    followups: Vec<serenity::MessageId>,
}

impl PageExpiry {
    async fn expire(self) {
        let original = serenity::EditInteractionResponse::new()
            .content(EXPIRED_NOTICE)
            .components(Vec::new());
        let result = match &self.interaction {
            Interaction::Command(i) => i.edit_response(&self.http, original).await,
            Interaction::Component(i) => i.edit_response(&self.http, original).await,
        };
        if let Err(e) = result {
            warn!("Failed to expire soundboard page: {}", e);
        }

        for id in &self.followups {
            let edit = serenity::CreateInteractionResponseFollowup::new()
                .content(EXPIRED_NOTICE)
                .components(Vec::new());
            let result = match &self.interaction {
                Interaction::Command(i) => i.edit_followup(&self.http, *id, edit).await,
                Interaction::Component(i) => i.edit_followup(&self.http, *id, edit).await,
            };
            if let Err(e) = result {
                warn!("Failed to expire soundboard page {}: {}", id, e);
            }
        }
    }
}

/// Sends `pages` to `target` until `cancel` fires, then arranges for them to expire.
pub async fn deliver(target: PageTarget<'_>, pages: &[Page], cancel: CancellationToken) -> Result<()> {
    let mut followups = Vec::new();

    for (index, page) in pages.iter().enumerate() {
        if cancel.is_cancelled() {
            info!(
                "Voice session ended, skipping {} remaining page(s)",
                pages.len() - index
            );
            if index == 0 {
                return target.notice(EXPIRED_NOTICE).await;
            }
            break;
        }
        if let Some(id) = target.send(page, index == 0).await? {
            followups.push(id);
        }
    }

    if let Some(expiry) = target.expiry(followups) {
        tokio::spawn(async move {
            tokio::select! {
                () = cancel.cancelled() => expiry.expire().await,
                () = tokio::time::sleep(INTERACTION_LIFETIME) => {}
            }
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::layout::Button;

    fn grid(rows: &[usize]) -> Grid {
        Grid {
            rows: rows
                .iter()
                .map(|&n| {
                    (0..n)
                        .map(|i| Button {
                            label: format!("s{i}"),
                            token: format!("sound:s{i}"),
                        })
                        .collect()
                })
                .collect(),
        }
    }

    #[test]
    fn test_action_rows_match_grid() {
        let rows = action_rows(&grid(&[5, 5, 2]));
        assert_eq!(rows.len(), 3);
        let sizes: Vec<usize> = rows
            .iter()
            .map(|row| match row {
                serenity::CreateActionRow::Buttons(buttons) => buttons.len(),
                _ => 0,
            })
            .collect();
        assert_eq!(sizes, vec![5, 5, 2]);
    }

    #[test]
    fn test_short_listing_is_one_field() {
        let fields = listing_fields("Sounds", &["airhorn", "bruh"]);
        assert_eq!(fields.len(), 1);
        assert_eq!(fields[0].0, "Sounds");
        assert_eq!(fields[0].1, "1) airhorn\n2) bruh");
    }

    #[test]
    fn test_long_listing_is_split() {
        let names: Vec<String> = (0..80).map(|i| format!("{i:0>40}")).collect();
        let refs: Vec<&str> = names.iter().map(String::as_str).collect();
        let fields = listing_fields("Sounds", &refs);

        assert!(fields.len() > 1);
        assert!(fields.iter().all(|(_, value, _)| value.len() <= EMBED_FIELD_LIMIT));
        assert_eq!(fields[1].0, "Sounds (cont.)");

        let lines: usize = fields.iter().map(|(_, value, _)| value.lines().count()).sum();
        assert_eq!(lines, 80);
    }

    #[test]
    fn test_oversized_listing_is_summarised() {
        let names: Vec<String> = (0..300).map(|i| format!("{i:0>45}")).collect();
        let refs: Vec<&str> = names.iter().map(String::as_str).collect();
        let fields = listing_fields("Sounds", &refs);

        let total: usize = fields.iter().map(|(_, value, _)| value.len()).sum();
        assert!(total <= EMBED_LISTING_BUDGET + EMBED_FIELD_LIMIT);
        assert!(fields.iter().all(|(_, value, _)| value.len() <= EMBED_FIELD_LIMIT));
        let last = &fields[fields.len() - 1].1;
        assert!(last.ends_with("more"), "{last}");
    }

    #[test]
    fn test_empty_listing_has_no_fields() {
        assert!(listing_fields("Sounds", &[]).is_empty());
    }
}
