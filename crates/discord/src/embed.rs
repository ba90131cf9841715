//! Notification payload → Discord embed.

use {
    livewatch_notify::NotificationPayload,
    serenity::all::{CreateEmbed, CreateEmbedAuthor, Timestamp},
};

pub const VIEWERS_FIELD: &str = "👥 Viewers";
pub const CATEGORY_FIELD: &str = "🎮 Category";
pub const LIVE_FOR_FIELD: &str = "⏱️ Live for";

pub fn build_embed(payload: &NotificationPayload) -> CreateEmbed {
    let mut author = CreateEmbedAuthor::new(&payload.author_name);
    if let Some(icon) = &payload.author_icon_url {
        author = author.icon_url(icon);
    }

    let mut embed = CreateEmbed::new()
        .title(&payload.title)
        .url(&payload.url)
        .author(author)
        .image(&payload.image_url)
        .field(VIEWERS_FIELD, &payload.viewers, true)
        .field(CATEGORY_FIELD, &payload.category, true)
        .field(LIVE_FOR_FIELD, &payload.live_for, true)
        .colour(payload.colour);

    if let Ok(ts) = Timestamp::from_unix_timestamp(payload.timestamp.timestamp()) {
        embed = embed.timestamp(ts);
    }
    embed
}
