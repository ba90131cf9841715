use std::fmt;

use chrono::{DateTime, Utc};

/// Platform identifier of a posted notification message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MessageId(pub u64);

impl MessageId {
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for MessageId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

/// What a channel looks like right now, while it is broadcasting.
/// Lives for a single reconciliation pass.
#[derive(Debug, Clone, PartialEq)]
pub struct LiveSnapshot {
    /// Streamer name as the platform displays it.
    pub display_name: String,
    pub title: String,
    pub category_id: Option<String>,
    pub category_name: Option<String>,
    pub viewer_count: u64,
    pub started_at: DateTime<Utc>,
    /// Thumbnail URL with `{width}` and `{height}` placeholders.
    pub thumbnail_url_template: String,
    pub avatar_url: Option<String>,
}

/// Rendered notification, independent of the chat platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationPayload {
    pub title: String,
    pub url: String,
    pub author_name: String,
    pub author_icon_url: Option<String>,
    pub image_url: String,
    pub viewers: String,
    pub category: String,
    pub live_for: String,
    pub timestamp: DateTime<Utc>,
    pub colour: u32,
}

/// A message as returned by [`NotificationSurface::fetch`](crate::NotificationSurface::fetch).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostedMessage {
    pub id: MessageId,
}
