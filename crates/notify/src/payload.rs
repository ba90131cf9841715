//! Builds the platform-neutral notification for a live channel.

use std::fmt;

use {
    chrono::{DateTime, Utc},
    livewatch_common::ChannelId,
};

use crate::types::{LiveSnapshot, NotificationPayload};

/// Brand colour of the notification card.
pub const NOTIFICATION_COLOUR: u32 = 0x9146FF;
/// Shown when the stream has no category.
pub const CATEGORY_PLACEHOLDER: &str = "Not specified";

const THUMBNAIL_WIDTH: &str = "1920";
const THUMBNAIL_HEIGHT: &str = "1080";

/// Broadcast duration in whole hours and remainder minutes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Elapsed {
    pub hours: u64,
    pub minutes: u64,
}

impl Elapsed {
    /// Time from `start` to `now`, clamped at zero when `start` lies in the future.
    pub fn between(start: DateTime<Utc>, now: DateTime<Utc>) -> Self {
        let secs = u64::try_from((now - start).num_seconds()).unwrap_or(0);
        Self {
            hours: secs / 3600,
            minutes: (secs % 3600) / 60,
        }
    }
}

impl fmt::Display for Elapsed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}h{}m", self.hours, self.minutes)
    }
}

/// Thumbnail sized for the card, with a cache-busting `t` parameter so chat
/// clients fetch a fresh preview on every edit.
pub fn thumbnail_url(template: &str, now: DateTime<Utc>) -> String {
    let url = template
        .replace("{width}", THUMBNAIL_WIDTH)
        .replace("{height}", THUMBNAIL_HEIGHT);
    format!("{url}?t={}", now.timestamp_millis())
}

/// `1234567` → `1,234,567`.
pub fn format_viewers(count: u64) -> String {
    let digits = count.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

pub fn build_payload(
    channel: &ChannelId,
    snapshot: &LiveSnapshot,
    elapsed: Elapsed,
    now: DateTime<Utc>,
) -> NotificationPayload {
    let name = if snapshot.display_name.is_empty() {
        channel.as_str()
    } else {
        snapshot.display_name.as_str()
    };
    NotificationPayload {
        title: snapshot.title.clone(),
        url: channel.url(),
        author_name: format!("{name} is live on Twitch!"),
        author_icon_url: snapshot.avatar_url.clone(),
        image_url: thumbnail_url(&snapshot.thumbnail_url_template, now),
        viewers: format_viewers(snapshot.viewer_count),
        category: snapshot
            .category_name
            .clone()
            .filter(|c| !c.is_empty())
            .unwrap_or_else(|| CATEGORY_PLACEHOLDER.to_string()),
        live_for: elapsed.to_string(),
        timestamp: now,
        colour: NOTIFICATION_COLOUR,
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use {
        super::*,
        chrono::{Duration, TimeZone},
        rstest::rstest,
    };

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000 + secs, 0).single().unwrap()
    }

    #[rstest]
    #[case(0, 0, 0)]
    #[case(59, 0, 0)]
    #[case(90 * 60, 1, 30)]
    #[case(2 * 3600 + 59, 2, 0)]
    #[case(3 * 3600 + 61 * 60, 4, 1)]
    fn elapsed_splits_hours_and_minutes(
        #[case] secs: i64,
        #[case] hours: u64,
        #[case] minutes: u64,
    ) {
        assert_eq!(Elapsed::between(at(0), at(secs)), Elapsed { hours, minutes });
    }

    #[test]
    fn elapsed_clamps_future_start() {
        let e = Elapsed::between(at(600), at(0));
        assert_eq!(e, Elapsed { hours: 0, minutes: 0 });
        assert_eq!(e.to_string(), "0h0m");
    }

    #[rstest]
    #[case(0, "0")]
    #[case(42, "42")]
    #[case(999, "999")]
    #[case(1000, "1,000")]
    #[case(12345, "12,345")]
    #[case(1234567, "1,234,567")]
    fn viewers_get_separators(#[case] count: u64, #[case] expected: &str) {
        assert_eq!(format_viewers(count), expected);
    }

    #[test]
    fn payload_fields() {
        let now = at(0);
        let channel = ChannelId::parse("alice").unwrap();
        let snapshot = LiveSnapshot {
            display_name: "Alice".into(),
            title: "Speedrun".into(),
            category_id: Some("509658".into()),
            category_name: None,
            viewer_count: 4200,
            started_at: now - Duration::minutes(75),
            thumbnail_url_template: "https://cdn/x-{width}x{height}.jpg".into(),
            avatar_url: Some("https://cdn/alice.png".into()),
        };

        let payload = build_payload(
            &channel,
            &snapshot,
            Elapsed::between(snapshot.started_at, now),
            now,
        );

        assert_eq!(payload.title, "Speedrun");
        assert_eq!(payload.url, "https://twitch.tv/alice");
        assert_eq!(payload.author_name, "Alice is live on Twitch!");
        assert_eq!(
            payload.image_url,
            format!("https://cdn/x-1920x1080.jpg?t={}", now.timestamp_millis())
        );
        assert_eq!(payload.viewers, "4,200");
        assert_eq!(payload.category, CATEGORY_PLACEHOLDER);
        assert_eq!(payload.live_for, "1h15m");
        assert_eq!(payload.timestamp, now);
        assert_eq!(payload.colour, 0x9146FF);
    }
}
