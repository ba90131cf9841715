//! Config schema types (discord, twitch, watch).
use std::path::PathBuf;

use {
    secrecy::{ExposeSecret, Secret},
    serde::{Deserialize, Serialize},
};

/// Default Helix API base.
pub const DEFAULT_TWITCH_API_BASE: &str = "https://api.twitch.tv/helix";
/// Default Twitch OAuth base.
pub const DEFAULT_TWITCH_AUTH_BASE: &str = "https://id.twitch.tv";
/// Discord caps a single message history fetch at 100 entries.
pub const MAX_PURGE_LIMIT: u8 = 100;

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LivewatchConfig {
    pub discord: DiscordConfig,
    pub twitch: TwitchConfig,
    pub watch: WatchConfig,
}

/// Discord bot and notification channel settings.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscordConfig {
    /// Bot token.
    #[serde(
        default,
        serialize_with = "serialize_option_secret",
        skip_serializing_if = "Option::is_none"
    )]
    pub token: Option<Secret<String>>,

    /// Application (client) ID. Optional: serenity learns it from the
    /// gateway `READY` event when unset.
    pub application_id: Option<u64>,

    /// Channel that receives live notifications.
    pub notification_channel_id: u64,

    /// Delete the bot's previous messages in the notification channel at startup.
    pub purge_on_start: bool,

    /// How many recent messages the startup purge inspects (1..=100).
    pub purge_limit: u8,

    /// Custom status shown on the bot's profile.
    pub activity: Option<String>,
}

impl std::fmt::Debug for DiscordConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiscordConfig")
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .field("application_id", &self.application_id)
            .field("notification_channel_id", &self.notification_channel_id)
            .field("purge_on_start", &self.purge_on_start)
            .field("purge_limit", &self.purge_limit)
            .field("activity", &self.activity)
            .finish()
    }
}

impl Default for DiscordConfig {
    fn default() -> Self {
        Self {
            token: None,
            application_id: None,
            notification_channel_id: 0,
            purge_on_start: true,
            purge_limit: MAX_PURGE_LIMIT,
            activity: Some("🎮 Watching streams".into()),
        }
    }
}

/// Twitch application credentials and endpoints.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TwitchConfig {
    pub client_id: String,

    #[serde(
        default,
        serialize_with = "serialize_option_secret",
        skip_serializing_if = "Option::is_none"
    )]
    pub client_secret: Option<Secret<String>>,

    /// Helix base URL (overridable for tests and proxies).
    pub api_base: String,

    /// OAuth base URL used for the client-credentials grant.
    pub auth_base: String,
}

impl std::fmt::Debug for TwitchConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TwitchConfig")
            .field("client_id", &self.client_id)
            .field("client_secret", &self.client_secret.as_ref().map(|_| "[REDACTED]"))
            .field("api_base", &self.api_base)
            .field("auth_base", &self.auth_base)
            .finish()
    }
}

impl Default for TwitchConfig {
    fn default() -> Self {
        Self {
            client_id: String::new(),
            client_secret: None,
            api_base: DEFAULT_TWITCH_API_BASE.into(),
            auth_base: DEFAULT_TWITCH_AUTH_BASE.into(),
        }
    }
}

/// Watch list location and polling cadence.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WatchConfig {
    /// JSON file holding the watched channel names.
    pub list_path: PathBuf,

    /// Seconds between reconciliation ticks.
    pub poll_interval_secs: u64,

    /// Live notifications are deleted and re-posted every this many hours
    /// of broadcast. 0 disables the forced refresh.
    pub refresh_interval_hours: u32,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            list_path: PathBuf::from("streamers.json"),
            poll_interval_secs: 60,
            refresh_interval_hours: 2,
        }
    }
}

// ── Serde helpers for Secret<String> ────────────────────────────────────────

fn serialize_option_secret<S: serde::Serializer>(
    secret: &Option<Secret<String>>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match secret {
        Some(s) => serializer.serialize_some(s.expose_secret()),
        None => serializer.serialize_none(),
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cfg = LivewatchConfig::default();
        assert_eq!(cfg.watch.poll_interval_secs, 60);
        assert_eq!(cfg.watch.refresh_interval_hours, 2);
        assert_eq!(cfg.watch.list_path, PathBuf::from("streamers.json"));
        assert!(cfg.discord.purge_on_start);
        assert_eq!(cfg.discord.purge_limit, 100);
        assert_eq!(cfg.twitch.api_base, DEFAULT_TWITCH_API_BASE);
    }

    #[test]
    fn deserialize_partial_toml() {
        let raw = r#"
            [discord]
            token = "abc"
            notification_channel_id = 1234

            [watch]
            poll_interval_secs = 30
        "#;
        let cfg: LivewatchConfig = toml::from_str(raw).unwrap();
        assert_eq!(cfg.discord.token.unwrap().expose_secret(), "abc");
        assert_eq!(cfg.discord.notification_channel_id, 1234);
        assert_eq!(cfg.watch.poll_interval_secs, 30);
        assert_eq!(cfg.watch.refresh_interval_hours, 2);
    }

    #[test]
    fn debug_redacts_secrets() {
        let cfg = LivewatchConfig {
            discord: DiscordConfig {
                token: Some(Secret::new("super-secret".into())),
                ..Default::default()
            },
            twitch: TwitchConfig {
                client_secret: Some(Secret::new("hidden".into())),
                ..Default::default()
            },
            ..Default::default()
        };
        let out = format!("{cfg:?}");
        assert!(!out.contains("super-secret"));
        assert!(!out.contains("hidden"));
        assert!(out.contains("[REDACTED]"));
    }
}
