//! Identifiers shared between the watch list and the reconciliation engine.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Base URL for channel links.
pub const CHANNEL_URL_BASE: &str = "https://twitch.tv";

/// Normalized (trimmed, lower-cased) broadcast channel login.
///
/// Serializes as a bare string so a watch list persists as a plain JSON
/// array of names.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct ChannelId(String);

impl ChannelId {
    /// Normalize `raw`. Returns `None` when nothing is left after trimming.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }
        Some(Self(trimmed.to_lowercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Public channel page.
    pub fn url(&self) -> String {
        format!("{CHANNEL_URL_BASE}/{}", self.0)
    }

    /// Name with `_` escaped for chat markdown.
    pub fn escaped(&self) -> String {
        self.0.replace('_', "\\_")
    }
}

impl fmt::Display for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ChannelId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl<'de> Deserialize<'de> for ChannelId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).ok_or_else(|| serde::de::Error::custom("empty channel name"))
    }
}
