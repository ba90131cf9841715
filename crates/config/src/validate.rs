//! Semantic validation of a loaded configuration.
//!
//! Parsing already rejects malformed files; this pass catches values that
//! parse fine but cannot run (missing credentials, zero ids, bad intervals).

use secrecy::ExposeSecret;

use crate::schema::{LivewatchConfig, MAX_PURGE_LIMIT};

/// Severity level for a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Error,
    Warning,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Error => write!(f, "error"),
            Self::Warning => write!(f, "warning"),
        }
    }
}

/// A single validation diagnostic.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub severity: Severity,
    /// Dotted path, e.g. "discord.token"
    pub path: &'static str,
    pub message: String,
}

impl Diagnostic {
    fn error(path: &'static str, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            path,
            message: message.into(),
        }
    }

    fn warning(path: &'static str, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            path,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}: {}", self.severity, self.path, self.message)
    }
}

fn is_blank(secret: Option<&secrecy::Secret<String>>) -> bool {
    secret.is_none_or(|s| s.expose_secret().trim().is_empty())
}

/// Check everything the daemon needs before it connects anywhere.
#[must_use]
pub fn validate(config: &LivewatchConfig) -> Vec<Diagnostic> {
    let mut out = Vec::new();

    if is_blank(config.discord.token.as_ref()) {
        out.push(Diagnostic::error(
            "discord.token",
            "bot token is required (or set DISCORD_TOKEN)",
        ));
    }
    if config.discord.notification_channel_id == 0 {
        out.push(Diagnostic::error(
            "discord.notification_channel_id",
            "notification channel id is required (or set NOTIFICATION_CHANNEL_ID)",
        ));
    }
    if config.discord.purge_limit == 0 || config.discord.purge_limit > MAX_PURGE_LIMIT {
        out.push(Diagnostic::error(
            "discord.purge_limit",
            format!("must be between 1 and {MAX_PURGE_LIMIT}"),
        ));
    }
    if config.twitch.client_id.trim().is_empty() {
        out.push(Diagnostic::error(
            "twitch.client_id",
            "client id is required (or set TWITCH_CLIENT_ID)",
        ));
    }
    if is_blank(config.twitch.client_secret.as_ref()) {
        out.push(Diagnostic::error(
            "twitch.client_secret",
            "client secret is required (or set TWITCH_CLIENT_SECRET)",
        ));
    }
    if config.watch.poll_interval_secs == 0 {
        out.push(Diagnostic::error(
            "watch.poll_interval_secs",
            "poll interval must be at least one second",
        ));
    } else if config.watch.poll_interval_secs > 60 {
        out.push(Diagnostic::warning(
            "watch.poll_interval_secs",
            "intervals above 60s can skip the minute a forced refresh is due",
        ));
    }

    out
}
