use std::path::{Path, PathBuf};

use {
    secrecy::Secret,
    tracing::{debug, warn},
};

use crate::{
    Error, Result,
    env_subst::substitute_env,
    schema::LivewatchConfig,
};

/// Standard config file names, checked in order.
const CONFIG_FILENAMES: &[&str] = &[
    "livewatch.toml",
    "livewatch.yaml",
    "livewatch.yml",
    "livewatch.json",
];

/// Load config from the given path (any supported format).
pub fn load_config(path: &Path) -> Result<LivewatchConfig> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| Error::external(format!("failed to read {}", path.display()), e))?;
    let raw = substitute_env(&raw);
    parse_config(&raw, path)
}

/// Discover and load config from standard locations, then apply environment
/// overrides.
///
/// Search order:
/// 1. `explicit` when given (a read/parse failure is returned as an error)
/// 2. `./livewatch.{toml,yaml,yml,json}` (project-local)
/// 3. `~/.config/livewatch/livewatch.{toml,yaml,yml,json}` (user-global)
///
/// Falls back to `LivewatchConfig::default()` if no config file is found or
/// a discovered file fails to parse.
pub fn discover_and_load(explicit: Option<&Path>) -> Result<LivewatchConfig> {
    let mut config = if let Some(path) = explicit {
        debug!(path = %path.display(), "loading config");
        load_config(path)?
    } else if let Some(path) = find_config_file() {
        debug!(path = %path.display(), "loading config");
        match load_config(&path) {
            Ok(cfg) => cfg,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to load config, using defaults");
                LivewatchConfig::default()
            },
        }
    } else {
        debug!("no config file found, using defaults");
        LivewatchConfig::default()
    };
    apply_env_overrides(&mut config);
    Ok(config)
}

/// Find the first config file in standard locations.
pub fn find_config_file() -> Option<PathBuf> {
    for name in CONFIG_FILENAMES {
        let p = PathBuf::from(name);
        if p.exists() {
            return Some(p);
        }
    }

    if let Some(dir) = config_dir() {
        for name in CONFIG_FILENAMES {
            let p = dir.join(name);
            if p.exists() {
                return Some(p);
            }
        }
    }

    None
}

/// Returns the user-global config directory (`~/.config/livewatch/`).
pub fn config_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "livewatch").map(|d| d.config_dir().to_path_buf())
}

/// Overlay well-known environment variables on top of file values.
pub fn apply_env_overrides(config: &mut LivewatchConfig) {
    apply_env_overrides_with(config, |name| std::env::var(name).ok());
}

fn apply_env_overrides_with(config: &mut LivewatchConfig, lookup: impl Fn(&str) -> Option<String>) {
    let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

    if let Some(token) = get("DISCORD_TOKEN") {
        config.discord.token = Some(Secret::new(token));
    }
    if let Some(raw) = get("DISCORD_CLIENT_ID") {
        match raw.trim().parse() {
            Ok(id) => config.discord.application_id = Some(id),
            Err(e) => warn!(value = %raw, error = %e, "ignoring invalid DISCORD_CLIENT_ID"),
        }
    }
    if let Some(raw) = get("NOTIFICATION_CHANNEL_ID") {
        match raw.trim().parse() {
            Ok(id) => config.discord.notification_channel_id = id,
            Err(e) => warn!(value = %raw, error = %e, "ignoring invalid NOTIFICATION_CHANNEL_ID"),
        }
    }
    if let Some(id) = get("TWITCH_CLIENT_ID") {
        config.twitch.client_id = id;
    }
    if let Some(secret) = get("TWITCH_CLIENT_SECRET") {
        config.twitch.client_secret = Some(Secret::new(secret));
    }
    if let Some(path) = get("LIVEWATCH_WATCHLIST") {
        config.watch.list_path = PathBuf::from(path);
    }
}

fn parse_config(raw: &str, path: &Path) -> Result<LivewatchConfig> {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("toml");

    match ext {
        "toml" => Ok(toml::from_str(raw)?),
        "yaml" | "yml" => Ok(serde_yaml::from_str(raw)?),
        "json" => Ok(serde_json::from_str(raw)?),
        _ => Err(Error::message(format!("unsupported config format: .{ext}"))),
    }
}
