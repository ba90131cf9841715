//! Configuration loading, env substitution, environment overrides and validation.
//!
//! Config files: `livewatch.toml`, `livewatch.yaml`, or `livewatch.json`
//! Searched in `./` then `~/.config/livewatch/`.
//!
//! Supports `${ENV_VAR}` and `${ENV_VAR:-fallback}` substitution in the raw file.

pub mod env_subst;
pub mod error;
pub mod loader;
pub mod schema;
pub mod validate;

pub use {
    error::{Error, Result},
    loader::{apply_env_overrides, config_dir, discover_and_load, find_config_file, load_config},
    schema::{DiscordConfig, LivewatchConfig, TwitchConfig, WatchConfig},
    validate::{Diagnostic, Severity, validate},
};
