//! Discord side of the notifier: the notification channel as a
//! [`livewatch_notify::NotificationSurface`], slash commands for the watch
//! list, and the gateway connection that ties them together.

pub mod bot;
pub mod commands;
pub mod embed;
pub mod error;
pub mod handler;
pub mod purge;
pub mod surface;

pub use {
    bot::{notification_channel, rest_client, run},
    error::{Error, Result},
    handler::{HandlerSettings, LivewatchHandler},
    surface::DiscordSurface,
};
