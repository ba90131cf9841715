use std::sync::Arc;

use {
    livewatch_config::DiscordConfig,
    secrecy::ExposeSecret,
    serenity::all::{ApplicationId, ChannelId, Client, Http},
    tokio_util::sync::CancellationToken,
    tracing::info,
};

use crate::{
    error::{Error, Result},
    handler::LivewatchHandler,
};

fn token(config: &DiscordConfig) -> Result<&str> {
    config
        .token
        .as_ref()
        .map(|t| t.expose_secret().as_str())
        .filter(|t| !t.trim().is_empty())
        .ok_or_else(|| Error::missing("token"))
}

pub fn notification_channel(config: &DiscordConfig) -> Result<ChannelId> {
    match config.notification_channel_id {
        0 => Err(Error::missing("notification_channel_id")),
        id => Ok(ChannelId::new(id)),
    }
}

/// REST-only client for the notification surface. Usable before the
/// gateway connects.
pub fn rest_client(config: &DiscordConfig) -> Result<Arc<Http>> {
    let http = Http::new(token(config)?);
    if let Some(id) = config.application_id.filter(|id| *id != 0) {
        http.set_application_id(ApplicationId::new(id));
    }
    Ok(Arc::new(http))
}

/// Connect to the gateway and dispatch events to `handler` until the
/// connection ends or `shutdown` fires.
pub async fn run(
    config: &DiscordConfig,
    handler: LivewatchHandler,
    shutdown: CancellationToken,
) -> Result<()> {
    let mut client = Client::builder(token(config)?, LivewatchHandler::intents())
        .event_handler(handler)
        .await?;
    if let Some(id) = config.application_id.filter(|id| *id != 0) {
        client.http.set_application_id(ApplicationId::new(id));
    }

    let shard_manager = Arc::clone(&client.shard_manager);
    tokio::select! {
        result = client.start() => result?,
        () = shutdown.cancelled() => {
            info!("closing discord gateway connection");
            shard_manager.shutdown_all().await;
        },
    }
    Ok(())
}
