use std::{sync::Arc, time::Duration};

use {
    anyhow::{Result, bail},
    livewatch_config::{LivewatchConfig, Severity, validate},
    livewatch_discord::{DiscordSurface, HandlerSettings, LivewatchHandler},
    livewatch_notify::{ReconcileService, ReconciliationEngine, RefreshPolicy},
    livewatch_twitch::HelixClient,
    livewatch_watchlist::{WatchListAdmin, store_file::FileStore},
    tokio_util::sync::CancellationToken,
    tracing::{error, info, warn},
};

/// Start the bot and block until the gateway closes or Ctrl-C.
pub async fn run(config: LivewatchConfig) -> Result<()> {
    let diagnostics = validate(&config);
    for d in &diagnostics {
        match d.severity {
            Severity::Error => error!(path = d.path, "{}", d.message),
            Severity::Warning => warn!(path = d.path, "{}", d.message),
        }
    }
    if diagnostics.iter().any(|d| d.severity == Severity::Error) {
        bail!("configuration has errors; see `livewatch config check`");
    }

    let store = Arc::new(FileStore::new(&config.watch.list_path));
    let admin = Arc::new(WatchListAdmin::load(store).await?);

    let source = Arc::new(HelixClient::from_config(&config.twitch)?);
    let http = livewatch_discord::rest_client(&config.discord)?;
    let settings = HandlerSettings::from_config(&config.discord)?;
    let surface = Arc::new(DiscordSurface::new(http, settings.notification_channel));

    let engine = ReconciliationEngine::new(admin.shared(), source, surface)
        .with_policy(RefreshPolicy::new(config.watch.refresh_interval_hours));
    let service =
        ReconcileService::new(engine, Duration::from_secs(config.watch.poll_interval_secs));
    let handler = LivewatchHandler::new(settings, Arc::clone(&admin), Arc::clone(&service));

    let shutdown = CancellationToken::new();
    let signal = shutdown.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("shutdown requested");
            signal.cancel();
        }
    });

    info!(
        list = %config.watch.list_path.display(),
        interval_secs = config.watch.poll_interval_secs,
        "connecting to discord"
    );
    let result = livewatch_discord::run(&config.discord, handler, shutdown).await;
    service.stop().await;
    Ok(result?)
}
