use std::sync::Arc;

use {
    anyhow::{Result, bail},
    livewatch_config::{LivewatchConfig, Severity, validate},
    livewatch_notify::{ReconciliationEngine, RefreshPolicy, fake::FakeSurface},
    livewatch_twitch::HelixClient,
    livewatch_watchlist::{WatchListStore, store_file::FileStore},
};

/// Dry run: reconcile once against Twitch with an in-memory surface, so
/// nothing is posted to Discord.
pub async fn check(config: &LivewatchConfig) -> Result<()> {
    let problems: Vec<_> = validate(config)
        .into_iter()
        .filter(|d| d.severity == Severity::Error && d.path.starts_with("twitch."))
        .collect();
    if !problems.is_empty() {
        for d in &problems {
            eprintln!("  {d}");
        }
        bail!("twitch credentials are incomplete");
    }

    let list = FileStore::new(&config.watch.list_path).load().await?;
    if list.is_empty() {
        println!("No channels are being watched.");
        return Ok(());
    }

    let source = Arc::new(HelixClient::from_config(&config.twitch)?);
    let surface = Arc::new(FakeSurface::new());
    let mut engine =
        ReconciliationEngine::new(list.into_shared(), source, Arc::clone(&surface) as _)
            .with_policy(RefreshPolicy::new(config.watch.refresh_interval_hours));

    let report = engine.reconcile().await;
    for entry in &report.channels {
        match &entry.outcome {
            Ok(action) => match action.current_message().and_then(|id| surface.message(id)) {
                Some(p) => println!(
                    "{:<24} live     {} | {} viewers | {} | {}",
                    entry.channel.as_str(), p.title, p.viewers, p.category, p.live_for
                ),
                None => println!("{:<24} offline", entry.channel.as_str()),
            },
            Err(e) => println!("{:<24} error    {e}", entry.channel.as_str()),
        }
    }

    let failed = report.failures().count();
    if failed > 0 {
        bail!("{failed} channel(s) could not be checked");
    }
    Ok(())
}
